//! Volition - Utility-Driven Decision and Planning Engine
//!
//! Agents carry drives (pressures that build over time or mirror an
//! attribute) and pick behaviors by scoring candidate action mappings:
//! response curves shape raw levels into utilities, factors gate and
//! weight candidates, and the decider ranks drives, plans the most
//! pressing one and watches executing plans for better alternatives.

pub mod agent;
pub mod attribute;
pub mod core;
pub mod curve;
pub mod decider;
pub mod drive;
pub mod engine;
pub mod factor;
pub mod modifier;
pub mod plan;
pub mod ports;
pub mod utility;

pub use engine::Engine;
