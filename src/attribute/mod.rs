//! Attribute model: bounded or categorical agent properties

pub mod interaction;
pub mod state;
pub mod types;

pub use interaction::AttributeCurveTable;
pub use state::AttributeState;
pub use types::{AttributeKind, AttributeType, AttributeTypeId, AttributeTypeRegistry};
