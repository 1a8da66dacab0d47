//! Drive model: need dimensions with bounded levels and derived utility

pub mod equation;
pub mod state;
pub mod types;

pub use equation::EquationKind;
pub use state::DriveState;
pub use types::{ChangeRule, DriveType, DriveTypeId, DriveTypeRegistry, SyncDirection, SyncSource};
