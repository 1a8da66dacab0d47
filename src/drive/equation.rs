//! Pluggable drive-change equations
//!
//! An equation-synced drive never rate-advances; its level moves only
//! when an action outcome is applied, and the equation decides how the
//! outcome's output change translates into a level delta.

use serde::{Deserialize, Serialize};

use crate::drive::state::DriveState;
use crate::plan::Mapping;

/// Built-in equation variants, selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EquationKind {
    /// Level delta proportional to the output change
    Linear { per_unit: f32 },
    /// Proportional, but scaled by the current level so repeated
    /// applications yield less and less
    DiminishingReturns { per_unit: f32 },
}

impl EquationKind {
    /// Level delta (0-100 scale) for an action outcome's output change
    ///
    /// The delta is the difference between the pre-change and post-change
    /// levels; the caller applies it through
    /// [`DriveState::apply_level_change`]. The mapping is available for
    /// equations that care about the action context.
    pub fn level_change(&self, output_change: f32, state: &DriveState, _mapping: &Mapping) -> f32 {
        match self {
            EquationKind::Linear { per_unit } => output_change * per_unit,
            EquationKind::DiminishingReturns { per_unit } => {
                output_change * per_unit * (state.level() / 100.0)
            }
        }
    }
}
