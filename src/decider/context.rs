//! The decider's view of one agent during evaluation
//!
//! Bundles the agent's own state tables, the shared read-only
//! registries, and the external collaborators. Factors, modifiers and
//! utility functions all evaluate against this; nothing in it is
//! mutated during a decision cycle.

use crate::agent::AgentState;
use crate::attribute::{AttributeTypeId, AttributeTypeRegistry};
use crate::core::types::AgentId;
use crate::drive::{DriveType, DriveTypeId, DriveTypeRegistry};
use crate::ports::{PathCost, Perception};

pub struct EvalContext<'a> {
    pub agent: AgentId,
    pub state: &'a AgentState,
    pub drives: &'a DriveTypeRegistry,
    pub attributes: &'a AttributeTypeRegistry,
    pub paths: &'a dyn PathCost,
    pub perception: &'a dyn Perception,
}

impl<'a> EvalContext<'a> {
    pub fn drive_type(&self, id: &DriveTypeId) -> Option<&DriveType> {
        self.drives.get(id)
    }

    /// Drive level in [0, 100], honoring attribute sync
    pub fn drive_level(&self, id: &DriveTypeId) -> Option<f32> {
        let ty = self.drives.get(id)?;
        self.state.drive_level(ty)
    }

    /// Drive utility in [0, 1]
    pub fn drive_utility(&self, id: &DriveTypeId) -> Option<f32> {
        let ty = self.drives.get(id)?;
        self.state.drive_utility(ty)
    }

    /// Own attribute level, normalized to [0, 1]
    pub fn attribute_level(&self, id: &AttributeTypeId) -> Option<f32> {
        self.state.attribute(id).map(|state| state.normalized_level())
    }
}
