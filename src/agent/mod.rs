//! Per-agent state tables
//!
//! Drive and attribute runtime state is owned here, keyed by
//! (agent, type), created at spawn from the registries and destroyed
//! with the agent. Shared type configuration never holds per-agent data,
//! so many agents can evaluate against the same registries without
//! locking.

use ahash::AHashMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::attribute::{AttributeState, AttributeTypeId, AttributeTypeRegistry};
use crate::core::config::config;
use crate::core::types::AgentId;
use crate::drive::{DriveState, DriveType, DriveTypeId, DriveTypeRegistry, SyncDirection, SyncSource};

/// All mutable decision state for one agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentState {
    drives: AHashMap<DriveTypeId, DriveState>,
    attributes: AHashMap<AttributeTypeId, AttributeState>,
}

impl AgentState {
    /// Create state with one entry per registered drive and attribute
    pub fn new(drives: &DriveTypeRegistry, attributes: &AttributeTypeRegistry) -> Self {
        Self {
            drives: drives
                .iter()
                .map(|ty| (ty.id.clone(), DriveState::new(ty)))
                .collect(),
            attributes: attributes
                .iter()
                .map(|ty| (ty.id.clone(), AttributeState::new(ty)))
                .collect(),
        }
    }

    pub fn drive(&self, id: &DriveTypeId) -> Option<&DriveState> {
        self.drives.get(id)
    }

    pub fn drive_mut(&mut self, id: &DriveTypeId) -> Option<&mut DriveState> {
        self.drives.get_mut(id)
    }

    pub fn attribute(&self, id: &AttributeTypeId) -> Option<&AttributeState> {
        self.attributes.get(id)
    }

    pub fn attribute_mut(&mut self, id: &AttributeTypeId) -> Option<&mut AttributeState> {
        self.attributes.get_mut(id)
    }

    /// Drive level in [0, 100], honoring attribute sync
    ///
    /// An attribute-synced drive's level is derived read-only from the
    /// attribute's normalized level; everything else reads its own state.
    pub fn drive_level(&self, drive_type: &DriveType) -> Option<f32> {
        match &drive_type.sync {
            SyncSource::Attribute {
                attribute,
                direction,
            } => {
                let n = self.attribute(attribute)?.normalized_level();
                Some(match direction {
                    SyncDirection::Same => n * 100.0,
                    SyncDirection::Opposite => (1.0 - n) * 100.0,
                })
            }
            _ => self.drive(&drive_type.id).map(|state| state.level()),
        }
    }

    /// Drive utility in [0, 1]
    pub fn drive_utility(&self, drive_type: &DriveType) -> Option<f32> {
        self.drive_level(drive_type)
            .map(|level| drive_type.utility_curve.eval_0_to_100_ignore_bounds(level))
    }

    /// Advance every independent drive by the elapsed time
    pub fn advance(&mut self, drives: &DriveTypeRegistry, dt_hours: f32, time_of_day: f32) {
        for ty in drives.iter() {
            if ty.is_synced() {
                continue;
            }
            if let Some(state) = self.drives.get_mut(&ty.id) {
                state.advance(ty, dt_hours, time_of_day);
            }
        }
    }
}

/// Store of per-agent state, keyed by agent id
#[derive(Debug, Clone, Default)]
pub struct AgentStore {
    agents: AHashMap<AgentId, AgentState>,
}

impl AgentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(
        &mut self,
        agent: AgentId,
        drives: &DriveTypeRegistry,
        attributes: &AttributeTypeRegistry,
    ) {
        self.agents.insert(agent, AgentState::new(drives, attributes));
    }

    pub fn despawn(&mut self, agent: AgentId) -> Option<AgentState> {
        self.agents.remove(&agent)
    }

    pub fn get(&self, agent: AgentId) -> Option<&AgentState> {
        self.agents.get(&agent)
    }

    pub fn get_mut(&mut self, agent: AgentId) -> Option<&mut AgentState> {
        self.agents.get_mut(&agent)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Advance drives for every agent
    ///
    /// Agents are independent, so large populations advance in parallel;
    /// each agent's own tables are only ever touched from one thread.
    pub fn advance_all(&mut self, drives: &DriveTypeRegistry, dt_hours: f32, time_of_day: f32) {
        if self.agents.len() >= config().parallel_threshold {
            self.agents
                .par_iter_mut()
                .for_each(|(_, state)| state.advance(drives, dt_hours, time_of_day));
        } else {
            for state in self.agents.values_mut() {
                state.advance(drives, dt_hours, time_of_day);
            }
        }
    }
}
