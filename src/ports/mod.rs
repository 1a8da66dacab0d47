//! External collaborators the core consults but never implements
//!
//! Pathfinding, perception/memory, history recording and alternate plan
//! selection all live in the host simulation. The core reads scalar
//! facts through these traits; no-op implementations are provided for
//! hosts that lack a collaborator.

use std::sync::Arc;

use crate::core::types::{AgentId, EntityId, GameHours, Vec2};
use crate::drive::DriveTypeId;
use crate::plan::{MappingType, MappingTypeId, Plan};

/// Movement/pathfinding cost provider
///
/// `None` means no route exists; target factors treat that as a veto.
pub trait PathCost {
    fn path_cost(&self, agent: AgentId, target: EntityId) -> Option<f32>;
}

/// A provider for hosts without pathfinding: everything is unreachable
pub struct NoPathfinding;

impl PathCost for NoPathfinding {
    fn path_cost(&self, _agent: AgentId, _target: EntityId) -> Option<f32> {
        None
    }
}

/// Memory/perception provider: scalar facts about known entities
pub trait Perception {
    fn known_entities(&self, agent: AgentId) -> Vec<EntityId>;
    fn known_position(&self, agent: AgentId, entity: EntityId) -> Option<Vec2>;
    fn relationship_level(&self, agent: AgentId, other: EntityId) -> Option<f32>;
    /// Another entity's attribute level as this agent knows it,
    /// normalized against that entity's own bounds
    fn known_attribute_level(
        &self,
        agent: AgentId,
        entity: EntityId,
        attribute: &crate::attribute::AttributeTypeId,
    ) -> Option<f32>;
    fn entity_category(&self, entity: EntityId) -> Option<String>;
}

/// A provider for hosts without perception: nothing is known
pub struct NoPerception;

impl Perception for NoPerception {
    fn known_entities(&self, _agent: AgentId) -> Vec<EntityId> {
        Vec::new()
    }

    fn known_position(&self, _agent: AgentId, _entity: EntityId) -> Option<Vec2> {
        None
    }

    fn relationship_level(&self, _agent: AgentId, _other: EntityId) -> Option<f32> {
        None
    }

    fn known_attribute_level(
        &self,
        _agent: AgentId,
        _entity: EntityId,
        _attribute: &crate::attribute::AttributeTypeId,
    ) -> Option<f32> {
        None
    }

    fn entity_category(&self, _entity: EntityId) -> Option<String> {
        None
    }
}

/// Fire-and-forget history recording; every call has a no-op default
pub trait HistorySink {
    fn decision_made(
        &self,
        _agent: AgentId,
        _drive: &DriveTypeId,
        _mapping: &MappingTypeId,
        _utility: f32,
    ) {
    }

    fn plan_interrupted(&self, _agent: AgentId, _drive: &DriveTypeId, _mapping: &MappingTypeId) {}

    fn drive_changed(
        &self,
        _agent: AgentId,
        _drive: &DriveTypeId,
        _old_level: f32,
        _new_level: f32,
    ) {
    }

    fn interrupt_checked(&self, _agent: AgentId, _interrupted: bool, _next_check: GameHours) {}
}

/// The default sink: records nothing
pub struct NoopHistory;

impl HistorySink for NoopHistory {}

/// Supplies candidate behavior templates for a drive during planning
pub trait PlanProvider {
    fn candidates(&self, drive: &DriveTypeId) -> Vec<Arc<MappingType>>;
}

/// Optional external plan-selection backend (e.g. a learned policy)
///
/// When present it replaces the ranking step: it picks a candidate index
/// from the plan, or `None` to fall back to utility ranking.
pub trait PlanSelector {
    fn select(&self, agent: AgentId, plan: &Plan) -> Option<usize>;
}
