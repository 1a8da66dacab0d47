//! Mappings and plans
//!
//! A [`MappingType`] is a behavior template: shared, immutable
//! configuration describing what an action promises (drive reduction,
//! duration, side effects) and how it is scored (factors, modifier
//! bindings, utility function). A [`Mapping`] is one ephemeral candidate
//! instance of a template, possibly bound to a target; a [`Plan`] is the
//! set of candidates produced for one drive at one decision point and is
//! discarded when the next cycle starts.

use std::sync::Arc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, GameHours};
use crate::drive::DriveTypeId;
use crate::factor::{SelectorFactor, TargetFactor};
use crate::modifier::{ModifierBinding, UtilityModifier};
use crate::ports::PlanProvider;
use crate::utility::UtilityFunction;

/// Identifies a behavior template (e.g. "eat")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MappingTypeId(pub String);

impl std::fmt::Display for MappingTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MappingTypeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for MappingTypeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Behavior template, immutable post-load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingType {
    pub id: MappingTypeId,
    /// The drive this behavior primarily serves
    pub drive: DriveTypeId,
    pub requires_target: bool,
    pub selector_factors: Vec<(SelectorFactor, f32)>,
    pub target_factors: Vec<(TargetFactor, f32)>,
    pub modifier_bindings: Vec<ModifierBinding>,
    pub utility: UtilityFunction,
    /// Promised change to the drive's level; negative values satisfy
    /// the need
    pub drive_amount: f32,
    /// Base execution time before travel is added
    pub duration_hours: GameHours,
    /// Level changes to other drives caused as a side effect
    pub side_effects: Vec<(DriveTypeId, f32)>,
}

impl MappingType {
    pub fn new(id: impl Into<MappingTypeId>, drive: DriveTypeId, utility: UtilityFunction) -> Self {
        Self {
            id: id.into(),
            drive,
            requires_target: false,
            selector_factors: Vec::new(),
            target_factors: Vec::new(),
            modifier_bindings: Vec::new(),
            utility,
            drive_amount: 0.0,
            duration_hours: 0.0,
            side_effects: Vec::new(),
        }
    }

    pub fn with_drive_amount(mut self, amount: f32) -> Self {
        self.drive_amount = amount;
        self
    }

    pub fn with_duration(mut self, hours: GameHours) -> Self {
        self.duration_hours = hours;
        self
    }

    pub fn targeted(mut self) -> Self {
        self.requires_target = true;
        self
    }

    pub fn with_selector_factor(mut self, factor: SelectorFactor, weight: f32) -> Self {
        self.selector_factors.push((factor, weight));
        self
    }

    pub fn with_target_factor(mut self, factor: TargetFactor, weight: f32) -> Self {
        self.target_factors.push((factor, weight));
        self
    }

    pub fn with_modifier(mut self, modifier: UtilityModifier, weight: f32) -> Self {
        self.modifier_bindings.push(ModifierBinding::new(modifier, weight));
        self
    }

    pub fn with_side_effect(mut self, drive: DriveTypeId, amount: f32) -> Self {
        self.side_effects.push((drive, amount));
        self
    }
}

/// One candidate action instance, owned by a plan
#[derive(Debug, Clone)]
pub struct Mapping {
    pub mapping_type: Arc<MappingType>,
    pub target: Option<EntityId>,
    /// Base duration plus travel, filled in during planning
    pub time_estimate: GameHours,
    /// Modifier bindings copied from the template at instantiation
    pub bindings: Vec<ModifierBinding>,
}

impl Mapping {
    pub fn new(mapping_type: Arc<MappingType>) -> Self {
        let bindings = mapping_type.modifier_bindings.clone();
        let time_estimate = mapping_type.duration_hours;
        Self {
            mapping_type,
            target: None,
            time_estimate,
            bindings,
        }
    }

    pub fn with_target(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn id(&self) -> &MappingTypeId {
        &self.mapping_type.id
    }
}

/// A scored candidate inside a plan
#[derive(Debug, Clone)]
pub struct Candidate {
    pub mapping: Mapping,
    /// Weighted mean of selector/target factor scores
    pub factor_score: f32,
    /// Final comparable utility, filled in during selection
    pub utility: f32,
}

/// Candidates produced for one drive at one decision point
#[derive(Debug, Clone)]
pub struct Plan {
    pub drive: DriveTypeId,
    pub candidates: Vec<Candidate>,
    /// Root mappings excluded this cycle (just interrupted)
    pub excluded: Vec<MappingTypeId>,
    pub chosen: Option<usize>,
    complete: bool,
}

impl Plan {
    pub fn new(drive: DriveTypeId, excluded: Vec<MappingTypeId>) -> Self {
        Self {
            drive,
            candidates: Vec::new(),
            excluded,
            chosen: None,
            complete: false,
        }
    }

    pub fn is_viable(&self) -> bool {
        !self.candidates.is_empty()
    }

    pub fn chosen_candidate(&self) -> Option<&Candidate> {
        self.chosen.and_then(|i| self.candidates.get(i))
    }

    /// Mark the chosen mapping finished; the plan is then discarded by
    /// the next cycle
    pub fn mark_complete(&mut self) {
        self.complete = true;
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

/// Catalog of behavior templates, indexed by the drive they serve
#[derive(Debug, Clone, Default)]
pub struct MappingCatalog {
    by_drive: AHashMap<DriveTypeId, Vec<Arc<MappingType>>>,
}

impl MappingCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, mapping_type: MappingType) {
        self.by_drive
            .entry(mapping_type.drive.clone())
            .or_default()
            .push(Arc::new(mapping_type));
    }

    pub fn for_drive(&self, drive: &DriveTypeId) -> &[Arc<MappingType>] {
        self.by_drive.get(drive).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_drive.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_drive.is_empty()
    }
}

impl PlanProvider for MappingCatalog {
    fn candidates(&self, drive: &DriveTypeId) -> Vec<Arc<MappingType>> {
        self.for_drive(drive).to_vec()
    }
}
