//! Drive type configuration
//!
//! A [`DriveType`] is immutable, shared configuration: many agents
//! reference the same instance. Per-agent runtime data lives in
//! [`crate::drive::DriveState`], never here.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::attribute::AttributeTypeId;
use crate::core::error::{Result, VolitionError};
use crate::curve::Curve;
use crate::drive::equation::EquationKind;

/// Identifies a need dimension (e.g. "hunger")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DriveTypeId(pub String);

impl std::fmt::Display for DriveTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DriveTypeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// How a synced drive's level follows the attribute it mirrors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncDirection {
    /// Drive level equals the attribute's normalized level
    Same,
    /// Drive level is the attribute's normalized level, mirrored
    Opposite,
}

/// Where a drive's level comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SyncSource {
    /// Independent: the drive owns its raw level and advances over time
    None,
    /// Derived read-only from an attribute's normalized level
    Attribute {
        attribute: AttributeTypeId,
        direction: SyncDirection,
    },
    /// Level changes are computed by a pluggable equation when action
    /// outcomes are applied
    Equation(EquationKind),
}

impl SyncSource {
    pub fn is_synced(&self) -> bool {
        !matches!(self, SyncSource::None)
    }
}

/// How an independent drive's raw level changes as time passes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChangeRule {
    /// Fixed raw-level change per game hour
    Constant { per_game_hour: f32 },
    /// Rate read off a curve indexed by time-of-day fraction
    TimeOfDayCurve { curve: Curve },
}

/// Configuration for one need dimension, immutable post-load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveType {
    pub id: DriveTypeId,
    /// Tie-break when two drives have equal utility (higher wins)
    pub priority: u32,
    /// Whether plans serving other drives may be interrupted for this one
    pub can_cause_interruptions: bool,
    /// Multiplier applied to the current plan's utility during
    /// interruption checks; above 1.0 makes in-progress plans stickier
    pub continue_modifier: f32,
    pub sync: SyncSource,
    /// Time-based change rule; must be absent for synced drives
    pub change: Option<ChangeRule>,
    /// Maps drive level (0-100) to drive utility (0-1)
    pub utility_curve: Curve,
    pub min: f32,
    pub max: f32,
    pub start: f32,
}

impl DriveType {
    pub fn new(id: impl Into<DriveTypeId>, priority: u32, utility_curve: Curve) -> Self {
        Self {
            id: id.into(),
            priority,
            can_cause_interruptions: true,
            continue_modifier: 1.0,
            sync: SyncSource::None,
            change: None,
            utility_curve,
            min: 0.0,
            max: 100.0,
            start: 0.0,
        }
    }

    pub fn with_bounds(mut self, min: f32, max: f32, start: f32) -> Self {
        self.min = min;
        self.max = max;
        self.start = start;
        self
    }

    pub fn with_constant_rate(mut self, per_game_hour: f32) -> Self {
        self.change = Some(ChangeRule::Constant { per_game_hour });
        self
    }

    pub fn with_time_of_day_rate(mut self, curve: Curve) -> Self {
        self.change = Some(ChangeRule::TimeOfDayCurve { curve });
        self
    }

    pub fn synced_to_attribute(mut self, attribute: AttributeTypeId, direction: SyncDirection) -> Self {
        self.sync = SyncSource::Attribute {
            attribute,
            direction,
        };
        self
    }

    pub fn with_equation(mut self, equation: EquationKind) -> Self {
        self.sync = SyncSource::Equation(equation);
        self
    }

    pub fn non_interrupting(mut self) -> Self {
        self.can_cause_interruptions = false;
        self
    }

    pub fn with_continue_modifier(mut self, modifier: f32) -> Self {
        self.continue_modifier = modifier;
        self
    }

    pub fn is_synced(&self) -> bool {
        self.sync.is_synced()
    }
}

/// Insertion-ordered registry of drive types
///
/// Registration enforces the sync invariant: a drive cannot be both
/// attribute/equation-synced and independently rate-advanced.
#[derive(Debug, Clone, Default)]
pub struct DriveTypeRegistry {
    order: Vec<DriveTypeId>,
    types: AHashMap<DriveTypeId, DriveType>,
}

impl DriveTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, drive_type: DriveType) -> Result<()> {
        if drive_type.is_synced() && drive_type.change.is_some() {
            return Err(VolitionError::Config(format!(
                "drive {} is synced and cannot also carry a change rule",
                drive_type.id
            )));
        }
        if drive_type.min >= drive_type.max {
            return Err(VolitionError::Config(format!(
                "drive {} has degenerate bounds [{}, {}]",
                drive_type.id, drive_type.min, drive_type.max
            )));
        }
        if self.types.contains_key(&drive_type.id) {
            return Err(VolitionError::Config(format!(
                "drive {} registered twice",
                drive_type.id
            )));
        }
        self.order.push(drive_type.id.clone());
        self.types.insert(drive_type.id.clone(), drive_type);
        Ok(())
    }

    pub fn get(&self, id: &DriveTypeId) -> Option<&DriveType> {
        self.types.get(id)
    }

    /// Iterate in registration order (ranking tie-breaks depend on it)
    pub fn iter(&self) -> impl Iterator<Item = &DriveType> {
        self.order.iter().filter_map(|id| self.types.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
