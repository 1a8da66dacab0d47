//! Utility modifiers: named, reusable scoring units combined by weight
//!
//! Modifiers are pure functions over current agent state. Each variant
//! declares its auxiliary inputs through [`ModifierInputs`] so tooling
//! can validate a configuration without evaluating it.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::attribute::AttributeTypeId;
use crate::curve::Curve;
use crate::decider::context::EvalContext;
use crate::drive::DriveTypeId;
use crate::factor::VetoRule;
use crate::plan::Mapping;

/// Outcome of a modifier evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ModifierScore {
    Scored(f32),
    Vetoed,
}

impl ModifierScore {
    pub fn value(&self) -> Option<f32> {
        match self {
            ModifierScore::Scored(v) => Some(*v),
            ModifierScore::Vetoed => None,
        }
    }

    pub fn is_veto(&self) -> bool {
        matches!(self, ModifierScore::Vetoed)
    }
}

/// Which auxiliary inputs a modifier variant consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierInputs {
    /// References a drive or attribute type
    pub level_type: bool,
    /// Reshapes its input through a curve
    pub curve: bool,
    /// Carries a numeric constant (veto cutoff)
    pub constant: bool,
}

/// A scalar-producing scoring unit with an optional veto
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum UtilityModifier {
    /// Own attribute level, optionally reshaped (bounds-ignoring, since
    /// the level is already normalized)
    AttributeLevel {
        attribute: AttributeTypeId,
        curve: Option<Curve>,
        veto: Option<VetoRule>,
    },
    /// Another drive's utility
    DriveUtility {
        drive: DriveTypeId,
        veto: Option<VetoRule>,
    },
    /// Uniform draw over the curve's domain, for stochastic scoring
    RandomDraw { curve: Curve },
}

impl UtilityModifier {
    pub fn requirements(&self) -> ModifierInputs {
        match self {
            UtilityModifier::AttributeLevel { curve, veto, .. } => ModifierInputs {
                level_type: true,
                curve: curve.is_some(),
                constant: veto.is_some(),
            },
            UtilityModifier::DriveUtility { veto, .. } => ModifierInputs {
                level_type: true,
                curve: false,
                constant: veto.is_some(),
            },
            UtilityModifier::RandomDraw { .. } => ModifierInputs {
                level_type: false,
                curve: true,
                constant: false,
            },
        }
    }

    /// Evaluate against current agent state
    ///
    /// Veto rules trigger on the raw input (normalized level, utility,
    /// or drawn sample), not on the shaped score.
    pub fn evaluate<R: Rng>(
        &self,
        ctx: &EvalContext,
        _mapping: &Mapping,
        rng: &mut R,
    ) -> ModifierScore {
        match self {
            UtilityModifier::AttributeLevel {
                attribute,
                curve,
                veto,
            } => {
                let Some(level) = ctx.attribute_level(attribute) else {
                    tracing::warn!(attribute = %attribute, "modifier references an unknown attribute");
                    return ModifierScore::Scored(0.0);
                };
                if let Some(rule) = veto {
                    if rule.triggered(level) {
                        return ModifierScore::Vetoed;
                    }
                }
                let score = match curve {
                    Some(c) => c.eval_ignore_bounds(level),
                    None => level,
                };
                ModifierScore::Scored(score)
            }
            UtilityModifier::DriveUtility { drive, veto } => {
                let Some(utility) = ctx.drive_utility(drive) else {
                    tracing::warn!(drive = %drive, "modifier references an unknown drive");
                    return ModifierScore::Scored(0.0);
                };
                if let Some(rule) = veto {
                    if rule.triggered(utility) {
                        return ModifierScore::Vetoed;
                    }
                }
                ModifierScore::Scored(utility)
            }
            UtilityModifier::RandomDraw { curve } => ModifierScore::Scored(curve.eval_random(rng)),
        }
    }
}

/// A modifier bound to a mapping with its aggregation weight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifierBinding {
    pub modifier: UtilityModifier,
    pub weight: f32,
}

impl ModifierBinding {
    pub fn new(modifier: UtilityModifier, weight: f32) -> Self {
        Self { modifier, weight }
    }
}
