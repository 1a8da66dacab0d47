//! Selector factors: score a candidate action for an agent

use serde::{Deserialize, Serialize};

use crate::attribute::AttributeTypeId;
use crate::curve::Curve;
use crate::decider::context::EvalContext;
use crate::drive::DriveTypeId;
use crate::factor::{FactorScore, VetoRule};
use crate::plan::Mapping;

/// Scores a candidate action from the agent's own state or the
/// candidate's target identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SelectorFactor {
    /// Own attribute level, shaped by a curve
    AttributeLevel {
        attribute: AttributeTypeId,
        curve: Curve,
    },
    /// Own drive level, shaped by a curve, with an optional veto
    /// threshold on the level itself
    DriveLevel {
        drive: DriveTypeId,
        curve: Curve,
        veto: Option<VetoRule>,
    },
    /// Discretized score from the target's category; earlier entries in
    /// the match list score higher, no match is a hard veto
    TargetCategory { categories: Vec<String> },
}

impl SelectorFactor {
    /// Errors inside evaluation degrade to a zero score with a
    /// diagnostic so one misconfigured factor cannot abort ranking.
    pub fn evaluate(&self, ctx: &EvalContext, mapping: &Mapping) -> FactorScore {
        match self {
            SelectorFactor::AttributeLevel { attribute, curve } => {
                let Some(level) = ctx.attribute_level(attribute) else {
                    tracing::warn!(attribute = %attribute, "selector factor references an unknown attribute");
                    return FactorScore::Scored(0.0);
                };
                FactorScore::Scored(curve.eval(level))
            }
            SelectorFactor::DriveLevel { drive, curve, veto } => {
                let Some(level) = ctx.drive_level(drive) else {
                    tracing::warn!(drive = %drive, "selector factor references an unknown drive");
                    return FactorScore::Scored(0.0);
                };
                if let Some(rule) = veto {
                    if rule.triggered(level) {
                        return FactorScore::Vetoed;
                    }
                }
                FactorScore::Scored(curve.eval_0_to_100(level))
            }
            SelectorFactor::TargetCategory { categories } => {
                let Some(target) = mapping.target else {
                    return FactorScore::Vetoed;
                };
                let Some(category) = ctx.perception.entity_category(target) else {
                    return FactorScore::Vetoed;
                };
                match categories.iter().position(|c| *c == category) {
                    Some(index) => FactorScore::Scored(
                        (categories.len() - index) as f32 / categories.len() as f32,
                    ),
                    None => FactorScore::Vetoed,
                }
            }
        }
    }
}
