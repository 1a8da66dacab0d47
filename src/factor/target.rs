//! Target factors: score a candidate target for an action

use serde::{Deserialize, Serialize};

use crate::attribute::AttributeTypeId;
use crate::core::types::EntityId;
use crate::curve::Curve;
use crate::decider::context::EvalContext;
use crate::factor::FactorScore;
use crate::plan::Mapping;

/// Scores a candidate entity as the target of a mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TargetFactor {
    /// Path cost to the candidate, shaped by a curve; an unreachable
    /// candidate is a veto
    PathDistance { curve: Curve },
    /// Difference between the agent's own attribute level and the
    /// candidate's known level, bounds-ignoring since the input is a
    /// signed difference
    ComparativeLevel {
        attribute: AttributeTypeId,
        curve: Curve,
    },
    /// Relationship toward the candidate as the memory provider reports
    /// it; an unknown relationship is a veto
    Relationship { curve: Curve },
}

impl TargetFactor {
    pub fn evaluate(
        &self,
        ctx: &EvalContext,
        candidate: EntityId,
        _mapping: &Mapping,
        for_inventory: bool,
    ) -> FactorScore {
        match self {
            TargetFactor::PathDistance { curve } => {
                // Carried items cost nothing to reach
                if for_inventory {
                    return FactorScore::Scored(curve.eval(0.0));
                }
                match ctx.paths.path_cost(ctx.agent, candidate) {
                    Some(cost) => FactorScore::Scored(curve.eval(cost)),
                    None => FactorScore::Vetoed,
                }
            }
            TargetFactor::ComparativeLevel { attribute, curve } => {
                let Some(own) = ctx.attribute_level(attribute) else {
                    tracing::warn!(attribute = %attribute, "target factor references an unknown attribute");
                    return FactorScore::Scored(0.0);
                };
                let Some(theirs) =
                    ctx.perception
                        .known_attribute_level(ctx.agent, candidate, attribute)
                else {
                    return FactorScore::Vetoed;
                };
                FactorScore::Scored(curve.eval_ignore_bounds(own - theirs))
            }
            TargetFactor::Relationship { curve } => {
                match ctx.perception.relationship_level(ctx.agent, candidate) {
                    Some(level) => FactorScore::Scored(curve.eval(level)),
                    None => FactorScore::Vetoed,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentState;
    use crate::attribute::AttributeTypeRegistry;
    use crate::core::types::AgentId;
    use crate::curve::CurveShape;
    use crate::drive::DriveTypeRegistry;
    use crate::plan::MappingType;
    use crate::ports::{NoPathfinding, NoPerception, PathCost};
    use crate::utility::UtilityFunction;
    use std::sync::Arc;

    struct FixedPaths(f32);

    impl PathCost for FixedPaths {
        fn path_cost(&self, _agent: AgentId, _target: EntityId) -> Option<f32> {
            Some(self.0)
        }
    }

    fn mapping() -> Mapping {
        Mapping::new(Arc::new(MappingType::new(
            "eat",
            "hunger".into(),
            UtilityFunction::WeightedModifiers,
        )))
    }

    #[test]
    fn test_unreachable_target_is_vetoed() {
        let drives = DriveTypeRegistry::new();
        let attributes = AttributeTypeRegistry::new();
        let state = AgentState::new(&drives, &attributes);
        let ctx = EvalContext {
            agent: AgentId::new(),
            state: &state,
            drives: &drives,
            attributes: &attributes,
            paths: &NoPathfinding,
            perception: &NoPerception,
        };
        let factor = TargetFactor::PathDistance {
            curve: Curve::new(CurveShape::Linear, 0.0, 10.0, 1.0, 0.0),
        };
        assert!(factor
            .evaluate(&ctx, EntityId::new(), &mapping(), false)
            .is_veto());
    }

    #[test]
    fn test_closer_targets_score_higher() {
        let drives = DriveTypeRegistry::new();
        let attributes = AttributeTypeRegistry::new();
        let state = AgentState::new(&drives, &attributes);
        let curve = Curve::new(CurveShape::Linear, 0.0, 10.0, 1.0, 0.0);

        let near_paths = FixedPaths(2.0);
        let near_ctx = EvalContext {
            agent: AgentId::new(),
            state: &state,
            drives: &drives,
            attributes: &attributes,
            paths: &near_paths,
            perception: &NoPerception,
        };
        let far_paths = FixedPaths(8.0);
        let far_ctx = EvalContext {
            agent: AgentId::new(),
            state: &state,
            drives: &drives,
            attributes: &attributes,
            paths: &far_paths,
            perception: &NoPerception,
        };

        let factor = TargetFactor::PathDistance { curve };
        let near = factor
            .evaluate(&near_ctx, EntityId::new(), &mapping(), false)
            .value()
            .unwrap();
        let far = factor
            .evaluate(&far_ctx, EntityId::new(), &mapping(), false)
            .value()
            .unwrap();
        assert!(near > far);
    }

    #[test]
    fn test_inventory_target_skips_pathfinding() {
        let drives = DriveTypeRegistry::new();
        let attributes = AttributeTypeRegistry::new();
        let state = AgentState::new(&drives, &attributes);
        let ctx = EvalContext {
            agent: AgentId::new(),
            state: &state,
            drives: &drives,
            attributes: &attributes,
            paths: &NoPathfinding,
            perception: &NoPerception,
        };
        let factor = TargetFactor::PathDistance {
            curve: Curve::new(CurveShape::Linear, 0.0, 10.0, 1.0, 0.0),
        };
        // No route exists, but a carried item evaluates at distance zero
        let score = factor.evaluate(&ctx, EntityId::new(), &mapping(), true);
        assert_eq!(score, FactorScore::Scored(1.0));
    }
}
