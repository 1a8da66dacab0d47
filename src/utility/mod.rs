//! Utility functions: fold a candidate plan into one comparable score
//!
//! Two built-in composition strategies share one contract. The
//! drive-rate strategy rewards reducing the planned drive quickly; the
//! weighted-modifier strategy aggregates the mapping's bound utility
//! modifiers. Invalid numeric input and empty configurations degrade to
//! a neutral zero with a diagnostic instead of propagating NaN.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::decider::context::EvalContext;
use crate::drive::DriveType;
use crate::plan::Mapping;

/// Composition strategy, selected per mapping type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UtilityFunction {
    /// `(du + du_influence*(1-du)) * rate + se_influence * side_effects`
    /// where `rate = -drive_amount / time_estimate`
    DriveRate { du_influence: f32, se_influence: f32 },
    /// Weighted mean of the mapping's modifier scores; any veto zeroes
    /// the whole candidate
    WeightedModifiers,
}

impl UtilityFunction {
    pub fn evaluate<R: Rng>(
        &self,
        ctx: &EvalContext,
        mapping: &Mapping,
        drive: &DriveType,
        drive_amount: f32,
        time_estimate: f32,
        side_effects_utility: f32,
        rng: &mut R,
    ) -> f32 {
        match self {
            UtilityFunction::DriveRate {
                du_influence,
                se_influence,
            } => {
                if time_estimate <= 0.0 {
                    tracing::warn!(
                        mapping = %mapping.id(),
                        time_estimate,
                        "non-positive time estimate; utility defaults to 0"
                    );
                    return 0.0;
                }
                let Some(du) = ctx.state.drive_utility(drive) else {
                    tracing::warn!(drive = %drive.id, "no drive state for utility evaluation");
                    return 0.0;
                };
                let rate = -drive_amount / time_estimate;
                (du + du_influence * (1.0 - du)) * rate + se_influence * side_effects_utility
            }
            UtilityFunction::WeightedModifiers => {
                if mapping.bindings.is_empty() {
                    tracing::warn!(
                        mapping = %mapping.id(),
                        "mapping has no utility modifiers; utility defaults to 0"
                    );
                    return 0.0;
                }
                let mut weighted_sum = 0.0;
                let mut weight_sum = 0.0;
                for binding in &mapping.bindings {
                    match binding.modifier.evaluate(ctx, mapping, rng) {
                        crate::modifier::ModifierScore::Vetoed => return 0.0,
                        crate::modifier::ModifierScore::Scored(score) => {
                            weighted_sum += score * binding.weight;
                            weight_sum += binding.weight;
                        }
                    }
                }
                if weight_sum <= 0.0 {
                    tracing::warn!(
                        mapping = %mapping.id(),
                        "mapping modifier weights sum to zero; utility defaults to 0"
                    );
                    return 0.0;
                }
                weighted_sum / weight_sum
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentState;
    use crate::attribute::{AttributeType, AttributeTypeRegistry};
    use crate::core::types::AgentId;
    use crate::curve::{Curve, CurveShape};
    use crate::drive::{DriveTypeRegistry, DriveType};
    use crate::factor::VetoRule;
    use crate::modifier::UtilityModifier;
    use crate::plan::MappingType;
    use crate::ports::{NoPathfinding, NoPerception};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::Arc;

    struct Fixture {
        drives: DriveTypeRegistry,
        attributes: AttributeTypeRegistry,
        state: AgentState,
    }

    impl Fixture {
        fn new() -> Self {
            let mut drives = DriveTypeRegistry::new();
            drives
                .register(DriveType::new(
                    "hunger",
                    1,
                    Curve::over_levels(CurveShape::Linear),
                ))
                .unwrap();
            let mut attributes = AttributeTypeRegistry::new();
            attributes
                .register(AttributeType::numeric("health", 0.0, 1.0, 0.2))
                .unwrap();
            attributes
                .register(AttributeType::numeric("morale", 0.0, 1.0, 0.6))
                .unwrap();
            let mut state = AgentState::new(&drives, &attributes);
            // Raw 60 -> level 40 -> utility 0.4 under the linear curve
            state
                .drive_mut(&"hunger".into())
                .unwrap()
                .set_raw(60.0);
            Self {
                drives,
                attributes,
                state,
            }
        }

        fn ctx(&self) -> EvalContext<'_> {
            EvalContext {
                agent: AgentId::new(),
                state: &self.state,
                drives: &self.drives,
                attributes: &self.attributes,
                paths: &NoPathfinding,
                perception: &NoPerception,
            }
        }
    }

    fn attr_modifier(attribute: &str) -> UtilityModifier {
        UtilityModifier::AttributeLevel {
            attribute: attribute.into(),
            curve: None,
            veto: None,
        }
    }

    #[test]
    fn test_drive_rate_strategy_composition() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let hunger = fixture.drives.get(&"hunger".into()).unwrap();
        let uf = UtilityFunction::DriveRate {
            du_influence: 0.5,
            se_influence: 0.2,
        };
        let mapping = Mapping::new(Arc::new(MappingType::new("eat", "hunger".into(), uf)));
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        // du=0.4: (0.4 + 0.5*0.6) * (10/5) + 0.2*1.0 = 1.6
        let utility = uf.evaluate(&ctx, &mapping, hunger, -10.0, 5.0, 1.0, &mut rng);
        assert!((utility - 1.6).abs() < 1e-4);
    }

    #[test]
    fn test_zero_time_estimate_is_neutral() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let hunger = fixture.drives.get(&"hunger".into()).unwrap();
        let uf = UtilityFunction::DriveRate {
            du_influence: 0.5,
            se_influence: 0.2,
        };
        let mapping = Mapping::new(Arc::new(MappingType::new("eat", "hunger".into(), uf)));
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let utility = uf.evaluate(&ctx, &mapping, hunger, -10.0, 0.0, 1.0, &mut rng);
        assert!((utility - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_weighted_modifiers_mean() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let hunger = fixture.drives.get(&"hunger".into()).unwrap();
        let uf = UtilityFunction::WeightedModifiers;
        let ty = MappingType::new("visit", "hunger".into(), uf)
            .with_modifier(attr_modifier("health"), 1.0)
            .with_modifier(attr_modifier("morale"), 3.0);
        let mapping = Mapping::new(Arc::new(ty));
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        // (0.2*1 + 0.6*3) / 4 = 0.5
        let utility = uf.evaluate(&ctx, &mapping, hunger, 0.0, 1.0, 0.0, &mut rng);
        assert!((utility - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_veto_dominates_all_weights() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let hunger = fixture.drives.get(&"hunger".into()).unwrap();
        let uf = UtilityFunction::WeightedModifiers;
        let vetoing = UtilityModifier::AttributeLevel {
            attribute: "health".into(),
            curve: None,
            veto: Some(VetoRule::at_most(0.5)),
        };
        let ty = MappingType::new("visit", "hunger".into(), uf)
            .with_modifier(attr_modifier("morale"), 100.0)
            .with_modifier(vetoing, 0.001);
        let mapping = Mapping::new(Arc::new(ty));
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let utility = uf.evaluate(&ctx, &mapping, hunger, 0.0, 1.0, 0.0, &mut rng);
        assert!((utility - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_zero_modifiers_is_config_error_neutral() {
        let fixture = Fixture::new();
        let ctx = fixture.ctx();
        let hunger = fixture.drives.get(&"hunger".into()).unwrap();
        let uf = UtilityFunction::WeightedModifiers;
        let mapping = Mapping::new(Arc::new(MappingType::new("bare", "hunger".into(), uf)));
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let utility = uf.evaluate(&ctx, &mapping, hunger, 0.0, 1.0, 0.0, &mut rng);
        assert!((utility - 0.0).abs() < f32::EPSILON);
    }
}
