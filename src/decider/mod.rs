//! The decision cycle: rank drives, plan, select, watch for interrupts
//!
//! A [`Decider`] runs one agent's cycle. Drives are ranked by utility,
//! the most pressing drive is planned against the mapping catalog,
//! candidates are scored by their utility function scaled by factor
//! fit, and the best candidate wins. While a plan executes, periodic
//! interrupt checks ask whether another interruption-capable drive now
//! offers a clearly better plan.

pub mod context;

pub use context::EvalContext;

use std::sync::Arc;

use ordered_float::OrderedFloat;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::config;
use crate::core::error::{Result, VolitionError};
use crate::core::types::{EntityId, GameHours};
use crate::drive::DriveTypeId;
use crate::factor::FactorScore;
use crate::plan::{Candidate, Mapping, MappingType, MappingTypeId, Plan};
use crate::ports::{PlanProvider, PlanSelector};

/// Where an agent currently sits in its decision cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeciderPhase {
    #[default]
    Idle,
    EvaluatingDrives,
    Planning,
    Selecting,
    Executing,
    InterruptCheck,
    Replanning,
}

/// Outcome of one full decision cycle
///
/// `chosen: None` is a normal outcome, not an error: no drive had a
/// viable plan this cycle.
#[derive(Debug, Clone)]
pub struct DecisionResult {
    pub chosen: Option<Mapping>,
    pub drive: Option<DriveTypeId>,
    pub chosen_utility: f32,
    /// All drives this cycle, most pressing first
    pub ranked_drives: Vec<(DriveTypeId, f32)>,
}

/// Per-agent decision loop state
#[derive(Debug, Clone, Default)]
pub struct Decider {
    phase: DeciderPhase,
}

impl Decider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DeciderPhase {
        self.phase
    }

    /// Rank all drives by utility, most pressing first
    ///
    /// Ties break on declared priority, then on registration order. A
    /// drive type with no matching state is a corrupt agent table and
    /// aborts the cycle.
    pub fn rank_drives(&mut self, ctx: &EvalContext) -> Result<Vec<(DriveTypeId, f32)>> {
        self.phase = DeciderPhase::EvaluatingDrives;
        let mut ranked = Vec::new();
        for ty in ctx.drives.iter() {
            let utility =
                ctx.state
                    .drive_utility(ty)
                    .ok_or_else(|| VolitionError::DriveStateMissing {
                        agent: ctx.agent,
                        drive: ty.id.clone(),
                    })?;
            ranked.push((ty.id.clone(), utility, ty.priority));
        }
        ranked.sort_by(|a, b| {
            OrderedFloat(b.1)
                .cmp(&OrderedFloat(a.1))
                .then(b.2.cmp(&a.2))
        });
        Ok(ranked
            .into_iter()
            .map(|(id, utility, _)| (id, utility))
            .collect())
    }

    /// Build the candidate list for one drive
    ///
    /// Target resolution runs before selector factors so that factors
    /// inspecting the target see the resolved entity. A candidate that
    /// needs a target but finds none, or that any factor vetoes, is
    /// dropped silently; an empty plan is the caller's signal to move on
    /// to the next drive.
    pub fn build_plan(
        &mut self,
        ctx: &EvalContext,
        provider: &dyn PlanProvider,
        drive: &DriveTypeId,
        excluded: Vec<MappingTypeId>,
    ) -> Plan {
        self.phase = DeciderPhase::Planning;
        let mut plan = Plan::new(drive.clone(), excluded);
        for template in provider.candidates(drive) {
            if plan.excluded.contains(&template.id) {
                tracing::debug!(mapping = %template.id, "mapping excluded after interruption");
                continue;
            }
            if let Some(candidate) = Self::build_candidate(ctx, &template) {
                plan.candidates.push(candidate);
            }
        }
        plan
    }

    fn build_candidate(ctx: &EvalContext, template: &Arc<MappingType>) -> Option<Candidate> {
        let mut mapping = Mapping::new(Arc::clone(template));
        let mut weighted_sum = 0.0;
        let mut weight_sum = 0.0;
        let mut travel_cost = 0.0;

        if template.requires_target {
            let (target, target_sum, target_weight) = Self::pick_target(ctx, template, &mapping)?;
            mapping.target = Some(target);
            weighted_sum += target_sum;
            weight_sum += target_weight;
            travel_cost = ctx.paths.path_cost(ctx.agent, target).unwrap_or(0.0);
        }

        for (factor, weight) in &template.selector_factors {
            match factor.evaluate(ctx, &mapping) {
                FactorScore::Vetoed => return None,
                FactorScore::Scored(score) => {
                    weighted_sum += score * weight;
                    weight_sum += weight;
                }
            }
        }

        mapping.time_estimate =
            template.duration_hours + travel_cost * config().travel_hours_per_cost;
        let factor_score = if weight_sum > 0.0 {
            weighted_sum / weight_sum
        } else {
            1.0
        };
        Some(Candidate {
            mapping,
            factor_score,
            utility: 0.0,
        })
    }

    /// Best-scoring known entity under the template's target factors
    ///
    /// Entities any factor vetoes are skipped. Returns the winner plus
    /// its weighted score components so they fold into the candidate's
    /// factor score.
    fn pick_target(
        ctx: &EvalContext,
        template: &MappingType,
        mapping: &Mapping,
    ) -> Option<(EntityId, f32, f32)> {
        let mut best: Option<(EntityId, f32, f32, f32)> = None;
        'entities: for entity in ctx.perception.known_entities(ctx.agent) {
            let mut weighted_sum = 0.0;
            let mut weight_sum = 0.0;
            for (factor, weight) in &template.target_factors {
                match factor.evaluate(ctx, entity, mapping, false) {
                    FactorScore::Vetoed => continue 'entities,
                    FactorScore::Scored(score) => {
                        weighted_sum += score * weight;
                        weight_sum += weight;
                    }
                }
            }
            let mean = if weight_sum > 0.0 {
                weighted_sum / weight_sum
            } else {
                1.0
            };
            let better = match &best {
                Some((_, _, _, best_mean)) => mean > *best_mean,
                None => true,
            };
            if better {
                best = Some((entity, weighted_sum, weight_sum, mean));
            }
        }
        best.map(|(entity, sum, weight, _)| (entity, sum, weight))
    }

    /// Score every candidate and pick the winner
    ///
    /// A candidate's score is its utility function's output scaled by
    /// its factor score. The first candidate with the strictly highest
    /// score wins, so equal scores fall to catalog registration order.
    /// An external selector, when present and decisive, overrides the
    /// ranking.
    pub fn select<R: Rng>(
        &mut self,
        ctx: &EvalContext,
        plan: &mut Plan,
        external: Option<&dyn PlanSelector>,
        rng: &mut R,
    ) -> Option<usize> {
        self.phase = DeciderPhase::Selecting;
        if plan.candidates.is_empty() {
            return None;
        }
        let Some(drive_type) = ctx.drives.get(&plan.drive) else {
            tracing::warn!(drive = %plan.drive, "plan references an unknown drive type");
            return None;
        };
        for candidate in &mut plan.candidates {
            let template = Arc::clone(&candidate.mapping.mapping_type);
            let side_effects = Self::side_effects_utility(ctx, &template);
            let utility = template.utility.evaluate(
                ctx,
                &candidate.mapping,
                drive_type,
                template.drive_amount,
                candidate.mapping.time_estimate,
                side_effects,
                rng,
            );
            candidate.utility = utility * candidate.factor_score;
        }

        if let Some(selector) = external {
            if let Some(i) = selector.select(ctx.agent, plan) {
                if i < plan.candidates.len() {
                    plan.chosen = Some(i);
                    return Some(i);
                }
                tracing::warn!(index = i, "external selector returned an out-of-range candidate");
            }
        }

        let mut best = 0;
        for (i, candidate) in plan.candidates.iter().enumerate().skip(1) {
            if candidate.utility > plan.candidates[best].utility {
                best = i;
            }
        }
        plan.chosen = Some(best);
        Some(best)
    }

    /// Anticipated utility of a mapping's declared side effects
    ///
    /// Each side effect is the level change it promises another drive,
    /// scaled to [0, 1] and weighted by how much that drive currently
    /// wants relief. A negative amount reduces the other drive, which
    /// reads as positive utility.
    fn side_effects_utility(ctx: &EvalContext, template: &MappingType) -> f32 {
        let mut total = 0.0;
        for (drive, amount) in &template.side_effects {
            let Some(utility) = ctx.drive_utility(drive) else {
                tracing::warn!(drive = %drive, "side effect references an unknown drive");
                continue;
            };
            total += (-amount / 100.0) * utility;
        }
        total
    }

    /// Run one full cycle for the agent
    ///
    /// Drives are tried most pressing first; the first drive with a
    /// viable plan decides the cycle. When the previous plan was just
    /// interrupted, its root mapping is excluded from re-planning the
    /// same drive so the agent does not immediately resume what it
    /// abandoned.
    pub fn decide<R: Rng>(
        &mut self,
        ctx: &EvalContext,
        provider: &dyn PlanProvider,
        external: Option<&dyn PlanSelector>,
        interrupted: Option<(&DriveTypeId, &MappingTypeId)>,
        rng: &mut R,
    ) -> Result<DecisionResult> {
        let ranked = self.rank_drives(ctx)?;
        for (drive, _) in &ranked {
            let excluded = match interrupted {
                Some((prev_drive, prev_mapping)) if prev_drive == drive => {
                    vec![prev_mapping.clone()]
                }
                _ => Vec::new(),
            };
            let mut plan = self.build_plan(ctx, provider, drive, excluded);
            if !plan.is_viable() {
                continue;
            }
            if self.select(ctx, &mut plan, external, rng).is_some() {
                if let Some(candidate) = plan.chosen_candidate() {
                    self.phase = DeciderPhase::Executing;
                    return Ok(DecisionResult {
                        chosen: Some(candidate.mapping.clone()),
                        drive: Some(drive.clone()),
                        chosen_utility: candidate.utility,
                        ranked_drives: ranked.clone(),
                    });
                }
            }
        }
        self.phase = DeciderPhase::Idle;
        Ok(DecisionResult {
            chosen: None,
            drive: None,
            chosen_utility: 0.0,
            ranked_drives: ranked,
        })
    }

    /// Ask whether any other drive now beats the executing plan
    ///
    /// Only drives flagged as interruption-capable are considered, and
    /// the executing mapping is excluded from their plans. The bar an
    /// alternative must clear is the current plan's utility scaled by
    /// its drive's continue modifier, plus the configured margin.
    /// Returns the verdict and the game time of the next check.
    pub fn should_interrupt<R: Rng>(
        &mut self,
        ctx: &EvalContext,
        provider: &dyn PlanProvider,
        current: &Mapping,
        current_drive: &DriveTypeId,
        current_utility: f32,
        last_check: GameHours,
        rng: &mut R,
    ) -> Result<(bool, GameHours)> {
        self.phase = DeciderPhase::InterruptCheck;
        let next_check = last_check + config().replan_interval_hours;
        let Some(current_type) = ctx.drives.get(current_drive) else {
            tracing::warn!(drive = %current_drive, "executing plan references an unknown drive type");
            self.phase = DeciderPhase::Executing;
            return Ok((false, next_check));
        };
        let threshold = current_utility * current_type.continue_modifier + config().interrupt_margin;

        let ranked = self.rank_drives(ctx)?;
        self.phase = DeciderPhase::InterruptCheck;
        for (drive, _) in &ranked {
            let Some(ty) = ctx.drives.get(drive) else {
                continue;
            };
            if !ty.can_cause_interruptions {
                continue;
            }
            let mut plan = self.build_plan(ctx, provider, drive, vec![current.id().clone()]);
            if !plan.is_viable() {
                continue;
            }
            if self.select(ctx, &mut plan, None, rng).is_some() {
                if let Some(candidate) = plan.chosen_candidate() {
                    if candidate.utility > threshold {
                        tracing::debug!(
                            drive = %drive,
                            challenger = %candidate.mapping.id(),
                            utility = candidate.utility,
                            threshold,
                            "plan interrupted"
                        );
                        self.phase = DeciderPhase::Replanning;
                        return Ok((true, next_check));
                    }
                }
            }
        }
        self.phase = DeciderPhase::Executing;
        Ok((false, next_check))
    }
}
