//! Engine facade: registries, agents, clock and the decision loop
//!
//! Owns everything a host needs to run decisions for a population:
//! shared type registries, the mapping catalog, per-agent state and
//! deciders, the game clock and a seeded RNG. Hosts plug pathfinding,
//! perception, history and an optional plan selector in through the
//! port traits; all of them default to no-ops.

use ahash::AHashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::agent::{AgentState, AgentStore};
use crate::attribute::{AttributeCurveTable, AttributeTypeId, AttributeTypeRegistry};
use crate::core::clock::GameClock;
use crate::core::error::{Result, VolitionError};
use crate::core::types::{AgentId, GameHours};
use crate::decider::{Decider, DecisionResult, EvalContext};
use crate::drive::{DriveTypeId, DriveTypeRegistry, SyncDirection, SyncSource};
use crate::plan::{Mapping, MappingCatalog, MappingTypeId};
use crate::ports::{
    HistorySink, NoPathfinding, NoPerception, NoopHistory, PathCost, Perception, PlanSelector,
};

pub struct Engine {
    drives: DriveTypeRegistry,
    attributes: AttributeTypeRegistry,
    curves: AttributeCurveTable,
    catalog: MappingCatalog,
    store: AgentStore,
    clock: GameClock,
    rng: ChaCha8Rng,
    paths: Box<dyn PathCost>,
    perception: Box<dyn Perception>,
    history: Box<dyn HistorySink>,
    selector: Option<Box<dyn PlanSelector>>,
    deciders: AHashMap<AgentId, Decider>,
}

impl Engine {
    /// Create an engine over frozen type registries and a catalog
    ///
    /// The seed fixes the RNG stream, so two engines built with the same
    /// registries, seed and call sequence make identical decisions.
    pub fn new(
        drives: DriveTypeRegistry,
        attributes: AttributeTypeRegistry,
        catalog: MappingCatalog,
        seed: u64,
    ) -> Self {
        Self {
            drives,
            attributes,
            curves: AttributeCurveTable::new(),
            catalog,
            store: AgentStore::new(),
            clock: GameClock::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            paths: Box::new(NoPathfinding),
            perception: Box::new(NoPerception),
            history: Box::new(NoopHistory),
            selector: None,
            deciders: AHashMap::new(),
        }
    }

    pub fn with_pathfinding(mut self, paths: Box<dyn PathCost>) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_perception(mut self, perception: Box<dyn Perception>) -> Self {
        self.perception = perception;
        self
    }

    pub fn with_history(mut self, history: Box<dyn HistorySink>) -> Self {
        self.history = history;
        self
    }

    pub fn with_selector(mut self, selector: Box<dyn PlanSelector>) -> Self {
        self.selector = Some(selector);
        self
    }

    pub fn with_curves(mut self, curves: AttributeCurveTable) -> Self {
        self.curves = curves;
        self
    }

    pub fn with_clock(mut self, clock: GameClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn drives(&self) -> &DriveTypeRegistry {
        &self.drives
    }

    pub fn attributes(&self) -> &AttributeTypeRegistry {
        &self.attributes
    }

    pub fn catalog(&self) -> &MappingCatalog {
        &self.catalog
    }

    pub fn curves(&self) -> &AttributeCurveTable {
        &self.curves
    }

    pub fn agent_count(&self) -> usize {
        self.store.len()
    }

    pub fn spawn_agent(&mut self) -> AgentId {
        let agent = AgentId::new();
        self.store.spawn(agent, &self.drives, &self.attributes);
        self.deciders.insert(agent, Decider::new());
        tracing::debug!(agent = %agent.0, "agent spawned");
        agent
    }

    pub fn despawn_agent(&mut self, agent: AgentId) -> Option<AgentState> {
        self.deciders.remove(&agent);
        self.store.despawn(agent)
    }

    pub fn agent(&self, agent: AgentId) -> Option<&AgentState> {
        self.store.get(agent)
    }

    pub fn agent_mut(&mut self, agent: AgentId) -> Option<&mut AgentState> {
        self.store.get_mut(agent)
    }

    /// Advance the clock and every agent's independent drives
    pub fn tick(&mut self, dt: GameHours) {
        self.clock.advance(dt);
        let time_of_day = self.clock.time_of_day_fraction();
        self.store.advance_all(&self.drives, dt, time_of_day);
    }

    /// Advance one agent's drives without moving the clock
    ///
    /// For hosts that run agents on staggered schedules instead of a
    /// global tick.
    pub fn advance_drives(&mut self, agent: AgentId, dt: GameHours) -> Result<()> {
        let time_of_day = self.clock.time_of_day_fraction();
        let state = self
            .store
            .get_mut(agent)
            .ok_or(VolitionError::AgentNotFound(agent))?;
        state.advance(&self.drives, dt, time_of_day);
        Ok(())
    }

    /// Run one decision cycle for the agent
    ///
    /// Pass the drive and root mapping of the plan that was just
    /// interrupted, when there is one, so re-planning the same drive
    /// does not immediately resume it.
    pub fn decide(
        &mut self,
        agent: AgentId,
        interrupted: Option<(&DriveTypeId, &MappingTypeId)>,
    ) -> Result<DecisionResult> {
        let state = self
            .store
            .get(agent)
            .ok_or(VolitionError::AgentNotFound(agent))?;
        let ctx = EvalContext {
            agent,
            state,
            drives: &self.drives,
            attributes: &self.attributes,
            paths: self.paths.as_ref(),
            perception: self.perception.as_ref(),
        };
        let decider = self.deciders.entry(agent).or_default();
        let result = decider.decide(
            &ctx,
            &self.catalog,
            self.selector.as_deref(),
            interrupted,
            &mut self.rng,
        )?;
        if let (Some(drive), Some(mapping)) = (&result.drive, &result.chosen) {
            self.history
                .decision_made(agent, drive, mapping.id(), result.chosen_utility);
        }
        Ok(result)
    }

    /// Check whether the agent's executing plan should be abandoned
    pub fn should_interrupt(
        &mut self,
        agent: AgentId,
        current: &Mapping,
        current_drive: &DriveTypeId,
        current_utility: f32,
        last_check: GameHours,
    ) -> Result<(bool, GameHours)> {
        let state = self
            .store
            .get(agent)
            .ok_or(VolitionError::AgentNotFound(agent))?;
        let ctx = EvalContext {
            agent,
            state,
            drives: &self.drives,
            attributes: &self.attributes,
            paths: self.paths.as_ref(),
            perception: self.perception.as_ref(),
        };
        let decider = self.deciders.entry(agent).or_default();
        let (interrupted, next_check) = decider.should_interrupt(
            &ctx,
            &self.catalog,
            current,
            current_drive,
            current_utility,
            last_check,
            &mut self.rng,
        )?;
        self.history.interrupt_checked(agent, interrupted, next_check);
        if interrupted {
            self.history.plan_interrupted(agent, current_drive, current.id());
        }
        Ok((interrupted, next_check))
    }

    /// Apply a curve-paired attribute change to an agent
    ///
    /// The rate comes from the registered (target, source) curve pairing,
    /// with `input_value` normalized against the source attribute's
    /// bounds. Returns the target attribute's new normalized level.
    pub fn apply_attribute_change(
        &mut self,
        agent: AgentId,
        target: &AttributeTypeId,
        source: &AttributeTypeId,
        input_value: f32,
        multiplier: f32,
        increase: bool,
    ) -> Result<f32> {
        let source_type = self
            .attributes
            .get(source)
            .ok_or_else(|| VolitionError::Config(format!("unknown attribute type {source}")))?;
        let state = self
            .store
            .get_mut(agent)
            .ok_or(VolitionError::AgentNotFound(agent))?;
        let attribute_state = state.attribute_mut(target).ok_or_else(|| {
            VolitionError::AttributeStateMissing {
                agent,
                attribute: target.clone(),
            }
        })?;
        self.curves.change_using_curve(
            attribute_state,
            target,
            source_type,
            input_value,
            multiplier,
            increase,
        );
        Ok(attribute_state.normalized_level())
    }

    /// Apply an action outcome's output change to a drive
    ///
    /// Routing follows the drive's sync source: an independent drive
    /// takes the change directly as a level delta, an equation-synced
    /// drive runs it through its equation first, and an attribute-synced
    /// drive forwards it to the backing attribute so the derived level
    /// follows. Returns the drive level reached.
    pub fn apply_output_change(
        &mut self,
        agent: AgentId,
        drive: &DriveTypeId,
        output_change: f32,
        mapping: &Mapping,
    ) -> Result<f32> {
        let ty = self
            .drives
            .get(drive)
            .ok_or_else(|| VolitionError::Config(format!("unknown drive type {drive}")))?;
        let state = self
            .store
            .get_mut(agent)
            .ok_or(VolitionError::AgentNotFound(agent))?;
        let old_level = state
            .drive_level(ty)
            .ok_or_else(|| VolitionError::DriveStateMissing {
                agent,
                drive: drive.clone(),
            })?;

        let new_level = match &ty.sync {
            SyncSource::None => {
                let drive_state =
                    state
                        .drive_mut(drive)
                        .ok_or_else(|| VolitionError::DriveStateMissing {
                            agent,
                            drive: drive.clone(),
                        })?;
                drive_state.apply_level_change(output_change)
            }
            SyncSource::Equation(kind) => {
                let drive_state =
                    state
                        .drive_mut(drive)
                        .ok_or_else(|| VolitionError::DriveStateMissing {
                            agent,
                            drive: drive.clone(),
                        })?;
                let delta = kind.level_change(output_change, drive_state, mapping);
                drive_state.apply_level_change(delta)
            }
            SyncSource::Attribute {
                attribute,
                direction,
            } => {
                let Some((min, max)) = self
                    .attributes
                    .get(attribute)
                    .and_then(|at| at.bounds())
                else {
                    tracing::warn!(
                        drive = %drive,
                        attribute = %attribute,
                        "synced attribute has no numeric bounds; change skipped"
                    );
                    return Ok(old_level);
                };
                let attribute_state = state.attribute_mut(attribute).ok_or_else(|| {
                    VolitionError::AttributeStateMissing {
                        agent,
                        attribute: attribute.clone(),
                    }
                })?;
                let sign = match direction {
                    SyncDirection::Same => 1.0,
                    SyncDirection::Opposite => -1.0,
                };
                // Level change on the drive's 0-100 scale, translated to
                // the attribute's own units
                attribute_state.change(sign * output_change / 100.0 * (max - min));
                state.drive_level(ty).unwrap_or(old_level)
            }
        };
        self.history.drive_changed(agent, drive, old_level, new_level);
        Ok(new_level)
    }
}
