//! Engine configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other.

use serde::{Deserialize, Serialize};

use super::error::Result;

/// Configuration for the decision engine
///
/// These values have been tuned to produce stable plan selection.
/// Changing them will affect how eager agents are to abandon plans.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === INTERRUPTION ===
    /// Utility advantage an alternative plan needs before it interrupts
    /// the plan currently executing.
    ///
    /// A margin of 0.0 makes agents flip to any marginally better plan,
    /// which produces visible oscillation. At 0.05, the alternative must
    /// be clearly better. The current drive's continue modifier is
    /// applied on top of this margin.
    pub interrupt_margin: f32,

    /// Simulated hours between interruption checks
    ///
    /// At 0.25 (15 in-game minutes), a long-running plan is re-examined
    /// often enough to react to drive changes without re-planning every
    /// tick.
    pub replan_interval_hours: f32,

    // === PLANNING ===
    /// Conversion from a pathfinding cost unit to game hours
    ///
    /// Target time estimates are `base duration + path cost * this`.
    /// Hosts whose path costs are already hours leave it at 1.0.
    pub travel_hours_per_cost: f32,

    // === PARALLELIZATION ===
    /// Minimum agent count before drives advance in parallel
    ///
    /// Below this threshold, thread overhead exceeds benefits. Drive
    /// advancement is per-agent independent, so it parallelizes across
    /// agents only.
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            interrupt_margin: 0.05,
            replan_interval_hours: 0.25,
            travel_hours_per_cost: 1.0,
            parallel_threshold: 256,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys fall back to defaults
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(s)?;
        config.validate().map_err(super::error::VolitionError::Config)?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.interrupt_margin < 0.0 {
            return Err(format!(
                "interrupt_margin ({}) must be >= 0",
                self.interrupt_margin
            ));
        }

        if self.replan_interval_hours <= 0.0 {
            return Err(format!(
                "replan_interval_hours ({}) must be > 0",
                self.replan_interval_hours
            ));
        }

        if self.travel_hours_per_cost < 0.0 {
            return Err(format!(
                "travel_hours_per_cost ({}) must be >= 0",
                self.travel_hours_per_cost
            ));
        }

        if self.parallel_threshold == 0 {
            return Err("parallel_threshold must be >= 1".into());
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<EngineConfig> = OnceLock::new();

/// Get the global engine config (initializes with defaults if not set)
pub fn config() -> &'static EngineConfig {
    CONFIG.get_or_init(EngineConfig::default)
}

/// Set the global engine config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: EngineConfig) -> std::result::Result<(), EngineConfig> {
    CONFIG.set(config)
}
