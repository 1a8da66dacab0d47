//! Per-agent drive state
//!
//! One [`DriveState`] exists per (agent, drive type) pair, owned by the
//! agent's state table. The raw level always stays inside [min, max];
//! the displayed level inverts and normalizes it onto a 0-100 scale.

use serde::{Deserialize, Serialize};

use crate::drive::types::{ChangeRule, DriveType};

/// Bounded raw level for one drive on one agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveState {
    raw: f32,
    min: f32,
    max: f32,
}

impl DriveState {
    pub fn new(drive_type: &DriveType) -> Self {
        Self {
            raw: drive_type.start.clamp(drive_type.min, drive_type.max),
            min: drive_type.min,
            max: drive_type.max,
        }
    }

    pub fn raw(&self) -> f32 {
        self.raw
    }

    pub fn set_raw(&mut self, value: f32) {
        self.raw = value.clamp(self.min, self.max);
    }

    pub fn change_raw(&mut self, delta: f32) {
        self.set_raw(self.raw + delta);
    }

    /// Normalized level in [0, 100]
    ///
    /// Inverted: a higher raw value yields a lower level. A drive whose
    /// raw value sits at max reads as level 0.
    pub fn level(&self) -> f32 {
        if self.min >= self.max {
            tracing::warn!(min = self.min, max = self.max, "drive has degenerate bounds");
            return 0.0;
        }
        (100.0 * (1.0 - (self.raw - self.min) / (self.max - self.min))).clamp(0.0, 100.0)
    }

    /// Advance the raw level by the type's change rule
    ///
    /// Synced drives are never rate-advanced; a call on one is a
    /// configuration problem and is skipped with a diagnostic.
    pub fn advance(&mut self, drive_type: &DriveType, dt_hours: f32, time_of_day: f32) {
        if drive_type.is_synced() {
            tracing::warn!(drive = %drive_type.id, "advance called on a synced drive; skipped");
            return;
        }
        let Some(rule) = &drive_type.change else {
            return;
        };
        let delta = match rule {
            ChangeRule::Constant { per_game_hour } => per_game_hour * dt_hours,
            ChangeRule::TimeOfDayCurve { curve } => {
                curve.normalize_and_eval(time_of_day, curve.x_min, curve.x_max) * dt_hours
            }
        };
        self.set_raw(self.raw + delta);
    }

    /// Apply a delta expressed in level units (0-100 scale)
    ///
    /// Negative deltas lower the level (raise the raw value). Returns the
    /// level actually reached after clamping.
    pub fn apply_level_change(&mut self, delta_level: f32) -> f32 {
        let new_level = (self.level() + delta_level).clamp(0.0, 100.0);
        self.raw = self.min + (1.0 - new_level / 100.0) * (self.max - self.min);
        self.level()
    }
}
