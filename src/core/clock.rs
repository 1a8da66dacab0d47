//! Game clock for time-of-day tracking
//!
//! Provides the time-of-day fraction consumed by curve-shaped drive
//! change rates, plus coarse time periods for hosts that want them.

use serde::{Deserialize, Serialize};

use super::types::GameHours;

/// Time of day periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimePeriod {
    Morning,   // 06:00-12:00
    Afternoon, // 12:00-18:00
    Evening,   // 18:00-22:00
    Night,     // 22:00-06:00
}

impl TimePeriod {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => TimePeriod::Morning,
            12..=17 => TimePeriod::Afternoon,
            18..=21 => TimePeriod::Evening,
            _ => TimePeriod::Night, // 22-23, 0-5
        }
    }
}

/// Tracks simulated time in game hours
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameClock {
    hours: f64,
}

impl GameClock {
    pub fn new() -> Self {
        Self { hours: 0.0 }
    }

    /// Start the clock at an arbitrary hour of day (e.g. 8.0 for 08:00)
    pub fn starting_at(hour_of_day: f64) -> Self {
        Self {
            hours: hour_of_day.rem_euclid(24.0),
        }
    }

    pub fn advance(&mut self, dt: GameHours) {
        self.hours += dt as f64;
    }

    /// Total elapsed game hours since the clock started
    pub fn elapsed_hours(&self) -> GameHours {
        self.hours as f32
    }

    pub fn current_day(&self) -> u64 {
        (self.hours / 24.0) as u64
    }

    pub fn current_hour(&self) -> u32 {
        (self.hours.rem_euclid(24.0)) as u32
    }

    /// Fraction of the current day in [0, 1)
    pub fn time_of_day_fraction(&self) -> f32 {
        (self.hours.rem_euclid(24.0) / 24.0) as f32
    }

    pub fn current_time_period(&self) -> TimePeriod {
        TimePeriod::from_hour(self.current_hour())
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_of_day_wraps() {
        let mut clock = GameClock::new();
        clock.advance(30.0);
        assert_eq!(clock.current_day(), 1);
        assert_eq!(clock.current_hour(), 6);
        assert!((clock.time_of_day_fraction() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_time_periods() {
        assert_eq!(TimePeriod::from_hour(7), TimePeriod::Morning);
        assert_eq!(TimePeriod::from_hour(13), TimePeriod::Afternoon);
        assert_eq!(TimePeriod::from_hour(19), TimePeriod::Evening);
        assert_eq!(TimePeriod::from_hour(2), TimePeriod::Night);
    }

    #[test]
    fn test_starting_at() {
        let clock = GameClock::starting_at(8.0);
        assert_eq!(clock.current_hour(), 8);
        assert_eq!(clock.current_time_period(), TimePeriod::Morning);
    }
}
