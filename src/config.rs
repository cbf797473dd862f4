//! Playback engine configuration

use std::time::Duration;

/// Tunables for the playback scheduler and explanation trigger
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Wall-clock interval at speed 1.0 between auto-advance ticks
    pub tick_base: Duration,
    /// Lowest accepted speed multiplier
    pub min_speed: f64,
    /// Highest accepted speed multiplier
    pub max_speed: f64,
    /// Settle window before an explanation request fires
    pub explain_settle: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_base: Duration::from_millis(1000),
            min_speed: 0.25,
            max_speed: 8.0,
            explain_settle: Duration::from_millis(150),
        }
    }
}

impl PlaybackConfig {
    /// Auto-advance interval for a given speed multiplier
    pub fn tick_interval(&self, speed: f64) -> Duration {
        self.tick_base.div_f64(speed)
    }
}
