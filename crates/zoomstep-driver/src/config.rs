//! Driver configuration.

use std::time::Duration;

/// Tick driver configuration.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Interval between ticks (one per processed frame at 30fps by default)
    pub tick_interval: Duration,
    /// Immediate zoom applied through the parameter path before animating
    pub initial_zoom: Option<i32>,
    /// Smooth zoom target
    pub smooth_target: i32,
    /// Tick after which the smooth zoom is stopped, if any
    pub stop_after: Option<u32>,
    /// Upper bound on ticks before giving up
    pub max_ticks: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(33),
            initial_zoom: None,
            smooth_target: 20,
            stop_after: None,
            max_ticks: 600,
        }
    }
}

impl DriverConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            tick_interval: std::env::var("DRIVER_TICK_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.tick_interval),
            initial_zoom: std::env::var("DRIVER_INITIAL_ZOOM")
                .ok()
                .and_then(|s| s.parse().ok()),
            smooth_target: std::env::var("DRIVER_SMOOTH_TARGET")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.smooth_target),
            stop_after: std::env::var("DRIVER_STOP_AFTER")
                .ok()
                .and_then(|s| s.parse().ok()),
            max_ticks: std::env::var("DRIVER_MAX_TICKS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_ticks),
        }
    }
}
