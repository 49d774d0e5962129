//! Controller configuration.

use serde::{Deserialize, Serialize};
use zoomstep_models::{CaptureMode, QuirkContext, SensorId};

use crate::quirk::QuirkProfile;
use crate::table::REFERENCE_ZOOM_STEPS;

/// Zoom controller configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Number of zoom stages exposed to clients. Clamped to the table length.
    pub max_zoom_supported: usize,
    /// Device quirk applied to the base zoom step.
    pub quirk: QuirkProfile,
    /// Sensor active at startup.
    pub sensor: SensorId,
    /// Capture mode active at startup.
    pub capture_mode: CaptureMode,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            max_zoom_supported: REFERENCE_ZOOM_STEPS.len(),
            quirk: QuirkProfile::None,
            sensor: SensorId::BACK,
            capture_mode: CaptureMode::Preview,
        }
    }
}

impl ZoomConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_zoom_supported: std::env::var("ZOOM_MAX_SUPPORTED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_zoom_supported),
            quirk: std::env::var("ZOOM_QUIRK")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.quirk),
            sensor: std::env::var("ZOOM_SENSOR")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(SensorId)
                .unwrap_or(defaults.sensor),
            capture_mode: std::env::var("ZOOM_CAPTURE_MODE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.capture_mode),
        }
    }

    /// Builder-style setter for the number of exposed stages.
    pub fn with_max_zoom_supported(mut self, max: usize) -> Self {
        self.max_zoom_supported = max;
        self
    }

    /// Builder-style setter for the quirk profile.
    pub fn with_quirk(mut self, quirk: QuirkProfile) -> Self {
        self.quirk = quirk;
        self
    }

    /// Builder-style setter for the startup sensor.
    pub fn with_sensor(mut self, sensor: SensorId) -> Self {
        self.sensor = sensor;
        self
    }

    /// Builder-style setter for the startup capture mode.
    pub fn with_capture_mode(mut self, mode: CaptureMode) -> Self {
        self.capture_mode = mode;
        self
    }

    /// Quirk context at startup.
    pub fn quirk_context(&self) -> QuirkContext {
        QuirkContext::new(self.sensor, self.capture_mode)
    }

    /// Exposed stage count for a table of `table_len` stages.
    pub fn effective_max(&self, table_len: usize) -> usize {
        self.max_zoom_supported.clamp(1, table_len.max(1))
    }
}
