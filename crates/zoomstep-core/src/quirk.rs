//! Device quirk overrides for the base zoom step.
//!
//! Some sensor/ISP combinations show duplicated colored bands at the top or
//! bottom edge of video frames. A tiny amount of digital zoom at index 0
//! crops them away. The override is selected once at controller construction
//! so the step table and stepping logic never branch on device identity.

use std::fmt::Debug;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use zoomstep_models::{QuirkContext, ScaleFactor, SensorId};

use crate::error::ZoomError;

/// Strategy that may replace the scale at index 0 for a given context.
pub trait QuirkOverride: Send + Sync + Debug {
    /// Replacement for the base step, or `None` to use the table value.
    fn override_base_scale(&self, context: &QuirkContext) -> Option<ScaleFactor>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Never overrides anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoQuirk;

impl QuirkOverride for NoQuirk {
    fn override_base_scale(&self, _context: &QuirkContext) -> Option<ScaleFactor> {
        None
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Crops edge banding in video modes with a sensor-specific minimum zoom.
#[derive(Debug, Clone, Copy)]
pub struct VideoBandingOverride {
    /// Minimum zoom for the front sensor in video modes.
    pub front_sensor_scale: ScaleFactor,
    /// Minimum zoom for every other sensor in video modes.
    pub back_sensor_scale: ScaleFactor,
    /// Sensor treated as front-facing.
    pub front_sensor: SensorId,
}

impl VideoBandingOverride {
    /// 1.0x + 1280/65536.
    pub const FRONT_SENSOR_VIDEO_MIN_ZOOM: ScaleFactor = ScaleFactor::from_raw(66816);
    /// 1.0x + 768/65536.
    pub const BACK_SENSOR_VIDEO_MIN_ZOOM: ScaleFactor = ScaleFactor::from_raw(66304);
}

impl Default for VideoBandingOverride {
    fn default() -> Self {
        Self {
            front_sensor_scale: Self::FRONT_SENSOR_VIDEO_MIN_ZOOM,
            back_sensor_scale: Self::BACK_SENSOR_VIDEO_MIN_ZOOM,
            front_sensor: SensorId::FRONT,
        }
    }
}

impl QuirkOverride for VideoBandingOverride {
    fn override_base_scale(&self, context: &QuirkContext) -> Option<ScaleFactor> {
        if !context.mode.is_video() {
            return None;
        }

        if context.sensor == self.front_sensor {
            Some(self.front_sensor_scale)
        } else {
            Some(self.back_sensor_scale)
        }
    }

    fn name(&self) -> &'static str {
        "video_banding"
    }
}

/// Configurable selection of a quirk override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuirkProfile {
    #[default]
    None,
    VideoBanding,
}

impl QuirkProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuirkProfile::None => "none",
            QuirkProfile::VideoBanding => "video_banding",
        }
    }

    /// Build the override strategy for this profile.
    pub fn build(&self) -> Arc<dyn QuirkOverride> {
        match self {
            QuirkProfile::None => Arc::new(NoQuirk),
            QuirkProfile::VideoBanding => Arc::new(VideoBandingOverride::default()),
        }
    }
}

impl FromStr for QuirkProfile {
    type Err = ZoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "" => Ok(QuirkProfile::None),
            "video_banding" | "tuna" => Ok(QuirkProfile::VideoBanding),
            _ => Err(ZoomError::invalid_parameter("quirk", s)),
        }
    }
}
