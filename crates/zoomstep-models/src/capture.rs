//! Sensor identity and capture modes.
//!
//! Together these form the [`QuirkContext`] that decides whether a
//! device-specific override applies to the base zoom step.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identity of the active camera sensor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct SensorId(pub u8);

impl SensorId {
    /// Rear-facing sensor.
    pub const BACK: SensorId = SensorId(0);

    /// Front-facing sensor.
    pub const FRONT: SensorId = SensorId(1);

    /// Returns true for the front-facing sensor.
    pub fn is_front(&self) -> bool {
        *self == Self::FRONT
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sensor{}", self.0)
    }
}

/// Capture mode the ISP is configured for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMode {
    /// Viewfinder preview only.
    #[default]
    Preview,

    /// Still image capture.
    Still,

    /// Video recording.
    Video,

    /// High quality video recording.
    VideoHighQuality,
}

impl CaptureMode {
    /// All capture modes.
    pub const ALL: &'static [CaptureMode] = &[
        CaptureMode::Preview,
        CaptureMode::Still,
        CaptureMode::Video,
        CaptureMode::VideoHighQuality,
    ];

    /// Returns the mode name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureMode::Preview => "preview",
            CaptureMode::Still => "still",
            CaptureMode::Video => "video",
            CaptureMode::VideoHighQuality => "video_hq",
        }
    }

    /// Returns true for the video recording modes.
    pub fn is_video(&self) -> bool {
        matches!(self, CaptureMode::Video | CaptureMode::VideoHighQuality)
    }
}

impl fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CaptureMode {
    type Err = CaptureModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "preview" => Ok(CaptureMode::Preview),
            "still" | "capture" => Ok(CaptureMode::Still),
            "video" => Ok(CaptureMode::Video),
            "video_hq" | "video_high_quality" => Ok(CaptureMode::VideoHighQuality),
            _ => Err(CaptureModeParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown capture mode: {0}")]
pub struct CaptureModeParseError(String);

/// Sensor/mode pair a quirk override is evaluated against.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
pub struct QuirkContext {
    pub sensor: SensorId,
    pub mode: CaptureMode,
}

impl QuirkContext {
    pub fn new(sensor: SensorId, mode: CaptureMode) -> Self {
        Self { sensor, mode }
    }

    /// Same sensor, different mode.
    pub fn with_mode(self, mode: CaptureMode) -> Self {
        Self { mode, ..self }
    }

    /// Same mode, different sensor.
    pub fn with_sensor(self, sensor: SensorId) -> Self {
        Self { sensor, ..self }
    }
}
