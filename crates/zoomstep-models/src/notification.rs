//! Zoom change notifications and smooth zoom states.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scale::ZoomIndex;

/// Delivered to subscribers once per tick that moves or settles the zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ZoomNotification {
    /// Index the session now sits at.
    pub index: ZoomIndex,
    /// True for the last notification of a smooth zoom sequence.
    pub is_final_step: bool,
}

impl ZoomNotification {
    pub fn step(index: ZoomIndex) -> Self {
        Self {
            index,
            is_final_step: false,
        }
    }

    pub fn settled(index: ZoomIndex) -> Self {
        Self {
            index,
            is_final_step: true,
        }
    }
}

/// The part of the capture state machine the zoom controller cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SmoothZoomState {
    #[default]
    Idle,
    SmoothZoomActive,
}

impl SmoothZoomState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SmoothZoomState::Idle => "idle",
            SmoothZoomState::SmoothZoomActive => "smooth_zoom_active",
        }
    }

    /// Returns true while an animated zoom owns the session.
    pub fn is_zoom_active(&self) -> bool {
        matches!(self, SmoothZoomState::SmoothZoomActive)
    }
}

impl fmt::Display for SmoothZoomState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
