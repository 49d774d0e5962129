//! Shared value types for the digital zoom step controller.
//!
//! This crate provides Serde-serializable types for:
//! - Zoom indexes and 16.16 fixed-point scale factors
//! - Sensor identity and capture modes
//! - Quirk contexts used to resolve device-specific overrides
//! - Zoom change notifications and smooth zoom states

pub mod capture;
pub mod notification;
pub mod scale;

// Re-export common types
pub use capture::{CaptureMode, CaptureModeParseError, QuirkContext, SensorId};
pub use notification::{SmoothZoomState, ZoomNotification};
pub use scale::{ScaleFactor, ZoomIndex};
