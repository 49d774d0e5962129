#![deny(unreachable_patterns)]
//! Digital zoom step controller.
//!
//! This crate provides:
//! - An immutable zoom step table with a pluggable index-0 quirk override
//! - The zoom session state machine for immediate and smooth zoom
//! - Coalescing of immediate zoom requests while a hardware write is in flight
//! - A narrow bridge to the external capture state machine
//! - Subscriber notifications, key-value parameter ingestion and metrics

pub mod bridge;
pub mod config;
pub mod controller;
pub mod error;
pub mod hardware;
pub mod metrics;
pub mod notify;
pub mod params;
pub mod quirk;
pub mod session;
pub mod table;

pub use bridge::{
    CaptureStateBridge, CaptureTransition, Committed, InMemoryCaptureState, RolledBack,
    TransitionError,
};
pub use config::ZoomConfig;
pub use controller::{AdvanceReport, ExitOutcome, ZoomController};
pub use error::{ZoomError, ZoomResult};
pub use hardware::{HardwareError, HardwareSink, SimulatedSink};
pub use notify::{
    callback, notification_channel, ChannelSubscriber, NotificationReceiver, ZoomCallback,
    ZoomSubscriber,
};
pub use params::{ZoomParameters, KEY_ZOOM};
pub use quirk::{NoQuirk, QuirkOverride, QuirkProfile, VideoBandingOverride};
pub use session::{AppliedZoom, StepDirection, ZoomSession};
pub use table::{ZoomStepTable, REFERENCE_ZOOM_STEPS};
