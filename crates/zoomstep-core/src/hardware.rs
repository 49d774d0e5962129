//! Hardware configuration sink.
//!
//! The sink is the firmware channel that actually changes the digital zoom.
//! Writes may block on a driver round-trip and are issued while the
//! controller holds its session lock.

use std::sync::Mutex;

use thiserror::Error;
use tracing::{debug, warn};
use zoomstep_models::ScaleFactor;

/// Errors reported by a hardware sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HardwareError {
    #[error("Camera component is in an invalid state")]
    ComponentInvalid,

    #[error("Driver rejected digital zoom config (code {code:#x})")]
    Rejected { code: u32 },

    #[error("Driver I/O error: {0}")]
    Io(String),
}

/// Firmware channel that applies a digital zoom scale.
#[cfg_attr(test, mockall::automock)]
pub trait HardwareSink: Send + Sync {
    /// Apply the given horizontal and vertical scale.
    fn apply(&self, scale_width: ScaleFactor, scale_height: ScaleFactor) -> Result<(), HardwareError>;
}

/// In-memory sink that records every write.
///
/// Can be told to fail upcoming writes, which is how the driver and tests
/// exercise the retry path.
#[derive(Debug, Default)]
pub struct SimulatedSink {
    state: Mutex<SimulatedState>,
}

#[derive(Debug, Default)]
struct SimulatedState {
    writes: Vec<ScaleFactor>,
    fail_next: u32,
    invalid: bool,
}

impl SimulatedSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next `count` writes with [`HardwareError::Rejected`].
    pub fn fail_next(&self, count: u32) {
        self.lock().fail_next = count;
    }

    /// Put the component into (or out of) the invalid state.
    pub fn set_invalid(&self, invalid: bool) {
        self.lock().invalid = invalid;
    }

    /// Every scale successfully written so far.
    pub fn writes(&self) -> Vec<ScaleFactor> {
        self.lock().writes.clone()
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.lock().writes.len()
    }

    /// Most recent successful write.
    pub fn last_write(&self) -> Option<ScaleFactor> {
        self.lock().writes.last().copied()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SimulatedState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl HardwareSink for SimulatedSink {
    fn apply(&self, scale_width: ScaleFactor, scale_height: ScaleFactor) -> Result<(), HardwareError> {
        let mut state = self.lock();

        if state.invalid {
            return Err(HardwareError::ComponentInvalid);
        }

        if state.fail_next > 0 {
            state.fail_next -= 1;
            warn!(scale = %scale_width, "Simulated digital zoom write rejected");
            return Err(HardwareError::Rejected { code: 0x8000_1001 });
        }

        debug!(
            width = scale_width.raw(),
            height = scale_height.raw(),
            "Simulated digital zoom applied"
        );
        state.writes.push(scale_width);
        Ok(())
    }
}
