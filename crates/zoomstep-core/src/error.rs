//! Error types for zoom operations.

use thiserror::Error;

use crate::hardware::HardwareError;

/// Result type for zoom operations.
pub type ZoomResult<T> = Result<T, ZoomError>;

/// Errors that can occur while driving the zoom state machine.
#[derive(Debug, Error)]
pub enum ZoomError {
    #[error("Zoom index {index} out of range [0, {max})")]
    OutOfRange { index: i64, max: usize },

    #[error("Immediate zoom rejected while smooth zoom is active")]
    Busy,

    #[error("Hardware zoom write failed: {0}")]
    Hardware(#[from] HardwareError),

    #[error("Capture state machine rolled back the smooth zoom exit")]
    StateTransitionFailed,

    #[error("Invalid zoom step table: {0}")]
    InvalidTable(String),

    #[error("Invalid value {value:?} for parameter {key}")]
    InvalidParameter { key: String, value: String },
}

impl ZoomError {
    /// Create an out of range error.
    pub fn out_of_range(index: impl Into<i64>, max: usize) -> Self {
        Self::OutOfRange {
            index: index.into(),
            max,
        }
    }

    /// Create an invalid table error.
    pub fn invalid_table(message: impl Into<String>) -> Self {
        Self::InvalidTable(message.into())
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidParameter {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Returns true if the next tick will retry the failed work.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Hardware(_) | Self::StateTransitionFailed)
    }
}
