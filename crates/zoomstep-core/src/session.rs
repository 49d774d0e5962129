//! Mutable zoom session state.
//!
//! Owned by [`crate::ZoomController`] and only touched while its session lock
//! is held.

use serde::Serialize;
use zoomstep_models::{QuirkContext, ZoomIndex};

/// Direction of a single zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepDirection {
    Down,
    #[default]
    Hold,
    Up,
}

impl StepDirection {
    /// Direction that moves `from` toward `to`.
    pub fn toward(from: ZoomIndex, to: ZoomIndex) -> Self {
        match from.cmp(&to) {
            std::cmp::Ordering::Less => StepDirection::Up,
            std::cmp::Ordering::Equal => StepDirection::Hold,
            std::cmp::Ordering::Greater => StepDirection::Down,
        }
    }

    /// Signed increment, one of -1, 0, +1.
    pub fn increment(&self) -> i8 {
        match self {
            StepDirection::Down => -1,
            StepDirection::Hold => 0,
            StepDirection::Up => 1,
        }
    }

    /// Step `index` once, staying inside `[0, max)`.
    pub fn step(&self, index: ZoomIndex, max: usize) -> ZoomIndex {
        match self {
            StepDirection::Down => index.saturating_sub(1),
            StepDirection::Hold => index,
            StepDirection::Up => (index + 1).min(max.saturating_sub(1)),
        }
    }
}

/// Last index successfully written to hardware, with the context it was
/// resolved under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AppliedZoom {
    pub index: ZoomIndex,
    pub context: QuirkContext,
}

/// State of an idle or in-progress zoom.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ZoomSession {
    /// Index the session currently reports.
    pub current_index: ZoomIndex,
    /// Index the session is heading for.
    pub target_index: ZoomIndex,
    /// Index active when the last smooth zoom was requested.
    pub request_index: ZoomIndex,
    /// Last successful hardware write; `None` until the first one.
    pub previous_applied: Option<AppliedZoom>,
    /// Direction of the final step scheduled by a smooth zoom stop.
    pub step_increment: StepDirection,
    /// A stop was requested; the next tick takes one step and settles.
    pub smooth_return_pending: bool,
    /// A hardware update was issued and the next tick has not cleared it yet.
    pub update_in_flight: bool,
    /// An immediate zoom arrived while an update was in flight.
    pub update_pending: bool,
    /// A settled index whose write failed and must be retried.
    pub failed_index: Option<ZoomIndex>,
}

impl ZoomSession {
    /// Fresh session with every index at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore the baseline, e.g. on device reopen.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Last index written to hardware.
    pub fn previous_applied_index(&self) -> Option<ZoomIndex> {
        self.previous_applied.map(|applied| applied.index)
    }

    /// Returns true if writing `index` under `context` would change anything.
    ///
    /// The context only matters at index 0, the one entry an override can
    /// replace.
    pub fn needs_apply(&self, index: ZoomIndex, context: &QuirkContext) -> bool {
        match self.previous_applied {
            None => true,
            Some(applied) => {
                applied.index != index || (index == 0 && applied.context != *context)
            }
        }
    }

    /// Record a successful write.
    pub fn record_applied(&mut self, index: ZoomIndex, context: QuirkContext) {
        self.previous_applied = Some(AppliedZoom { index, context });
        if self.failed_index == Some(index) {
            self.failed_index = None;
        }
    }

    /// Returns true while the current index differs from the target.
    pub fn is_moving(&self) -> bool {
        self.current_index != self.target_index
    }
}
