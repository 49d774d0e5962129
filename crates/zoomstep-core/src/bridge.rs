//! Capture state bridge.
//!
//! The zoom controller only needs two things from the surrounding capture
//! state machine: whether a smooth zoom currently owns the session, and a way
//! to leave that state once the animation settles. Leaving is two-phase:
//! request the transition, then commit it or roll it back.

use std::sync::{Mutex, MutexGuard};

use thiserror::Error;
use tracing::{debug, warn};
use zoomstep_models::SmoothZoomState;

/// Exit transition was committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Committed;

/// Exit transition was rolled back; the state is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolledBack;

/// Narrow view of the external capture state machine.
///
/// Implementations must not call back into the zoom controller.
#[cfg_attr(test, mockall::automock)]
pub trait CaptureStateBridge: Send + Sync {
    /// True while an animated zoom owns the session.
    fn is_zoom_active(&self) -> bool;

    /// Request the `SmoothZoomActive -> Idle` transition.
    fn request_exit_smooth_zoom(&self) -> Result<Committed, RolledBack>;
}

/// Transitions understood by [`InMemoryCaptureState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureTransition {
    StartSmoothZoom,
    StopSmoothZoom,
}

impl CaptureTransition {
    fn target(&self) -> SmoothZoomState {
        match self {
            CaptureTransition::StartSmoothZoom => SmoothZoomState::SmoothZoomActive,
            CaptureTransition::StopSmoothZoom => SmoothZoomState::Idle,
        }
    }
}

/// Errors from the two-phase transition protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Transition {transition:?} not allowed from {from}")]
    NotAllowed {
        from: SmoothZoomState,
        transition: CaptureTransition,
    },

    #[error("Transition already pending")]
    AlreadyPending,

    #[error("No transition pending")]
    NothingPending,

    #[error("Transition refused")]
    Refused,
}

#[derive(Debug, Default)]
struct CaptureInner {
    state: SmoothZoomState,
    pending: Option<SmoothZoomState>,
    refuse_exits: u32,
}

/// Minimal in-process capture state machine.
#[derive(Debug, Default)]
pub struct InMemoryCaptureState {
    inner: Mutex<CaptureInner>,
}

impl InMemoryCaptureState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current committed state.
    pub fn state(&self) -> SmoothZoomState {
        self.lock().state
    }

    /// Enter `SmoothZoomActive`. Called by whoever starts a smooth zoom.
    pub fn begin_smooth_zoom(&self) -> Result<(), TransitionError> {
        self.set_state(CaptureTransition::StartSmoothZoom)?;
        self.commit_state()
    }

    /// Refuse the next `count` exit requests.
    pub fn refuse_next_exits(&self, count: u32) {
        self.lock().refuse_exits = count;
    }

    /// Phase one: validate and stage a transition.
    pub fn set_state(&self, transition: CaptureTransition) -> Result<(), TransitionError> {
        let mut inner = self.lock();

        if inner.pending.is_some() {
            return Err(TransitionError::AlreadyPending);
        }

        let allowed = match transition {
            CaptureTransition::StartSmoothZoom => inner.state == SmoothZoomState::Idle,
            CaptureTransition::StopSmoothZoom => inner.state == SmoothZoomState::SmoothZoomActive,
        };
        if !allowed {
            return Err(TransitionError::NotAllowed {
                from: inner.state,
                transition,
            });
        }

        if transition == CaptureTransition::StopSmoothZoom && inner.refuse_exits > 0 {
            inner.refuse_exits -= 1;
            return Err(TransitionError::Refused);
        }

        inner.pending = Some(transition.target());
        Ok(())
    }

    /// Phase two: apply the staged transition.
    pub fn commit_state(&self) -> Result<(), TransitionError> {
        let mut inner = self.lock();
        let next = inner.pending.take().ok_or(TransitionError::NothingPending)?;
        debug!(from = %inner.state, to = %next, "Capture state committed");
        inner.state = next;
        Ok(())
    }

    /// Phase two alternative: discard whatever is staged.
    pub fn rollback_state(&self) {
        let mut inner = self.lock();
        if let Some(discarded) = inner.pending.take() {
            debug!(state = %inner.state, discarded = %discarded, "Capture state rolled back");
        }
    }

    fn lock(&self) -> MutexGuard<'_, CaptureInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CaptureStateBridge for InMemoryCaptureState {
    fn is_zoom_active(&self) -> bool {
        self.lock().state.is_zoom_active()
    }

    fn request_exit_smooth_zoom(&self) -> Result<Committed, RolledBack> {
        let staged = self
            .set_state(CaptureTransition::StopSmoothZoom)
            .and_then(|()| self.commit_state());

        match staged {
            Ok(()) => Ok(Committed),
            Err(e) => {
                warn!(error = %e, "Smooth zoom exit not committed");
                self.rollback_state();
                Err(RolledBack)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_and_exit() {
        let capture = InMemoryCaptureState::new();
        assert!(!capture.is_zoom_active());

        capture.begin_smooth_zoom().unwrap();
        assert!(capture.is_zoom_active());

        assert_eq!(capture.request_exit_smooth_zoom(), Ok(Committed));
        assert_eq!(capture.state(), SmoothZoomState::Idle);
    }

    #[test]
    fn test_exit_from_idle_rolls_back() {
        let capture = InMemoryCaptureState::new();
        assert_eq!(capture.request_exit_smooth_zoom(), Err(RolledBack));
        assert_eq!(capture.state(), SmoothZoomState::Idle);
    }

    #[test]
    fn test_refused_exit_keeps_state() {
        let capture = InMemoryCaptureState::new();
        capture.begin_smooth_zoom().unwrap();
        capture.refuse_next_exits(1);

        assert_eq!(capture.request_exit_smooth_zoom(), Err(RolledBack));
        assert!(capture.is_zoom_active());

        assert_eq!(capture.request_exit_smooth_zoom(), Ok(Committed));
        assert!(!capture.is_zoom_active());
    }

    #[test]
    fn test_two_phase_protocol() {
        let capture = InMemoryCaptureState::new();
        capture.set_state(CaptureTransition::StartSmoothZoom).unwrap();
        assert_eq!(
            capture.set_state(CaptureTransition::StartSmoothZoom),
            Err(TransitionError::AlreadyPending)
        );
        assert!(!capture.is_zoom_active());

        capture.rollback_state();
        assert_eq!(capture.commit_state(), Err(TransitionError::NothingPending));
        assert_eq!(capture.state(), SmoothZoomState::Idle);
    }

    #[test]
    fn test_cannot_start_twice() {
        let capture = InMemoryCaptureState::new();
        capture.begin_smooth_zoom().unwrap();
        assert!(matches!(
            capture.begin_smooth_zoom(),
            Err(TransitionError::NotAllowed { .. })
        ));
    }
}
