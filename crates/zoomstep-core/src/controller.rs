//! Zoom controller.
//!
//! Orchestrates immediate and smooth zoom over a [`ZoomStepTable`]:
//! - `set_zoom` applies a new index right away, or merges it into the
//!   pending update when a write is already in flight
//! - `start_smooth_zoom` / `stop_smooth_zoom` set up an animation
//! - `advance`, called once per tick, is the only place the animation moves
//!
//! A single session lock serializes those four operations and is held across
//! the hardware write. The capture state bridge is queried before taking the
//! session lock and asked to leave smooth zoom only after releasing it.

use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use tracing::{debug, info, warn};
use zoomstep_models::{QuirkContext, ZoomIndex, ZoomNotification};

use crate::bridge::{CaptureStateBridge, Committed, RolledBack};
use crate::config::ZoomConfig;
use crate::error::{ZoomError, ZoomResult};
use crate::hardware::HardwareSink;
use crate::metrics;
use crate::notify::ZoomSubscriber;
use crate::params::ZoomParameters;
use crate::session::{StepDirection, ZoomSession};
use crate::table::ZoomStepTable;

/// Result of a smooth zoom exit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Committed,
    RolledBack,
}

/// What a successful tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdvanceReport {
    /// Notification delivered to subscribers, if any.
    pub notification: Option<ZoomNotification>,
    /// Outcome of the smooth zoom exit, if one was requested.
    pub exit: Option<ExitOutcome>,
}

struct ControllerState {
    session: ZoomSession,
    context: QuirkContext,
}

/// Digital zoom step controller.
pub struct ZoomController {
    table: ZoomStepTable,
    max_zoom_supported: usize,
    sink: Arc<dyn HardwareSink>,
    bridge: Arc<dyn CaptureStateBridge>,
    state: Mutex<ControllerState>,
    tick: Mutex<()>,
    subscribers: RwLock<Vec<Arc<dyn ZoomSubscriber>>>,
}

impl ZoomController {
    /// Create a controller over the reference table with the configured quirk.
    pub fn new(
        config: &ZoomConfig,
        sink: Arc<dyn HardwareSink>,
        bridge: Arc<dyn CaptureStateBridge>,
    ) -> Self {
        let table = ZoomStepTable::reference_with_quirk(config.quirk.build());
        Self::with_table(table, config, sink, bridge)
    }

    /// Create a controller over a custom table.
    pub fn with_table(
        table: ZoomStepTable,
        config: &ZoomConfig,
        sink: Arc<dyn HardwareSink>,
        bridge: Arc<dyn CaptureStateBridge>,
    ) -> Self {
        let max_zoom_supported = config.effective_max(table.len());
        info!(
            stages = table.len(),
            max_zoom_supported,
            quirk = table.quirk_name(),
            sensor = %config.sensor,
            mode = %config.capture_mode,
            "Zoom controller initialized"
        );

        Self {
            table,
            max_zoom_supported,
            sink,
            bridge,
            state: Mutex::new(ControllerState {
                session: ZoomSession::new(),
                context: config.quirk_context(),
            }),
            tick: Mutex::new(()),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Number of zoom stages exposed to clients.
    pub fn max_zoom_supported(&self) -> usize {
        self.max_zoom_supported
    }

    /// The step table in use.
    pub fn table(&self) -> &ZoomStepTable {
        &self.table
    }

    pub fn current_index(&self) -> ZoomIndex {
        self.lock_state().session.current_index
    }

    pub fn target_index(&self) -> ZoomIndex {
        self.lock_state().session.target_index
    }

    /// Index that was active when the last smooth zoom was requested.
    pub fn request_index(&self) -> ZoomIndex {
        self.lock_state().session.request_index
    }

    /// Returns true while a stop is waiting for its final step.
    pub fn is_smooth_zoom_returning(&self) -> bool {
        self.lock_state().session.smooth_return_pending
    }

    /// Copy of the session state.
    pub fn snapshot(&self) -> ZoomSession {
        self.lock_state().session.clone()
    }

    /// Sensor/mode pair the quirk override is evaluated against.
    pub fn quirk_context(&self) -> QuirkContext {
        self.lock_state().context
    }

    /// Register a subscriber for zoom change notifications.
    pub fn subscribe(&self, subscriber: Arc<dyn ZoomSubscriber>) {
        self.subscribers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(subscriber);
    }

    /// Restore the session baseline, e.g. after the device was reopened.
    pub fn reset(&self) {
        let mut state = self.lock_state();
        state.session.reset();
        info!("Zoom session reset");
    }

    /// Switch sensor or capture mode.
    ///
    /// Rewrites the current index when the new context changes its scale.
    pub fn set_quirk_context(&self, context: QuirkContext) -> ZoomResult<()> {
        let mut state = self.lock_state();
        if state.context == context {
            return Ok(());
        }

        debug!(
            sensor = %context.sensor,
            mode = %context.mode,
            "Zoom quirk context changed"
        );
        state.context = context;

        if state.session.previous_applied.is_none() {
            return Ok(());
        }

        let index = state.session.current_index;
        self.apply_hardware_zoom(&mut state, index)
    }

    /// Immediate zoom.
    ///
    /// Fails with `OutOfRange` or `Busy` without touching the session. A
    /// hardware failure keeps the new index and is retried on the next tick.
    pub fn set_zoom(&self, requested: i32) -> ZoomResult<()> {
        let index = self.validate(requested)?;

        if self.bridge.is_zoom_active() {
            metrics::record_rejected("busy");
            return Err(ZoomError::Busy);
        }

        let mut state = self.lock_state();
        let session = &mut state.session;
        session.target_index = index;
        session.current_index = index;
        session.smooth_return_pending = false;

        if session.update_in_flight {
            session.update_pending = true;
            metrics::record_coalesced();
            debug!(index, "Immediate zoom deferred to next tick");
            return Ok(());
        }

        session.update_in_flight = true;
        debug!(index, "Immediate zoom");
        self.apply_hardware_zoom(&mut state, index)
    }

    /// Route the zoom key of a parameter set through [`Self::set_zoom`].
    pub fn apply_parameters(&self, params: &ZoomParameters) -> ZoomResult<()> {
        match params.zoom()? {
            Some(requested) => self.set_zoom(requested),
            None => Ok(()),
        }
    }

    /// Begin animating toward `target`. The index itself only moves in
    /// [`Self::advance`].
    pub fn start_smooth_zoom(&self, target: i32) -> ZoomResult<()> {
        let target = self.validate(target)?;

        let mut state = self.lock_state();
        let session = &mut state.session;
        info!(
            target_index = target,
            current_index = session.current_index,
            "Start smooth zoom"
        );

        session.target_index = target;
        session.request_index = session.current_index;
        session.smooth_return_pending = false;
        Ok(())
    }

    /// Schedule one last step toward the target, then settle.
    pub fn stop_smooth_zoom(&self) {
        let mut state = self.lock_state();
        let session = &mut state.session;

        if !session.is_moving() {
            return;
        }

        session.step_increment = StepDirection::toward(session.current_index, session.target_index);
        session.smooth_return_pending = true;
        info!(
            current = session.current_index,
            target = session.target_index,
            "Stop smooth zoom"
        );
    }

    /// Run one tick of the zoom state machine.
    pub fn advance(&self) -> ZoomResult<AdvanceReport> {
        let _tick = self.tick.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let zoom_active = self.bridge.is_zoom_active();

        let mut notification = None;
        let mut exit_wanted = false;
        let mut error = None;

        {
            let mut state = self.lock_state();

            if state.session.smooth_return_pending {
                let next = state
                    .session
                    .step_increment
                    .step(state.session.current_index, self.max_zoom_supported);

                match self.apply_hardware_zoom(&mut state, next) {
                    Ok(()) => {
                        let session = &mut state.session;
                        session.current_index = next;
                        session.target_index = next;
                        session.smooth_return_pending = false;
                        info!(index = next, "Smooth zoom stopped");
                        notification = Some(ZoomNotification::settled(next));
                    }
                    Err(e) => error = Some(e),
                }
            } else if state.session.is_moving() {
                let current = state.session.current_index;
                let target = state.session.target_index;
                let next = if zoom_active {
                    StepDirection::toward(current, target).step(current, self.max_zoom_supported)
                } else {
                    target
                };

                match self.apply_hardware_zoom(&mut state, next) {
                    Ok(()) => {
                        state.session.current_index = next;
                        if zoom_active {
                            if next == target {
                                info!(index = next, "Smooth zoom target reached");
                                exit_wanted = true;
                                notification = Some(ZoomNotification::settled(next));
                            } else {
                                debug!(index = next, target_index = target, "Smooth zoom advancing");
                                notification = Some(ZoomNotification::step(next));
                            }
                        }
                    }
                    Err(e) => error = Some(e),
                }
            } else if zoom_active {
                exit_wanted = true;
            } else if state.session.failed_index == Some(state.session.current_index) {
                let index = state.session.current_index;
                debug!(index, "Retrying failed zoom write");
                if let Err(e) = self.apply_hardware_zoom(&mut state, index) {
                    error = Some(e);
                }
            }

            // A deferred immediate zoom always lands on the tracked index; a
            // smooth zoom started since then has already moved it.
            if state.session.update_pending {
                let index = state.session.current_index;
                match self.apply_hardware_zoom(&mut state, index) {
                    Ok(()) => state.session.update_pending = false,
                    Err(e) => {
                        error.get_or_insert(e);
                    }
                }
                state.session.update_in_flight = true;
            } else {
                state.session.update_in_flight = false;
            }
        }

        let mut exit = None;
        if exit_wanted {
            match self.bridge.request_exit_smooth_zoom() {
                Ok(Committed) => {
                    metrics::record_exit(true);
                    exit = Some(ExitOutcome::Committed);
                }
                Err(RolledBack) => {
                    metrics::record_exit(false);
                    warn!("Smooth zoom exit rolled back, retrying next tick");
                    exit = Some(ExitOutcome::RolledBack);
                    error.get_or_insert(ZoomError::StateTransitionFailed);
                }
            }
        }

        if let Some(n) = notification {
            self.notify(n);
        }

        match error {
            Some(e) => Err(e),
            None => Ok(AdvanceReport { notification, exit }),
        }
    }

    /// Write `index` to hardware unless it is already applied under the
    /// current context.
    ///
    /// On failure the previously applied index is left untouched so the next
    /// attempt writes again.
    fn apply_hardware_zoom(&self, state: &mut ControllerState, index: ZoomIndex) -> ZoomResult<()> {
        let context = state.context;

        if !state.session.needs_apply(index, &context) {
            metrics::record_write_skipped();
            debug!(index, "Zoom already applied, skipping write");
            return Ok(());
        }

        let scale = self.table.scale_factor_for(index, &context)?;

        match self.sink.apply(scale, scale) {
            Ok(()) => {
                state.session.record_applied(index, context);
                metrics::record_hardware_write(index, scale);
                debug!(index, scale = %scale, "Digital zoom applied");
                Ok(())
            }
            Err(e) => {
                state.session.failed_index = Some(index);
                metrics::record_hardware_failure();
                warn!(index, scale = %scale, error = %e, "Error while applying digital zoom");
                Err(e.into())
            }
        }
    }

    fn validate(&self, requested: i32) -> ZoomResult<ZoomIndex> {
        usize::try_from(requested)
            .ok()
            .filter(|index| *index < self.max_zoom_supported)
            .ok_or_else(|| {
                metrics::record_rejected("out_of_range");
                warn!(requested, max = self.max_zoom_supported, "Zoom index out of range");
                ZoomError::out_of_range(requested, self.max_zoom_supported)
            })
    }

    fn notify(&self, notification: ZoomNotification) {
        let subscribers = self
            .subscribers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();

        for subscriber in subscribers {
            subscriber.on_zoom_changed(notification.index, notification.is_final_step);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for ZoomController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoomController")
            .field("stages", &self.table.len())
            .field("max_zoom_supported", &self.max_zoom_supported)
            .field("session", &self.snapshot())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{InMemoryCaptureState, MockCaptureStateBridge};
    use crate::hardware::{HardwareError, MockHardwareSink, SimulatedSink};
    use crate::notify::callback;
    use crate::quirk::{NoQuirk, QuirkProfile};
    use zoomstep_models::{CaptureMode, SensorId};

    const SMALL_TABLE: [u32; 3] = [65536, 68157, 70124];
    const REFERENCE: [u32; 61] = crate::table::REFERENCE_ZOOM_STEPS;

    struct Fixture {
        controller: ZoomController,
        sink: Arc<SimulatedSink>,
        capture: Arc<InMemoryCaptureState>,
        seen: Arc<Mutex<Vec<(ZoomIndex, bool)>>>,
    }

    fn fixture(steps: &[u32]) -> Fixture {
        let table = ZoomStepTable::new(steps, Arc::new(NoQuirk)).unwrap();
        let config = ZoomConfig::default().with_max_zoom_supported(steps.len());
        let sink = Arc::new(SimulatedSink::new());
        let capture = Arc::new(InMemoryCaptureState::new());
        let controller = ZoomController::with_table(table, &config, sink.clone(), capture.clone());

        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&seen);
        controller.subscribe(callback(move |index, is_final| {
            recorder.lock().unwrap().push((index, is_final));
        }));

        Fixture {
            controller,
            sink,
            capture,
            seen,
        }
    }

    fn raw_writes(sink: &SimulatedSink) -> Vec<u32> {
        sink.writes().iter().map(|s| s.raw()).collect()
    }

    #[test]
    fn test_set_zoom_applies_immediately() {
        let f = fixture(&SMALL_TABLE);

        f.controller.set_zoom(2).unwrap();

        assert_eq!(f.controller.current_index(), 2);
        assert_eq!(f.controller.target_index(), 2);
        assert_eq!(raw_writes(&f.sink), vec![70124]);
        assert!(f.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_set_zoom_every_valid_index() {
        let f = fixture(&SMALL_TABLE);
        for index in 0..3 {
            f.controller.set_zoom(index).unwrap();
            f.controller.advance().unwrap();
            assert_eq!(f.controller.current_index(), index as ZoomIndex);
        }
    }

    #[test]
    fn test_set_zoom_out_of_range() {
        let f = fixture(&SMALL_TABLE);
        f.controller.set_zoom(1).unwrap();

        for bad in [3, 5, -1, i32::MAX, i32::MIN] {
            assert!(matches!(
                f.controller.set_zoom(bad),
                Err(ZoomError::OutOfRange { max: 3, .. })
            ));
            assert_eq!(f.controller.current_index(), 1);
        }
        assert_eq!(f.sink.write_count(), 1);
    }

    #[test]
    fn test_set_zoom_busy_during_smooth_zoom() {
        let f = fixture(&SMALL_TABLE);
        f.capture.begin_smooth_zoom().unwrap();

        assert!(matches!(f.controller.set_zoom(1), Err(ZoomError::Busy)));
        assert_eq!(f.controller.snapshot(), ZoomSession::new());
        assert_eq!(f.sink.write_count(), 0);
    }

    #[test]
    fn test_coalesces_while_in_flight() {
        let f = fixture(&REFERENCE);

        f.controller.set_zoom(10).unwrap();
        f.controller.set_zoom(20).unwrap();
        f.controller.set_zoom(30).unwrap();
        assert_eq!(f.sink.write_count(), 1);
        assert!(f.controller.snapshot().update_pending);

        f.controller.advance().unwrap();

        let table = ZoomStepTable::reference();
        assert_eq!(
            f.sink.writes(),
            vec![table.baseline(10).unwrap(), table.baseline(30).unwrap()]
        );
        let session = f.controller.snapshot();
        assert!(!session.update_pending);
        assert!(session.update_in_flight);

        f.controller.advance().unwrap();
        assert!(!f.controller.snapshot().update_in_flight);
    }

    #[test]
    fn test_pending_update_follows_smooth_zoom() {
        let f = fixture(&REFERENCE);
        let table = ZoomStepTable::reference();

        f.controller.set_zoom(10).unwrap();
        f.controller.set_zoom(20).unwrap();
        f.capture.begin_smooth_zoom().unwrap();
        f.controller.start_smooth_zoom(40).unwrap();

        let report = f.controller.advance().unwrap();
        assert_eq!(report.notification, Some(ZoomNotification::step(21)));
        assert_eq!(
            f.sink.writes(),
            vec![table.baseline(10).unwrap(), table.baseline(21).unwrap()]
        );
        let session = f.controller.snapshot();
        assert_eq!(session.current_index, 21);
        assert_eq!(session.previous_applied_index(), Some(21));
        assert!(!session.update_pending);

        f.controller.advance().unwrap();
        assert_eq!(f.sink.last_write(), table.baseline(22));
        assert_eq!(f.sink.write_count(), 3);
        assert_eq!(f.controller.snapshot().previous_applied_index(), Some(22));
    }

    #[test]
    fn test_pending_update_without_movement_lands_on_requested_index() {
        let f = fixture(&REFERENCE);
        let table = ZoomStepTable::reference();

        f.controller.set_zoom(10).unwrap();
        f.controller.set_zoom(20).unwrap();
        f.capture.begin_smooth_zoom().unwrap();
        f.controller.start_smooth_zoom(20).unwrap();

        let report = f.controller.advance().unwrap();
        assert_eq!(report.exit, Some(ExitOutcome::Committed));
        assert_eq!(
            f.sink.writes(),
            vec![table.baseline(10).unwrap(), table.baseline(20).unwrap()]
        );
    }

    #[test]
    fn test_smooth_zoom_scenario() {
        let f = fixture(&SMALL_TABLE);
        f.capture.begin_smooth_zoom().unwrap();
        f.controller.start_smooth_zoom(2).unwrap();
        assert_eq!(f.controller.current_index(), 0);
        assert_eq!(f.controller.request_index(), 0);

        let report = f.controller.advance().unwrap();
        assert_eq!(report.notification, Some(ZoomNotification::step(1)));
        assert_eq!(report.exit, None);

        let report = f.controller.advance().unwrap();
        assert_eq!(report.notification, Some(ZoomNotification::settled(2)));
        assert_eq!(report.exit, Some(ExitOutcome::Committed));
        assert!(!f.capture.is_zoom_active());

        assert_eq!(*f.seen.lock().unwrap(), vec![(1, false), (2, true)]);
        assert_eq!(raw_writes(&f.sink), vec![68157, 70124]);
    }

    #[test]
    fn test_smooth_zoom_down() {
        let f = fixture(&REFERENCE);
        f.controller.set_zoom(5).unwrap();
        f.controller.advance().unwrap();

        f.capture.begin_smooth_zoom().unwrap();
        f.controller.start_smooth_zoom(2).unwrap();
        assert_eq!(f.controller.request_index(), 5);

        for _ in 0..3 {
            f.controller.advance().unwrap();
        }

        assert_eq!(f.controller.current_index(), 2);
        assert_eq!(*f.seen.lock().unwrap(), vec![(4, false), (3, false), (2, true)]);
    }

    #[test]
    fn test_stop_takes_one_step_then_settles() {
        let f = fixture(&REFERENCE);
        f.capture.begin_smooth_zoom().unwrap();
        f.controller.start_smooth_zoom(40).unwrap();
        f.controller.advance().unwrap();
        f.controller.advance().unwrap();

        f.controller.stop_smooth_zoom();
        assert!(f.controller.is_smooth_zoom_returning());

        let report = f.controller.advance().unwrap();
        assert_eq!(report.notification, Some(ZoomNotification::settled(3)));
        assert_eq!(f.controller.current_index(), 3);
        assert_eq!(f.controller.target_index(), 3);
        assert!(!f.controller.is_smooth_zoom_returning());

        // Capture state still says active; the next tick asks to leave it.
        let report = f.controller.advance().unwrap();
        assert_eq!(report.notification, None);
        assert_eq!(report.exit, Some(ExitOutcome::Committed));
        assert_eq!(f.controller.current_index(), 3);
    }

    #[test]
    fn test_stop_when_settled_is_noop() {
        let f = fixture(&SMALL_TABLE);
        f.controller.stop_smooth_zoom();
        assert!(!f.controller.is_smooth_zoom_returning());
    }

    #[test]
    fn test_non_animated_jump() {
        let f = fixture(&REFERENCE);
        f.controller.start_smooth_zoom(12).unwrap();

        let report = f.controller.advance().unwrap();

        assert_eq!(f.controller.current_index(), 12);
        assert_eq!(report, AdvanceReport::default());
        assert_eq!(f.sink.write_count(), 1);
    }

    #[test]
    fn test_hardware_failure_stalls_and_retries() {
        let f = fixture(&SMALL_TABLE);
        f.capture.begin_smooth_zoom().unwrap();
        f.controller.start_smooth_zoom(2).unwrap();

        f.sink.fail_next(1);
        assert!(matches!(f.controller.advance(), Err(ZoomError::Hardware(_))));
        assert_eq!(f.controller.current_index(), 0);
        assert!(f.seen.lock().unwrap().is_empty());

        f.controller.advance().unwrap();
        assert_eq!(f.controller.current_index(), 1);
        assert_eq!(raw_writes(&f.sink), vec![68157]);
    }

    #[test]
    fn test_failed_immediate_zoom_retried_on_tick() {
        let f = fixture(&SMALL_TABLE);
        f.sink.fail_next(1);

        assert!(matches!(f.controller.set_zoom(2), Err(ZoomError::Hardware(_))));
        assert_eq!(f.controller.current_index(), 2);
        assert_eq!(f.controller.snapshot().previous_applied_index(), None);

        f.controller.advance().unwrap();
        assert_eq!(raw_writes(&f.sink), vec![70124]);
        assert_eq!(f.controller.snapshot().failed_index, None);
    }

    #[test]
    fn test_exit_rollback_is_retried() {
        let f = fixture(&SMALL_TABLE);
        f.capture.begin_smooth_zoom().unwrap();
        f.capture.refuse_next_exits(1);
        f.controller.start_smooth_zoom(1).unwrap();

        assert!(matches!(
            f.controller.advance(),
            Err(ZoomError::StateTransitionFailed)
        ));
        assert!(f.capture.is_zoom_active());
        assert_eq!(*f.seen.lock().unwrap(), vec![(1, true)]);

        let report = f.controller.advance().unwrap();
        assert_eq!(report.exit, Some(ExitOutcome::Committed));
        assert!(!f.capture.is_zoom_active());
    }

    #[test]
    fn test_idempotent_apply() {
        let f = fixture(&SMALL_TABLE);
        f.controller.set_zoom(1).unwrap();
        f.controller.advance().unwrap();
        f.controller.set_zoom(1).unwrap();
        f.controller.advance().unwrap();

        assert_eq!(f.sink.write_count(), 1);
    }

    #[test]
    fn test_quirk_context_rewrites_base_step() {
        let config = ZoomConfig::default()
            .with_quirk(QuirkProfile::VideoBanding)
            .with_sensor(SensorId::FRONT);
        let sink = Arc::new(SimulatedSink::new());
        let controller =
            ZoomController::new(&config, sink.clone(), Arc::new(InMemoryCaptureState::new()));

        controller.set_zoom(0).unwrap();
        let video = controller.quirk_context().with_mode(CaptureMode::Video);
        controller.set_quirk_context(video).unwrap();
        controller.set_quirk_context(video).unwrap();
        controller
            .set_quirk_context(video.with_mode(CaptureMode::Preview))
            .unwrap();

        assert_eq!(raw_writes(&sink), vec![65536, 66816, 65536]);
    }

    #[test]
    fn test_quirk_context_sensor_switch_rewrites_base_step() {
        let config = ZoomConfig::default()
            .with_quirk(QuirkProfile::VideoBanding)
            .with_sensor(SensorId::BACK)
            .with_capture_mode(CaptureMode::Video);
        let sink = Arc::new(SimulatedSink::new());
        let controller =
            ZoomController::new(&config, sink.clone(), Arc::new(InMemoryCaptureState::new()));

        controller.set_zoom(0).unwrap();
        let front = controller.quirk_context().with_sensor(SensorId::FRONT);
        controller.set_quirk_context(front).unwrap();

        assert_eq!(raw_writes(&sink), vec![66304, 66816]);
    }

    #[test]
    fn test_quirk_context_ignored_off_base_step() {
        let config = ZoomConfig::default().with_quirk(QuirkProfile::VideoBanding);
        let sink = Arc::new(SimulatedSink::new());
        let controller =
            ZoomController::new(&config, sink.clone(), Arc::new(InMemoryCaptureState::new()));

        controller.set_zoom(3).unwrap();
        controller
            .set_quirk_context(QuirkContext::new(SensorId::BACK, CaptureMode::Video))
            .unwrap();

        assert_eq!(sink.write_count(), 1);
    }

    #[test]
    fn test_reset_restores_baseline() {
        let f = fixture(&SMALL_TABLE);
        f.controller.set_zoom(2).unwrap();
        f.controller.reset();

        assert_eq!(f.controller.snapshot(), ZoomSession::new());
        f.controller.set_zoom(2).unwrap();
        assert_eq!(f.sink.write_count(), 2);
    }

    #[test]
    fn test_apply_parameters() {
        let f = fixture(&SMALL_TABLE);

        f.controller
            .apply_parameters(&ZoomParameters::new().with("zoom", "1"))
            .unwrap();
        assert_eq!(f.controller.current_index(), 1);

        assert!(matches!(
            f.controller
                .apply_parameters(&ZoomParameters::new().with("zoom", "5")),
            Err(ZoomError::OutOfRange { index: 5, max: 3 })
        ));
        f.controller.apply_parameters(&ZoomParameters::new()).unwrap();
        assert_eq!(f.controller.current_index(), 1);
    }

    #[test]
    fn test_writes_equal_width_and_height() {
        let mut sink = MockHardwareSink::new();
        sink.expect_apply()
            .withf(|w, h| w == h && w.raw() == 68157)
            .times(1)
            .returning(|_, _| Ok(()));

        let mut bridge = MockCaptureStateBridge::new();
        bridge.expect_is_zoom_active().return_const(false);

        let table = ZoomStepTable::new(&SMALL_TABLE, Arc::new(NoQuirk)).unwrap();
        let controller = ZoomController::with_table(
            table,
            &ZoomConfig::default(),
            Arc::new(sink),
            Arc::new(bridge),
        );

        controller.set_zoom(1).unwrap();
        controller.set_zoom(1).unwrap();
        controller.advance().unwrap();
    }

    #[test]
    fn test_exit_requested_once_per_settle() {
        let mut sink = MockHardwareSink::new();
        sink.expect_apply().returning(|_, _| Ok(()));

        let mut bridge = MockCaptureStateBridge::new();
        let active = Arc::new(std::sync::atomic::AtomicBool::new(true));
        bridge
            .expect_is_zoom_active()
            .returning(move || active.swap(false, std::sync::atomic::Ordering::SeqCst));
        bridge
            .expect_request_exit_smooth_zoom()
            .times(1)
            .returning(|| Ok(Committed));

        let table = ZoomStepTable::new(&SMALL_TABLE, Arc::new(NoQuirk)).unwrap();
        let controller = ZoomController::with_table(
            table,
            &ZoomConfig::default(),
            Arc::new(sink),
            Arc::new(bridge),
        );

        controller.start_smooth_zoom(1).unwrap();
        let report = controller.advance().unwrap();
        assert_eq!(report.exit, Some(ExitOutcome::Committed));

        let report = controller.advance().unwrap();
        assert_eq!(report, AdvanceReport::default());
    }

    #[test]
    fn test_hardware_error_surfaces_kind() {
        let mut sink = MockHardwareSink::new();
        sink.expect_apply()
            .returning(|_, _| Err(HardwareError::ComponentInvalid));
        let mut bridge = MockCaptureStateBridge::new();
        bridge.expect_is_zoom_active().return_const(false);

        let table = ZoomStepTable::new(&SMALL_TABLE, Arc::new(NoQuirk)).unwrap();
        let controller = ZoomController::with_table(
            table,
            &ZoomConfig::default(),
            Arc::new(sink),
            Arc::new(bridge),
        );

        let err = controller.set_zoom(2).unwrap_err();
        assert!(matches!(err, ZoomError::Hardware(HardwareError::ComponentInvalid)));
        assert!(err.is_retryable());
        assert_eq!(controller.snapshot().failed_index, Some(2));
    }
}
