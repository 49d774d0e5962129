//! Zoom controller metrics.
//!
//! Recorded through the `metrics` facade; nothing is collected unless the
//! host process installs a recorder.

use metrics::{counter, gauge};
use zoomstep_models::{ScaleFactor, ZoomIndex};

/// Metric names as constants for consistency.
pub mod names {
    // Hardware writes
    pub const HARDWARE_WRITES_TOTAL: &str = "zoomstep_hardware_writes_total";
    pub const HARDWARE_WRITE_FAILURES_TOTAL: &str = "zoomstep_hardware_write_failures_total";
    pub const HARDWARE_WRITES_SKIPPED_TOTAL: &str = "zoomstep_hardware_writes_skipped_total";

    // Requests
    pub const REQUESTS_COALESCED_TOTAL: &str = "zoomstep_requests_coalesced_total";
    pub const REQUESTS_REJECTED_TOTAL: &str = "zoomstep_requests_rejected_total";

    // Capture state transitions
    pub const EXIT_COMMITS_TOTAL: &str = "zoomstep_smooth_zoom_exit_commits_total";
    pub const EXIT_ROLLBACKS_TOTAL: &str = "zoomstep_smooth_zoom_exit_rollbacks_total";

    // Subscribers
    pub const NOTIFICATIONS_DROPPED_TOTAL: &str = "zoomstep_notifications_dropped_total";

    // Current position
    pub const CURRENT_INDEX: &str = "zoomstep_current_index";
    pub const APPLIED_SCALE: &str = "zoomstep_applied_scale";
}

/// Record a hardware write that reached the sink.
pub fn record_hardware_write(index: ZoomIndex, scale: ScaleFactor) {
    counter!(names::HARDWARE_WRITES_TOTAL).increment(1);
    gauge!(names::CURRENT_INDEX).set(index as f64);
    gauge!(names::APPLIED_SCALE).set(scale.as_f64());
}

/// Record a hardware write the sink rejected.
pub fn record_hardware_failure() {
    counter!(names::HARDWARE_WRITE_FAILURES_TOTAL).increment(1);
}

/// Record a write skipped by the idempotence guard.
pub fn record_write_skipped() {
    counter!(names::HARDWARE_WRITES_SKIPPED_TOTAL).increment(1);
}

/// Record an immediate zoom merged into a pending update.
pub fn record_coalesced() {
    counter!(names::REQUESTS_COALESCED_TOTAL).increment(1);
}

/// Record a rejected request.
pub fn record_rejected(reason: &'static str) {
    let labels = [("reason", reason)];
    counter!(names::REQUESTS_REJECTED_TOTAL, &labels).increment(1);
}

/// Record the outcome of a smooth zoom exit request.
pub fn record_exit(committed: bool) {
    if committed {
        counter!(names::EXIT_COMMITS_TOTAL).increment(1);
    } else {
        counter!(names::EXIT_ROLLBACKS_TOTAL).increment(1);
    }
}

/// Record a notification a subscriber channel had no room for.
pub fn record_notification_dropped(is_final_step: bool) {
    let labels = [("final", if is_final_step { "true" } else { "false" })];
    counter!(names::NOTIFICATIONS_DROPPED_TOTAL, &labels).increment(1);
}
