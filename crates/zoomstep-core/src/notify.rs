//! Zoom change subscribers.
//!
//! Subscribers receive `(index, is_final_step)` after each tick that moves or
//! settles the zoom. Delivery happens outside the session lock, in the order
//! ticks complete, so a subscriber may safely query the controller.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};
use zoomstep_models::{ZoomIndex, ZoomNotification};

use crate::metrics;

/// Receives zoom change notifications.
pub trait ZoomSubscriber: Send + Sync {
    fn on_zoom_changed(&self, index: ZoomIndex, is_final_step: bool);
}

/// Closure adaptor for [`ZoomSubscriber`].
pub struct ZoomCallback<F>(pub F);

impl<F> ZoomSubscriber for ZoomCallback<F>
where
    F: Fn(ZoomIndex, bool) + Send + Sync,
{
    fn on_zoom_changed(&self, index: ZoomIndex, is_final_step: bool) {
        (self.0)(index, is_final_step)
    }
}

/// Wrap a closure as a shareable subscriber.
pub fn callback<F>(f: F) -> Arc<dyn ZoomSubscriber>
where
    F: Fn(ZoomIndex, bool) + Send + Sync + 'static,
{
    Arc::new(ZoomCallback(f))
}

/// Subscriber that forwards into a bounded channel.
///
/// Never blocks the tick. A notification that finds the channel full is
/// dropped, logged and counted.
#[derive(Clone)]
pub struct ChannelSubscriber {
    tx: mpsc::Sender<ZoomNotification>,
    dropped: Arc<AtomicU64>,
}

impl ChannelSubscriber {
    pub fn new(tx: mpsc::Sender<ZoomNotification>) -> Self {
        Self {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Notifications lost to a full channel.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl ZoomSubscriber for ChannelSubscriber {
    fn on_zoom_changed(&self, index: ZoomIndex, is_final_step: bool) {
        let notification = ZoomNotification {
            index,
            is_final_step,
        };

        match self.tx.try_send(notification) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                metrics::record_notification_dropped(is_final_step);
                warn!(index, is_final_step, "Zoom notification channel full, dropping");
            }
            Err(TrySendError::Closed(_)) => {
                debug!(index, is_final_step, "Zoom notification receiver closed");
            }
        }
    }
}

/// Receiving end of a [`ChannelSubscriber`].
pub struct NotificationReceiver {
    rx: mpsc::Receiver<ZoomNotification>,
}

impl NotificationReceiver {
    /// Receive the next notification.
    pub async fn recv(&mut self) -> Option<ZoomNotification> {
        self.rx.recv().await
    }

    /// Try to receive a notification without blocking.
    pub fn try_recv(&mut self) -> Option<ZoomNotification> {
        self.rx.try_recv().ok()
    }

    /// Drain everything currently buffered.
    pub fn drain(&mut self) -> Vec<ZoomNotification> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

/// Create a subscriber/receiver pair.
pub fn notification_channel(capacity: usize) -> (Arc<ChannelSubscriber>, NotificationReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (Arc::new(ChannelSubscriber::new(tx)), NotificationReceiver { rx })
}
