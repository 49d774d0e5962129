//! Tick driver.
//!
//! Plays the role of the frame callback: applies an optional immediate zoom,
//! enters smooth zoom on the capture state machine, then calls `advance`
//! once per tick until the animation settles and the state machine is idle.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};
use zoomstep_core::{
    ExitOutcome, InMemoryCaptureState, ZoomController, ZoomParameters, KEY_ZOOM,
};

use crate::config::DriverConfig;

/// Summary of a driver run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DriverSummary {
    pub ticks: u32,
    pub final_index: usize,
    pub retried_ticks: u32,
}

/// Drives a controller from a fixed-rate tick.
pub struct TickDriver {
    controller: Arc<ZoomController>,
    capture: Arc<InMemoryCaptureState>,
    config: DriverConfig,
}

impl TickDriver {
    pub fn new(
        controller: Arc<ZoomController>,
        capture: Arc<InMemoryCaptureState>,
        config: DriverConfig,
    ) -> Self {
        Self {
            controller,
            capture,
            config,
        }
    }

    /// Run one smooth zoom to completion.
    pub async fn run(&self) -> Result<DriverSummary> {
        if let Some(zoom) = self.config.initial_zoom {
            let params = ZoomParameters::new().with(KEY_ZOOM, zoom.to_string());
            self.controller
                .apply_parameters(&params)
                .context("initial immediate zoom")?;
            info!(index = zoom, "Initial zoom applied");
        }

        self.capture
            .begin_smooth_zoom()
            .context("entering smooth zoom")?;
        self.controller
            .start_smooth_zoom(self.config.smooth_target)
            .context("starting smooth zoom")?;

        let period = self.config.tick_interval.max(Duration::from_millis(1));
        let mut interval = tokio::time::interval(period);
        let mut retried_ticks = 0;

        for tick in 1..=self.config.max_ticks {
            interval.tick().await;

            if self.config.stop_after == Some(tick) {
                self.controller.stop_smooth_zoom();
            }

            match self.controller.advance() {
                Ok(report) => {
                    if let Some(n) = report.notification {
                        debug!(tick, index = n.index, is_final = n.is_final_step, "Tick");
                    }
                    if report.exit == Some(ExitOutcome::Committed) {
                        let summary = DriverSummary {
                            ticks: tick,
                            final_index: self.controller.current_index(),
                            retried_ticks,
                        };
                        info!(?summary, "Smooth zoom settled");
                        return Ok(summary);
                    }
                }
                Err(e) if e.is_retryable() => {
                    retried_ticks += 1;
                    warn!(tick, error = %e, "Tick failed, retrying on next tick");
                }
                Err(e) => return Err(e).context("advancing zoom"),
            }
        }

        bail!(
            "smooth zoom did not settle within {} ticks (index {})",
            self.config.max_ticks,
            self.controller.current_index()
        )
    }
}
