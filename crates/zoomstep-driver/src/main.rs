//! Zoom tick driver binary.

use std::sync::Arc;

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use zoomstep_core::{
    notification_channel, InMemoryCaptureState, SimulatedSink, ZoomConfig, ZoomController,
};
use zoomstep_driver::{DriverConfig, TickDriver};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("zoomstep_core=info,zoomstep_driver=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .context("installing Prometheus recorder")?;

    info!("Starting zoomstep-driver");

    let zoom_config = ZoomConfig::from_env();
    let driver_config = DriverConfig::from_env();
    info!("Zoom config: {:?}", zoom_config);
    info!("Driver config: {:?}", driver_config);

    let sink = Arc::new(SimulatedSink::new());
    let capture = Arc::new(InMemoryCaptureState::new());
    let controller = Arc::new(ZoomController::new(&zoom_config, sink.clone(), capture.clone()));

    let (subscriber, mut notifications) = notification_channel(64);
    controller.subscribe(subscriber);
    let listener = tokio::spawn(async move {
        while let Some(n) = notifications.recv().await {
            info!(index = n.index, is_final = n.is_final_step, "Zoom changed");
        }
    });

    let driver = TickDriver::new(controller.clone(), capture, driver_config);

    let outcome = tokio::select! {
        result = driver.run() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
            Ok(Default::default())
        }
    };

    match &outcome {
        Ok(summary) => info!(?summary, writes = sink.write_count(), "Driver finished"),
        Err(e) => error!("Driver error: {:#}", e),
    }

    listener.abort();

    debug!("Metrics:\n{}", metrics.render());

    outcome.map(|_| ())
}
