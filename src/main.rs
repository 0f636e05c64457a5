//! # CISS Bridge
//!
//! Stream telemetry from a Bosch CISS multi-sensor node.
//!
//! Opens the node's USB serial port, arms the sensors, and prints every
//! decoded snapshot as one JSON line on stdout.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber;

mod codec;
mod config;
mod error;
mod serial;
mod telemetry;
mod wireless;

use config::Config;
use serial::CissSerial;
use telemetry::TelemetryPublisher;

/// Number of snapshots between status log messages
const LOG_INTERVAL_SNAPSHOTS: u64 = 100;

/// Main entry point for CISS Bridge
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Set up logging with tracing subscriber
///    - Load configuration (path from the first CLI argument, else defaults)
///    - Open the serial connection and run the sensor arming sequence
///
/// 2. **Main Loop**
///    - The session task reads raw chunks, frames and decodes them, and
///      publishes snapshots
///    - Each snapshot is printed as one JSON line
///    - Status is logged every 100 snapshots
///    - Ctrl+C triggers graceful shutdown
///
/// # Errors
///
/// Returns error if the serial port cannot be opened, the configuration is
/// invalid, or the arming sequence fails.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("CISS Bridge v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };

    // Open the node and arm its sensors
    let mut port = CissSerial::open(&config.serial.port, config.serial.baud_rate)?;
    info!("CISS serial port opened at: {}", port.device_path());

    port.configure(
        &config.sensors,
        Duration::from_millis(config.serial.command_settle_ms),
    )
    .await?;

    // Decoded snapshots fan out from here; the console printer below is one
    // subscriber, library users register their own
    let publisher = Arc::new(TelemetryPublisher::new());
    let mut snapshots = publisher.subscribe();

    let mut session = tokio::spawn(port.run_session(Arc::clone(&publisher)));

    info!("Streaming snapshots; press Ctrl+C to exit");

    let mut snapshot_count: u64 = 0;

    // Main loop
    loop {
        tokio::select! {
            snapshot = snapshots.recv() => {
                let Some(snapshot) = snapshot else {
                    warn!("Snapshot stream closed");
                    break;
                };

                println!("{}", serde_json::to_string(&snapshot)?);

                snapshot_count += 1;
                if snapshot_count % LOG_INTERVAL_SNAPSHOTS == 0 {
                    info!("Published {} snapshots", snapshot_count);
                }
            }

            result = &mut session => {
                match result {
                    Ok(Ok(())) => info!("Measurement session ended"),
                    Ok(Err(e)) => warn!("Measurement session failed: {}", e),
                    Err(e) => warn!("Session task panicked: {}", e),
                }
                break;
            }

            // Handle Ctrl+C for graceful shutdown
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                session.abort();
                break;
            }
        }
    }

    info!("Total snapshots published: {}", snapshot_count);
    Ok(())
}
