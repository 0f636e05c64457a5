//! # Serial Communication Module
//!
//! Handles serial communication with the CISS node over USB.
//!
//! This module handles:
//! - Opening the serial port at 115,200 baud
//! - Writing checksummed configuration commands (arm/disarm, periods, range)
//! - The read loop: feeding raw chunks to the framer, decoding records and
//!   publishing the resulting field sets

pub mod commands;
pub mod port_trait;

use std::sync::Arc;
use std::time::Duration;

use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info, warn};

use crate::codec::framer::Framer;
use crate::codec::record::decode_record;
use crate::config::SensorConfig;
use crate::error::{CissBridgeError, Result};
use crate::telemetry::TelemetryPublisher;
use port_trait::{SerialPortIO, TokioSerialPort};

/// CISS USB serial baud rate
pub const CISS_BAUD_RATE: u32 = 115_200;

/// Default device paths to try (in order of preference)
const DEFAULT_DEVICE_PATHS: &[&str] = &[
    "/dev/ttyACM0", // USB CDC devices (most common for the CISS node)
    "/dev/ttyUSB0", // USB-to-serial adapters
];

/// Read buffer size for the session loop
const READ_BUFFER_SIZE: usize = 256;

/// CISS Serial Port Handler
///
/// Manages the connection to the CISS node via USB serial.
pub struct CissSerial<P: SerialPortIO = TokioSerialPort> {
    /// Serial port handle
    port: P,
    /// Device path (e.g., /dev/ttyACM0)
    device_path: String,
}

impl<P: SerialPortIO> std::fmt::Debug for CissSerial<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CissSerial")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl CissSerial {
    /// Open a connection to the CISS node
    ///
    /// Tries the configured path first; on failure falls back to the common
    /// device paths.
    ///
    /// # Arguments
    ///
    /// * `path` - Preferred device path (e.g., "/dev/ttyACM0")
    /// * `baud_rate` - Baud rate, normally [`CISS_BAUD_RATE`]
    ///
    /// # Errors
    ///
    /// Returns error if no device could be opened at any candidate path
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        let mut paths = vec![path];
        paths.extend(DEFAULT_DEVICE_PATHS.iter().copied().filter(|p| *p != path));
        Self::open_with_paths(&paths, baud_rate)
    }

    /// Open a connection to the CISS node with explicit candidate paths
    pub fn open_with_paths(paths: &[&str], baud_rate: u32) -> Result<Self> {
        for path in paths {
            debug!("Trying to open serial port: {}", path);

            match Self::open_port(path, baud_rate) {
                Ok(port) => {
                    info!("Successfully opened CISS device at {}", path);
                    return Ok(Self {
                        port: TokioSerialPort::new(port),
                        device_path: path.to_string(),
                    });
                }
                Err(e) => {
                    warn!("Failed to open {}: {}", path, e);
                    continue;
                }
            }
        }

        Err(CissBridgeError::SerialPortNotFound(paths.join(", ")))
    }

    /// Open a specific serial port with CISS settings (8N1, no flow control)
    fn open_port(path: &str, baud_rate: u32) -> Result<tokio_serial::SerialStream> {
        let port = tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| CissBridgeError::Serial(format!("Failed to open {}: {}", path, e)))?;

        Ok(port)
    }
}

impl<P: SerialPortIO> CissSerial<P> {
    /// Wrap an already opened port
    ///
    /// Used by tests to substitute a mock port; production code goes through
    /// [`CissSerial::open`].
    pub fn from_port(port: P, device_path: impl Into<String>) -> Self {
        Self {
            port,
            device_path: device_path.into(),
        }
    }

    /// Write one checksummed command to the node
    ///
    /// # Arguments
    ///
    /// * `command` - Complete command bytes including the trailing checksum
    ///
    /// # Errors
    ///
    /// Returns error if the write or flush fails
    pub async fn write_command(&mut self, command: &[u8]) -> Result<()> {
        self.port
            .write_all(command)
            .await
            .map_err(|e| CissBridgeError::Serial(format!("Failed to write command: {}", e)))?;

        self.port
            .flush()
            .await
            .map_err(|e| CissBridgeError::Serial(format!("Failed to flush serial port: {}", e)))?;

        debug!("Write: {:02X?}", command);
        Ok(())
    }

    /// Run the sensor configuration sequence
    ///
    /// Disables every sensor, applies ranges and periods, then re-enables
    /// them. The node needs a settle delay after each command before it
    /// accepts the next one.
    ///
    /// # Arguments
    ///
    /// * `sensors` - Range and period settings
    /// * `settle` - Pause after each command write
    pub async fn configure(&mut self, sensors: &SensorConfig, settle: Duration) -> Result<()> {
        info!("Configuring sensors: {:?}", sensors);

        let sequence = commands::configuration_sequence(
            sensors.accel_range_g,
            sensors.stream_period_us,
            sensors.environmental_period_s,
        );

        for command in sequence {
            self.write_command(&command).await?;
            tokio::time::sleep(settle).await;
        }

        info!("Sensor configuration complete");
        Ok(())
    }

    /// Run the measurement session until the port closes or errors
    ///
    /// Reads raw chunks, feeds them to the framer, decodes each completed
    /// record and publishes the resulting field sets. Partial records are
    /// carried across reads by the framer; the pending buffer lives and dies
    /// with this session.
    ///
    /// # Arguments
    ///
    /// * `publisher` - Destination for decoded snapshots
    ///
    /// # Errors
    ///
    /// Returns error if a read fails; EOF ends the session cleanly
    pub async fn run_session(mut self, publisher: Arc<TelemetryPublisher>) -> Result<()> {
        info!("Starting measurement session on {}", self.device_path);

        let mut framer = Framer::new();
        let mut buf = [0u8; READ_BUFFER_SIZE];

        loop {
            let n = self
                .port
                .read(&mut buf)
                .await
                .map_err(|e| CissBridgeError::Serial(format!("Read failed: {}", e)))?;

            if n == 0 {
                info!("Serial stream ended");
                return Ok(());
            }

            for record in framer.push(&buf[..n])? {
                publisher.publish(decode_record(&record));
            }
        }
    }

    /// Get the device path of the opened serial port
    pub fn device_path(&self) -> &str {
        &self.device_path
    }
}
