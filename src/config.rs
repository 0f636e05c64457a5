//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::Deserialize;
use serde::de::Error;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub serial: SerialConfig,

    #[serde(default)]
    pub sensors: SensorConfig,

    #[serde(default)]
    pub wireless: WirelessConfig,
}

/// Serial port configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SerialConfig {
    #[serde(default = "default_serial_port")]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Delay after each configuration command, giving the device time to
    /// apply it before the next write
    #[serde(default = "default_command_settle_ms")]
    pub command_settle_ms: u64,
}

/// Sensor configuration applied during the arming sequence
#[derive(Debug, Deserialize, Clone)]
pub struct SensorConfig {
    #[serde(default = "default_accel_range_g")]
    pub accel_range_g: u8,

    /// Streaming period for the inertial sensors, in microseconds
    #[serde(default = "default_stream_period_us")]
    pub stream_period_us: u32,

    /// Streaming period for the environmental and light sensors, in seconds
    #[serde(default = "default_environmental_period_s")]
    pub environmental_period_s: u16,
}

/// Wireless (BLE) configuration
#[derive(Debug, Deserialize, Clone)]
pub struct WirelessConfig {
    /// Device address to connect to; empty disables the wireless path
    #[serde(default)]
    pub device_address: String,
}

// Default value functions
fn default_serial_port() -> String { "/dev/ttyACM0".to_string() }
fn default_baud_rate() -> u32 { 115_200 }
fn default_command_settle_ms() -> u64 { 500 }

fn default_accel_range_g() -> u8 { 16 }
fn default_stream_period_us() -> u32 { 100_000 }
fn default_environmental_period_s() -> u16 { 1 }

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_serial_port(),
            baud_rate: default_baud_rate(),
            command_settle_ms: default_command_settle_ms(),
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            accel_range_g: default_accel_range_g(),
            stream_period_us: default_stream_period_us(),
            environmental_period_s: default_environmental_period_s(),
        }
    }
}

impl Default for WirelessConfig {
    fn default() -> Self {
        Self {
            device_address: String::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            serial: SerialConfig::default(),
            sensors: SensorConfig::default(),
            wireless: WirelessConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.serial.port.is_empty() {
            return Err(crate::error::CissBridgeError::Config(
                toml::de::Error::custom("serial port cannot be empty")
            ));
        }

        if self.serial.baud_rate == 0 {
            return Err(crate::error::CissBridgeError::Config(
                toml::de::Error::custom("baud_rate must be greater than 0")
            ));
        }

        if self.serial.command_settle_ms > 10_000 {
            return Err(crate::error::CissBridgeError::Config(
                toml::de::Error::custom("command_settle_ms must be at most 10000")
            ));
        }

        // The device accepts only these accelerometer ranges
        if ![2, 4, 8, 16].contains(&self.sensors.accel_range_g) {
            return Err(crate::error::CissBridgeError::Config(
                toml::de::Error::custom("accel_range_g must be one of 2, 4, 8, 16")
            ));
        }

        if self.sensors.stream_period_us == 0 {
            return Err(crate::error::CissBridgeError::Config(
                toml::de::Error::custom("stream_period_us must be greater than 0")
            ));
        }

        if self.sensors.environmental_period_s == 0 {
            return Err(crate::error::CissBridgeError::Config(
                toml::de::Error::custom("environmental_period_s must be greater than 0")
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.serial.port, "/dev/ttyACM0");
        assert_eq!(config.serial.baud_rate, 115_200);
        assert_eq!(config.sensors.accel_range_g, 16);
        assert_eq!(config.sensors.stream_period_us, 100_000);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [serial]
            port = "/dev/ttyUSB1"
            baud_rate = 115200

            [sensors]
            accel_range_g = 8
            "#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.serial.port, "/dev/ttyUSB1");
        assert_eq!(config.sensors.accel_range_g, 8);
        // Unspecified sections and fields fall back to defaults
        assert_eq!(config.sensors.stream_period_us, 100_000);
        assert_eq!(config.serial.command_settle_ms, 500);
        assert!(config.wireless.device_address.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(Config::load("/nonexistent/ciss-bridge.toml").is_err());
    }

    #[test]
    fn test_invalid_accel_range_rejected() {
        let mut config = Config::default();
        config.sensors.accel_range_g = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_serial_port_rejected() {
        let mut config = Config::default();
        config.serial.port = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_stream_period_rejected() {
        let mut config = Config::default();
        config.sensors.stream_period_us = 0;
        assert!(config.validate().is_err());
    }
}
