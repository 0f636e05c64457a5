//! # Error Types
//!
//! Custom error types for CISS Bridge using `thiserror`.

use thiserror::Error;

/// Main error type for CISS Bridge
#[derive(Debug, Error)]
pub enum CissBridgeError {
    /// CISS protocol errors
    #[error("CISS protocol error: {0}")]
    Protocol(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Serial port errors
    #[error("Serial port error: {0}")]
    Serial(String),

    /// No usable serial device found
    #[error("No CISS device found at any of: {0}")]
    SerialPortNotFound(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CISS Bridge
pub type Result<T> = std::result::Result<T, CissBridgeError>;
