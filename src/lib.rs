//! # CISS Bridge Library
//!
//! Stream telemetry from a Bosch CISS multi-sensor node.
//!
//! This library decodes the node's two raw binary telemetry formats (the
//! length-prefixed record stream on USB serial and the fixed-layout BLE
//! notification packets) into timestamped sensor snapshots published to
//! subscribers.

pub mod config;
pub mod error;
pub mod codec;
pub mod serial;
pub mod wireless;
pub mod telemetry;
