//! # CISS Decoding Engine
//!
//! Binary decoding and framing for the CISS sensor protocols.
//!
//! This module handles:
//! - Splitting the serial byte stream into length-prefixed records
//! - Tag-dispatched field extraction from serial records
//! - Fixed-layout decoding of the two BLE notification packets
//! - Bit-level field reassembly (byte order, sign extension, packed fields)
//! - The XOR checksum appended to outgoing configuration commands

pub mod bits;
pub mod checksum;
pub mod framer;
pub mod packet;
pub mod protocol;
pub mod record;
