//! # BLE Packet Decoder
//!
//! Decodes the fixed-layout 16-byte notification packets.
//!
//! Unlike serial records, BLE packets carry no length byte and no tag: which
//! layout applies is determined by the characteristic that delivered the
//! packet. Fields are big-endian, and the inertial packet packs the gyroscope
//! and magnetometer axes at sub-byte offsets across bytes 6..=13.

use super::bits::{
    be16, be32, packed12_high, packed12_pair, packed14_low, packed14_split, sign_extend_16,
};
use super::protocol::{SensorFields, WIRELESS_PACKET_LEN};
use crate::error::{CissBridgeError, Result};

fn check_len(packet: &[u8]) -> Result<()> {
    if packet.len() < WIRELESS_PACKET_LEN {
        return Err(CissBridgeError::Protocol(format!(
            "Packet too short: expected {} bytes, got {}",
            WIRELESS_PACKET_LEN,
            packet.len()
        )));
    }
    Ok(())
}

/// Decode an environmental characteristic packet
///
/// # Arguments
///
/// * `packet` - Notification payload (16 bytes)
///
/// # Returns
///
/// * `Result<SensorFields>` - Temperature, humidity, pressure, noise and light
///
/// # Errors
///
/// Returns error if the packet is shorter than 16 bytes.
pub fn decode_environmental(packet: &[u8]) -> Result<SensorFields> {
    check_len(packet)?;

    Ok(SensorFields {
        temperature: Some(sign_extend_16(be16(packet[0], packet[1])) as f64 / 10.0),
        humidity: Some(be16(packet[2], packet[3]) as f64 / 100.0),
        pressure: Some(be32(packet[4], packet[5], packet[6], packet[7]) as f64 / 100.0),
        noise: Some(sign_extend_16(be16(packet[8], packet[9]))),
        light: Some(be32(packet[10], packet[11], packet[12], packet[13])),
        ..Default::default()
    })
}

/// Decode an inertial characteristic packet
///
/// Acceleration occupies three big-endian signed words; the gyroscope axes
/// are 12-bit quantities and magnetometer X/Y are 14-bit quantities packed
/// back to back across bytes 6..=13, with magnetometer Z as a trailing
/// signed word.
///
/// # Arguments
///
/// * `packet` - Notification payload (16 bytes)
///
/// # Returns
///
/// * `Result<SensorFields>` - Acceleration, gyroscope and magnetometer axes
///
/// # Errors
///
/// Returns error if the packet is shorter than 16 bytes.
pub fn decode_inertial(packet: &[u8]) -> Result<SensorFields> {
    check_len(packet)?;

    let (gyro_x, gyro_y) = packed12_pair(packet[6], packet[7], packet[8]);

    Ok(SensorFields {
        acceleration_x: Some(sign_extend_16(be16(packet[0], packet[1]))),
        acceleration_y: Some(sign_extend_16(be16(packet[2], packet[3]))),
        acceleration_z: Some(sign_extend_16(be16(packet[4], packet[5]))),
        gyro_x: Some(gyro_x),
        gyro_y: Some(gyro_y),
        gyro_z: Some(packed12_high(packet[9], packet[10])),
        magnetometer_x: Some(packed14_split(packet[10], packet[11], packet[12])),
        magnetometer_y: Some(packed14_low(packet[12], packet[13])),
        magnetometer_z: Some(sign_extend_16(be16(packet[14], packet[15]))),
        ..Default::default()
    })
}
