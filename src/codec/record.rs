//! # Serial Record Decoder
//!
//! Decodes measurement records extracted from the serial stream.
//!
//! Dispatch is tag-based but the tag positions are irregular: most record
//! kinds carry their tag at offset 2, while the environmental composite
//! region places the humidity tag at offset 5 and the pressure tag at offset
//! 8, each checked independently of the others. One record can therefore
//! populate temperature, humidity and pressure together. Serial fields are
//! little-endian, unlike the BLE packets.

use super::bits::{be32, le16, sign_extend_16};
use super::protocol::{MeasurementRecord, RecordTag, SensorFields};

/// Tag offset for humidity within the environmental composite region
const HUMIDITY_TAG_OFFSET: usize = 5;

/// Tag offset for pressure within the environmental composite region
const PRESSURE_TAG_OFFSET: usize = 8;

/// Decode one record into the sensor fields its tags cover
///
/// Unknown or unsupported tags produce an empty field set rather than an
/// error, and a record too short for a field's byte window leaves that field
/// unset. The decoder never fails.
///
/// # Arguments
///
/// * `record` - A complete, length-validated record from the framer
///
/// # Returns
///
/// * `SensorFields` - The fields this record carries; possibly empty
pub fn decode_record(record: &MeasurementRecord) -> SensorFields {
    let data = record.bytes();
    let mut fields = SensorFields::default();

    match data.get(2).copied().and_then(RecordTag::from_byte) {
        Some(RecordTag::Temperature) if data.len() > 4 => {
            fields.temperature = Some(sign_extend_16(le16(data[3], data[4])) as f64 / 10.0);
        }
        Some(RecordTag::Light) if data.len() > 6 => {
            fields.light = Some(be32(data[6], data[5], data[4], data[3]));
        }
        Some(RecordTag::Accelerometer) if data.len() > 8 => {
            fields.acceleration_x = Some(sign_extend_16(le16(data[3], data[4])));
            fields.acceleration_y = Some(sign_extend_16(le16(data[5], data[6])));
            fields.acceleration_z = Some(sign_extend_16(le16(data[7], data[8])));
        }
        Some(RecordTag::Gyroscope) if data.len() > 8 => {
            // Unsigned, unlike acceleration; matches the observed device
            // stream, pending hardware-level confirmation.
            fields.gyro_x = Some(le16(data[3], data[4]));
            fields.gyro_y = Some(le16(data[5], data[6]));
            fields.gyro_z = Some(le16(data[7], data[8]));
        }
        Some(RecordTag::Magnetometer) if data.len() > 8 => {
            fields.magnetometer_x = Some(le16(data[3], data[4]));
            fields.magnetometer_y = Some(le16(data[5], data[6]));
            fields.magnetometer_z = Some(sign_extend_16(le16(data[7], data[8])));
        }
        _ => {}
    }

    if data.len() > 7 && data[HUMIDITY_TAG_OFFSET] == RecordTag::Humidity as u8 {
        fields.humidity = Some(le16(data[6], data[7]) as f64 / 100.0);
    }

    if data.len() > 12 && data[PRESSURE_TAG_OFFSET] == RecordTag::Pressure as u8 {
        fields.pressure = Some(be32(data[12], data[11], data[10], data[9]) as f64 / 100.0);
    }

    fields
}
