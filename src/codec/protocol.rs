//! # CISS Protocol Constants and Types
//!
//! Core definitions shared by the serial record path and the BLE packet path.

use bytes::Bytes;
use serde::Serialize;

use crate::error::{CissBridgeError, Result};

/// Serial record framing overhead in bytes
///
/// Record structure: prefix(1) + length(1) + [declared-length bytes] + trailer(1).
/// The length byte at offset 1 counts only the middle section, so a complete
/// record occupies `declared + 3` bytes of the stream.
pub const RECORD_OVERHEAD: usize = 3;

/// Offset of the self-declared length byte within a record
pub const RECORD_LENGTH_OFFSET: usize = 1;

/// Fixed size of a BLE notification packet (both characteristics)
pub const WIRELESS_PACKET_LEN: usize = 16;

/// Record type tags carried in the serial stream
///
/// Tags identify which sensor produced a record. Most tags sit at record
/// offset 2, but the environmental composite region places the humidity and
/// pressure tags at offsets 5 and 8 respectively (see `codec::record`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordTag {
    Accelerometer = 0x02,
    Magnetometer = 0x03,
    Gyroscope = 0x04,
    Temperature = 0x05,
    Pressure = 0x06,
    Humidity = 0x07,
    Light = 0x08,
}

impl RecordTag {
    /// Map a raw tag byte to a known record tag
    ///
    /// Returns `None` for unrecognized tags; unknown record kinds are
    /// tolerated so future firmware can add types without breaking decoding.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x02 => Some(Self::Accelerometer),
            0x03 => Some(Self::Magnetometer),
            0x04 => Some(Self::Gyroscope),
            0x05 => Some(Self::Temperature),
            0x06 => Some(Self::Pressure),
            0x07 => Some(Self::Humidity),
            0x08 => Some(Self::Light),
            _ => None,
        }
    }
}

/// One complete, length-validated record from the serial stream
///
/// Invariant: the byte length equals the declared length at offset 1 plus
/// [`RECORD_OVERHEAD`]. The framer only constructs records that satisfy it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementRecord {
    data: Bytes,
}

impl MeasurementRecord {
    /// Wrap raw bytes as a record, checking the length invariant
    ///
    /// # Errors
    ///
    /// Returns error if the slice is shorter than the framing overhead or its
    /// length does not match the declared length.
    pub fn new(data: Bytes) -> Result<Self> {
        if data.len() <= RECORD_LENGTH_OFFSET {
            return Err(CissBridgeError::Protocol(format!(
                "Record too short: {} bytes",
                data.len()
            )));
        }

        let expected = data[RECORD_LENGTH_OFFSET] as usize + RECORD_OVERHEAD;
        if data.len() != expected {
            return Err(CissBridgeError::Protocol(format!(
                "Record length mismatch: declared {} bytes, got {}",
                expected,
                data.len()
            )));
        }

        Ok(Self { data })
    }

    /// Declared payload length from the length byte at offset 1
    pub fn declared_len(&self) -> usize {
        self.data[RECORD_LENGTH_OFFSET] as usize
    }

    /// Raw record bytes, including prefix, length byte and trailer
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Sensor quantities decoded from one record or packet
///
/// Every field is optional: a given record or packet populates only the
/// fields its type carries, and an absent field means "not measured", not
/// zero. Serialized field names match the device's documented value names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noise: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceleration_x: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceleration_y: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceleration_z: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gyro_x: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gyro_y: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gyro_z: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magnetometer_x: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magnetometer_y: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magnetometer_z: Option<i16>,
}

impl SensorFields {
    /// True if no field was decoded
    ///
    /// Records with unknown tags decode to an empty set; the publisher drops
    /// them instead of emitting empty snapshots.
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.humidity.is_none()
            && self.pressure.is_none()
            && self.noise.is_none()
            && self.light.is_none()
            && self.acceleration_x.is_none()
            && self.acceleration_y.is_none()
            && self.acceleration_z.is_none()
            && self.gyro_x.is_none()
            && self.gyro_y.is_none()
            && self.gyro_z.is_none()
            && self.magnetometer_x.is_none()
            && self.magnetometer_y.is_none()
            && self.magnetometer_z.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_tag_round_trip() {
        for tag in [
            RecordTag::Accelerometer,
            RecordTag::Magnetometer,
            RecordTag::Gyroscope,
            RecordTag::Temperature,
            RecordTag::Pressure,
            RecordTag::Humidity,
            RecordTag::Light,
        ] {
            assert_eq!(RecordTag::from_byte(tag as u8), Some(tag));
        }
    }

    #[test]
    fn test_record_tag_unknown() {
        assert_eq!(RecordTag::from_byte(0x00), None);
        assert_eq!(RecordTag::from_byte(0x09), None);
        assert_eq!(RecordTag::from_byte(0xFF), None);
    }

    #[test]
    fn test_measurement_record_valid() {
        // declared length 2 -> total 5 bytes
        let record = MeasurementRecord::new(Bytes::from_static(&[0xFE, 0x02, 0x05, 0x64, 0x00]))
            .unwrap();
        assert_eq!(record.declared_len(), 2);
        assert_eq!(record.bytes().len(), 5);
    }

    #[test]
    fn test_measurement_record_length_mismatch() {
        // declared length 4 -> expects 7 bytes, got 5
        let result = MeasurementRecord::new(Bytes::from_static(&[0xFE, 0x04, 0x05, 0x64, 0x00]));
        assert!(result.is_err());
    }

    #[test]
    fn test_measurement_record_too_short() {
        assert!(MeasurementRecord::new(Bytes::from_static(&[])).is_err());
        assert!(MeasurementRecord::new(Bytes::from_static(&[0xFE])).is_err());
    }

    #[test]
    fn test_sensor_fields_empty_by_default() {
        assert!(SensorFields::default().is_empty());
    }

    #[test]
    fn test_sensor_fields_not_empty_with_one_field() {
        let fields = SensorFields {
            noise: Some(5),
            ..Default::default()
        };
        assert!(!fields.is_empty());
    }

    #[test]
    fn test_sensor_fields_serialize_skips_unset() {
        let fields = SensorFields {
            temperature: Some(10.0),
            ..Default::default()
        };
        let json = serde_json::to_string(&fields).unwrap();
        assert_eq!(json, r#"{"temperature":10.0}"#);
    }
}
