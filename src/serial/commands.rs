//! # CISS Configuration Commands
//!
//! Builders for the host-to-device command set.
//!
//! Commands are framed as `[0xFE, length, payload..., checksum]` where the
//! checksum is the XOR fold from [`crate::codec::checksum`]. The device only
//! streams measurements after its sensors have been disabled, configured and
//! re-enabled, so the full configuration sequence is built here as well.

use crate::codec::checksum::command_checksum;

/// Leading byte of every host-to-device command
pub const COMMAND_PREFIX: u8 = 0xFE;

/// Sensor addresses used by enable/disable and period commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SensorId {
    Accelerometer = 0x80,
    Magnetometer = 0x81,
    Gyroscope = 0x82,
    Environmental = 0x83,
    Light = 0x84,
}

impl SensorId {
    /// Every sensor on the node, in device address order
    pub const ALL: [SensorId; 5] = [
        SensorId::Accelerometer,
        SensorId::Magnetometer,
        SensorId::Gyroscope,
        SensorId::Environmental,
        SensorId::Light,
    ];
}

/// Append the command checksum to a framed command
fn with_checksum(mut command: Vec<u8>) -> Vec<u8> {
    let checksum = command_checksum(&command);
    command.push(checksum);
    command
}

/// Start streaming from a sensor
pub fn enable(sensor: SensorId) -> Vec<u8> {
    with_checksum(vec![COMMAND_PREFIX, 0x02, sensor as u8, 0x01])
}

/// Stop streaming from a sensor
pub fn disable(sensor: SensorId) -> Vec<u8> {
    with_checksum(vec![COMMAND_PREFIX, 0x02, sensor as u8, 0x00])
}

/// Set an inertial sensor's streaming period in microseconds
pub fn set_stream_period(sensor: SensorId, micros: u32) -> Vec<u8> {
    let mut command = vec![COMMAND_PREFIX, 0x06, sensor as u8, 0x02];
    command.extend_from_slice(&micros.to_le_bytes());
    with_checksum(command)
}

/// Set an environmental sensor's streaming period in seconds
pub fn set_environmental_period(sensor: SensorId, seconds: u16) -> Vec<u8> {
    let mut command = vec![COMMAND_PREFIX, 0x04, sensor as u8, 0x02];
    command.extend_from_slice(&seconds.to_le_bytes());
    with_checksum(command)
}

/// Set the accelerometer measurement range in g (2, 4, 8 or 16)
pub fn set_accel_range(range_g: u8) -> Vec<u8> {
    with_checksum(vec![
        COMMAND_PREFIX,
        0x03,
        SensorId::Accelerometer as u8,
        0x04,
        range_g,
    ])
}

/// Build the full sensor configuration sequence
///
/// Disables every sensor, applies the accelerometer range, then configures
/// and re-enables each sensor: stream periods for the inertial sensors,
/// slower second-granularity periods for the environmental and light
/// sensors.
///
/// # Arguments
///
/// * `accel_range_g` - Accelerometer range in g
/// * `stream_period_us` - Inertial streaming period in microseconds
/// * `environmental_period_s` - Environmental/light period in seconds
///
/// # Returns
///
/// * `Vec<Vec<u8>>` - Commands in write order, each with trailing checksum
pub fn configuration_sequence(
    accel_range_g: u8,
    stream_period_us: u32,
    environmental_period_s: u16,
) -> Vec<Vec<u8>> {
    vec![
        disable(SensorId::Light),
        disable(SensorId::Magnetometer),
        disable(SensorId::Environmental),
        disable(SensorId::Gyroscope),
        disable(SensorId::Accelerometer),
        set_accel_range(accel_range_g),
        set_stream_period(SensorId::Accelerometer, stream_period_us),
        enable(SensorId::Accelerometer),
        set_environmental_period(SensorId::Light, environmental_period_s),
        enable(SensorId::Light),
        set_stream_period(SensorId::Magnetometer, stream_period_us),
        enable(SensorId::Magnetometer),
        set_environmental_period(SensorId::Environmental, environmental_period_s),
        enable(SensorId::Environmental),
        set_stream_period(SensorId::Gyroscope, stream_period_us),
        enable(SensorId::Gyroscope),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enable_disable_bytes() {
        assert_eq!(disable(SensorId::Accelerometer), vec![0xFE, 0x02, 0x80, 0x00, 0x82]);
        assert_eq!(enable(SensorId::Accelerometer), vec![0xFE, 0x02, 0x80, 0x01, 0x83]);
        assert_eq!(disable(SensorId::Light)[2], 0x84);
    }

    #[test]
    fn test_accel_range_16g() {
        let command = set_accel_range(16);
        assert_eq!(&command[..5], &[0xFE, 0x03, 0x80, 0x04, 0x10]);
        assert_eq!(command[5], command_checksum(&command[..5]));
    }

    #[test]
    fn test_stream_period_little_endian() {
        let command = set_stream_period(SensorId::Accelerometer, 100_000);
        assert_eq!(&command[..8], &[0xFE, 0x06, 0x80, 0x02, 0xA0, 0x86, 0x01, 0x00]);
        assert_eq!(command[8], command_checksum(&command[..8]));
    }

    #[test]
    fn test_environmental_period_little_endian() {
        let command = set_environmental_period(SensorId::Environmental, 1);
        assert_eq!(&command[..6], &[0xFE, 0x04, 0x83, 0x02, 0x01, 0x00]);
        assert_eq!(command[6], command_checksum(&command[..6]));
    }

    #[test]
    fn test_every_command_is_checksummed() {
        for command in configuration_sequence(16, 100_000, 1) {
            let (payload, checksum) = command.split_at(command.len() - 1);
            assert_eq!(checksum[0], command_checksum(payload));
            assert_eq!(payload[0], COMMAND_PREFIX);
        }
    }

    #[test]
    fn test_configuration_sequence_shape() {
        let sequence = configuration_sequence(16, 100_000, 1);

        assert_eq!(sequence.len(), 16);
        // All five sensors are disabled before anything is configured
        for (command, sensor) in sequence.iter().take(5).zip([
            SensorId::Light,
            SensorId::Magnetometer,
            SensorId::Environmental,
            SensorId::Gyroscope,
            SensorId::Accelerometer,
        ]) {
            assert_eq!(command[2], sensor as u8);
            assert_eq!(command[3], 0x00);
        }
        // Every sensor is re-enabled afterwards
        for sensor in SensorId::ALL {
            assert!(sequence[5..]
                .iter()
                .any(|c| c[1] == 0x02 && c[2] == sensor as u8 && c[3] == 0x01));
        }
    }
}
