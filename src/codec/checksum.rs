//! # Command Checksum
//!
//! XOR checksum appended to outgoing CISS configuration commands.
//!
//! **Algorithm**: XOR of all payload bytes, then XOR with 0xFE.
//!
//! XOR is commutative and associative, so the result is independent of byte
//! order. Only host-to-device commands are checksummed; the device-to-host
//! stream carries no checksum the host validates.

/// Final XOR applied after folding the payload
const CHECKSUM_SEED: u8 = 0xFE;

/// Calculate the command checksum for a payload
///
/// # Arguments
///
/// * `data` - Command bytes, excluding the checksum slot
///
/// # Returns
///
/// * `u8` - Checksum byte to append to the command
///
/// # Examples
///
/// ```
/// use ciss_bridge::codec::checksum::command_checksum;
///
/// let command = [0xFE, 0x02, 0x80, 0x01];
/// let crc = command_checksum(&command);
/// ```
pub fn command_checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, &byte| acc ^ byte) ^ CHECKSUM_SEED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_empty() {
        assert_eq!(command_checksum(&[]), 0xFE);
    }

    #[test]
    fn test_checksum_single_byte() {
        assert_eq!(command_checksum(&[0x00]), 0xFE);
        assert_eq!(command_checksum(&[0xFE]), 0x00);
        assert_eq!(command_checksum(&[0x01]), 0xFF);
    }

    #[test]
    fn test_checksum_known_command() {
        // Accelerometer disable command from the CISS command set
        let command = [0xFE, 0x02, 0x80, 0x00];
        assert_eq!(command_checksum(&command), 0xFE ^ 0x02 ^ 0x80 ^ 0xFE);
    }

    #[test]
    fn test_checksum_order_independent() {
        let data = [0x11, 0x22, 0x33, 0x44, 0x55];
        let reversed = [0x55, 0x44, 0x33, 0x22, 0x11];
        let shuffled = [0x33, 0x11, 0x55, 0x22, 0x44];

        assert_eq!(command_checksum(&data), command_checksum(&reversed));
        assert_eq!(command_checksum(&data), command_checksum(&shuffled));
    }

    #[test]
    fn test_checksum_changes_with_data() {
        let data1 = [0xFE, 0x02, 0x80, 0x00];
        let data2 = [0xFE, 0x02, 0x80, 0x01];

        assert_ne!(command_checksum(&data1), command_checksum(&data2));
    }

    #[test]
    fn test_checksum_self_cancelling_pairs() {
        // Duplicate bytes cancel under XOR
        assert_eq!(command_checksum(&[0xAB, 0xAB]), 0xFE);
        assert_eq!(command_checksum(&[0xAB, 0xCD, 0xAB, 0xCD]), 0xFE);
    }
}
