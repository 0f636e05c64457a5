//! # Wireless (BLE) Module
//!
//! Interface boundary to the BLE transport.
//!
//! Discovery, connection and notification subscription belong to the
//! transport collaborator; this module owns what the decoding engine needs
//! to know about it: which characteristic a notification came from, the
//! constants the collaborator writes to arm the node, and the dispatch from
//! notification payload to decoded snapshot. Packet identity is determined
//! by the delivering characteristic, not by packet content.

use std::sync::Arc;

use tracing::warn;

use crate::codec::packet::{decode_environmental, decode_inertial};
use crate::error::Result;
use crate::telemetry::TelemetryPublisher;

/// UUID prefix of the sensor data service
pub const SENSOR_SERVICE_UUID_PREFIX: &str = "00007500";

/// UUID prefix of the control characteristic (configuration write + ack read)
pub const CONTROL_UUID_PREFIX: &str = "0000750a";

/// UUID prefix of the inertial data characteristic
pub const INERTIAL_UUID_PREFIX: &str = "00007502";

/// UUID prefix of the environmental data characteristic
pub const ENVIRONMENTAL_UUID_PREFIX: &str = "00007504";

/// Client characteristic configuration descriptor UUID
pub const CCCD_UUID: &str = "2902";

/// CCCD value enabling notifications
pub const NOTIFICATIONS_ENABLE: [u8; 2] = [0x01, 0x00];

/// CCCD value disabling notifications
pub const NOTIFICATIONS_DISABLE: [u8; 2] = [0x00, 0x00];

/// Fixed configuration payload written once to the control characteristic
pub const SENSOR_CONFIGURATION: [u8; 20] = [
    0x19, 0x0F, 0x02, 0x00, 0x06, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00,
];

/// The two notification sources, identified by delivering characteristic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WirelessCharacteristic {
    Environmental,
    Inertial,
}

impl WirelessCharacteristic {
    /// Identify a data characteristic from its UUID
    ///
    /// Returns `None` for characteristics that carry no measurement data
    /// (control, device information, event detection).
    pub fn from_uuid(uuid: &str) -> Option<Self> {
        if uuid.starts_with(ENVIRONMENTAL_UUID_PREFIX) {
            Some(Self::Environmental)
        } else if uuid.starts_with(INERTIAL_UUID_PREFIX) {
            Some(Self::Inertial)
        } else {
            None
        }
    }
}

/// Notification sink for the BLE transport
///
/// The transport calls [`handle_notification`](Self::handle_notification)
/// for every packet it receives; the link decodes it by characteristic and
/// publishes the snapshot. The two characteristics are independent event
/// sources with no mutual ordering, so their snapshots interleave.
#[derive(Debug)]
pub struct WirelessLink {
    publisher: Arc<TelemetryPublisher>,
}

impl WirelessLink {
    /// Create a link publishing into the given publisher
    pub fn new(publisher: Arc<TelemetryPublisher>) -> Self {
        Self { publisher }
    }

    /// Decode one notification and publish its snapshot
    ///
    /// # Arguments
    ///
    /// * `characteristic` - Which characteristic delivered the payload
    /// * `payload` - The 16-byte notification payload
    ///
    /// # Errors
    ///
    /// Returns error if the payload is shorter than a packet
    pub fn handle_notification(
        &self,
        characteristic: WirelessCharacteristic,
        payload: &[u8],
    ) -> Result<()> {
        let fields = match characteristic {
            WirelessCharacteristic::Environmental => decode_environmental(payload),
            WirelessCharacteristic::Inertial => decode_inertial(payload),
        };

        match fields {
            Ok(fields) => {
                self.publisher.publish(fields);
                Ok(())
            }
            Err(e) => {
                warn!("Dropping malformed {:?} notification: {}", characteristic, e);
                Err(e)
            }
        }
    }
}
