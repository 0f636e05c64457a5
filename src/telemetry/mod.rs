//! # Telemetry Module
//!
//! Aggregates decoded field sets into timestamped snapshots and fans them out
//! to subscribers.
//!
//! This module handles:
//! - Stamping each decoded field set at the moment of emission
//! - Fan-out to any number of subscribers, in arrival order, unbounded
//! - Dropping empty field sets (unknown record tags decode to nothing)
//!
//! Every snapshot carries the fields of exactly one record or packet; field
//! sets from different sources are never merged, so environmental and
//! inertial streams interleave and must be consumed as separate logical
//! streams by downstream code.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::trace;

use crate::codec::protocol::SensorFields;

/// One timestamped field set as published to subscribers
#[derive(Debug, Clone, Serialize)]
pub struct SensorSnapshot {
    /// Capture timestamp, taken at emission
    pub timestamp: DateTime<Utc>,

    /// The sensor fields decoded from one record or packet
    #[serde(flatten)]
    pub fields: SensorFields,
}

/// Snapshot fan-out with an explicitly owned subscriber list
///
/// Subscribers register with [`subscribe`](Self::subscribe) and deregister by
/// dropping their receiver; closed subscribers are pruned on the next
/// publish. Channels are unbounded and ordered, so a slow subscriber never
/// stalls decoding.
#[derive(Debug, Default)]
pub struct TelemetryPublisher {
    subscribers: Mutex<Vec<mpsc::UnboundedSender<SensorSnapshot>>>,
}

impl TelemetryPublisher {
    /// Create a publisher with no subscribers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber and return its snapshot stream
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<SensorSnapshot> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock_subscribers().push(tx);
        rx
    }

    /// Stamp a field set and send it to every live subscriber
    ///
    /// Empty field sets are dropped silently: a record with an unrecognized
    /// tag decodes to nothing and must not produce an empty snapshot.
    pub fn publish(&self, fields: SensorFields) {
        if fields.is_empty() {
            trace!("Dropping empty field set");
            return;
        }

        let snapshot = SensorSnapshot {
            timestamp: Utc::now(),
            fields,
        };

        self.lock_subscribers()
            .retain(|subscriber| subscriber.send(snapshot.clone()).is_ok());
    }

    /// Number of currently registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.lock_subscribers().len()
    }

    fn lock_subscribers(&self) -> std::sync::MutexGuard<'_, Vec<mpsc::UnboundedSender<SensorSnapshot>>> {
        // Recover from a poisoned lock instead of propagating a panic
        // from another thread.
        match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
