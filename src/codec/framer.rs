//! # Serial Frame Splitter
//!
//! Splits the unaligned serial byte stream into discrete measurement records.
//!
//! The serial transport delivers chunks with no record alignment: a chunk may
//! contain several records, a fraction of one, or a tail of the previous
//! record followed by the head of the next. The framer accumulates bytes in a
//! pending buffer and emits every complete record, keeping the trailing
//! partial record for the next chunk.

use bytes::BytesMut;

use super::protocol::{MeasurementRecord, RECORD_LENGTH_OFFSET, RECORD_OVERHEAD};
use crate::error::Result;

/// Initial capacity for the pending buffer
const PENDING_BUFFER_CAPACITY: usize = 512;

/// Stream-to-record splitter for one serial session
///
/// Owns the pending buffer for the lifetime of the session. There is no upper
/// bound on retained partial-record bytes: the declared length is a single
/// byte, so an incomplete record can hold back at most 257 bytes, and the
/// buffer is dropped with the session when the transport closes.
#[derive(Debug)]
pub struct Framer {
    pending: BytesMut,
}

impl Framer {
    /// Create a framer with an empty pending buffer
    pub fn new() -> Self {
        Self {
            pending: BytesMut::with_capacity(PENDING_BUFFER_CAPACITY),
        }
    }

    /// Feed one transport chunk, returning every record it completes
    ///
    /// A record is complete when the buffer holds at least the length implied
    /// by its length byte (`declared + 3`). Completed records are consumed
    /// from the front of the buffer; a chunk arriving mid-record yields an
    /// empty vector and grows the buffer instead.
    ///
    /// # Arguments
    ///
    /// * `chunk` - Raw bytes as delivered by the transport
    ///
    /// # Returns
    ///
    /// * `Result<Vec<MeasurementRecord>>` - Zero or more complete records
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<MeasurementRecord>> {
        self.pending.extend_from_slice(chunk);

        let mut records = Vec::new();

        loop {
            if self.pending.len() <= RECORD_LENGTH_OFFSET + 1 {
                break;
            }

            let record_len = self.pending[RECORD_LENGTH_OFFSET] as usize + RECORD_OVERHEAD;
            if record_len > self.pending.len() {
                // Partial record: keep it for the next chunk
                break;
            }

            let data = self.pending.split_to(record_len).freeze();
            records.push(MeasurementRecord::new(data)?);
        }

        Ok(records)
    }

    /// Number of bytes currently retained as a partial record
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

impl Default for Framer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a record with the given declared length, tag and payload filler
    fn record_bytes(declared: u8, tag: u8) -> Vec<u8> {
        let mut bytes = vec![0xFE, declared, tag];
        bytes.resize(declared as usize + RECORD_OVERHEAD, 0x00);
        bytes
    }

    #[test]
    fn test_single_complete_record() {
        let mut framer = Framer::new();
        let bytes = record_bytes(5, 0x02);

        let records = framer.push(&bytes).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].bytes(), bytes.as_slice());
        assert_eq!(framer.pending_len(), 0);
    }

    #[test]
    fn test_record_split_across_chunks_matches_single_push() {
        let bytes = record_bytes(6, 0x04);

        // Feed in one piece
        let mut whole = Framer::new();
        let from_whole = whole.push(&bytes).unwrap();

        // Feed in two arbitrary pieces, at every possible split point
        for split in 1..bytes.len() {
            let mut framer = Framer::new();

            let first = framer.push(&bytes[..split]).unwrap();
            assert!(
                first.is_empty(),
                "no record should be emitted from a partial chunk (split at {})",
                split
            );
            assert_eq!(framer.pending_len(), split);

            let second = framer.push(&bytes[split..]).unwrap();
            assert_eq!(second.len(), 1);
            assert_eq!(second[0], from_whole[0]);
            assert_eq!(framer.pending_len(), 0);
        }
    }

    #[test]
    fn test_two_back_to_back_records() {
        let mut framer = Framer::new();
        let mut stream = record_bytes(5, 0x02);
        stream.extend_from_slice(&record_bytes(7, 0x03));

        let records = framer.push(&stream).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].declared_len(), 5);
        assert_eq!(records[1].declared_len(), 7);
        assert_eq!(framer.pending_len(), 0);
    }

    #[test]
    fn test_trailing_partial_record_retained() {
        let mut framer = Framer::new();
        let mut stream = record_bytes(4, 0x05);
        let second = record_bytes(8, 0x02);
        stream.extend_from_slice(&second[..3]); // head of the next record

        let records = framer.push(&stream).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(framer.pending_len(), 3);

        let records = framer.push(&second[3..]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].declared_len(), 8);
        assert_eq!(framer.pending_len(), 0);
    }

    #[test]
    fn test_tiny_chunks_accumulate() {
        let mut framer = Framer::new();
        let bytes = record_bytes(10, 0x03);

        let mut emitted = Vec::new();
        for byte in &bytes {
            emitted.extend(framer.push(std::slice::from_ref(byte)).unwrap());
        }

        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].bytes(), bytes.as_slice());
    }

    #[test]
    fn test_empty_chunk_is_harmless() {
        let mut framer = Framer::new();
        assert!(framer.push(&[]).unwrap().is_empty());
        assert_eq!(framer.pending_len(), 0);
    }

    #[test]
    fn test_two_bytes_never_emit() {
        // A record needs more than the prefix and length byte
        let mut framer = Framer::new();
        assert!(framer.push(&[0xFE, 0x00]).unwrap().is_empty());
        assert_eq!(framer.pending_len(), 2);
    }
}
