//! Packed fixed-size binary records.
//!
//! Layout, little-endian:
//!
//! ```text
//! 0      4              12      16                     32
//! ┌──────┬──────────────┬───────┬──────────────────────┐
//! │ id   │ timestamp    │ value │ payload              │
//! │ u32  │ i64          │ u32   │ 16 random bytes      │
//! └──────┴──────────────┴───────┴──────────────────────┘
//! ```

use crate::generators::{copy_pending, ByteGenerator};
use crate::rng::DeterministicSource;

pub const RECORD_SIZE: usize = 32;
pub const BASE_TIMESTAMP: i64 = 1_700_000_000;
/// Timestamp step between consecutive ids.
pub const TIMESTAMP_STEP: i64 = 100;
pub const MAX_JITTER: u32 = 50;
pub const MAX_VALUE: u32 = 1_000_000;
pub const PAYLOAD_SIZE: usize = 16;

#[derive(Debug, Clone)]
pub struct StructuredRecordGenerator {
    next_id: u32,
    record: [u8; RECORD_SIZE],
    cursor: usize,
}

impl StructuredRecordGenerator {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            record: [0; RECORD_SIZE],
            cursor: RECORD_SIZE,
        }
    }

    /// Id the next record will carry. Wraps after `u32::MAX`.
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    fn next_record(&mut self, rng: &mut DeterministicSource) {
        let id = self.next_id;
        let jitter = rng.next_int_in_range(0, MAX_JITTER);
        let value = rng.next_int_in_range(0, MAX_VALUE);
        let timestamp = BASE_TIMESTAMP + i64::from(id) * TIMESTAMP_STEP + i64::from(jitter);

        self.record[0..4].copy_from_slice(&id.to_le_bytes());
        self.record[4..12].copy_from_slice(&timestamp.to_le_bytes());
        self.record[12..16].copy_from_slice(&value.to_le_bytes());
        rng.fill(&mut self.record[16..RECORD_SIZE]);

        self.next_id = id.wrapping_add(1);
        self.cursor = 0;
    }
}

impl Default for StructuredRecordGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteGenerator for StructuredRecordGenerator {
    fn fill(&mut self, out: &mut [u8], rng: &mut DeterministicSource) {
        let mut written = 0;
        while written < out.len() {
            if self.cursor == RECORD_SIZE {
                self.next_record(rng);
            }
            written += copy_pending(&self.record, &mut self.cursor, &mut out[written..]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(seed: u64, len: usize) -> Vec<u8> {
        let mut rng = DeterministicSource::new(seed);
        let mut out = vec![0u8; len];
        StructuredRecordGenerator::new().fill(&mut out, &mut rng);
        out
    }

    fn fields(record: &[u8]) -> (u32, i64, u32) {
        (
            u32::from_le_bytes(record[0..4].try_into().unwrap()),
            i64::from_le_bytes(record[4..12].try_into().unwrap()),
            u32::from_le_bytes(record[12..16].try_into().unwrap()),
        )
    }

    #[test]
    fn test_pinned_first_records() {
        let out = generate(42, 2 * RECORD_SIZE);

        assert_eq!(fields(&out[..32]), (0, 1_700_000_033, 803_110));
        assert_eq!(
            &out[16..32],
            &[117, 32, 69, 109, 132, 97, 129, 84, 18, 238, 212, 181, 48, 69, 11, 183]
        );
        assert_eq!(fields(&out[32..]), (1, 1_700_000_106, 477_884));
        assert_eq!(
            &out[48..64],
            &[142, 176, 110, 47, 119, 233, 247, 149, 113, 186, 47, 229, 188, 243, 185, 18]
        );
    }

    #[test]
    fn test_record_invariants() {
        let out = generate(3, 1000 * RECORD_SIZE + 5);

        for (expected_id, record) in out.chunks_exact(RECORD_SIZE).enumerate() {
            let (id, timestamp, value) = fields(record);
            assert_eq!(id as usize, expected_id);
            let jitter = timestamp - BASE_TIMESTAMP - i64::from(id) * TIMESTAMP_STEP;
            assert!((0..=i64::from(MAX_JITTER)).contains(&jitter));
            assert!(value <= MAX_VALUE);
        }
    }

    #[test]
    fn test_truncated_record_is_prefix() {
        let whole = generate(8, 3 * RECORD_SIZE);
        let cut = generate(8, 2 * RECORD_SIZE + 10);
        assert_eq!(&whole[..cut.len()], &cut[..]);
    }

    #[test]
    fn test_split_fill_matches_single_fill() {
        let whole = generate(21, 10 * RECORD_SIZE);

        let mut rng = DeterministicSource::new(21);
        let mut generator = StructuredRecordGenerator::new();
        let mut pieces = Vec::new();
        for len in [3usize, 29, 33, 1, 254] {
            let mut chunk = vec![0u8; len];
            generator.fill(&mut chunk, &mut rng);
            pieces.extend_from_slice(&chunk);
        }
        assert_eq!(pieces, whole);
        assert_eq!(generator.next_id(), 10);
    }
}
