//! Byte generators, one per entropy profile.
//!
//! Every generator fills caller-provided buffers from a shared
//! [`DeterministicSource`]. Filling one buffer of `n` bytes and filling
//! several consecutive buffers adding up to `n` bytes produce the same bytes
//! and leave the source in the same state.

pub mod log_text;
pub mod noise;
pub mod record;

use fixture_core::EntropyProfile;

use crate::rng::DeterministicSource;

pub use log_text::LogTextGenerator;
pub use noise::{RandomGenerator, ZeroGenerator};
pub use record::StructuredRecordGenerator;

/// Trait for filling buffers with profile content.
pub trait ByteGenerator {
    /// Fill all of `out`, continuing where the previous call stopped.
    fn fill(&mut self, out: &mut [u8], rng: &mut DeterministicSource);
}

/// Generator for one section, chosen by its profile.
#[derive(Debug, Clone)]
pub enum ProfileGenerator {
    LogText(LogTextGenerator),
    StructuredRecord(StructuredRecordGenerator),
    Random(RandomGenerator),
    Zero(ZeroGenerator),
}

impl ProfileGenerator {
    /// Fresh generator state for a new section.
    pub fn new(profile: EntropyProfile) -> Self {
        match profile {
            EntropyProfile::LogText => ProfileGenerator::LogText(LogTextGenerator::new()),
            EntropyProfile::StructuredRecord => {
                ProfileGenerator::StructuredRecord(StructuredRecordGenerator::new())
            }
            EntropyProfile::Random => ProfileGenerator::Random(RandomGenerator),
            EntropyProfile::Zero => ProfileGenerator::Zero(ZeroGenerator),
        }
    }

    pub fn profile(&self) -> EntropyProfile {
        match self {
            ProfileGenerator::LogText(_) => EntropyProfile::LogText,
            ProfileGenerator::StructuredRecord(_) => EntropyProfile::StructuredRecord,
            ProfileGenerator::Random(_) => EntropyProfile::Random,
            ProfileGenerator::Zero(_) => EntropyProfile::Zero,
        }
    }
}

impl ByteGenerator for ProfileGenerator {
    fn fill(&mut self, out: &mut [u8], rng: &mut DeterministicSource) {
        match self {
            ProfileGenerator::LogText(generator) => generator.fill(out, rng),
            ProfileGenerator::StructuredRecord(generator) => generator.fill(out, rng),
            ProfileGenerator::Random(generator) => generator.fill(out, rng),
            ProfileGenerator::Zero(generator) => generator.fill(out, rng),
        }
    }
}

/// Generate a whole `len`-byte section of `profile` in one call.
pub fn generate(profile: EntropyProfile, len: usize, rng: &mut DeterministicSource) -> Vec<u8> {
    let mut out = vec![0u8; len];
    ProfileGenerator::new(profile).fill(&mut out, rng);
    out
}

/// Copy as much of `pending[*cursor..]` into `out` as fits; returns bytes copied.
pub(crate) fn copy_pending(pending: &[u8], cursor: &mut usize, out: &mut [u8]) -> usize {
    let available = &pending[*cursor..];
    let n = available.len().min(out.len());
    out[..n].copy_from_slice(&available[..n]);
    *cursor += n;
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_round_trip() {
        for profile in EntropyProfile::ALL {
            assert_eq!(ProfileGenerator::new(profile).profile(), profile);
        }
    }

    #[test]
    fn test_generate_exact_lengths() {
        for profile in EntropyProfile::ALL {
            for len in [0usize, 1, 31, 32, 33, 4096] {
                let mut rng = DeterministicSource::new(1);
                assert_eq!(generate(profile, len, &mut rng).len(), len);
            }
        }
    }

    #[test]
    fn test_zero_profile_is_zero() {
        let mut rng = DeterministicSource::new(42);
        assert_eq!(generate(EntropyProfile::Zero, 32, &mut rng), vec![0u8; 32]);
    }

    #[test]
    fn test_random_profile_is_next_bytes() {
        let mut a = DeterministicSource::new(9);
        let mut b = DeterministicSource::new(9);
        assert_eq!(generate(EntropyProfile::Random, 100, &mut a), b.next_bytes(100));
    }

    #[test]
    fn test_split_fill_matches_for_every_profile() {
        for profile in EntropyProfile::ALL {
            let mut rng = DeterministicSource::new(77);
            let whole = generate(profile, 5000, &mut rng);
            let end_state = rng.state();

            let mut rng = DeterministicSource::new(77);
            let mut generator = ProfileGenerator::new(profile);
            let mut pieces = vec![0u8; 5000];
            for piece in pieces.chunks_mut(333) {
                generator.fill(piece, &mut rng);
            }
            assert_eq!(pieces, whole, "profile {profile}");
            assert_eq!(rng.state(), end_state, "profile {profile}");
        }
    }

    #[test]
    fn test_copy_pending() {
        let pending = [1u8, 2, 3, 4, 5];
        let mut cursor = 1;
        let mut out = [0u8; 2];
        assert_eq!(copy_pending(&pending, &mut cursor, &mut out), 2);
        assert_eq!(out, [2, 3]);
        assert_eq!(cursor, 3);

        let mut out = [0u8; 8];
        assert_eq!(copy_pending(&pending, &mut cursor, &mut out), 2);
        assert_eq!(cursor, 5);
    }
}
