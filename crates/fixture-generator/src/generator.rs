//! Section-aware content generator driving one run.

use fixture_core::ChunkSpec;
use rand::SeedableRng;

use crate::generators::{ByteGenerator, ProfileGenerator};
use crate::rng::DeterministicSource;

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Buffer length differs from the chunk it should hold
    #[error("buffer holds {actual} bytes but chunk at offset {offset} is {expected} bytes")]
    BufferLength {
        offset: u64,
        expected: u64,
        actual: usize,
    },

    /// Chunk arrived out of order
    #[error("expected chunk at offset {expected}, got offset {actual}")]
    OutOfOrder { expected: u64, actual: u64 },
}

/// Fills chunks in plan order from one [`DeterministicSource`].
///
/// Profile state lives for the length of a section: it is carried from one
/// chunk to the next and reset when a chunk opens a new section. Chunks must
/// be fed in order, since every byte depends on all the draws before it.
#[derive(Debug, Clone)]
pub struct ContentGenerator {
    seed: u64,
    rng: DeterministicSource,
    /// Section index and generator of the section being filled
    active: Option<(usize, ProfileGenerator)>,
    bytes_generated: u64,
}

impl ContentGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: DeterministicSource::seed_from_u64(seed),
            active: None,
            bytes_generated: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Bytes produced so far, which is also the offset of the next chunk.
    pub fn bytes_generated(&self) -> u64 {
        self.bytes_generated
    }

    pub fn rng(&self) -> &DeterministicSource {
        &self.rng
    }

    /// Fill `out` with the content of `chunk`.
    ///
    /// `out` must be exactly `chunk.len` bytes and `chunk` must start where
    /// the previous one ended.
    pub fn fill_chunk(&mut self, chunk: &ChunkSpec, out: &mut [u8]) -> Result<(), GeneratorError> {
        if out.len() as u64 != chunk.len {
            return Err(GeneratorError::BufferLength {
                offset: chunk.offset,
                expected: chunk.len,
                actual: out.len(),
            });
        }
        if chunk.offset != self.bytes_generated {
            return Err(GeneratorError::OutOfOrder {
                expected: self.bytes_generated,
                actual: chunk.offset,
            });
        }

        let continues_section = matches!(
            &self.active,
            Some((index, _)) if *index == chunk.section_index && !chunk.is_section_start()
        );
        if !continues_section {
            self.active = Some((chunk.section_index, ProfileGenerator::new(chunk.profile)));
        }

        if let Some((_, generator)) = &mut self.active {
            generator.fill(out, &mut self.rng);
        }
        self.bytes_generated += chunk.len;
        Ok(())
    }

    /// Allocate and fill a buffer for `chunk`.
    pub fn generate_chunk(&mut self, chunk: &ChunkSpec) -> Result<Vec<u8>, GeneratorError> {
        let mut out = vec![0u8; chunk.len as usize];
        self.fill_chunk(chunk, &mut out)?;
        Ok(out)
    }
}
