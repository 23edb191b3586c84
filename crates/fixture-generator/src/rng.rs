//! The pinned pseudo-random source every profile draws from.
//!
//! A 32-bit linear congruential generator with the classic
//! `1103515245 * x + 12345` step. Output depends only on the seed and the
//! sequence of calls, so any implementation of the same algorithm produces
//! the same bytes.

use rand::{Error, RngCore, SeedableRng};

const MULTIPLIER: u32 = 1_103_515_245;
const INCREMENT: u32 = 12_345;

/// Deterministic byte and integer source shared by all profiles of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterministicSource {
    state: u32,
}

impl DeterministicSource {
    /// Seed the source. The two halves of `seed` are folded into the 32-bit state.
    pub fn new(seed: u64) -> Self {
        Self {
            state: (seed as u32) ^ ((seed >> 32) as u32),
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    #[inline]
    fn step(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        self.state
    }

    /// Bits 16..24 of the next state.
    #[inline]
    pub fn next_byte(&mut self) -> u8 {
        (self.step() >> 16) as u8
    }

    /// Bits 16..32 of the next state.
    #[inline]
    pub fn next_u16(&mut self) -> u16 {
        (self.step() >> 16) as u16
    }

    /// Two 16-bit draws, high half first.
    pub fn next_u32(&mut self) -> u32 {
        let hi = u32::from(self.next_u16());
        let lo = u32::from(self.next_u16());
        (hi << 16) | lo
    }

    /// Uniform-ish integer in `[lo, hi]`, inclusive at both ends.
    ///
    /// Spans up to 65536 values take one 16-bit draw, wider spans one 32-bit
    /// draw. `lo > hi` returns `lo` without drawing.
    pub fn next_int_in_range(&mut self, lo: u32, hi: u32) -> u32 {
        if hi < lo {
            return lo;
        }
        let span = u64::from(hi - lo) + 1;
        let draw = if span <= 1 << 16 {
            u64::from(self.next_u16())
        } else {
            u64::from(self.next_u32())
        };
        // draw % span < span <= 2^32, and lo + (draw % span) <= hi
        lo + (draw % span) as u32
    }

    /// `n` successive byte draws.
    pub fn next_bytes(&mut self, n: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; n];
        self.fill(&mut bytes);
        bytes
    }

    /// Overwrite `dest` with successive byte draws.
    pub fn fill(&mut self, dest: &mut [u8]) {
        for byte in dest {
            *byte = self.next_byte();
        }
    }
}

impl RngCore for DeterministicSource {
    fn next_u32(&mut self) -> u32 {
        DeterministicSource::next_u32(self)
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(DeterministicSource::next_u32(self));
        let lo = u64::from(DeterministicSource::next_u32(self));
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.fill(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill(dest);
        Ok(())
    }
}

impl SeedableRng for DeterministicSource {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}
