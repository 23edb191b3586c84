//! Flat-entropy profiles: pseudo-random noise and zero fill.

use rand::RngCore;

use crate::generators::ByteGenerator;
use crate::rng::DeterministicSource;

/// One byte draw per output byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomGenerator;

impl ByteGenerator for RandomGenerator {
    fn fill(&mut self, out: &mut [u8], rng: &mut DeterministicSource) {
        rng.fill_bytes(out);
    }
}

/// Zero bytes; leaves the random source untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroGenerator;

impl ByteGenerator for ZeroGenerator {
    fn fill(&mut self, out: &mut [u8], _rng: &mut DeterministicSource) {
        out.fill(0);
    }
}
