//! Random number source with a deterministic seeding discipline.
//!
//! Every candidate draws from its own ChaCha8 stream selected by
//! `(seed, stream)`, so draws for one particle never interleave with
//! another's, whether candidates run sequentially or on worker threads.
//! [`RngState`] captures the exact stream position for replay.

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::Vector3;

/// Source of random draws used by processes and propagators.
///
/// Passed explicitly as `&mut dyn RandomSource`; there is no global
/// generator.
pub trait RandomSource {
    /// Uniform draw in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Snapshot of the stream position, for error reports and replay.
    fn state(&self) -> RngState;

    /// Exponentially distributed draw with unit mean, by inverse CDF.
    fn exponential(&mut self) -> f64 {
        -(1.0 - self.uniform()).ln()
    }

    /// Draw a bin index from an unnormalised cumulative distribution.
    ///
    /// Returns `None` when the table is empty or its total weight is not
    /// positive.
    fn rand_bin(&mut self, cdf: &[f64]) -> Option<usize> {
        let total = *cdf.last()?;
        if !(total > 0.0) || !total.is_finite() {
            return None;
        }
        let r = self.uniform() * total;
        let idx = cdf.partition_point(|&c| c <= r);
        Some(idx.min(cdf.len() - 1))
    }

    /// Uniformly distributed point on the segment from `a` to `b`.
    fn interpolated_position(&mut self, a: &Vector3, b: &Vector3) -> Vector3 {
        a + (b - a) * self.uniform()
    }
}

/// Position of a [`SimRng`] stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RngState {
    /// Base seed.
    pub seed: u64,
    /// ChaCha stream index (one per candidate).
    pub stream: u64,
    /// Word position within the stream.
    pub word_pos: u128,
}

impl fmt::Display for RngState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "seed={} stream={} word_pos={}",
            self.seed, self.stream, self.word_pos
        )
    }
}

/// Seeded ChaCha8 generator implementing [`RandomSource`].
#[derive(Clone, Debug)]
pub struct SimRng {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SimRng {
    /// Generator for stream 0 of `seed`.
    pub fn new(seed: u64) -> Self {
        Self::for_candidate(seed, 0)
    }

    /// Independent generator for the candidate with index `index`.
    pub fn for_candidate(seed: u64, index: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(index);
        Self { seed, rng }
    }

    /// Recreate a generator positioned exactly at `state`.
    pub fn restore(state: RngState) -> Self {
        let mut rng = Self::for_candidate(state.seed, state.stream);
        rng.rng.set_word_pos(state.word_pos);
        rng
    }

    /// The base seed of this generator.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SimRng {
    fn uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn state(&self) -> RngState {
        RngState {
            seed: self.seed,
            stream: self.rng.get_stream(),
            word_pos: self.rng.get_word_pos(),
        }
    }
}
