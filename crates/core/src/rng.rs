//! RNG module - per-engine piece randomizer
//!
//! Each engine owns its own generator, seeded once at construction, so
//! sessions never share random state and tests can pin a seed.
//! Pieces are drawn uniformly and independently (no bag).

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::types::PieceType;

/// Seeded uniform piece generator
#[derive(Debug, Clone)]
pub struct PieceRng {
    seed: u64,
    rng: Pcg32,
}

impl PieceRng {
    /// Create a generator from an explicit seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Create a generator seeded from the thread-local entropy source
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Seed this generator was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draw a piece type uniformly from the seven variants
    pub fn next_piece(&mut self) -> PieceType {
        let index = self.rng.random_range(0..PieceType::COUNT);
        PieceType::ALL[index]
    }
}
