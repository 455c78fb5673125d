//! Sampling seeds sent with each completion request.
//!
//! A fresh seed per call decorrelates repeated requests, so asking again
//! yields a different candidate set.

use std::ops::Range;

use rand::Rng;

/// Range seeds are drawn from.
pub const SEED_RANGE: Range<u32> = 10..1000;

/// Source of the per-request sampling seed.
pub trait SeedSource: Send + Sync {
    /// Returns the seed for the next request.
    fn next_seed(&self) -> u32;
}

/// Uniformly random seed in [`SEED_RANGE`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSeed;

impl SeedSource for RandomSeed {
    fn next_seed(&self) -> u32 {
        rand::rng().random_range(SEED_RANGE)
    }
}

/// Always returns the same seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSeed(pub u32);

impl SeedSource for FixedSeed {
    fn next_seed(&self) -> u32 {
        self.0
    }
}
