//! Monte Carlo estimation of pi.
//!
//! Points are drawn uniformly from the unit square `[0, 1) x [0, 1)`. The
//! quarter circle of radius 1 covers `pi / 4` of that square, so four times
//! the fraction of points landing inside it approximates pi.

use std::fmt;
use std::num::NonZeroU64;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{Error, Result};

/// Number of points sampled by one estimation. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SampleCount(NonZeroU64);

impl SampleCount {
    pub fn new(n: u64) -> Result<Self> {
        NonZeroU64::new(n).map(SampleCount).ok_or(Error::ZeroSamples)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for SampleCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where each worker gets its random numbers from.
///
/// With a seed, stream `k` is a ChaCha8 generator seeded once and moved to
/// stream `k`, so every worker draws from its own reproducible sequence.
/// Without one, every stream is seeded from OS entropy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RngSource {
    seed: Option<u64>,
}

impl RngSource {
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    pub fn entropy() -> Self {
        Self { seed: None }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn stream(&self, index: u64) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                rng.set_stream(index);
                rng
            }
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

/// Estimates pi from `samples` uniform points drawn from `rng`.
pub fn estimate_pi<R: Rng + ?Sized>(samples: SampleCount, rng: &mut R) -> f64 {
    let n = samples.get();
    let mut inside = 0u64;

    for _ in 0..n {
        let x: f64 = rng.gen();
        let y: f64 = rng.gen();
        if x * x + y * y <= 1.0 {
            inside += 1;
        }
    }

    4.0 * inside as f64 / n as f64
}
