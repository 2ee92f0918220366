//! Fast, non-portable engine backed by `rand::rngs::SmallRng`.

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

use super::{entropy_seed, Engine};

/// Seeded engine wrapping `SmallRng`.
///
/// Reproducible for a fixed seed on one platform and `rand` version, but the
/// underlying algorithm differs between 32- and 64-bit targets. Use
/// [`StdEngine`](super::StdEngine) when streams must match across machines.
#[derive(Clone, Debug)]
pub struct FastEngine {
    inner: SmallRng,
    seed: u64,
}

impl FastEngine {
    /// Creates an engine initialised with the given seed.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Creates an engine from a seed drawn from OS entropy.
    pub fn from_entropy() -> Self {
        Self::from_seed(entropy_seed())
    }
}

impl RngCore for FastEngine {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

impl Engine for FastEngine {
    fn reseed(&mut self, seed: Option<u64>) -> u64 {
        let seed = seed.unwrap_or_else(entropy_seed);
        self.inner = SmallRng::seed_from_u64(seed);
        self.seed = seed;
        seed
    }

    #[inline]
    fn seed(&self) -> u64 {
        self.seed
    }
}
