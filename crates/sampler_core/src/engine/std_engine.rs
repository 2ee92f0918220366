//! Portable, reproducible engine backed by `rand::rngs::StdRng`.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use super::{entropy_seed, Engine};

/// Seeded engine wrapping `StdRng` (ChaCha12).
///
/// Two engines created from the same seed produce identical streams on every
/// platform, which makes this the engine of choice for reproducible runs and
/// the type of the thread default engine.
///
/// # Examples
///
/// ```rust
/// use sampler_core::engine::{Engine, StdEngine};
///
/// let mut a = StdEngine::from_seed(42);
/// let mut b = StdEngine::from_seed(42);
/// assert_eq!(a.next_word(), b.next_word());
/// assert_eq!(a.seed(), 42);
/// ```
#[derive(Clone, Debug)]
pub struct StdEngine {
    /// The underlying PRNG instance.
    inner: StdRng,
    /// The seed the current stream started from.
    seed: u64,
}

impl StdEngine {
    /// Creates an engine initialised with the given seed.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Creates an engine from a seed drawn from OS entropy.
    ///
    /// The drawn seed is recorded and available through [`Engine::seed`], so
    /// the stream can be replayed.
    pub fn from_entropy() -> Self {
        Self::from_seed(entropy_seed())
    }
}

impl RngCore for StdEngine {
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

impl Engine for StdEngine {
    fn reseed(&mut self, seed: Option<u64>) -> u64 {
        let seed = seed.unwrap_or_else(entropy_seed);
        self.inner = StdRng::seed_from_u64(seed);
        self.seed = seed;
        seed
    }

    #[inline]
    fn seed(&self) -> u64 {
        self.seed
    }
}
