//! # Engine Abstraction
//!
//! An engine is the source of raw randomness every sampler draws from. The
//! sampler protocol never assumes a particular bit-generation algorithm; it
//! only needs "produce the next raw word / N raw bits" and "reseed
//! deterministically". Any type satisfying [`Engine`] is interchangeable.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: every engine records the seed it was initialised with,
//!   including seeds drawn from OS entropy
//! - **Ecosystem compatibility**: `Engine: rand::RngCore`, so `rand` and
//!   `rand_distr` algorithms run directly on any engine
//! - **Static dispatch**: generation functions are generic over `E: Engine`;
//!   `&mut E` and `Box<E>` forward the contract for callers holding trait objects
//! - **No shared state**: an engine is borrowed mutably for the duration of a
//!   draw sequence; the borrow checker rules out concurrent mutation
//!
//! ## Module Structure
//!
//! - [`StdEngine`]: ChaCha12-based `StdRng` adapter (portable, reproducible)
//! - [`FastEngine`]: `SmallRng` adapter (fast, not portable across platforms)
//! - `default`: thread-local default engine lifecycle
//!
//! ## Usage Example
//!
//! ```rust
//! use sampler_core::engine::{Engine, StdEngine};
//!
//! let mut engine = StdEngine::from_seed(12345);
//! let word = engine.next_word();
//! let byte = engine.next_bits(8);
//! assert!(byte < 256);
//!
//! // Reseeding restarts the stream.
//! engine.reseed(Some(12345));
//! assert_eq!(engine.next_word(), word);
//! ```

mod default;
mod fast_engine;
mod std_engine;

use rand::RngCore;

pub use default::{
    default_engine_seed, init_default_engine, reseed_default_engine, teardown_default_engine,
    with_default_engine,
};
pub use fast_engine::FastEngine;
pub use std_engine::StdEngine;

/// Source of raw pseudo-random bits, deterministically reseedable.
///
/// Implementors provide the `rand::RngCore` word generators plus seed
/// management; [`next_word`](Engine::next_word) and
/// [`next_bits`](Engine::next_bits) are derived from `next_u64`.
pub trait Engine: RngCore {
    /// Yields the next raw machine word.
    #[inline]
    fn next_word(&mut self) -> u64 {
        self.next_u64()
    }

    /// Yields `width` random bits in the low end of the result.
    ///
    /// Widths of 64 or more yield a full word; a width of 0 yields 0 without
    /// advancing the engine.
    #[inline]
    fn next_bits(&mut self, width: u32) -> u64 {
        match width {
            0 => 0,
            w if w >= 64 => self.next_u64(),
            // High bits are the better-mixed ones for most generators.
            w => self.next_u64() >> (64 - w),
        }
    }

    /// Restarts the stream from `seed`, or from a fresh entropy seed when
    /// `None`. Returns the seed now in effect.
    fn reseed(&mut self, seed: Option<u64>) -> u64;

    /// Returns the seed the current stream was started from.
    fn seed(&self) -> u64;
}

impl<E: Engine + ?Sized> Engine for &mut E {
    #[inline]
    fn next_word(&mut self) -> u64 {
        (**self).next_word()
    }

    #[inline]
    fn next_bits(&mut self, width: u32) -> u64 {
        (**self).next_bits(width)
    }

    fn reseed(&mut self, seed: Option<u64>) -> u64 {
        (**self).reseed(seed)
    }

    fn seed(&self) -> u64 {
        (**self).seed()
    }
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    #[inline]
    fn next_word(&mut self) -> u64 {
        (**self).next_word()
    }

    #[inline]
    fn next_bits(&mut self, width: u32) -> u64 {
        (**self).next_bits(width)
    }

    fn reseed(&mut self, seed: Option<u64>) -> u64 {
        (**self).reseed(seed)
    }

    fn seed(&self) -> u64 {
        (**self).seed()
    }
}

/// Draws a fresh seed from the operating system's entropy source.
pub(crate) fn entropy_seed() -> u64 {
    rand::random()
}

#[cfg(test)]
mod tests;
