//! Packed random bit arrays.
//!
//! Filling a bit array is equivalent to filling a `bool` array with fair
//! coin flips, but consumes one engine word per 64 bits.

use sampler_core::{Engine, Result};

use crate::context::SamplingContext;

/// Fixed-length packed bits, least significant bit first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BitArray {
    len: usize,
    words: Vec<u64>,
}

impl BitArray {
    /// All-zero array of `len` bits.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            words: vec![0; len.div_ceil(64)],
        }
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array holds no bits.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bit at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<bool> {
        (index < self.len).then(|| (self.words[index / 64] >> (index % 64)) & 1 == 1)
    }

    /// Sets the bit at `index`, returning its previous value, or `None`
    /// when out of range.
    pub fn set(&mut self, index: usize, bit: bool) -> Option<bool> {
        let previous = self.get(index)?;
        let mask = 1u64 << (index % 64);
        if bit {
            self.words[index / 64] |= mask;
        } else {
            self.words[index / 64] &= !mask;
        }
        Some(previous)
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Backing words; bits past `len` are zero.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Iterates the bits in index order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |index| (self.words[index / 64] >> (index % 64)) & 1 == 1)
    }

    fn mask_tail(&mut self) {
        let used = self.len % 64;
        if used != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << used) - 1;
            }
        }
    }
}

/// Overwrites every bit of `bits` with a fair coin flip.
pub fn fill_bits<E: Engine>(engine: &mut E, bits: &mut BitArray) {
    for word in bits.words.iter_mut() {
        *word = engine.next_word();
    }
    bits.mask_tail();
}

impl SamplingContext {
    /// Generates `len` random bits.
    ///
    /// # Errors
    ///
    /// Returns [`SamplingError::InvalidDimensions`](sampler_core::SamplingError::InvalidDimensions)
    /// when `len` exceeds the configured element limit.
    pub fn random_bits<E: Engine>(&self, engine: &mut E, len: usize) -> Result<BitArray> {
        self.element_count(&[len])?;
        let mut bits = BitArray::new(len);
        fill_bits(engine, &mut bits);
        Ok(bits)
    }
}
