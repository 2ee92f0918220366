//! Random strings.

use sampler_core::{Engine, FromValue, Repetition, Result};

use crate::context::SamplingContext;
use crate::distribution::Distribution;
use crate::request::{Collection, Request};

impl SamplingContext {
    /// Draws one string of `len` elements from `alphabet` (alphanumeric by default).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sampler_core::StdEngine;
    /// use sampler_gen::{Collection, SamplingContext};
    ///
    /// let mut engine = StdEngine::from_seed(7);
    /// let dna = SamplingContext::default()
    ///     .random_string(&mut engine, 12, Some(&Collection::chars("ACGT")))
    ///     .unwrap();
    /// assert_eq!(dna.len(), 12);
    /// assert!(dna.chars().all(|c| "ACGT".contains(c)));
    /// ```
    pub fn random_string<E: Engine>(
        &self,
        engine: &mut E,
        len: usize,
        alphabet: Option<&Collection>,
    ) -> Result<String> {
        self.draw_as(engine, &text_request(len, alphabet))
    }

    /// Draws `count` strings, resolving the alphabet once.
    ///
    /// A single string is resolved as a one-shot draw, matching
    /// [`random_string`](Self::random_string).
    pub fn random_strings<E: Engine>(
        &self,
        engine: &mut E,
        count: usize,
        len: usize,
        alphabet: Option<&Collection>,
    ) -> Result<Vec<String>> {
        self.element_count(&[count])?;
        let sampler = self.resolve(&text_request(len, alphabet), Repetition::for_count(count))?;
        (0..count)
            .map(|_| String::from_value(sampler.draw(engine)))
            .collect()
    }
}

fn text_request(len: usize, alphabet: Option<&Collection>) -> Request {
    let alphabet = alphabet.cloned().unwrap_or_else(Collection::alphanumeric);
    Distribution::text(alphabet, len).into()
}
