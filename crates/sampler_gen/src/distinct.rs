//! Distinct-element filling for sets and maps.
//!
//! Values are drawn and inserted until the collection holds the requested
//! number of distinct elements (for maps, distinct keys). A sampler whose
//! known universe is smaller than the target would loop forever, so that
//! case is rejected up front. Samplers with an unknown universe are only
//! bounded by the optional attempt limit in [`SamplingConfig`].
//!
//! [`SamplingConfig`]: sampler_core::SamplingConfig

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::{BuildHasher, Hash};

use sampler_core::{Engine, FromValue, Repetition, Result, SamplingError};

use crate::context::SamplingContext;
use crate::request::Request;
use crate::sampler::Sampler;
use crate::scalar::typed_request;

/// A collection that keeps only distinct elements.
pub trait DistinctCollection {
    /// Element built from each draw.
    type Item: FromValue;

    /// Removes every element.
    fn clear(&mut self);

    /// Number of distinct elements held.
    fn len(&self) -> usize;

    /// Whether the collection is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts an element; duplicates are absorbed.
    fn insert_item(&mut self, item: Self::Item);

    /// Upper bound on the distinct elements `sampler` can contribute.
    fn universe(sampler: &Sampler) -> Option<u128> {
        sampler.universe_size()
    }
}

impl<T, S> DistinctCollection for HashSet<T, S>
where
    T: FromValue + Eq + Hash,
    S: BuildHasher,
{
    type Item = T;

    fn clear(&mut self) {
        HashSet::clear(self)
    }

    fn len(&self) -> usize {
        HashSet::len(self)
    }

    fn insert_item(&mut self, item: T) {
        self.insert(item);
    }
}

impl<T: FromValue + Ord> DistinctCollection for BTreeSet<T> {
    type Item = T;

    fn clear(&mut self) {
        BTreeSet::clear(self)
    }

    fn len(&self) -> usize {
        BTreeSet::len(self)
    }

    fn insert_item(&mut self, item: T) {
        self.insert(item);
    }
}

impl<K, V, S> DistinctCollection for HashMap<K, V, S>
where
    K: FromValue + Eq + Hash,
    V: FromValue,
    S: BuildHasher,
{
    type Item = (K, V);

    fn clear(&mut self) {
        HashMap::clear(self)
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn insert_item(&mut self, (key, value): (K, V)) {
        self.insert(key, value);
    }

    fn universe(sampler: &Sampler) -> Option<u128> {
        sampler.key_universe_size()
    }
}

impl<K: FromValue + Ord, V: FromValue> DistinctCollection for BTreeMap<K, V> {
    type Item = (K, V);

    fn clear(&mut self) {
        BTreeMap::clear(self)
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn insert_item(&mut self, (key, value): (K, V)) {
        self.insert(key, value);
    }

    fn universe(sampler: &Sampler) -> Option<u128> {
        sampler.key_universe_size()
    }
}

impl SamplingContext {
    /// Clears `collection` and fills it with `count` distinct elements.
    ///
    /// The request is resolved once for many draws; draws are then inserted
    /// until the collection holds `count` elements (distinct keys for maps).
    ///
    /// # Arguments
    ///
    /// * `engine` - Source of randomness
    /// * `collection` - Set or map to refill; cleared first
    /// * `count` - Number of distinct elements wanted
    /// * `request` - Request producing elements (pairs for maps)
    ///
    /// # Errors
    ///
    /// - [`SamplingError::UniverseTooSmall`] when the sampler provably cannot
    ///   yield `count` distinct elements (checked before `collection` is
    ///   touched, unless disabled in the configuration)
    /// - [`SamplingError::UniverseExhausted`] when the configured attempt
    ///   limit runs out
    /// - [`SamplingError::InvalidDimensions`] when `count` exceeds the
    ///   configured element limit
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::collections::HashSet;
    ///
    /// use sampler_core::StdEngine;
    /// use sampler_gen::SamplingContext;
    ///
    /// let mut engine = StdEngine::from_seed(42);
    /// let mut set: HashSet<i64> = HashSet::new();
    /// SamplingContext::default()
    ///     .fill_distinct(&mut engine, &mut set, 50, &(1..=1000i64).into())
    ///     .unwrap();
    /// assert_eq!(set.len(), 50);
    /// ```
    pub fn fill_distinct<C, E>(
        &self,
        engine: &mut E,
        collection: &mut C,
        count: usize,
        request: &Request,
    ) -> Result<()>
    where
        C: DistinctCollection,
        E: Engine,
    {
        self.element_count(&[count])?;
        let request = typed_request::<C::Item>(request);
        let sampler = self.resolve(&request, Repetition::Many)?;

        if self.config().check_universe() {
            if let Some(universe) = C::universe(&sampler) {
                if universe < count as u128 {
                    tracing::warn!(count, universe = %universe, "distinct fill cannot succeed");
                    return Err(SamplingError::UniverseTooSmall {
                        target: count,
                        universe,
                    });
                }
            }
        }

        collection.clear();
        let limit = self.config().distinct_attempt_limit();
        let mut attempts: u64 = 0;
        while collection.len() < count {
            if limit.is_some_and(|limit| attempts >= limit) {
                tracing::warn!(count, reached = collection.len(), attempts, "distinct fill gave up");
                return Err(SamplingError::UniverseExhausted {
                    target: count,
                    reached: collection.len(),
                    attempts,
                });
            }
            collection.insert_item(<C::Item as FromValue>::from_value(sampler.draw(engine))?);
            attempts += 1;
        }
        tracing::trace!(count, attempts, "distinct fill complete");
        Ok(())
    }

    /// Builds a new collection of `count` distinct elements.
    pub fn distinct<C, E>(&self, engine: &mut E, count: usize, request: &Request) -> Result<C>
    where
        C: DistinctCollection + Default,
        E: Engine,
    {
        let mut collection = C::default();
        self.fill_distinct(engine, &mut collection, count, request)?;
        Ok(collection)
    }
}
