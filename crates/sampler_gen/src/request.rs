//! Request shapes accepted by the resolution protocol.
//!
//! A request is one of a closed set of shapes: a bare value kind, an
//! arbitrary collection to sample from, a [`Distribution`], or an already
//! resolved [`Sampler`].

use std::ops::{Range, RangeInclusive};
use std::sync::Arc;

use sampler_core::{FromValue, IntWidth, Value, ValueKind};

use crate::distribution::Distribution;
use crate::sampler::Sampler;

/// Default alphabet for string generation.
pub const ALPHANUMERIC: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// A collection of candidate values sampled uniformly (or by weight).
///
/// Collections are cheap to clone: element storage is shared.
///
/// # Examples
///
/// ```rust
/// use sampler_gen::Collection;
///
/// let digits = Collection::IntRange(0..=9);
/// assert_eq!(digits.universe_size(), Some(10));
///
/// let colours = Collection::values(["red", "green", "blue"]);
/// assert_eq!(colours.element_kind().to_string(), "String");
/// ```
#[derive(Clone, Debug)]
pub enum Collection {
    /// Integers in an inclusive range.
    IntRange(RangeInclusive<i64>),
    /// Unsigned integers in an inclusive range.
    UIntRange(RangeInclusive<u64>),
    /// Floats in the half-open interval `[low, high)`.
    FloatRange {
        /// Inclusive lower bound.
        low: f64,
        /// Exclusive upper bound.
        high: f64,
    },
    /// Arbitrary values, each equally likely.
    Values(Arc<[Value]>),
    /// Characters, each equally likely.
    Chars(Arc<[char]>),
    /// Values drawn proportionally to their weights.
    Weighted {
        /// Candidate values.
        values: Arc<[Value]>,
        /// Non-negative weight per value.
        weights: Arc<[f64]>,
    },
}

impl Collection {
    /// Collects arbitrary values.
    pub fn values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Collection::Values(values.into_iter().map(Into::into).collect())
    }

    /// Collects the characters of `text`.
    pub fn chars(text: &str) -> Self {
        Collection::Chars(text.chars().collect())
    }

    /// The `0-9A-Za-z` alphabet.
    pub fn alphanumeric() -> Self {
        Self::chars(ALPHANUMERIC)
    }

    /// Floats in `[low, high)`.
    pub fn float_range(low: f64, high: f64) -> Self {
        Collection::FloatRange { low, high }
    }

    /// Values with relative weights.
    pub fn weighted<I, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (V, f64)>,
        V: Into<Value>,
    {
        let (values, weights): (Vec<Value>, Vec<f64>) = pairs
            .into_iter()
            .map(|(value, weight)| (value.into(), weight))
            .unzip();
        Collection::Weighted {
            values: values.into(),
            weights: weights.into(),
        }
    }

    /// Kind of the elements, or `Any` for mixed or empty value lists.
    pub fn element_kind(&self) -> ValueKind {
        match self {
            Collection::IntRange(_) => ValueKind::Int(IntWidth::W64),
            Collection::UIntRange(_) => ValueKind::UInt(IntWidth::W64),
            Collection::FloatRange { .. } => ValueKind::Float64,
            Collection::Chars(_) => ValueKind::Char,
            Collection::Values(values) | Collection::Weighted { values, .. } => {
                common_kind(values)
            }
        }
    }

    /// Upper bound on the number of distinct values the collection yields.
    ///
    /// `None` when the bound is not tracked (float ranges).
    pub fn universe_size(&self) -> Option<u128> {
        match self {
            Collection::IntRange(range) => {
                let span = i128::from(*range.end()) - i128::from(*range.start()) + 1;
                Some(span.max(0) as u128)
            }
            Collection::UIntRange(range) => Some(
                (u128::from(*range.end()) + 1).saturating_sub(u128::from(*range.start())),
            ),
            Collection::FloatRange { .. } => None,
            Collection::Values(values) => Some(values.len() as u128),
            Collection::Chars(chars) => Some(chars.len() as u128),
            Collection::Weighted { weights, .. } => {
                Some(weights.iter().filter(|w| **w > 0.0).count() as u128)
            }
        }
    }
}

/// Kind shared by every value, or `Any` when they differ.
pub(crate) fn common_kind(values: &[Value]) -> ValueKind {
    let mut kinds = values.iter().map(Value::kind);
    match kinds.next() {
        Some(first) if kinds.all(|kind| kind == first) => first,
        _ => ValueKind::Any,
    }
}

/// A request for randomness.
#[derive(Clone, Debug)]
pub enum Request {
    /// A bare value kind.
    Type(ValueKind),
    /// A collection to sample elements from.
    Collection(Collection),
    /// A distribution descriptor.
    Distribution(Box<Distribution>),
    /// An already resolved sampler.
    Sampler(Sampler),
}

impl Request {
    /// A bare request for the kind matching `T`.
    pub fn of<T: FromValue>() -> Self {
        Request::Type(T::kind())
    }

    /// Kind of the values this request produces.
    pub fn element_kind(&self) -> ValueKind {
        match self {
            Request::Type(kind) => kind.clone(),
            Request::Collection(collection) => collection.element_kind(),
            Request::Distribution(distribution) => distribution.kind().clone(),
            Request::Sampler(sampler) => sampler.kind(),
        }
    }
}

impl From<ValueKind> for Request {
    fn from(kind: ValueKind) -> Self {
        Request::Type(kind)
    }
}

impl From<Collection> for Request {
    fn from(collection: Collection) -> Self {
        Request::Collection(collection)
    }
}

impl From<Distribution> for Request {
    fn from(distribution: Distribution) -> Self {
        Request::Distribution(Box::new(distribution))
    }
}

impl From<Sampler> for Request {
    fn from(sampler: Sampler) -> Self {
        Request::Sampler(sampler)
    }
}

impl From<RangeInclusive<i64>> for Request {
    fn from(range: RangeInclusive<i64>) -> Self {
        Request::Collection(Collection::IntRange(range))
    }
}

impl From<RangeInclusive<u64>> for Request {
    fn from(range: RangeInclusive<u64>) -> Self {
        Request::Collection(Collection::UIntRange(range))
    }
}

impl From<Range<f64>> for Request {
    fn from(range: Range<f64>) -> Self {
        Request::Collection(Collection::float_range(range.start, range.end))
    }
}
