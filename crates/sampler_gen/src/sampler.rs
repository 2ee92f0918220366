//! Resolved samplers and their draw routines.
//!
//! A [`Sampler`] is the product of resolving a request for a repetition
//! class. It comes in three shapes:
//!
//! - **NoPayload**: the algorithm is fully determined by a primitive kind.
//! - **Trivial**: the request's parameters are kept verbatim and every draw
//!   works from them directly. Chosen for single draws, where building
//!   tables would cost more than it saves.
//! - **Tagged**: precomputed state (uniform ranges, alias tables, nested
//!   samplers) shared behind an `Arc`.
//!
//! Samplers are immutable once built; cloning one is cheap and it may be
//! drawn from concurrently, each caller supplying its own engine.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use rand::distributions::{Bernoulli, Distribution as _, Open01, OpenClosed01, Uniform};
use rand::Rng;
use rand_distr::{Exp, Exp1, Normal, StandardNormal, WeightedAliasIndex};
use sampler_core::{Engine, IntWidth, Primitive, Repetition, Value, ValueKind};

use crate::distribution::Interval;
use crate::registry::Algorithm;
use crate::request::{common_kind, Collection};

/// A resolved, reusable sampling strategy.
#[derive(Clone, Debug)]
pub enum Sampler {
    /// Primitive kind whose algorithm needs no parameters.
    NoPayload {
        /// Kind drawn.
        primitive: Primitive,
        /// Repetition resolved for.
        repetition: Repetition,
    },
    /// Parameters kept verbatim, drawn without precomputation.
    Trivial {
        /// The parameters.
        value: Arc<Verbatim>,
        /// Repetition resolved for.
        repetition: Repetition,
    },
    /// Precomputed state.
    Tagged {
        /// The state.
        payload: Arc<Payload>,
        /// Repetition resolved for.
        repetition: Repetition,
    },
}

/// Request parameters carried verbatim by a trivial sampler.
#[derive(Clone, Debug)]
pub enum Verbatim {
    /// A collection.
    Collection(Collection),
    /// A unit interval.
    Interval {
        /// `Float32` or `Float64`.
        kind: ValueKind,
        /// The interval.
        interval: Interval,
    },
    /// Normal parameters.
    Normal {
        /// `Float32` or `Float64`.
        kind: ValueKind,
        /// Mean.
        mean: f64,
        /// Standard deviation.
        std_dev: f64,
    },
    /// Exponential parameters.
    Exponential {
        /// `Float32` or `Float64`.
        kind: ValueKind,
        /// Rate.
        rate: f64,
    },
    /// Bernoulli parameter.
    Bernoulli {
        /// Success probability.
        p: f64,
    },
}

/// Precomputed state of a tagged sampler.
#[derive(Debug)]
pub enum Payload {
    /// Uniform integers over `[low, high]`.
    IntRange {
        /// Lower bound.
        low: i64,
        /// Upper bound.
        high: i64,
        /// Precomputed uniform.
        uniform: Uniform<i64>,
    },
    /// Uniform unsigned integers over `[low, high]`.
    UIntRange {
        /// Lower bound.
        low: u64,
        /// Upper bound.
        high: u64,
        /// Precomputed uniform.
        uniform: Uniform<u64>,
    },
    /// Uniform floats over `[low, high)`.
    FloatRange {
        /// Precomputed uniform.
        uniform: Uniform<f64>,
    },
    /// Uniform choice among values.
    Choice {
        /// Candidates.
        values: Arc<[Value]>,
        /// Index distribution.
        index: Uniform<usize>,
    },
    /// Uniform choice among characters.
    CharChoice {
        /// Candidates.
        chars: Arc<[char]>,
        /// Index distribution.
        index: Uniform<usize>,
    },
    /// Weighted choice through an alias table.
    Alias {
        /// Candidates.
        values: Arc<[Value]>,
        /// Alias table over the weights.
        table: WeightedAliasIndex<f64>,
        /// Number of candidates with positive weight.
        support: usize,
    },
    /// Gaussian deviates.
    Normal {
        /// `Float32` or `Float64`.
        kind: ValueKind,
        /// The distribution.
        normal: Normal<f64>,
    },
    /// Exponential deviates.
    Exponential {
        /// `Float32` or `Float64`.
        kind: ValueKind,
        /// The distribution.
        exp: Exp<f64>,
    },
    /// Bernoulli trials.
    Bernoulli {
        /// Success probability.
        p: f64,
        /// The distribution.
        bernoulli: Bernoulli,
    },
    /// Values of an inner sampler converted to `target`.
    Cast {
        /// Output kind.
        target: ValueKind,
        /// Source sampler.
        inner: Sampler,
    },
    /// Pairs from two independent samplers.
    Pair {
        /// Output kind.
        kind: ValueKind,
        /// First half.
        first: Sampler,
        /// Second half.
        second: Sampler,
    },
    /// Fixed-length strings.
    Text {
        /// Sampler over characters or string tokens.
        alphabet: Sampler,
        /// Elements per string.
        len: usize,
    },
    /// A registered algorithm with its precomputed state.
    Custom(CustomPayload),
}

/// Registered algorithm plus the state it precomputed.
pub struct CustomPayload {
    pub(crate) name: String,
    pub(crate) kind: ValueKind,
    pub(crate) algorithm: Arc<dyn Algorithm>,
    pub(crate) state: Arc<dyn Any + Send + Sync>,
}

impl CustomPayload {
    /// Registry key the algorithm was found under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// State precomputed by the algorithm.
    pub fn state(&self) -> &(dyn Any + Send + Sync) {
        self.state.as_ref()
    }
}

impl fmt::Debug for CustomPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomPayload")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl Sampler {
    pub(crate) fn no_payload(primitive: Primitive, repetition: Repetition) -> Self {
        Sampler::NoPayload {
            primitive,
            repetition,
        }
    }

    pub(crate) fn trivial(value: Verbatim, repetition: Repetition) -> Self {
        Sampler::Trivial {
            value: Arc::new(value),
            repetition,
        }
    }

    pub(crate) fn tagged(payload: Payload, repetition: Repetition) -> Self {
        Sampler::Tagged {
            payload: Arc::new(payload),
            repetition,
        }
    }

    /// Repetition class the sampler was resolved for.
    pub fn repetition(&self) -> Repetition {
        match self {
            Sampler::NoPayload { repetition, .. }
            | Sampler::Trivial { repetition, .. }
            | Sampler::Tagged { repetition, .. } => *repetition,
        }
    }

    /// Kind of the values drawn.
    pub fn kind(&self) -> ValueKind {
        match self {
            Sampler::NoPayload { primitive, .. } => primitive.kind(),
            Sampler::Trivial { value, .. } => value.kind(),
            Sampler::Tagged { payload, .. } => payload.kind(),
        }
    }

    /// `"no-payload"`, `"trivial"` or `"tagged"`.
    pub fn shape_name(&self) -> &'static str {
        match self {
            Sampler::NoPayload { .. } => "no-payload",
            Sampler::Trivial { .. } => "trivial",
            Sampler::Tagged { .. } => "tagged",
        }
    }

    /// Precomputed state, for tagged samplers.
    pub fn payload(&self) -> Option<&Payload> {
        match self {
            Sampler::Tagged { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Upper bound on the number of distinct values drawn, when known.
    pub fn universe_size(&self) -> Option<u128> {
        match self {
            Sampler::NoPayload { primitive, .. } => Some(primitive.universe_size()),
            Sampler::Trivial { value, .. } => value.universe_size(),
            Sampler::Tagged { payload, .. } => payload.universe_size(),
        }
    }

    /// Upper bound on the number of distinct first halves of drawn pairs.
    ///
    /// Falls back to [`universe_size`](Self::universe_size), which bounds the
    /// keys of any pair-valued sampler.
    pub fn key_universe_size(&self) -> Option<u128> {
        match self.payload() {
            Some(Payload::Pair { first, .. }) => first.universe_size(),
            Some(Payload::Cast { target, inner }) => {
                let bound = match target {
                    ValueKind::Pair(key, _) => kind_universe_size(key),
                    _ => None,
                };
                narrowed(inner.key_universe_size(), bound)
            }
            _ => self.universe_size(),
        }
    }

    /// Draws one value.
    pub fn draw<E: Engine>(&self, engine: &mut E) -> Value {
        match self {
            Sampler::NoPayload { primitive, .. } => draw_primitive(engine, *primitive),
            Sampler::Trivial { value, .. } => value.draw(engine),
            Sampler::Tagged { payload, .. } => payload.draw(engine),
        }
    }
}

impl Verbatim {
    fn kind(&self) -> ValueKind {
        match self {
            Verbatim::Collection(collection) => collection.element_kind(),
            Verbatim::Interval { kind, .. }
            | Verbatim::Normal { kind, .. }
            | Verbatim::Exponential { kind, .. } => kind.clone(),
            Verbatim::Bernoulli { .. } => ValueKind::Bool,
        }
    }

    fn universe_size(&self) -> Option<u128> {
        match self {
            Verbatim::Collection(collection) => collection.universe_size(),
            Verbatim::Bernoulli { p } => Some(bernoulli_support(*p)),
            _ => None,
        }
    }

    fn draw<E: Engine>(&self, engine: &mut E) -> Value {
        match self {
            Verbatim::Collection(collection) => draw_from_collection(engine, collection),
            Verbatim::Interval { kind, interval } => draw_interval(engine, kind, *interval),
            Verbatim::Normal {
                kind,
                mean,
                std_dev,
            } => {
                let z: f64 = StandardNormal.sample(engine);
                float_value(kind, mean + std_dev * z)
            }
            Verbatim::Exponential { kind, rate } => {
                let e: f64 = Exp1.sample(engine);
                float_value(kind, e / rate)
            }
            Verbatim::Bernoulli { p } => Value::Bool(engine.gen_bool(*p)),
        }
    }
}

impl Payload {
    /// Kind of the values drawn.
    pub fn kind(&self) -> ValueKind {
        match self {
            Payload::IntRange { .. } => ValueKind::Int(IntWidth::W64),
            Payload::UIntRange { .. } => ValueKind::UInt(IntWidth::W64),
            Payload::FloatRange { .. } => ValueKind::Float64,
            Payload::Choice { values, .. } | Payload::Alias { values, .. } => common_kind(values),
            Payload::CharChoice { .. } => ValueKind::Char,
            Payload::Normal { kind, .. } | Payload::Exponential { kind, .. } => kind.clone(),
            Payload::Bernoulli { .. } => ValueKind::Bool,
            Payload::Cast { target, .. } => target.clone(),
            Payload::Pair { kind, .. } => kind.clone(),
            Payload::Text { .. } => ValueKind::Str,
            Payload::Custom(custom) => custom.kind.clone(),
        }
    }

    fn universe_size(&self) -> Option<u128> {
        match self {
            Payload::IntRange { low, high, .. } => {
                Some((i128::from(*high) - i128::from(*low) + 1) as u128)
            }
            Payload::UIntRange { low, high, .. } => {
                Some(u128::from(*high) - u128::from(*low) + 1)
            }
            Payload::FloatRange { .. } | Payload::Normal { .. } | Payload::Exponential { .. } => {
                None
            }
            Payload::Choice { values, .. } => Some(values.len() as u128),
            Payload::CharChoice { chars, .. } => Some(chars.len() as u128),
            Payload::Alias { support, .. } => Some(*support as u128),
            Payload::Bernoulli { p, .. } => Some(bernoulli_support(*p)),
            // Narrowing conversions can merge values but never split them.
            Payload::Cast { target, inner } => {
                narrowed(inner.universe_size(), kind_universe_size(target))
            }
            Payload::Pair { first, second, .. } => first
                .universe_size()?
                .checked_mul(second.universe_size()?),
            Payload::Text { alphabet, len } => {
                let len = u32::try_from(*len).ok()?;
                alphabet.universe_size()?.checked_pow(len)
            }
            Payload::Custom(custom) => custom.algorithm.universe_size(custom.state.as_ref()),
        }
    }

    fn draw<E: Engine>(&self, engine: &mut E) -> Value {
        match self {
            Payload::IntRange { uniform, .. } => Value::Int(uniform.sample(engine)),
            Payload::UIntRange { uniform, .. } => Value::UInt(uniform.sample(engine)),
            Payload::FloatRange { uniform } => Value::Float64(uniform.sample(engine)),
            Payload::Choice { values, index } => values[index.sample(engine)].clone(),
            Payload::CharChoice { chars, index } => Value::Char(chars[index.sample(engine)]),
            Payload::Alias { values, table, .. } => values[table.sample(engine)].clone(),
            Payload::Normal { kind, normal } => float_value(kind, normal.sample(engine)),
            Payload::Exponential { kind, exp } => float_value(kind, exp.sample(engine)),
            Payload::Bernoulli { bernoulli, .. } => Value::Bool(bernoulli.sample(engine)),
            Payload::Cast { target, inner } => inner.draw(engine).coerce(target),
            Payload::Pair { first, second, .. } => {
                let first = first.draw(engine);
                let second = second.draw(engine);
                Value::Pair(Box::new(first), Box::new(second))
            }
            Payload::Text { alphabet, len } => {
                let mut text = String::with_capacity(*len);
                for _ in 0..*len {
                    match alphabet.draw(engine) {
                        Value::Char(c) => text.push(c),
                        Value::Str(token) => text.push_str(&token),
                        other => text.push_str(&other.to_string()),
                    }
                }
                Value::Str(text)
            }
            Payload::Custom(custom) => custom.algorithm.draw(engine, custom.state.as_ref()),
        }
    }
}

/// Number of distinct values of `kind`, when it is finite and known.
fn kind_universe_size(kind: &ValueKind) -> Option<u128> {
    match kind {
        ValueKind::Pair(first, second) => {
            kind_universe_size(first)?.checked_mul(kind_universe_size(second)?)
        }
        other => other.as_primitive().map(Primitive::universe_size),
    }
}

fn narrowed(inner: Option<u128>, bound: Option<u128>) -> Option<u128> {
    match (inner, bound) {
        (Some(inner), Some(bound)) => Some(inner.min(bound)),
        (inner, bound) => inner.or(bound),
    }
}

fn bernoulli_support(p: f64) -> u128 {
    if p == 0.0 || p == 1.0 {
        1
    } else {
        2
    }
}

fn float_value(kind: &ValueKind, x: f64) -> Value {
    match kind {
        ValueKind::Float32 => Value::Float32(x as f32),
        _ => Value::Float64(x),
    }
}

/// Draws a primitive from raw engine bits.
pub(crate) fn draw_primitive<E: Engine>(engine: &mut E, primitive: Primitive) -> Value {
    match primitive {
        Primitive::Bool => Value::Bool(engine.next_bits(1) == 1),
        Primitive::Int(width) => {
            let bits = width.bits();
            let shift = 64 - bits;
            // Sign-extend from the top bit of the drawn width.
            Value::Int(((engine.next_bits(bits) << shift) as i64) >> shift)
        }
        Primitive::UInt(width) => Value::UInt(engine.next_bits(width.bits())),
        Primitive::Float32 => Value::Float32(engine.gen()),
        Primitive::Float64 => Value::Float64(engine.gen()),
        Primitive::Char => Value::Char(engine.gen()),
    }
}

fn draw_interval<E: Engine>(engine: &mut E, kind: &ValueKind, interval: Interval) -> Value {
    if matches!(kind, ValueKind::Float32) {
        let x: f32 = match interval {
            Interval::CloseOpen01 => engine.gen(),
            Interval::CloseOpen12 => f32::from_bits(0x3F80_0000 | engine.next_bits(23) as u32),
            Interval::OpenClosed01 => OpenClosed01.sample(engine),
            Interval::Open01 => Open01.sample(engine),
        };
        Value::Float32(x)
    } else {
        let x: f64 = match interval {
            Interval::CloseOpen01 => engine.gen(),
            Interval::CloseOpen12 => f64::from_bits(0x3FF0_0000_0000_0000 | engine.next_bits(52)),
            Interval::OpenClosed01 => OpenClosed01.sample(engine),
            Interval::Open01 => Open01.sample(engine),
        };
        Value::Float64(x)
    }
}

/// One-shot draw from a validated collection.
fn draw_from_collection<E: Engine>(engine: &mut E, collection: &Collection) -> Value {
    match collection {
        Collection::IntRange(range) => Value::Int(engine.gen_range(range.clone())),
        Collection::UIntRange(range) => Value::UInt(engine.gen_range(range.clone())),
        Collection::FloatRange { low, high } => Value::Float64(engine.gen_range(*low..*high)),
        Collection::Values(values) => values[engine.gen_range(0..values.len())].clone(),
        Collection::Chars(chars) => Value::Char(chars[engine.gen_range(0..chars.len())]),
        Collection::Weighted { values, weights } => {
            // Linear scan: building an alias table does not pay off for one draw.
            let total: f64 = weights.iter().sum();
            let mut remaining = engine.gen::<f64>() * total;
            for (value, weight) in values.iter().zip(weights.iter()) {
                if remaining < *weight {
                    return value.clone();
                }
                remaining -= weight;
            }
            let last = weights.iter().rposition(|w| *w > 0.0).unwrap_or(0);
            values[last].clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sampler_core::StdEngine;

    #[test]
    fn test_primitive_widths() {
        let mut engine = StdEngine::from_seed(42);
        for _ in 0..200 {
            match draw_primitive(&mut engine, Primitive::Int(IntWidth::W8)) {
                Value::Int(i) => assert!((-128..=127).contains(&i)),
                other => panic!("unexpected {:?}", other),
            }
            match draw_primitive(&mut engine, Primitive::UInt(IntWidth::W16)) {
                Value::UInt(u) => assert!(u <= u64::from(u16::MAX)),
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn test_signed_draws_cover_negatives() {
        let mut engine = StdEngine::from_seed(7);
        let negatives = (0..200)
            .filter(|_| {
                matches!(draw_primitive(&mut engine, Primitive::Int(IntWidth::W32)), Value::Int(i) if i < 0)
            })
            .count();
        assert!(negatives > 50 && negatives < 150);
    }

    #[test]
    fn test_interval_bounds() {
        let mut engine = StdEngine::from_seed(3);
        for _ in 0..500 {
            match draw_interval(&mut engine, &ValueKind::Float64, Interval::CloseOpen12) {
                Value::Float64(x) => assert!((1.0..2.0).contains(&x)),
                other => panic!("unexpected {:?}", other),
            }
            match draw_interval(&mut engine, &ValueKind::Float32, Interval::CloseOpen12) {
                Value::Float32(x) => assert!((1.0..2.0).contains(&x)),
                other => panic!("unexpected {:?}", other),
            }
            match draw_interval(&mut engine, &ValueKind::Float64, Interval::OpenClosed01) {
                Value::Float64(x) => assert!(x > 0.0 && x <= 1.0),
                other => panic!("unexpected {:?}", other),
            }
            match draw_interval(&mut engine, &ValueKind::Float64, Interval::Open01) {
                Value::Float64(x) => assert!(x > 0.0 && x < 1.0),
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn test_one_shot_weighted_skips_zero_weights() {
        let mut engine = StdEngine::from_seed(11);
        let collection = Collection::weighted([("never", 0.0), ("always", 1.0), ("nope", 0.0)]);
        for _ in 0..100 {
            assert_eq!(
                draw_from_collection(&mut engine, &collection),
                Value::Str("always".to_string())
            );
        }
    }

    #[test]
    fn test_universe_sizes() {
        let bool_sampler = Sampler::no_payload(Primitive::Bool, Repetition::Many);
        assert_eq!(bool_sampler.universe_size(), Some(2));

        let trivial = Sampler::trivial(
            Verbatim::Collection(Collection::IntRange(1..=10)),
            Repetition::Single,
        );
        assert_eq!(trivial.universe_size(), Some(10));
        assert_eq!(trivial.shape_name(), "trivial");

        let narrowed = Sampler::tagged(
            Payload::Cast {
                target: ValueKind::UInt(IntWidth::W8),
                inner: Sampler::tagged(
                    Payload::IntRange {
                        low: 1,
                        high: 1000,
                        uniform: Uniform::new_inclusive(1, 1000),
                    },
                    Repetition::Many,
                ),
            },
            Repetition::Many,
        );
        assert_eq!(narrowed.universe_size(), Some(256));

        let unbounded = Sampler::tagged(
            Payload::Cast {
                target: ValueKind::Int(IntWidth::W8),
                inner: Sampler::tagged(
                    Payload::FloatRange {
                        uniform: Uniform::new(0.0, 1000.0),
                    },
                    Repetition::Many,
                ),
            },
            Repetition::Many,
        );
        assert_eq!(unbounded.universe_size(), Some(256));
    }

    #[test]
    fn test_key_universe_of_pairs() {
        let keys = Sampler::tagged(
            Payload::IntRange {
                low: 1,
                high: 3,
                uniform: Uniform::new_inclusive(1, 3),
            },
            Repetition::Many,
        );
        let pair = Sampler::tagged(
            Payload::Pair {
                kind: ValueKind::pair(ValueKind::Int(IntWidth::W64), ValueKind::Float64),
                first: keys,
                second: Sampler::no_payload(Primitive::Float64, Repetition::Many),
            },
            Repetition::Many,
        );
        assert_eq!(pair.key_universe_size(), Some(3));
        assert_eq!(pair.universe_size(), Some(3 * (1u128 << 53)));
    }

    #[test]
    fn test_cast_narrows_pair_keys() {
        let keys = Sampler::tagged(
            Payload::IntRange {
                low: 1,
                high: 1000,
                uniform: Uniform::new_inclusive(1, 1000),
            },
            Repetition::Many,
        );
        let pair = Sampler::tagged(
            Payload::Pair {
                kind: ValueKind::pair(ValueKind::Int(IntWidth::W64), ValueKind::Bool),
                first: keys,
                second: Sampler::no_payload(Primitive::Bool, Repetition::Many),
            },
            Repetition::Many,
        );
        let narrowed = Sampler::tagged(
            Payload::Cast {
                target: ValueKind::pair(ValueKind::UInt(IntWidth::W8), ValueKind::Bool),
                inner: pair,
            },
            Repetition::Many,
        );
        assert_eq!(narrowed.key_universe_size(), Some(256));
        assert_eq!(narrowed.universe_size(), Some(512));
    }
}
