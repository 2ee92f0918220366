//! The resolution protocol: turning a request into a [`Sampler`].
//!
//! Rules, in order of precedence:
//!
//! 1. A request that already is a sampler is reused when its repetition
//!    matches, and rejected otherwise.
//! 2. Bare kinds: primitives get a no-payload sampler; strings, pairs and
//!    named kinds get tagged samplers; abstract kinds are unsupported.
//! 3. Collections are validated, then kept verbatim for single draws or
//!    precomputed (uniform ranges, alias tables) for many.
//! 4. Distributions dispatch on their shape. Registered algorithms are found
//!    by name.
//!
//! Anything else is reported as [`SamplingError::UnsupportedRequest`].

use std::sync::Arc;

use rand::distributions::{Bernoulli, Uniform};
use rand_distr::{Exp, Normal, WeightedAliasIndex};
use sampler_core::{Repetition, Result, SamplingError, Value, ValueKind};

use crate::context::SamplingContext;
use crate::distribution::{Distribution, Shape};
use crate::request::{Collection, Request};
use crate::sampler::{CustomPayload, Payload, Sampler, Verbatim};

impl SamplingContext {
    /// Resolves `request` into a sampler for the given repetition class.
    ///
    /// Resolution validates parameters and performs all precomputation, so
    /// drawing from the result cannot fail.
    ///
    /// # Arguments
    ///
    /// * `request` - Kind, collection, distribution or already resolved sampler
    /// * `repetition` - Whether the sampler serves one draw or many
    ///
    /// # Returns
    ///
    /// A sampler that can be cloned, shared across threads and drawn from
    /// with any engine.
    ///
    /// # Errors
    ///
    /// - [`SamplingError::RepetitionMismatch`] when a sampler resolved for the
    ///   other repetition class is passed in
    /// - [`SamplingError::UnsupportedRequest`] for abstract kinds, unregistered
    ///   names and shapes that do not apply to the requested kind
    /// - [`SamplingError::InvalidParameter`] for empty collections and
    ///   out-of-domain distribution parameters
    /// - [`SamplingError::TypeMismatch`] when parameter values cannot be
    ///   converted to the requested kind
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sampler_core::{Repetition, StdEngine, Value};
    /// use sampler_gen::{Collection, Request, SamplingContext};
    ///
    /// let context = SamplingContext::default();
    /// let request = Request::from(Collection::weighted([("heads", 1.0), ("tails", 3.0)]));
    ///
    /// let sampler = context.resolve(&request, Repetition::Many).unwrap();
    /// assert_eq!(sampler.shape_name(), "tagged");
    ///
    /// let mut engine = StdEngine::from_seed(1);
    /// assert!(matches!(sampler.draw(&mut engine), Value::Str(_)));
    /// ```
    pub fn resolve(&self, request: &Request, repetition: Repetition) -> Result<Sampler> {
        let sampler = match request {
            Request::Sampler(sampler) => return reuse(sampler, repetition),
            Request::Type(kind) => self.resolve_kind(kind, repetition)?,
            Request::Collection(collection) => resolve_collection(collection, repetition)?,
            Request::Distribution(distribution) => {
                self.resolve_distribution(distribution, repetition)?
            }
        };
        tracing::debug!(
            kind = %sampler.kind(),
            shape = sampler.shape_name(),
            %repetition,
            "resolved sampler"
        );
        Ok(sampler)
    }

    fn resolve_kind(&self, kind: &ValueKind, repetition: Repetition) -> Result<Sampler> {
        if let Some(primitive) = kind.as_primitive() {
            return Ok(Sampler::no_payload(primitive, repetition));
        }
        match kind {
            ValueKind::Str => resolve_text(
                &Collection::alphanumeric(),
                self.config().string_length(),
                repetition,
            ),
            ValueKind::Pair(first, second) if kind.is_concrete() => {
                let first = self.resolve_kind(first, repetition)?;
                let second = self.resolve_kind(second, repetition)?;
                Ok(Sampler::tagged(
                    Payload::Pair {
                        kind: kind.clone(),
                        first,
                        second,
                    },
                    repetition,
                ))
            }
            ValueKind::Named(name) => self.resolve_custom(name, kind, &[], repetition),
            _ => Err(SamplingError::unsupported(
                kind.clone(),
                repetition,
                "abstract kinds need parameters to deduce a concrete kind",
            )),
        }
    }

    fn resolve_distribution(
        &self,
        distribution: &Distribution,
        repetition: Repetition,
    ) -> Result<Sampler> {
        let kind = distribution.kind();
        match distribution.shape() {
            Shape::Bare => self.resolve_kind(kind, repetition),
            Shape::Unary(param) => self.resolve_unary(kind, param, repetition),
            Shape::Binary(first, second) => {
                let first = self.resolve(first, repetition)?;
                let second = self.resolve(second, repetition)?;
                pair_of(kind, first, second, repetition)
            }
            Shape::Uniform(interval) => {
                require_float(kind, repetition)?;
                Ok(Sampler::trivial(
                    Verbatim::Interval {
                        kind: kind.clone(),
                        interval: *interval,
                    },
                    repetition,
                ))
            }
            Shape::Normal { mean, std_dev } => {
                require_float(kind, repetition)?;
                if !mean.is_finite() {
                    return Err(SamplingError::invalid_parameter(
                        "mean",
                        format!("{} is not finite", mean),
                    ));
                }
                if !(std_dev.is_finite() && *std_dev >= 0.0) {
                    return Err(SamplingError::invalid_parameter(
                        "std_dev",
                        format!("{} is not a finite non-negative number", std_dev),
                    ));
                }
                if repetition.is_single() {
                    return Ok(Sampler::trivial(
                        Verbatim::Normal {
                            kind: kind.clone(),
                            mean: *mean,
                            std_dev: *std_dev,
                        },
                        repetition,
                    ));
                }
                let normal = Normal::new(*mean, *std_dev)
                    .map_err(|e| SamplingError::invalid_parameter("std_dev", e.to_string()))?;
                Ok(Sampler::tagged(
                    Payload::Normal {
                        kind: kind.clone(),
                        normal,
                    },
                    repetition,
                ))
            }
            Shape::Exponential { rate } => {
                require_float(kind, repetition)?;
                if !(rate.is_finite() && *rate > 0.0) {
                    return Err(SamplingError::invalid_parameter(
                        "rate",
                        format!("{} is not a finite positive number", rate),
                    ));
                }
                if repetition.is_single() {
                    return Ok(Sampler::trivial(
                        Verbatim::Exponential {
                            kind: kind.clone(),
                            rate: *rate,
                        },
                        repetition,
                    ));
                }
                let exp = Exp::new(*rate)
                    .map_err(|e| SamplingError::invalid_parameter("rate", e.to_string()))?;
                Ok(Sampler::tagged(
                    Payload::Exponential {
                        kind: kind.clone(),
                        exp,
                    },
                    repetition,
                ))
            }
            Shape::Bernoulli { p } => {
                if *kind != ValueKind::Bool {
                    return Err(SamplingError::unsupported(
                        kind.clone(),
                        repetition,
                        "Bernoulli trials produce Bool",
                    ));
                }
                if !(0.0..=1.0).contains(p) {
                    return Err(SamplingError::invalid_parameter(
                        "p",
                        format!("{} is outside [0, 1]", p),
                    ));
                }
                if repetition.is_single() {
                    return Ok(Sampler::trivial(Verbatim::Bernoulli { p: *p }, repetition));
                }
                let bernoulli = Bernoulli::new(*p)
                    .map_err(|e| SamplingError::invalid_parameter("p", e.to_string()))?;
                Ok(Sampler::tagged(
                    Payload::Bernoulli { p: *p, bernoulli },
                    repetition,
                ))
            }
            Shape::Text { alphabet, len } => resolve_text(alphabet, *len, repetition),
            Shape::Custom { name, params } => {
                let sampler = self.resolve_custom(name, kind, params, repetition)?;
                match kind {
                    ValueKind::Named(_) => Ok(sampler),
                    declared => cast(declared, sampler, repetition),
                }
            }
        }
    }

    fn resolve_unary(
        &self,
        target: &ValueKind,
        param: &Request,
        repetition: Repetition,
    ) -> Result<Sampler> {
        let inner = self.resolve(param, repetition)?;
        match (target, inner.kind()) {
            // A pair target fed by a single non-pair source draws both halves from it.
            (ValueKind::Pair(..), source) if !matches!(source, ValueKind::Pair(..) | ValueKind::Any) => {
                pair_of(target, inner.clone(), inner, repetition)
            }
            _ => cast(target, inner, repetition),
        }
    }

    fn resolve_custom(
        &self,
        name: &str,
        kind: &ValueKind,
        params: &[Value],
        repetition: Repetition,
    ) -> Result<Sampler> {
        let algorithm = self.registry().get(name).cloned().ok_or_else(|| {
            SamplingError::unsupported(
                kind.clone(),
                repetition,
                format!("no algorithm registered under '{}'", name),
            )
        })?;
        let state = algorithm.resolve(params, repetition)?;
        tracing::trace!(name, %repetition, "custom algorithm resolved");
        Ok(Sampler::tagged(
            Payload::Custom(CustomPayload {
                name: name.to_string(),
                kind: algorithm.kind(),
                algorithm,
                state,
            }),
            repetition,
        ))
    }
}

fn reuse(sampler: &Sampler, repetition: Repetition) -> Result<Sampler> {
    if sampler.repetition() == repetition {
        Ok(sampler.clone())
    } else {
        Err(SamplingError::RepetitionMismatch {
            resolved: sampler.repetition(),
            requested: repetition,
        })
    }
}

fn require_float(kind: &ValueKind, repetition: Repetition) -> Result<()> {
    match kind {
        ValueKind::Float32 | ValueKind::Float64 => Ok(()),
        other => Err(SamplingError::unsupported(
            other.clone(),
            repetition,
            "continuous distributions produce Float32 or Float64",
        )),
    }
}

/// Wraps `sampler` so its values are converted to `target`.
fn cast(target: &ValueKind, sampler: Sampler, repetition: Repetition) -> Result<Sampler> {
    let source = sampler.kind();
    if matches!(target, ValueKind::Any) || *target == source {
        return Ok(sampler);
    }
    if !target.accepts(&source) {
        return Err(SamplingError::TypeMismatch {
            expected: target.clone(),
            found: source,
        });
    }
    // Mixed collections report `Any`; their candidates are checked one by one.
    if let Some(values) = candidates(&sampler) {
        if let Some(value) = values.iter().find(|v| !target.accepts(&v.kind())) {
            return Err(SamplingError::TypeMismatch {
                expected: target.clone(),
                found: value.kind(),
            });
        }
    }
    Ok(Sampler::tagged(
        Payload::Cast {
            target: target.clone(),
            inner: sampler,
        },
        repetition,
    ))
}

/// Candidate values held by a collection-backed sampler.
fn candidates(sampler: &Sampler) -> Option<&[Value]> {
    match sampler {
        Sampler::Trivial { value, .. } => match &**value {
            Verbatim::Collection(Collection::Values(values))
            | Verbatim::Collection(Collection::Weighted { values, .. }) => Some(&values[..]),
            _ => None,
        },
        Sampler::Tagged { payload, .. } => match &**payload {
            Payload::Choice { values, .. } | Payload::Alias { values, .. } => Some(&values[..]),
            _ => None,
        },
        Sampler::NoPayload { .. } => None,
    }
}

fn pair_of(
    kind: &ValueKind,
    first: Sampler,
    second: Sampler,
    repetition: Repetition,
) -> Result<Sampler> {
    let ValueKind::Pair(first_kind, second_kind) = kind else {
        return Err(SamplingError::unsupported(
            kind.clone(),
            repetition,
            "two-parameter distributions are defined for pair kinds only",
        ));
    };
    let first = cast(first_kind, first, repetition)?;
    let second = cast(second_kind, second, repetition)?;
    Ok(Sampler::tagged(
        Payload::Pair {
            kind: kind.clone(),
            first,
            second,
        },
        repetition,
    ))
}

fn resolve_text(alphabet: &Collection, len: usize, repetition: Repetition) -> Result<Sampler> {
    let element = alphabet.element_kind();
    if !matches!(element, ValueKind::Char | ValueKind::Str) {
        return Err(SamplingError::TypeMismatch {
            expected: ValueKind::Char,
            found: element,
        });
    }
    // Every string draws `len` elements, so the alphabet always serves many draws.
    let alphabet = resolve_collection(alphabet, Repetition::Many)?;
    Ok(Sampler::tagged(Payload::Text { alphabet, len }, repetition))
}

fn resolve_collection(collection: &Collection, repetition: Repetition) -> Result<Sampler> {
    validate_collection(collection)?;
    if repetition.is_single() {
        return Ok(Sampler::trivial(
            Verbatim::Collection(collection.clone()),
            repetition,
        ));
    }
    let payload = match collection {
        Collection::IntRange(range) => Payload::IntRange {
            low: *range.start(),
            high: *range.end(),
            uniform: Uniform::new_inclusive(*range.start(), *range.end()),
        },
        Collection::UIntRange(range) => Payload::UIntRange {
            low: *range.start(),
            high: *range.end(),
            uniform: Uniform::new_inclusive(*range.start(), *range.end()),
        },
        Collection::FloatRange { low, high } => Payload::FloatRange {
            uniform: Uniform::new(*low, *high),
        },
        Collection::Values(values) => Payload::Choice {
            values: Arc::clone(values),
            index: Uniform::new(0, values.len()),
        },
        Collection::Chars(chars) => Payload::CharChoice {
            chars: Arc::clone(chars),
            index: Uniform::new(0, chars.len()),
        },
        Collection::Weighted { values, weights } => {
            let table = WeightedAliasIndex::new(weights.to_vec())
                .map_err(|e| SamplingError::invalid_parameter("weights", e.to_string()))?;
            Payload::Alias {
                values: Arc::clone(values),
                table,
                support: weights.iter().filter(|w| **w > 0.0).count(),
            }
        }
    };
    Ok(Sampler::tagged(payload, repetition))
}

/// Rejects parameters the `rand` constructors would panic on.
fn validate_collection(collection: &Collection) -> Result<()> {
    match collection {
        Collection::IntRange(range) if range.start() > range.end() => Err(
            SamplingError::invalid_parameter("range", format!("{:?} is empty", range)),
        ),
        Collection::UIntRange(range) if range.start() > range.end() => Err(
            SamplingError::invalid_parameter("range", format!("{:?} is empty", range)),
        ),
        Collection::FloatRange { low, high } => {
            if low.is_finite() && high.is_finite() && low < high && (high - low).is_finite() {
                Ok(())
            } else {
                Err(SamplingError::invalid_parameter(
                    "range",
                    format!("[{}, {}) is not a finite non-empty interval", low, high),
                ))
            }
        }
        Collection::Values(values) if values.is_empty() => Err(SamplingError::invalid_parameter(
            "values",
            "collection is empty",
        )),
        Collection::Chars(chars) if chars.is_empty() => Err(SamplingError::invalid_parameter(
            "chars",
            "alphabet is empty",
        )),
        Collection::Weighted { values, weights } => {
            if values.len() != weights.len() {
                return Err(SamplingError::invalid_parameter(
                    "weights",
                    format!("{} weights for {} values", weights.len(), values.len()),
                ));
            }
            if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(SamplingError::invalid_parameter(
                    "weights",
                    "weights must be finite and non-negative",
                ));
            }
            if !weights.iter().any(|w| *w > 0.0) {
                return Err(SamplingError::invalid_parameter(
                    "weights",
                    "at least one weight must be positive",
                ));
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
