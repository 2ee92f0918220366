//! Distribution descriptors.
//!
//! A [`Distribution`] pairs an output kind with a [`Shape`] describing how
//! values are produced. Kinds with holes (`Any`, pairs containing `Any`) are
//! filled in from the parameters' element kinds when the descriptor is built,
//! so `Distribution::pair(1..=1000i64, names)` reports `Pair<Int64, String>`.

use sampler_core::{Value, ValueKind};

use crate::request::{Collection, Request};

/// Floating-point unit intervals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interval {
    /// `[0, 1)`
    CloseOpen01,
    /// `[1, 2)`, built directly from mantissa bits.
    CloseOpen12,
    /// `(0, 1]`
    OpenClosed01,
    /// `(0, 1)`
    Open01,
}

/// How a distribution produces its values.
#[derive(Clone, Debug)]
pub enum Shape {
    /// No parameters: values are drawn as for a bare kind request.
    Bare,
    /// Values drawn from one parameter request and converted to the output kind.
    Unary(Request),
    /// Pair values whose halves come from two parameter requests.
    Binary(Request, Request),
    /// Uniform floats over a unit interval.
    Uniform(Interval),
    /// Gaussian deviates.
    Normal {
        /// Mean.
        mean: f64,
        /// Standard deviation, non-negative.
        std_dev: f64,
    },
    /// Exponential deviates.
    Exponential {
        /// Rate parameter, positive.
        rate: f64,
    },
    /// Booleans that are `true` with probability `p`.
    Bernoulli {
        /// Success probability in `[0, 1]`.
        p: f64,
    },
    /// Strings of `len` elements drawn from `alphabet`.
    Text {
        /// Characters (or string tokens) to draw from.
        alphabet: Collection,
        /// Number of elements per string.
        len: usize,
    },
    /// A user algorithm registered by name.
    Custom {
        /// Registry key.
        name: String,
        /// Parameters handed to the algorithm at resolution.
        params: Vec<Value>,
    },
}

/// A distribution descriptor: output kind plus shape.
///
/// # Examples
///
/// ```rust
/// use sampler_gen::{Collection, Distribution};
///
/// let names = Collection::values(["alice", "bob"]);
/// let dist = Distribution::pair(1..=1000i64, names);
/// assert_eq!(dist.kind().to_string(), "Pair<Int64, String>");
/// ```
#[derive(Clone, Debug)]
pub struct Distribution {
    kind: ValueKind,
    shape: Shape,
}

impl Distribution {
    /// Values of `kind`, drawn as for a bare kind request.
    pub fn of(kind: ValueKind) -> Self {
        Self {
            kind,
            shape: Shape::Bare,
        }
    }

    /// Values drawn from `param` and converted to `target`.
    ///
    /// Holes in `target` are filled from the parameter's element kind.
    pub fn unary(target: ValueKind, param: impl Into<Request>) -> Self {
        let param = param.into();
        let kind = target.refine(&[param.element_kind()]);
        Self {
            kind,
            shape: Shape::Unary(param),
        }
    }

    /// Pair values of kind `target` with halves drawn from `first` and `second`.
    pub fn binary(target: ValueKind, first: impl Into<Request>, second: impl Into<Request>) -> Self {
        let first = first.into();
        let second = second.into();
        let kind = target.refine(&[first.element_kind(), second.element_kind()]);
        Self {
            kind,
            shape: Shape::Binary(first, second),
        }
    }

    /// Pairs whose kind is deduced from both parameters.
    pub fn pair(first: impl Into<Request>, second: impl Into<Request>) -> Self {
        Self::binary(ValueKind::abstract_pair(), first, second)
    }

    /// Uniform floats of `kind` (`Float32` or `Float64`) over `interval`.
    pub fn interval(kind: ValueKind, interval: Interval) -> Self {
        Self {
            kind,
            shape: Shape::Uniform(interval),
        }
    }

    /// `Float64` deviates from N(`mean`, `std_dev`²).
    pub fn normal(mean: f64, std_dev: f64) -> Self {
        Self {
            kind: ValueKind::Float64,
            shape: Shape::Normal { mean, std_dev },
        }
    }

    /// `Float64` exponential deviates with the given rate.
    pub fn exponential(rate: f64) -> Self {
        Self {
            kind: ValueKind::Float64,
            shape: Shape::Exponential { rate },
        }
    }

    /// Booleans, `true` with probability `p`.
    pub fn bernoulli(p: f64) -> Self {
        Self {
            kind: ValueKind::Bool,
            shape: Shape::Bernoulli { p },
        }
    }

    /// Strings of `len` elements drawn from `alphabet`.
    pub fn text(alphabet: Collection, len: usize) -> Self {
        Self {
            kind: ValueKind::Str,
            shape: Shape::Text { alphabet, len },
        }
    }

    /// Alphanumeric strings of `len` characters.
    pub fn alphanumeric(len: usize) -> Self {
        Self::text(Collection::alphanumeric(), len)
    }

    /// Values produced by the algorithm registered under `name`.
    pub fn custom(name: impl Into<String>, kind: ValueKind, params: Vec<Value>) -> Self {
        Self {
            kind,
            shape: Shape::Custom {
                name: name.into(),
                params,
            },
        }
    }

    /// Replaces the output kind, e.g. `Float32` normal deviates.
    pub fn with_kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }

    /// Output kind.
    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    /// Shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }
}
