//! Runtime value model: kinds, values and typed extraction.
//!
//! [`ValueKind`] describes *what* a request produces and is the closed set of
//! "type" wrappers the distribution model deduces over. [`Value`] is the
//! matching runtime representation handed out by every sampler, and
//! [`FromValue`] converts values back into ordinary Rust types.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Result, SamplingError};

/// Bit width of a fixed-width integer kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IntWidth {
    /// 8-bit integer.
    W8,
    /// 16-bit integer.
    W16,
    /// 32-bit integer.
    W32,
    /// 64-bit integer.
    W64,
}

impl IntWidth {
    /// Number of bits in this width.
    #[inline]
    pub fn bits(self) -> u32 {
        match self {
            IntWidth::W8 => 8,
            IntWidth::W16 => 16,
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
        }
    }
}

/// Descriptor of a value kind.
///
/// `Any` marks an abstract hole that type deduction fills in from the
/// parameters of a distribution; a kind without holes is *concrete*.
///
/// # Examples
///
/// ```rust
/// use sampler_core::{IntWidth, ValueKind};
///
/// let deduced = ValueKind::abstract_pair()
///     .refine(&[ValueKind::Int(IntWidth::W64), ValueKind::Str]);
/// assert_eq!(deduced, ValueKind::pair(ValueKind::Int(IntWidth::W64), ValueKind::Str));
/// assert_eq!(deduced.to_string(), "Pair<Int64, String>");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Abstract kind, refined from parameters.
    Any,
    /// Boolean.
    Bool,
    /// Signed integer of the given width.
    Int(IntWidth),
    /// Unsigned integer of the given width.
    UInt(IntWidth),
    /// Single-precision float.
    Float32,
    /// Double-precision float.
    Float64,
    /// Unicode scalar value.
    Char,
    /// Owned string.
    Str,
    /// Key/value pair.
    Pair(Box<ValueKind>, Box<ValueKind>),
    /// User-defined kind served by a registered algorithm.
    Named(String),
}

impl ValueKind {
    /// Builds a pair kind.
    pub fn pair(first: ValueKind, second: ValueKind) -> Self {
        ValueKind::Pair(Box::new(first), Box::new(second))
    }

    /// A pair whose halves are still to be deduced.
    pub fn abstract_pair() -> Self {
        ValueKind::pair(ValueKind::Any, ValueKind::Any)
    }

    /// Returns `true` when no abstract hole remains.
    pub fn is_concrete(&self) -> bool {
        match self {
            ValueKind::Any => false,
            ValueKind::Pair(first, second) => first.is_concrete() && second.is_concrete(),
            _ => true,
        }
    }

    /// Returns `true` for integer and float kinds.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ValueKind::Int(_) | ValueKind::UInt(_) | ValueKind::Float32 | ValueKind::Float64
        )
    }

    /// Deduces a concrete kind from the element kinds of up to two parameters.
    ///
    /// A concrete kind is returned unchanged. Otherwise holes are filled
    /// positionally, left to right: `Any` takes the first parameter, a pair
    /// takes its first half from the first parameter and its second half from
    /// the second. A pair given a single parameter takes the parameter's
    /// halves when it is itself a pair, or both halves from it otherwise.
    pub fn refine(&self, params: &[ValueKind]) -> ValueKind {
        if self.is_concrete() {
            return self.clone();
        }
        match (self, params) {
            (_, []) => self.clone(),
            (ValueKind::Any, [first, ..]) => first.clone(),
            (ValueKind::Pair(first, second), [ValueKind::Pair(p, q)]) => ValueKind::pair(
                first.refine(std::slice::from_ref(p.as_ref())),
                second.refine(std::slice::from_ref(q.as_ref())),
            ),
            (ValueKind::Pair(first, second), [only]) => ValueKind::pair(
                first.refine(std::slice::from_ref(only)),
                second.refine(std::slice::from_ref(only)),
            ),
            (ValueKind::Pair(first, second), [p, q, ..]) => ValueKind::pair(
                first.refine(std::slice::from_ref(p)),
                second.refine(std::slice::from_ref(q)),
            ),
            _ => self.clone(),
        }
    }

    /// Returns `true` when values of `source` can be coerced into `self`.
    ///
    /// Abstract and named sources are accepted since their runtime values are
    /// only known at draw time.
    pub fn accepts(&self, source: &ValueKind) -> bool {
        match (self, source) {
            (ValueKind::Any, _) | (_, ValueKind::Any) | (_, ValueKind::Named(_)) => true,
            (ValueKind::Bool, ValueKind::Bool) => true,
            (target, ValueKind::Bool) if target.is_numeric() => true,
            (target, source) if target.is_numeric() && source.is_numeric() => true,
            (ValueKind::Char, ValueKind::Char) => true,
            (ValueKind::Str, ValueKind::Str | ValueKind::Char) => true,
            (ValueKind::Pair(a, b), ValueKind::Pair(c, d)) => a.accepts(c) && b.accepts(d),
            _ => false,
        }
    }

    /// Returns the primitive this kind maps onto, if any.
    pub fn as_primitive(&self) -> Option<Primitive> {
        match self {
            ValueKind::Bool => Some(Primitive::Bool),
            ValueKind::Int(width) => Some(Primitive::Int(*width)),
            ValueKind::UInt(width) => Some(Primitive::UInt(*width)),
            ValueKind::Float32 => Some(Primitive::Float32),
            ValueKind::Float64 => Some(Primitive::Float64),
            ValueKind::Char => Some(Primitive::Char),
            _ => None,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Any => write!(f, "Any"),
            ValueKind::Bool => write!(f, "Bool"),
            ValueKind::Int(width) => write!(f, "Int{}", width.bits()),
            ValueKind::UInt(width) => write!(f, "UInt{}", width.bits()),
            ValueKind::Float32 => write!(f, "Float32"),
            ValueKind::Float64 => write!(f, "Float64"),
            ValueKind::Char => write!(f, "Char"),
            ValueKind::Str => write!(f, "String"),
            ValueKind::Pair(first, second) => write!(f, "Pair<{}, {}>", first, second),
            ValueKind::Named(name) => write!(f, "{}", name),
        }
    }
}

/// Kinds whose sampling algorithm is fully determined by the kind itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Fair coin.
    Bool,
    /// Full-range signed integer.
    Int(IntWidth),
    /// Full-range unsigned integer.
    UInt(IntWidth),
    /// Uniform in [0, 1).
    Float32,
    /// Uniform in [0, 1).
    Float64,
    /// Uniform over Unicode scalar values.
    Char,
}

impl Primitive {
    /// The value kind produced.
    pub fn kind(self) -> ValueKind {
        match self {
            Primitive::Bool => ValueKind::Bool,
            Primitive::Int(width) => ValueKind::Int(width),
            Primitive::UInt(width) => ValueKind::UInt(width),
            Primitive::Float32 => ValueKind::Float32,
            Primitive::Float64 => ValueKind::Float64,
            Primitive::Char => ValueKind::Char,
        }
    }

    /// Number of distinct values the primitive's algorithm can yield.
    pub fn universe_size(self) -> u128 {
        match self {
            Primitive::Bool => 2,
            Primitive::Int(width) | Primitive::UInt(width) => 1u128 << width.bits(),
            // 24 and 53 mantissa bits are consumed per unit-interval float.
            Primitive::Float32 => 1u128 << 24,
            Primitive::Float64 => 1u128 << 53,
            // Scalar values exclude the 2048 surrogates.
            Primitive::Char => 0x11_0000 - 0x800,
        }
    }
}

/// A generated value.
///
/// Floats compare and hash by bit pattern, so values of every kind can be
/// stored in hash sets and used as map keys.
#[derive(Clone, Debug)]
pub enum Value {
    /// Boolean.
    Bool(bool),
    /// Signed integer (narrow widths are stored sign-extended).
    Int(i64),
    /// Unsigned integer (narrow widths are stored zero-extended).
    UInt(u64),
    /// Single-precision float.
    Float32(f32),
    /// Double-precision float.
    Float64(f64),
    /// Unicode scalar value.
    Char(char),
    /// Owned string.
    Str(String),
    /// Key/value pair.
    Pair(Box<Value>, Box<Value>),
}

impl Value {
    /// Builds a pair value.
    pub fn pair(first: impl Into<Value>, second: impl Into<Value>) -> Self {
        Value::Pair(Box::new(first.into()), Box::new(second.into()))
    }

    /// The kind of this value (integers report their 64-bit kinds).
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int(IntWidth::W64),
            Value::UInt(_) => ValueKind::UInt(IntWidth::W64),
            Value::Float32(_) => ValueKind::Float32,
            Value::Float64(_) => ValueKind::Float64,
            Value::Char(_) => ValueKind::Char,
            Value::Str(_) => ValueKind::Str,
            Value::Pair(first, second) => ValueKind::pair(first.kind(), second.kind()),
        }
    }

    fn as_integer(&self) -> Option<i128> {
        match self {
            Value::Bool(b) => Some(i128::from(*b)),
            Value::Int(i) => Some(i128::from(*i)),
            Value::UInt(u) => Some(i128::from(*u)),
            Value::Float32(x) => Some(*x as i128),
            Value::Float64(x) => Some(*x as i128),
            _ => None,
        }
    }

    fn as_float(&self) -> Option<f64> {
        match self {
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Int(i) => Some(*i as f64),
            Value::UInt(u) => Some(*u as f64),
            Value::Float32(x) => Some(f64::from(*x)),
            Value::Float64(x) => Some(*x),
            _ => None,
        }
    }

    /// Converts the value towards `kind`.
    ///
    /// Numeric conversions wrap to the target width, a `Char` becomes a
    /// one-character `String`, and pairs convert element-wise. Values that
    /// have no conversion are returned unchanged; callers validate with
    /// [`ValueKind::accepts`] beforehand.
    pub fn coerce(self, kind: &ValueKind) -> Value {
        match kind {
            ValueKind::Int(width) => match self.as_integer() {
                Some(i) => Value::Int(wrap_signed(i, *width)),
                None => self,
            },
            ValueKind::UInt(width) => match self.as_integer() {
                Some(i) => Value::UInt(wrap_unsigned(i, *width)),
                None => self,
            },
            ValueKind::Float64 => match self.as_float() {
                Some(x) => Value::Float64(x),
                None => self,
            },
            ValueKind::Float32 => match self {
                Value::Float32(_) => self,
                other => match other.as_float() {
                    Some(x) => Value::Float32(x as f32),
                    None => other,
                },
            },
            ValueKind::Str => match self {
                Value::Char(c) => Value::Str(c.to_string()),
                other => other,
            },
            ValueKind::Pair(first_kind, second_kind) => match self {
                Value::Pair(first, second) => Value::Pair(
                    Box::new(first.coerce(first_kind)),
                    Box::new(second.coerce(second_kind)),
                ),
                other => other,
            },
            _ => self,
        }
    }
}

fn wrap_signed(value: i128, width: IntWidth) -> i64 {
    match width {
        IntWidth::W8 => i64::from(value as i8),
        IntWidth::W16 => i64::from(value as i16),
        IntWidth::W32 => i64::from(value as i32),
        IntWidth::W64 => value as i64,
    }
}

fn wrap_unsigned(value: i128, width: IntWidth) -> u64 {
    match width {
        IntWidth::W8 => u64::from(value as u8),
        IntWidth::W16 => u64::from(value as u16),
        IntWidth::W32 => u64::from(value as u32),
        IntWidth::W64 => value as u64,
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Float32(a), Value::Float32(b)) => a.to_bits() == b.to_bits(),
            (Value::Float64(a), Value::Float64(b)) => a.to_bits() == b.to_bits(),
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Pair(a, b), Value::Pair(c, d)) => a == c && b == d,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::UInt(u) => u.hash(state),
            Value::Float32(x) => x.to_bits().hash(state),
            Value::Float64(x) => x.to_bits().hash(state),
            Value::Char(c) => c.hash(state),
            Value::Str(s) => s.hash(state),
            Value::Pair(first, second) => {
                first.hash(state);
                second.hash(state);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::UInt(u) => write!(f, "{}", u),
            Value::Float32(x) => write!(f, "{}", x),
            Value::Float64(x) => write!(f, "{}", x),
            Value::Char(c) => write!(f, "{:?}", c),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Pair(first, second) => write!(f, "{} => {}", first, second),
        }
    }
}

macro_rules! impl_value_from {
    ($($t:ty => $variant:ident as $target:ty),* $(,)?) => {
        $(
            impl From<$t> for Value {
                #[inline]
                fn from(value: $t) -> Self {
                    Value::$variant(<$target>::from(value))
                }
            }
        )*
    };
}

impl_value_from! {
    bool => Bool as bool,
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int as i64,
    u8 => UInt as u64,
    u16 => UInt as u64,
    u32 => UInt as u64,
    u64 => UInt as u64,
    f32 => Float32 as f32,
    f64 => Float64 as f64,
    char => Char as char,
    String => Str as String,
}

impl From<usize> for Value {
    #[inline]
    fn from(value: usize) -> Self {
        Value::UInt(value as u64)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for Value {
    #[inline]
    fn from((first, second): (A, B)) -> Self {
        Value::pair(first, second)
    }
}

/// Conversion from a generated [`Value`] into a Rust type.
///
/// `kind()` tells the protocol which value kind to produce, so typed entry
/// points can validate a request before drawing anything.
pub trait FromValue: Sized {
    /// Kind of values this type is built from.
    fn kind() -> ValueKind;

    /// Converts a value, coercing numeric kinds where needed.
    ///
    /// # Errors
    ///
    /// Returns [`SamplingError::TypeMismatch`] when the value cannot become `Self`.
    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch(expected: ValueKind, found: &Value) -> SamplingError {
    SamplingError::TypeMismatch {
        expected,
        found: found.kind(),
    }
}

impl FromValue for Value {
    fn kind() -> ValueKind {
        ValueKind::Any
    }

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl FromValue for bool {
    fn kind() -> ValueKind {
        ValueKind::Bool
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch(Self::kind(), &other)),
        }
    }
}

macro_rules! impl_from_value_int {
    ($($t:ty => $kind:ident($width:ident) via $variant:ident),* $(,)?) => {
        $(
            impl FromValue for $t {
                fn kind() -> ValueKind {
                    ValueKind::$kind(IntWidth::$width)
                }

                fn from_value(value: Value) -> Result<Self> {
                    match value.coerce(&Self::kind()) {
                        Value::$variant(raw) => <$t>::try_from(raw).map_err(|_| {
                            SamplingError::TypeMismatch {
                                expected: Self::kind(),
                                found: ValueKind::$kind(IntWidth::W64),
                            }
                        }),
                        other => Err(mismatch(Self::kind(), &other)),
                    }
                }
            }
        )*
    };
}

impl_from_value_int! {
    i8 => Int(W8) via Int,
    i16 => Int(W16) via Int,
    i32 => Int(W32) via Int,
    i64 => Int(W64) via Int,
    u8 => UInt(W8) via UInt,
    u16 => UInt(W16) via UInt,
    u32 => UInt(W32) via UInt,
    u64 => UInt(W64) via UInt,
    usize => UInt(W64) via UInt,
}

impl FromValue for f64 {
    fn kind() -> ValueKind {
        ValueKind::Float64
    }

    fn from_value(value: Value) -> Result<Self> {
        match value.coerce(&ValueKind::Float64) {
            Value::Float64(x) => Ok(x),
            other => Err(mismatch(Self::kind(), &other)),
        }
    }
}

impl FromValue for f32 {
    fn kind() -> ValueKind {
        ValueKind::Float32
    }

    fn from_value(value: Value) -> Result<Self> {
        match value.coerce(&ValueKind::Float32) {
            Value::Float32(x) => Ok(x),
            other => Err(mismatch(Self::kind(), &other)),
        }
    }
}

impl FromValue for char {
    fn kind() -> ValueKind {
        ValueKind::Char
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Char(c) => Ok(c),
            other => Err(mismatch(Self::kind(), &other)),
        }
    }
}

impl FromValue for String {
    fn kind() -> ValueKind {
        ValueKind::Str
    }

    fn from_value(value: Value) -> Result<Self> {
        match value.coerce(&ValueKind::Str) {
            Value::Str(s) => Ok(s),
            other => Err(mismatch(Self::kind(), &other)),
        }
    }
}

impl<A: FromValue, B: FromValue> FromValue for (A, B) {
    fn kind() -> ValueKind {
        ValueKind::pair(A::kind(), B::kind())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Pair(first, second) => Ok((A::from_value(*first)?, B::from_value(*second)?)),
            other => Err(mismatch(Self::kind(), &other)),
        }
    }
}
