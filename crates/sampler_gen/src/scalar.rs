//! Scalar draws.
//!
//! A scalar draw resolves its request for a single draw, so collections and
//! distributions skip their precomputation.

use std::borrow::Cow;

use sampler_core::engine::with_default_engine;
use sampler_core::{Engine, FromValue, Repetition, Result, Value, ValueKind};

use crate::context::{default_context, SamplingContext};
use crate::distribution::Distribution;
use crate::request::Request;
use crate::sampler::Sampler;

impl SamplingContext {
    /// Draws one value.
    ///
    /// # Errors
    ///
    /// Propagates resolution errors (see [`SamplingContext::resolve`]).
    pub fn draw<E: Engine>(&self, engine: &mut E, request: &Request) -> Result<Value> {
        let sampler = self.resolve(request, Repetition::Single)?;
        Ok(sampler.draw(engine))
    }

    /// Draws one value converted to `T`.
    ///
    /// Requests whose element kind differs from `T`'s are wrapped in a
    /// conversion, so `draw_as::<u8, _>(engine, &(1..=6i64).into())` works.
    pub fn draw_as<T: FromValue, E: Engine>(&self, engine: &mut E, request: &Request) -> Result<T> {
        let request = typed_request::<T>(request);
        T::from_value(self.draw(engine, &request)?)
    }
}

/// Wraps `request` in a conversion to `T`'s kind when the kinds differ.
pub(crate) fn typed_request<T: FromValue>(request: &Request) -> Cow<'_, Request> {
    let target = T::kind();
    if matches!(target, ValueKind::Any) || target == request.element_kind() {
        Cow::Borrowed(request)
    } else {
        Cow::Owned(Request::from(Distribution::unary(target, request.clone())))
    }
}

/// Resolves `request` with the default context.
pub fn resolve(request: &Request, repetition: Repetition) -> Result<Sampler> {
    default_context().resolve(request, repetition)
}

/// Draws one value from this thread's default engine.
///
/// # Examples
///
/// ```rust
/// use sampler_core::engine::init_default_engine;
/// use sampler_core::Value;
///
/// init_default_engine(Some(42));
/// let first = sampler_gen::draw(&(1..=10i64).into()).unwrap();
///
/// init_default_engine(Some(42));
/// assert_eq!(sampler_gen::draw(&(1..=10i64).into()).unwrap(), first);
/// assert!(matches!(first, Value::Int(1..=10)));
/// ```
pub fn draw(request: &Request) -> Result<Value> {
    let sampler = default_context().resolve(request, Repetition::Single)?;
    Ok(with_default_engine(|engine| sampler.draw(engine)))
}

/// Draws one value converted to `T` from this thread's default engine.
pub fn draw_as<T: FromValue>(request: &Request) -> Result<T> {
    let request = typed_request::<T>(request);
    T::from_value(draw(&request)?)
}

/// Draws one value from `engine` with the default context.
pub fn draw_with<E: Engine>(engine: &mut E, request: &Request) -> Result<Value> {
    default_context().draw(engine, request)
}
