//! Array filling and generation.
//!
//! The request is resolved once, for many draws, before the first element
//! is written; each element then costs one draw from the shared sampler.

use sampler_core::{Engine, FromValue, Repetition, Result, Value};

use crate::context::SamplingContext;
use crate::dense::DenseArray;
use crate::request::Request;
use crate::scalar::typed_request;

impl SamplingContext {
    /// Overwrites every element of `out` with a draw from `request`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sampler_core::{StdEngine, Value};
    /// use sampler_gen::{Request, SamplingContext};
    ///
    /// let mut engine = StdEngine::from_seed(5);
    /// let mut out = vec![Value::Bool(false); 4];
    /// SamplingContext::default()
    ///     .fill(&mut engine, &mut out, &(1..=3i64).into())
    ///     .unwrap();
    /// assert!(out.iter().all(|v| matches!(v, Value::Int(1..=3))));
    /// ```
    pub fn fill<E: Engine>(&self, engine: &mut E, out: &mut [Value], request: &Request) -> Result<()> {
        self.fill_as(engine, out, request)
    }

    /// Overwrites every element of `out` with a draw converted to `T`.
    ///
    /// The request is wrapped in a conversion to `T`'s kind and resolved
    /// once for many draws. Conversion problems surface at resolution, so on
    /// error `out` is left untouched.
    ///
    /// # Arguments
    ///
    /// * `engine` - Source of randomness
    /// * `out` - Slice to overwrite, in iteration order
    /// * `request` - Request producing the values
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sampler_core::StdEngine;
    /// use sampler_gen::{Request, SamplingContext};
    ///
    /// let mut engine = StdEngine::from_seed(7);
    /// let mut faces = [0u8; 20];
    /// SamplingContext::default()
    ///     .fill_as(&mut engine, &mut faces, &Request::from(1..=6i64))
    ///     .unwrap();
    /// assert!(faces.iter().all(|f| (1..=6).contains(f)));
    /// ```
    ///
    /// # Errors
    ///
    /// Propagates resolution errors (see [`SamplingContext::resolve`]),
    /// including [`SamplingError::TypeMismatch`](sampler_core::SamplingError::TypeMismatch)
    /// when the request's values cannot become `T`.
    pub fn fill_as<T: FromValue, E: Engine>(
        &self,
        engine: &mut E,
        out: &mut [T],
        request: &Request,
    ) -> Result<()> {
        let request = typed_request::<T>(request);
        let sampler = self.resolve(&request, Repetition::Many)?;
        for slot in out.iter_mut() {
            *slot = T::from_value(sampler.draw(engine))?;
        }
        tracing::trace!(len = out.len(), kind = %sampler.kind(), "array filled");
        Ok(())
    }

    /// Fills `out` with values of `T`'s own kind.
    pub fn fill_default<T: FromValue, E: Engine>(&self, engine: &mut E, out: &mut [T]) -> Result<()> {
        self.fill_as(engine, out, &Request::of::<T>())
    }

    /// Allocates and fills an array of shape `dims`.
    ///
    /// An empty shape yields a single element.
    ///
    /// # Errors
    ///
    /// Returns [`SamplingError::InvalidDimensions`](sampler_core::SamplingError::InvalidDimensions)
    /// when the element count overflows or exceeds the configured limit,
    /// before anything is resolved or drawn.
    pub fn generate<E: Engine>(
        &self,
        engine: &mut E,
        request: &Request,
        dims: &[usize],
    ) -> Result<DenseArray<Value>> {
        self.generate_as(engine, request, dims)
    }

    /// Allocates and fills an array of `T` with shape `dims`.
    pub fn generate_as<T: FromValue, E: Engine>(
        &self,
        engine: &mut E,
        request: &Request,
        dims: &[usize],
    ) -> Result<DenseArray<T>> {
        let count = self.element_count(dims)?;
        let request = typed_request::<T>(request);
        let sampler = self.resolve(&request, Repetition::Many)?;
        let data = (0..count)
            .map(|_| T::from_value(sampler.draw(engine)))
            .collect::<Result<Vec<T>>>()?;
        Ok(DenseArray::from_parts(dims.to_vec(), data))
    }
}
