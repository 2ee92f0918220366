//! Sampling context: configuration plus the algorithm registry.
//!
//! Every generation entry point is a method on [`SamplingContext`]. The
//! crate-level convenience functions use [`default_context`], which has an
//! empty registry and the default configuration.

use std::sync::OnceLock;

use sampler_core::engine::init_default_engine;
use sampler_core::{Result, SamplingConfig, SamplingError};

use crate::registry::{Algorithm, Registry};

/// Configuration and registered algorithms used by resolution.
///
/// # Examples
///
/// ```rust
/// use sampler_core::{SamplingConfig, StdEngine};
/// use sampler_gen::{Request, SamplingContext};
///
/// let config = SamplingConfig::builder().string_length(4).build().unwrap();
/// let context = SamplingContext::new(config);
///
/// let mut engine = StdEngine::from_seed(42);
/// let word: String = context.draw_as(&mut engine, &Request::of::<String>()).unwrap();
/// assert_eq!(word.chars().count(), 4);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SamplingContext {
    config: SamplingConfig,
    registry: Registry,
}

impl SamplingContext {
    /// Creates a context with an empty registry.
    pub fn new(config: SamplingConfig) -> Self {
        Self {
            config,
            registry: Registry::new(),
        }
    }

    /// Replaces the registry.
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Registers `algorithm` under `name`.
    pub fn with_algorithm(mut self, name: impl Into<String>, algorithm: impl Algorithm + 'static) -> Self {
        self.registry.register(name, algorithm);
        self
    }

    /// Configuration in effect.
    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    /// Registered algorithms.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access to the registry.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Seeds this thread's default engine from the configured seed.
    ///
    /// Returns the seed applied, or `None` when no seed is configured.
    pub fn apply_seed(&self) -> Option<u64> {
        self.config.seed().map(|seed| init_default_engine(Some(seed)))
    }

    /// Number of elements in an array of shape `dims`, checked against
    /// overflow and the configured limit.
    pub(crate) fn element_count(&self, dims: &[usize]) -> Result<usize> {
        let count = dims
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
            .ok_or_else(|| SamplingError::InvalidDimensions {
                dims: dims.to_vec(),
                reason: "element count overflows usize".to_string(),
            })?;
        if count > self.config.max_elements() {
            return Err(SamplingError::InvalidDimensions {
                dims: dims.to_vec(),
                reason: format!(
                    "{} elements exceed the limit of {}",
                    count,
                    self.config.max_elements()
                ),
            });
        }
        Ok(count)
    }
}

/// Process-wide context used by the crate-level convenience functions.
pub fn default_context() -> &'static SamplingContext {
    static CONTEXT: OnceLock<SamplingContext> = OnceLock::new();
    CONTEXT.get_or_init(SamplingContext::default)
}
