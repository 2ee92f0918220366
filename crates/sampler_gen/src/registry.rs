//! Registry of user-supplied sampling algorithms.
//!
//! Requests for [`ValueKind::Named`] kinds and `Distribution::custom`
//! descriptors are resolved by looking the name up here. An [`Algorithm`]
//! precomputes whatever state it needs in [`Algorithm::resolve`]; that state
//! is stored in the resolved sampler and handed back on every draw.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use sampler_core::{Engine, Repetition, Result, Value, ValueKind};

/// Precomputed state of a custom algorithm.
pub type AlgorithmState = Arc<dyn Any + Send + Sync>;

/// A user-defined sampling algorithm.
///
/// # Examples
///
/// ```rust
/// use std::any::Any;
/// use std::sync::Arc;
///
/// use rand::Rng;
/// use sampler_core::{Engine, IntWidth, Repetition, Result, Value, ValueKind};
/// use sampler_gen::{Algorithm, AlgorithmState};
///
/// /// Rolls `n` six-sided dice and sums them.
/// struct Dice;
///
/// impl Algorithm for Dice {
///     fn kind(&self) -> ValueKind {
///         ValueKind::Int(IntWidth::W64)
///     }
///
///     fn resolve(&self, params: &[Value], _repetition: Repetition) -> Result<AlgorithmState> {
///         let n = match params.first() {
///             Some(Value::Int(n)) => *n,
///             _ => 1,
///         };
///         Ok(Arc::new(n))
///     }
///
///     fn draw(&self, engine: &mut dyn Engine, state: &(dyn Any + Send + Sync)) -> Value {
///         let n = state.downcast_ref::<i64>().copied().unwrap_or(1);
///         Value::Int((0..n).map(|_| engine.gen_range(1..=6i64)).sum())
///     }
/// }
/// ```
pub trait Algorithm: Send + Sync {
    /// Kind of the values produced.
    fn kind(&self) -> ValueKind;

    /// Validates `params` and precomputes the state used by every draw.
    ///
    /// Called once per resolution. `repetition` tells whether the sampler
    /// will serve one draw or many, so costly tables can be skipped for
    /// single draws.
    fn resolve(&self, params: &[Value], repetition: Repetition) -> Result<AlgorithmState>;

    /// Produces one value.
    fn draw(&self, engine: &mut dyn Engine, state: &(dyn Any + Send + Sync)) -> Value;

    /// Upper bound on distinct values, when known.
    fn universe_size(&self, _state: &(dyn Any + Send + Sync)) -> Option<u128> {
        None
    }
}

/// Named algorithms available to resolution.
#[derive(Clone, Default)]
pub struct Registry {
    rules: HashMap<String, Arc<dyn Algorithm>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `algorithm` under `name`, returning any algorithm it replaces.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        algorithm: impl Algorithm + 'static,
    ) -> Option<Arc<dyn Algorithm>> {
        self.register_shared(name, Arc::new(algorithm))
    }

    /// Registers an already shared algorithm.
    pub fn register_shared(
        &mut self,
        name: impl Into<String>,
        algorithm: Arc<dyn Algorithm>,
    ) -> Option<Arc<dyn Algorithm>> {
        let name = name.into();
        tracing::debug!(name = %name, kind = %algorithm.kind(), "registering algorithm");
        self.rules.insert(name, algorithm)
    }

    /// Looks up an algorithm.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Algorithm>> {
        self.rules.get(name)
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Number of registered algorithms.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("rules", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sampler_core::IntWidth;

    struct Constant(i64);

    impl Algorithm for Constant {
        fn kind(&self) -> ValueKind {
            ValueKind::Int(IntWidth::W64)
        }

        fn resolve(&self, _params: &[Value], _repetition: Repetition) -> Result<AlgorithmState> {
            Ok(Arc::new(()))
        }

        fn draw(&self, _engine: &mut dyn Engine, _state: &(dyn Any + Send + Sync)) -> Value {
            Value::Int(self.0)
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());

        assert!(registry.register("seven", Constant(7)).is_none());
        assert!(registry.register("one", Constant(1)).is_none());
        assert!(registry.contains("seven"));
        assert!(!registry.contains("eight"));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["one", "seven"]);

        let replaced = registry.register("seven", Constant(8));
        assert!(replaced.is_some());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_debug_lists_names() {
        let mut registry = Registry::new();
        registry.register("dice", Constant(3));
        assert_eq!(format!("{:?}", registry), r#"Registry { rules: ["dice"] }"#);
    }
}
