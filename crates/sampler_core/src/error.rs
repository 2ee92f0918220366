//! Error types for sampler resolution and generation.
//!
//! This module provides:
//! - `SamplingError`: errors raised while resolving or applying samplers
//! - `ConfigError`: errors raised while building a `SamplingConfig`
//!
//! Every condition is detected at resolution time or before the first draw;
//! nothing is retried internally and nothing is downgraded to a default value.

use thiserror::Error;

use crate::repetition::Repetition;
use crate::value::ValueKind;

/// Categorised sampling errors.
///
/// # Variants
/// - `UnsupportedRequest`: no strategy is defined for the value kind
/// - `RepetitionMismatch`: a sampler was reused under the other repetition hint
/// - `UniverseTooSmall`: more distinct values requested than can exist
/// - `UniverseExhausted`: distinct filling hit the configured attempt limit
/// - `InvalidDimensions`: malformed array or collection shape
/// - `InvalidParameter`: malformed distribution or collection parameter
/// - `TypeMismatch`: drawn values cannot become the requested type
///
/// # Examples
/// ```
/// use sampler_core::{Repetition, SamplingError, ValueKind};
///
/// let err = SamplingError::UnsupportedRequest {
///     kind: ValueKind::Any,
///     repetition: Repetition::Many,
///     detail: "abstract kind".to_string(),
/// };
/// assert_eq!(
///     err.to_string(),
///     "No sampling strategy defined for Any (many draws): abstract kind"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SamplingError {
    /// No registered rule and no generic fallback for this request.
    #[error("No sampling strategy defined for {kind} ({repetition} draws): {detail}")]
    UnsupportedRequest {
        /// Value kind that was requested.
        kind: ValueKind,
        /// Repetition class that was requested.
        repetition: Repetition,
        /// What was missing.
        detail: String,
    },

    /// A sampler resolved for one repetition class was offered for the other.
    #[error("Sampler resolved for {resolved} draws cannot be reused for {requested} draws")]
    RepetitionMismatch {
        /// Repetition the sampler was resolved for.
        resolved: Repetition,
        /// Repetition requested by the caller.
        requested: Repetition,
    },

    /// The sampler's universe cannot supply the requested number of distinct values.
    #[error("Cannot draw {target} distinct values from a universe of at most {universe}")]
    UniverseTooSmall {
        /// Requested number of distinct values.
        target: usize,
        /// Upper bound on the number of distinct values the sampler yields.
        universe: u128,
    },

    /// Distinct filling gave up after the configured number of draws.
    #[error("Universe exhausted: reached {reached} of {target} distinct values after {attempts} draws")]
    UniverseExhausted {
        /// Requested number of distinct values.
        target: usize,
        /// Distinct values collected before giving up.
        reached: usize,
        /// Draws performed.
        attempts: u64,
    },

    /// Requested array or collection shape is invalid.
    #[error("Invalid dimensions {dims:?}: {reason}")]
    InvalidDimensions {
        /// Offending dimensions.
        dims: Vec<usize>,
        /// Why they were rejected.
        reason: String,
    },

    /// A distribution or collection parameter is invalid.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        reason: String,
    },

    /// Values of `found` cannot be converted into `expected`.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Kind the caller asked for.
        expected: ValueKind,
        /// Kind the request produces.
        found: ValueKind,
    },
}

impl SamplingError {
    /// Shorthand for [`SamplingError::InvalidParameter`].
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        SamplingError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Shorthand for [`SamplingError::UnsupportedRequest`].
    pub fn unsupported(kind: ValueKind, repetition: Repetition, detail: impl Into<String>) -> Self {
        SamplingError::UnsupportedRequest {
            kind,
            repetition,
            detail: detail.into(),
        }
    }
}

/// Configuration error for [`SamplingConfig`](crate::SamplingConfig).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Invalid parameter value with name and description.
    #[error("Invalid configuration parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },

    /// Configuration text could not be parsed.
    #[error("Configuration parse error: {0}")]
    Parse(String),
}

/// Result alias used across the sampler crates.
pub type Result<T, E = SamplingError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampling_error_display() {
        let err = SamplingError::RepetitionMismatch {
            resolved: Repetition::Single,
            requested: Repetition::Many,
        };
        assert!(err.to_string().contains("single draws"));
        assert!(err.to_string().contains("many draws"));

        let err = SamplingError::UniverseTooSmall {
            target: 50,
            universe: 10,
        };
        assert!(err.to_string().contains("50 distinct values"));

        let err = SamplingError::invalid_parameter("density", "must lie in [0, 1]");
        assert_eq!(err.to_string(), "Invalid parameter 'density': must lie in [0, 1]");
    }

    #[test]
    fn test_unsupported_carries_kind_and_repetition() {
        let err = SamplingError::unsupported(
            ValueKind::Named("dice".to_string()),
            Repetition::Single,
            "no algorithm registered",
        );
        let message = err.to_string();
        assert!(message.contains("dice"));
        assert!(message.contains("single"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidParameter {
            name: "string_length",
            value: "must be positive".to_string(),
        };
        assert!(err.to_string().contains("string_length"));
    }
}
