//! Sampling configuration.
//!
//! This module provides [`SamplingConfig`] and its builder. The configuration
//! carries the knobs the generation algorithms consult at resolution time:
//! default string length, the dimension guard, and the safety valves for
//! distinct-element filling.

use crate::error::ConfigError;

/// Length of strings drawn for a bare `String` request.
pub const DEFAULT_STRING_LENGTH: usize = 8;

/// Default upper bound on the number of elements one call may generate.
pub const DEFAULT_MAX_ELEMENTS: usize = u32::MAX as usize;

/// Sampling configuration.
///
/// Immutable configuration consulted by the resolution protocol and the
/// collection generators. Use [`SamplingConfigBuilder`] to construct
/// instances.
///
/// # Examples
///
/// ```rust
/// use sampler_core::SamplingConfig;
///
/// let config = SamplingConfig::builder()
///     .seed(42)
///     .string_length(12)
///     .distinct_attempt_limit(10_000)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.seed(), Some(42));
/// assert_eq!(config.string_length(), 12);
/// assert!(config.check_universe());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SamplingConfig {
    /// Seed for the thread default engine.
    seed: Option<u64>,
    /// Length of strings drawn for a bare `String` request.
    string_length: usize,
    /// Upper bound on generated elements per call.
    max_elements: usize,
    /// Reject distinct fills whose known universe is too small.
    check_universe: bool,
    /// Give up distinct filling after this many draws.
    distinct_attempt_limit: Option<u64>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            seed: None,
            string_length: DEFAULT_STRING_LENGTH,
            max_elements: DEFAULT_MAX_ELEMENTS,
            check_universe: true,
            distinct_attempt_limit: None,
        }
    }
}

impl SamplingConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SamplingConfigBuilder {
        SamplingConfigBuilder::default()
    }

    /// Returns the seed for the thread default engine, if any.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the length of strings drawn for a bare `String` request.
    #[inline]
    pub fn string_length(&self) -> usize {
        self.string_length
    }

    /// Returns the upper bound on generated elements per call.
    #[inline]
    pub fn max_elements(&self) -> usize {
        self.max_elements
    }

    /// Returns whether distinct fills check the sampler's universe up front.
    #[inline]
    pub fn check_universe(&self) -> bool {
        self.check_universe
    }

    /// Returns the draw limit for distinct filling (`None` retries forever).
    #[inline]
    pub fn distinct_attempt_limit(&self) -> Option<u64> {
        self.distinct_attempt_limit
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `string_length` is 0
    /// - `max_elements` is 0
    /// - `distinct_attempt_limit` is `Some(0)`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.string_length == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "string_length",
                value: "must be positive".to_string(),
            });
        }
        if self.max_elements == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_elements",
                value: "must be positive".to_string(),
            });
        }
        if self.distinct_attempt_limit == Some(0) {
            return Err(ConfigError::InvalidParameter {
                name: "distinct_attempt_limit",
                value: "must be positive when set".to_string(),
            });
        }
        Ok(())
    }

    /// Parses and validates a configuration from TOML text.
    ///
    /// Missing keys take their default values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sampler_core::SamplingConfig;
    ///
    /// let config = SamplingConfig::from_toml_str("seed = 7\nstring_length = 4\n").unwrap();
    /// assert_eq!(config.seed(), Some(7));
    /// assert_eq!(config.string_length(), 4);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::InvalidParameter`] for values rejected by [`validate`](Self::validate).
    #[cfg(feature = "serde")]
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SamplingConfig =
            toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Builder for [`SamplingConfig`].
///
/// Provides a fluent API with validation at build time.
#[derive(Clone, Debug, Default)]
pub struct SamplingConfigBuilder {
    seed: Option<u64>,
    string_length: Option<usize>,
    max_elements: Option<usize>,
    check_universe: Option<bool>,
    distinct_attempt_limit: Option<u64>,
}

impl SamplingConfigBuilder {
    /// Sets the seed for the thread default engine.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the length of strings drawn for a bare `String` request.
    #[inline]
    pub fn string_length(mut self, len: usize) -> Self {
        self.string_length = Some(len);
        self
    }

    /// Sets the upper bound on generated elements per call.
    #[inline]
    pub fn max_elements(mut self, max: usize) -> Self {
        self.max_elements = Some(max);
        self
    }

    /// Enables or disables the up-front universe check for distinct fills.
    #[inline]
    pub fn check_universe(mut self, enabled: bool) -> Self {
        self.check_universe = Some(enabled);
        self
    }

    /// Sets the draw limit for distinct filling.
    #[inline]
    pub fn distinct_attempt_limit(mut self, limit: u64) -> Self {
        self.distinct_attempt_limit = Some(limit);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when validation fails (see [`SamplingConfig::validate`]).
    pub fn build(self) -> Result<SamplingConfig, ConfigError> {
        let defaults = SamplingConfig::default();
        let config = SamplingConfig {
            seed: self.seed,
            string_length: self.string_length.unwrap_or(defaults.string_length),
            max_elements: self.max_elements.unwrap_or(defaults.max_elements),
            check_universe: self.check_universe.unwrap_or(defaults.check_universe),
            distinct_attempt_limit: self.distinct_attempt_limit,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SamplingConfig::default();
        assert_eq!(config.seed(), None);
        assert_eq!(config.string_length(), DEFAULT_STRING_LENGTH);
        assert_eq!(config.max_elements(), DEFAULT_MAX_ELEMENTS);
        assert!(config.check_universe());
        assert_eq!(config.distinct_attempt_limit(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = SamplingConfig::builder()
            .seed(9)
            .max_elements(100)
            .check_universe(false)
            .build()
            .unwrap();
        assert_eq!(config.seed(), Some(9));
        assert_eq!(config.max_elements(), 100);
        assert!(!config.check_universe());
    }

    #[test]
    fn test_builder_rejects_invalid_values() {
        let err = SamplingConfig::builder().string_length(0).build().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "string_length",
                ..
            }
        ));

        let err = SamplingConfig::builder()
            .distinct_attempt_limit(0)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("distinct_attempt_limit"));

        assert!(SamplingConfig::builder().max_elements(0).build().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_toml_str() {
        let config = SamplingConfig::from_toml_str(
            "seed = 42\ncheck_universe = false\ndistinct_attempt_limit = 500\n",
        )
        .unwrap();
        assert_eq!(config.seed(), Some(42));
        assert!(!config.check_universe());
        assert_eq!(config.distinct_attempt_limit(), Some(500));
        assert_eq!(config.string_length(), DEFAULT_STRING_LENGTH);

        assert!(matches!(
            SamplingConfig::from_toml_str("seed = \"x\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SamplingConfig::from_toml_str("string_length = 0"),
            Err(ConfigError::InvalidParameter { .. })
        ));
    }
}
