//! Repetition hint used when resolving samplers.

use std::fmt;

/// How many draws a resolved sampler is expected to serve.
///
/// The hint only influences resolution: a request resolved for
/// [`Repetition::Single`] may skip precomputation that would only pay off
/// across many draws, while [`Repetition::Many`] builds whatever tables or
/// thresholds make each subsequent draw cheap.
///
/// # Examples
///
/// ```rust
/// use sampler_core::Repetition;
///
/// assert_eq!(Repetition::default(), Repetition::Many);
/// assert_eq!(Repetition::Single.to_string(), "single");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Repetition {
    /// Exactly one draw.
    Single,

    /// Many or an unknown number of draws.
    ///
    /// This is the conservative default: most entry points exist to be
    /// called from array-filling loops.
    #[default]
    Many,
}

impl Repetition {
    /// Returns `true` for [`Repetition::Single`].
    #[inline]
    pub fn is_single(self) -> bool {
        matches!(self, Repetition::Single)
    }

    /// Returns the hint appropriate for `count` draws.
    #[inline]
    pub fn for_count(count: usize) -> Self {
        if count == 1 {
            Repetition::Single
        } else {
            Repetition::Many
        }
    }
}

impl fmt::Display for Repetition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repetition::Single => write!(f, "single"),
            Repetition::Many => write!(f, "many"),
        }
    }
}
