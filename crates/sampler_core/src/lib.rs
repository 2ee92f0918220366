//! # sampler_core: Foundation for the Sampler Framework
//!
//! ## Layer 1 (Foundation) Role
//!
//! sampler_core is the bottom layer of the workspace, providing:
//! - The engine contract and its adapters (`engine`)
//! - The thread-local default engine lifecycle (`engine`)
//! - The runtime value model: `ValueKind`, `Value`, `Primitive`, `FromValue` (`value`)
//! - The repetition hint used during sampler resolution (`repetition`)
//! - Error types: `SamplingError`, `ConfigError` (`error`)
//! - Configuration: `SamplingConfig` and its builder (`config`)
//!
//! The sampler protocol and the generation algorithms live in `sampler_gen`.
//!
//! ## Usage Example
//!
//! ```rust
//! use sampler_core::engine::{Engine, StdEngine};
//! use sampler_core::{FromValue, Value, ValueKind};
//!
//! let mut engine = StdEngine::from_seed(42);
//! let bits = engine.next_bits(12);
//! assert!(bits < 4096);
//!
//! let value = Value::pair(7i64, "seven");
//! assert_eq!(value.kind().to_string(), "Pair<Int64, String>");
//! let (n, s) = <(i64, String)>::from_value(value).unwrap();
//! assert_eq!((n, s.as_str()), (7, "seven"));
//! # let _ = ValueKind::Any;
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: serialisation for `SamplingConfig` and `Repetition`, plus TOML loading

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod config;
pub mod engine;
pub mod error;
pub mod repetition;
pub mod value;

pub use config::{SamplingConfig, SamplingConfigBuilder};
pub use engine::{Engine, FastEngine, StdEngine};
pub use error::{ConfigError, Result, SamplingError};
pub use repetition::Repetition;
pub use value::{FromValue, IntWidth, Primitive, Value, ValueKind};
