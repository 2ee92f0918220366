//! # sampler_gen: Sampler Protocol and Generation Algorithms
//!
//! ## Layer 2 (Generation) Role
//!
//! sampler_gen builds on `sampler_core` and provides:
//! - Request shapes: bare kinds, collections, distributions (`request`, `distribution`)
//! - The resolution protocol producing reusable samplers (`resolve`, `sampler`)
//! - A registry for user algorithms (`registry`)
//! - Scalar draws, array fills and dense arrays (`scalar`, `fill`, `dense`)
//! - Distinct sets and maps (`distinct`)
//! - Sparse vectors and matrices, strings and bit arrays (`sparse`, `text`, `bits`)
//!
//! ## Resolve Once, Draw Many
//!
//! Every entry point resolves its request into a [`Sampler`] before drawing.
//! Single draws keep parameters verbatim; bulk operations precompute uniform
//! ranges and alias tables once and share them across all draws. Resolution
//! is where every error surfaces; drawing from a resolved sampler never fails.
//!
//! ## Usage Example
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use sampler_core::StdEngine;
//! use sampler_gen::{Collection, Distribution, Request, SamplingContext};
//!
//! let context = SamplingContext::default();
//! let mut engine = StdEngine::from_seed(42);
//!
//! let mut rolls = [0u8; 10];
//! context.fill_as(&mut engine, &mut rolls, &Request::from(1..=6i64)).unwrap();
//! assert!(rolls.iter().all(|r| (1..=6).contains(r)));
//!
//! let names = Collection::values(["ada", "grace", "edsger"]);
//! let ids: HashMap<i64, String> = context
//!     .distinct(&mut engine, 3, &Distribution::pair(1..=1000i64, names).into())
//!     .unwrap();
//! assert_eq!(ids.len(), 3);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod bits;
pub mod context;
pub mod dense;
pub mod distinct;
pub mod distribution;
pub mod fill;
pub mod registry;
pub mod request;
mod resolve;
pub mod sampler;
pub mod scalar;
pub mod sparse;
pub mod text;

pub use bits::{fill_bits, BitArray};
pub use context::{default_context, SamplingContext};
pub use dense::DenseArray;
pub use distinct::DistinctCollection;
pub use distribution::{Distribution, Interval, Shape};
pub use registry::{Algorithm, AlgorithmState, Registry};
pub use request::{Collection, Request, ALPHANUMERIC};
pub use sampler::{Payload, Sampler, Verbatim};
pub use scalar::{draw, draw_as, draw_with, resolve};
pub use sparse::{SparseMatrix, SparseVector};
