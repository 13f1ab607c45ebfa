#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Preferential Bayesian optimization: find good configurations from
//! pairwise human judgments ("this one is better than that one") instead of
//! numeric scores.
//!
//! The engine models a latent utility with a Gaussian process, fits it to
//! the recorded preferences with Expectation Propagation, draws one sample
//! of the judged utility differences with an orthant Gibbs sampler, and
//! proposes the next configuration by maximizing log expected improvement.
//!
//! # Getting Started
//!
//! ```
//! use pref_optimizer::prelude::*;
//!
//! let sampler = PreferentialGpSampler::builder()
//!     .max_fit_iters(5)
//!     .raw_samples(64)
//!     .n_restarts(2)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//! let study = PreferentialStudy::new(sampler, 3);
//! let space = SearchSpace::new()
//!     .with(&FloatParam::new("brightness", 0.0, 1.0))
//!     .unwrap();
//!
//! // generate candidates for the evaluator
//! let a = study.ask(&space).unwrap();
//! let b = study.ask(&space).unwrap();
//!
//! // the evaluator preferred `a`
//! study.report_preference(&[a.number], &[b.number]).unwrap();
//!
//! // the next proposal is informed by the judgment
//! let c = study.ask(&space).unwrap();
//! assert!(c.params.contains("brightness"));
//! assert_eq!(study.best_configurations().unwrap()[0].number, a.number);
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`PreferentialStudy`] | Ask for candidates, report preferences and skips, track the best. |
//! | [`SearchSpace`](search_space::SearchSpace) | Ordered name → [`Distribution`] map, built from [`Parameter`](parameter::Parameter)s. |
//! | [`PreferenceStore`](storage::PreferenceStore) | Where configurations and judgments live; [`MemoryStorage`](storage::MemoryStorage) by default. |
//! | [`Sampler`](sampler::Sampler) | Proposes configurations; [`PreferentialGpSampler`](sampler::PreferentialGpSampler) or [`RandomSampler`](sampler::RandomSampler). |
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) at key points of fitting and proposal | on |
//! | `serde` | `Serialize`/`Deserialize` on configurations, records and [`PreferentialState`](sampler::PreferentialState) | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::warn!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_warn {
    ($($arg:tt)*) => { tracing::warn!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_warn {
    ($($arg:tt)*) => {};
}

mod distribution;
mod error;
mod param;
pub mod parameter;
pub mod preference;
mod rng_util;
pub mod sampler;
pub mod search_space;
mod special;
pub mod storage;
mod study;
mod types;

pub use distribution::{CategoricalDistribution, Distribution, FloatDistribution, IntDistribution};
pub use error::{Error, Result};
pub use param::ParamValue;
pub use study::PreferentialStudy;
pub use types::TrialState;

/// Convenient wildcard import for the most common types.
///
/// ```
/// use pref_optimizer::prelude::*;
/// ```
pub mod prelude {
    pub use crate::distribution::Distribution;
    pub use crate::error::{Error, Result};
    pub use crate::param::ParamValue;
    pub use crate::parameter::{BoolParam, CategoricalParam, FloatParam, IntParam, Parameter};
    pub use crate::sampler::preferential::{GammaPrior, KernelKind};
    pub use crate::sampler::{
        IndependentSampler, PreferentialGpSampler, PreferentialState, RandomSampler, Sampler,
    };
    pub use crate::search_space::{Configuration, SearchSpace};
    pub use crate::storage::{ConfigurationRecord, MemoryStorage, PreferenceStore};
    pub use crate::study::PreferentialStudy;
    pub use crate::types::TrialState;
}
