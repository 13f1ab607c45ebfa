//! Sampler traits and implementations.
//!
//! A [`Sampler`] proposes configurations in two steps: a *relative* step that
//! jointly models the parameters every judged configuration shares, and an
//! *independent* step for whatever parameters are left. Samplers that keep a
//! model between calls expose it as an explicit [`Sampler::State`] owned by
//! the caller, so one sampler value can drive several studies without
//! cross-talk and the state can be checkpointed.

pub(crate) mod common;
pub mod preferential;
pub mod random;

pub use preferential::{PreferentialGpSampler, PreferentialGpSamplerBuilder, PreferentialState};
pub use random::RandomSampler;

use crate::distribution::Distribution;
use crate::error::Result;
use crate::param::ParamValue;
use crate::search_space::{Configuration, SearchSpace};
use crate::storage::PreferenceStore;

/// Trait for pluggable sampling strategies.
///
/// The trait requires `Send + Sync` so a sampler can be shared between
/// threads; all per-study mutable state lives in [`Self::State`].
pub trait Sampler: Send + Sync {
    /// Mutable model state carried between calls.
    type State: Send;

    /// Creates the state for a fresh study.
    fn new_state(&self) -> Self::State;

    /// The search space to model jointly, derived from the store.
    fn infer_relative_search_space(&self, storage: &dyn PreferenceStore) -> SearchSpace;

    /// Proposes values for `search_space` jointly.
    ///
    /// An empty configuration asks the caller to sample every parameter
    /// independently.
    ///
    /// # Errors
    ///
    /// Implementation specific; see the implementing type.
    fn sample_relative(
        &self,
        state: &mut Self::State,
        storage: &dyn PreferenceStore,
        search_space: &SearchSpace,
    ) -> Result<Configuration>;

    /// Samples one parameter outside the relative search space.
    fn sample_independent(
        &self,
        state: &mut Self::State,
        name: &str,
        distribution: &Distribution,
    ) -> ParamValue;
}

/// Stateless per-parameter sampling, used as a fallback by model-based
/// samplers.
pub trait IndependentSampler: Send + Sync {
    /// Samples a value for the parameter `name`.
    fn sample_independent(&self, name: &str, distribution: &Distribution) -> ParamValue;
}
