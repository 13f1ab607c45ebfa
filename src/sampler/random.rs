//! Random sampler implementation.

use parking_lot::Mutex;

use crate::distribution::Distribution;
use crate::error::Result;
use crate::param::ParamValue;
use crate::sampler::common::sample_random;
use crate::sampler::{IndependentSampler, Sampler};
use crate::search_space::{Configuration, SearchSpace};
use crate::storage::PreferenceStore;

/// A simple random sampler that samples uniformly from distributions.
///
/// This sampler ignores the preference history and samples uniformly at
/// random, respecting log scale and step size constraints. It is the default
/// fallback of [`PreferentialGpSampler`](super::PreferentialGpSampler) and a
/// baseline for comparison.
///
/// # Examples
///
/// ```
/// use pref_optimizer::sampler::RandomSampler;
///
/// // Create with default RNG
/// let sampler = RandomSampler::new();
///
/// // Create with a fixed seed for reproducibility
/// let sampler = RandomSampler::with_seed(42);
/// ```
pub struct RandomSampler {
    rng: Mutex<fastrand::Rng>,
}

impl RandomSampler {
    /// Creates a new random sampler with a default random seed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    /// Creates a new random sampler with a fixed seed for reproducibility.
    ///
    /// Using the same seed will produce the same sequence of sampled values.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
        }
    }
}

impl Default for RandomSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl IndependentSampler for RandomSampler {
    fn sample_independent(&self, _name: &str, distribution: &Distribution) -> ParamValue {
        sample_random(&mut self.rng.lock(), distribution)
    }
}

impl Sampler for RandomSampler {
    type State = ();

    fn new_state(&self) -> Self::State {}

    fn infer_relative_search_space(&self, _storage: &dyn PreferenceStore) -> SearchSpace {
        SearchSpace::new()
    }

    fn sample_relative(
        &self,
        _state: &mut Self::State,
        _storage: &dyn PreferenceStore,
        _search_space: &SearchSpace,
    ) -> Result<Configuration> {
        Ok(Configuration::new())
    }

    fn sample_independent(
        &self,
        _state: &mut Self::State,
        name: &str,
        distribution: &Distribution,
    ) -> ParamValue {
        IndependentSampler::sample_independent(self, name, distribution)
    }
}
