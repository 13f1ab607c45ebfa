//! Preferential Gaussian-process sampler.
//!
//! Proposes configurations from pairwise human judgments "`a` is better than
//! `b`" instead of numeric objective values. The latent utility `f` gets a
//! GP prior and each judgment is the event `f(a) − f(b) + ε > 0` with
//! Gaussian noise `ε`.
//!
//! # Algorithm overview
//!
//! 1. **Encode** every configuration referenced by a preference into the
//!    unit box of the relative search space.
//! 2. **Fit hyperparameters.** The Matérn lengthscales and the noise
//!    variance are fitted by maximizing the Expectation Propagation (EP)
//!    evidence plus Gamma log-priors, warm-started from the previous call.
//! 3. **Sample the differences.** One draw of the utility differences of
//!    all judgments is taken from the orthant-truncated Gaussian by
//!    continuing a Gibbs chain carried in [`PreferentialState`].
//! 4. **Maximize log-EI** of the GP conditioned on that draw, by enumerating
//!    small discrete spaces or by multi-start L-BFGS on the unit box.
//!
//! Parameters outside the relative search space (the parameters every
//! judged configuration shares) come from the independent sampler.
//!
//! # Configuration
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `kernel` | `Matern32` | Matérn smoothness, ARD lengthscales |
//! | `lengthscale_prior` | Gamma(5, 10) | Prior on each lengthscale |
//! | `noise_prior` | Gamma(5, 50) | Prior on the noise variance |
//! | `ep_cycles` | 2 | EP sweeps per evidence evaluation |
//! | `gibbs_cycles` | 20 | Gibbs sweeps per proposal |
//! | `max_fit_iters` | 100 | Outer hyperparameter steps |
//! | `fit_tolerance` | 1e-3 | Max log-hyperparameter change that stops the fit |
//! | `enumeration_limit` | 1e6 | Largest discrete space scored exhaustively |
//! | `n_restarts` | 10 | L-BFGS restarts for continuous acquisition |
//! | `raw_samples` | 512 | Random candidates ranked to pick the restarts |
//! | `acquisition_max_iters` | 200 | L-BFGS iterations per restart |
//! | `independent_sampler` | [`RandomSampler`] | Fallback for parameters outside the relative space |
//! | `seed` | random | RNG seed for reproducibility |
//!
//! # Examples
//!
//! ```
//! use pref_optimizer::parameter::FloatParam;
//! use pref_optimizer::sampler::{PreferentialGpSampler, Sampler};
//! use pref_optimizer::search_space::{Configuration, SearchSpace};
//! use pref_optimizer::storage::{MemoryStorage, PreferenceStore};
//! use pref_optimizer::ParamValue;
//!
//! let space = SearchSpace::new().with(&FloatParam::new("x", 0.0, 10.0)).unwrap();
//! let storage = MemoryStorage::new();
//! for x in [1.0, 5.0, 9.0] {
//!     let mut config = Configuration::new();
//!     config.insert("x", ParamValue::Float(x));
//!     storage.push_configuration(config, space.clone());
//! }
//! storage.report_preferences(&[(1, 0), (1, 2)]).unwrap();
//!
//! let sampler = PreferentialGpSampler::builder()
//!     .max_fit_iters(5)
//!     .raw_samples(64)
//!     .n_restarts(2)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//! let mut state = sampler.new_state();
//! let next = sampler.sample_relative(&mut state, &storage, &space).unwrap();
//! assert!(next.contains("x"));
//! ```

pub mod acquisition;
pub mod ep;
pub mod gibbs;
mod hyperparams;
pub mod kernel;
pub mod model;
mod optim;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use self::acquisition::AcquisitionOptions;
use self::ep::VirtualObservation;
use self::gibbs::orthant_gibbs_sampling;
use self::hyperparams::{DEFAULT_LENGTHSCALE_PRIOR, DEFAULT_NOISE_PRIOR, FitOptions};
pub use self::hyperparams::GammaPrior;
use self::kernel::{Kernel, pairwise_precision};
pub use self::kernel::KernelKind;
use self::model::SampledGp;
use crate::distribution::Distribution;
use crate::error::{Error, Result};
use crate::param::ParamValue;
use crate::preference::PreferenceGraph;
use crate::rng_util;
use crate::sampler::{IndependentSampler, RandomSampler, Sampler};
use crate::search_space::{
    Configuration, IntersectionSearchSpace, SearchSpace, SearchSpaceTransform,
};
use crate::storage::PreferenceStore;

/// Default EP sweeps per evidence evaluation.
const DEFAULT_EP_CYCLES: usize = 2;
/// Default Gibbs sweeps per proposal.
const DEFAULT_GIBBS_CYCLES: usize = 20;
/// Default outer hyperparameter steps.
const DEFAULT_MAX_FIT_ITERS: usize = 100;
/// Default convergence threshold on the log-hyperparameters.
const DEFAULT_FIT_TOLERANCE: f64 = 1e-3;
/// Default largest discrete space scored exhaustively.
const DEFAULT_ENUMERATION_LIMIT: f64 = 1e6;
/// Default L-BFGS restarts for continuous acquisition.
const DEFAULT_N_RESTARTS: usize = 10;
/// Default random candidates ranked to pick the restarts.
const DEFAULT_RAW_SAMPLES: usize = 512;
/// Default L-BFGS iterations per restart.
const DEFAULT_ACQUISITION_MAX_ITERS: u64 = 200;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Gaussian-process sampler driven by pairwise preferences.
///
/// The sampler itself is immutable configuration; everything learned from
/// the preferences lives in the [`PreferentialState`] passed to each call.
///
/// # Examples
///
/// ```
/// use pref_optimizer::sampler::PreferentialGpSampler;
/// use pref_optimizer::sampler::preferential::KernelKind;
///
/// // Default configuration
/// let sampler = PreferentialGpSampler::new();
///
/// // Custom configuration via builder
/// let sampler = PreferentialGpSampler::builder()
///     .kernel(KernelKind::Matern52)
///     .gibbs_cycles(50)
///     .seed(42)
///     .build()
///     .unwrap();
/// ```
pub struct PreferentialGpSampler {
    kernel: KernelKind,
    lengthscale_prior: GammaPrior,
    noise_prior: GammaPrior,
    ep_cycles: usize,
    gibbs_cycles: usize,
    max_fit_iters: usize,
    fit_tolerance: f64,
    enumeration_limit: f64,
    n_restarts: usize,
    raw_samples: usize,
    acquisition_max_iters: u64,
    independent_sampler: Box<dyn IndependentSampler>,
    seed: Option<u64>,
}

impl PreferentialGpSampler {
    /// Creates a sampler with the default configuration and a random seed.
    #[must_use]
    pub fn new() -> Self {
        PreferentialGpSamplerBuilder::new().assemble()
    }

    /// Creates a sampler with the default configuration and a fixed seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        PreferentialGpSamplerBuilder::new().seed(seed).assemble()
    }

    /// Creates a builder for configuring a `PreferentialGpSampler`.
    #[must_use]
    pub fn builder() -> PreferentialGpSamplerBuilder {
        PreferentialGpSamplerBuilder::new()
    }

    /// The kernel family.
    #[must_use]
    pub fn kernel(&self) -> KernelKind {
        self.kernel
    }

    /// EP sweeps per evidence evaluation.
    #[must_use]
    pub fn ep_cycles(&self) -> usize {
        self.ep_cycles
    }

    /// Gibbs sweeps per proposal.
    #[must_use]
    pub fn gibbs_cycles(&self) -> usize {
        self.gibbs_cycles
    }

    /// Largest discrete space scored exhaustively.
    #[must_use]
    pub fn enumeration_limit(&self) -> f64 {
        self.enumeration_limit
    }

    /// Refits the model to the preferences in `storage` and draws one
    /// sample of the judged utility differences, without running the
    /// acquisition step.
    ///
    /// Returns `Ok(None)` when there are no preferences yet or
    /// `search_space` is empty.
    ///
    /// # Errors
    ///
    /// - [`Error::DynamicSearchSpace`] if `search_space` encodes to a
    ///   different dimensionality than the one `state` was fitted on.
    /// - [`Error::UnknownConfiguration`] if a preference references a
    ///   configuration the store does not hold.
    /// - Encoder errors if a judged configuration does not fit
    ///   `search_space`.
    /// - [`Error::SingularMatrix`] if the pairwise precision cannot be formed.
    pub fn fit_model(
        &self,
        state: &mut PreferentialState,
        storage: &dyn PreferenceStore,
        search_space: &SearchSpace,
    ) -> Result<Option<FittedModel>> {
        let preferences = storage.read_preferences();
        if preferences.is_empty() || search_space.is_empty() {
            return Ok(None);
        }

        let transform = SearchSpaceTransform::new(search_space)?;
        let dims = transform.n_dims();
        match state.dims {
            Some(expected) if expected != dims => {
                return Err(Error::DynamicSearchSpace {
                    expected,
                    got: dims,
                });
            }
            Some(_) => {}
            None => state.initialize(dims),
        }

        let graph = PreferenceGraph::from_preferences(&preferences);
        let records = storage.read_configurations(graph.trial_numbers())?;
        let points = records
            .iter()
            .map(|r| transform.encode(&r.params.project(search_space)?))
            .collect::<Result<Vec<_>>>()?;
        let pairs = graph.pairs().to_vec();

        // judgments reported since the last call join with empty state
        state.diff.resize(pairs.len(), 0.0);
        state
            .virtual_obs
            .resize(pairs.len(), VirtualObservation::default());

        let mut theta = state.log_lengthscales.clone();
        theta.push(state.log_noise);
        let fitted = hyperparams::fit(&points, &pairs, &theta, &state.virtual_obs, &self.fit_options());
        state.log_lengthscales = fitted.log_lengthscales;
        state.log_noise = fitted.log_noise;
        state.virtual_obs = fitted.ep.virtual_obs;

        let kernel = Kernel::new(self.kernel, state.lengthscales());
        let noise_var = state.noise_var();
        let precision = pairwise_precision(&kernel.matrix(&points), &pairs, noise_var)?;
        let mut chain = orthant_gibbs_sampling(&precision, &state.diff, self.gibbs_cycles, &mut state.rng);
        if let Some(last) = chain.pop() {
            state.diff = last;
        }

        let model = SampledGp::from_precision(kernel, points, pairs, noise_var, precision, &state.diff);
        let best_f = model.best_mean();
        trace_debug!(
            n_points = graph.n_points(),
            n_preferences = graph.n_preferences(),
            noise_var,
            best_f,
            "preferential model fitted"
        );
        Ok(Some(FittedModel {
            model,
            transform,
            trial_numbers: graph.trial_numbers().to_vec(),
            best_f,
        }))
    }

    fn fit_options(&self) -> FitOptions {
        FitOptions {
            kind: self.kernel,
            lengthscale_prior: self.lengthscale_prior,
            noise_prior: self.noise_prior,
            ep_cycles: self.ep_cycles,
            max_fit_iters: self.max_fit_iters,
            fit_tolerance: self.fit_tolerance,
        }
    }

    fn acquisition_options(&self) -> AcquisitionOptions {
        AcquisitionOptions {
            enumeration_limit: self.enumeration_limit,
            n_restarts: self.n_restarts,
            raw_samples: self.raw_samples,
            max_iters: self.acquisition_max_iters,
        }
    }
}

impl Default for PreferentialGpSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for configuring a [`PreferentialGpSampler`].
///
/// Every option has a default; see the [module documentation](self) for
/// the table. Options are validated by [`build`](Self::build).
///
/// # Examples
///
/// ```
/// use pref_optimizer::sampler::preferential::{GammaPrior, PreferentialGpSamplerBuilder};
///
/// let sampler = PreferentialGpSamplerBuilder::new()
///     .noise_prior(GammaPrior::new(2.0, 20.0).unwrap())
///     .enumeration_limit(1e4)
///     .seed(3)
///     .build()
///     .unwrap();
/// assert_eq!(sampler.enumeration_limit(), 1e4);
/// ```
#[derive(Default)]
pub struct PreferentialGpSamplerBuilder {
    kernel: Option<KernelKind>,
    lengthscale_prior: Option<GammaPrior>,
    noise_prior: Option<GammaPrior>,
    ep_cycles: Option<usize>,
    gibbs_cycles: Option<usize>,
    max_fit_iters: Option<usize>,
    fit_tolerance: Option<f64>,
    enumeration_limit: Option<f64>,
    n_restarts: Option<usize>,
    raw_samples: Option<usize>,
    acquisition_max_iters: Option<u64>,
    independent_sampler: Option<Box<dyn IndependentSampler>>,
    seed: Option<u64>,
}

impl PreferentialGpSamplerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Matérn smoothness.
    ///
    /// Default: [`KernelKind::Matern32`].
    #[must_use]
    pub fn kernel(mut self, kind: KernelKind) -> Self {
        self.kernel = Some(kind);
        self
    }

    /// Sets the prior on every lengthscale.
    ///
    /// Default: Gamma(shape 5, rate 10).
    #[must_use]
    pub fn lengthscale_prior(mut self, prior: GammaPrior) -> Self {
        self.lengthscale_prior = Some(prior);
        self
    }

    /// Sets the prior on the observation-noise variance.
    ///
    /// Default: Gamma(shape 5, rate 50).
    #[must_use]
    pub fn noise_prior(mut self, prior: GammaPrior) -> Self {
        self.noise_prior = Some(prior);
        self
    }

    /// Sets the EP sweeps per evidence evaluation.
    ///
    /// Default: 2.
    #[must_use]
    pub fn ep_cycles(mut self, n: usize) -> Self {
        self.ep_cycles = Some(n);
        self
    }

    /// Sets the Gibbs sweeps per proposal.
    ///
    /// The chain continues from the previous proposal's sample, so a few
    /// sweeps per call are enough once the model has settled.
    ///
    /// Default: 20.
    #[must_use]
    pub fn gibbs_cycles(mut self, n: usize) -> Self {
        self.gibbs_cycles = Some(n);
        self
    }

    /// Sets the maximum number of outer hyperparameter steps. Zero keeps the
    /// hyperparameters at their initial values.
    ///
    /// Default: 100.
    #[must_use]
    pub fn max_fit_iters(mut self, n: usize) -> Self {
        self.max_fit_iters = Some(n);
        self
    }

    /// Sets the largest coordinate change of the log-hyperparameters that
    /// counts as converged.
    ///
    /// Default: 1e-3.
    #[must_use]
    pub fn fit_tolerance(mut self, tol: f64) -> Self {
        self.fit_tolerance = Some(tol);
        self
    }

    /// Sets the largest fully discrete search space that is scored
    /// exhaustively instead of relaxed to the unit box.
    ///
    /// Default: 1e6.
    #[must_use]
    pub fn enumeration_limit(mut self, limit: f64) -> Self {
        self.enumeration_limit = Some(limit);
        self
    }

    /// Sets the number of L-BFGS restarts for continuous acquisition.
    ///
    /// Default: 10.
    #[must_use]
    pub fn n_restarts(mut self, n: usize) -> Self {
        self.n_restarts = Some(n);
        self
    }

    /// Sets the number of random candidates ranked to pick the restarts.
    ///
    /// Default: 512.
    #[must_use]
    pub fn raw_samples(mut self, n: usize) -> Self {
        self.raw_samples = Some(n);
        self
    }

    /// Sets the L-BFGS iteration cap per restart.
    ///
    /// Default: 200.
    #[must_use]
    pub fn acquisition_max_iters(mut self, n: u64) -> Self {
        self.acquisition_max_iters = Some(n);
        self
    }

    /// Sets the sampler used for parameters outside the relative search
    /// space.
    ///
    /// Default: a [`RandomSampler`] seeded from this sampler's seed.
    #[must_use]
    pub fn independent_sampler(mut self, sampler: impl IndependentSampler + 'static) -> Self {
        self.independent_sampler = Some(Box::new(sampler));
        self
    }

    /// Sets the random seed for reproducibility.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the configured [`PreferentialGpSampler`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOption`] for zero EP or Gibbs cycles, zero
    /// restarts, raw samples or acquisition iterations, a negative or
    /// non-finite fit tolerance, or a negative or NaN enumeration limit.
    pub fn build(self) -> Result<PreferentialGpSampler> {
        let positive = [
            ("ep_cycles", self.ep_cycles),
            ("gibbs_cycles", self.gibbs_cycles),
            ("n_restarts", self.n_restarts),
            ("raw_samples", self.raw_samples),
        ];
        if let Some(&(option, _)) = positive.iter().find(|(_, v)| *v == Some(0)) {
            return Err(Error::InvalidOption {
                option,
                reason: "must be at least 1",
            });
        }
        if self.acquisition_max_iters == Some(0) {
            return Err(Error::InvalidOption {
                option: "acquisition_max_iters",
                reason: "must be at least 1",
            });
        }
        if self
            .fit_tolerance
            .is_some_and(|t| !t.is_finite() || t < 0.0)
        {
            return Err(Error::InvalidOption {
                option: "fit_tolerance",
                reason: "must be a non-negative finite number",
            });
        }
        if self.enumeration_limit.is_some_and(|l| l.is_nan() || l < 0.0) {
            return Err(Error::InvalidOption {
                option: "enumeration_limit",
                reason: "must be a non-negative number",
            });
        }
        Ok(self.assemble())
    }

    fn assemble(self) -> PreferentialGpSampler {
        let independent_sampler = self.independent_sampler.unwrap_or_else(|| {
            let sampler = match self.seed {
                Some(seed) => {
                    let mut rng = fastrand::Rng::with_seed(seed);
                    RandomSampler::with_seed(rng_util::child_seed(&mut rng))
                }
                None => RandomSampler::new(),
            };
            Box::new(sampler)
        });
        PreferentialGpSampler {
            kernel: self.kernel.unwrap_or_default(),
            lengthscale_prior: self.lengthscale_prior.unwrap_or(DEFAULT_LENGTHSCALE_PRIOR),
            noise_prior: self.noise_prior.unwrap_or(DEFAULT_NOISE_PRIOR),
            ep_cycles: self.ep_cycles.unwrap_or(DEFAULT_EP_CYCLES),
            gibbs_cycles: self.gibbs_cycles.unwrap_or(DEFAULT_GIBBS_CYCLES),
            max_fit_iters: self.max_fit_iters.unwrap_or(DEFAULT_MAX_FIT_ITERS),
            fit_tolerance: self.fit_tolerance.unwrap_or(DEFAULT_FIT_TOLERANCE),
            enumeration_limit: self.enumeration_limit.unwrap_or(DEFAULT_ENUMERATION_LIMIT),
            n_restarts: self.n_restarts.unwrap_or(DEFAULT_N_RESTARTS),
            raw_samples: self.raw_samples.unwrap_or(DEFAULT_RAW_SAMPLES),
            acquisition_max_iters: self
                .acquisition_max_iters
                .unwrap_or(DEFAULT_ACQUISITION_MAX_ITERS),
            independent_sampler,
            seed: self.seed,
        }
    }
}

/// Everything a [`PreferentialGpSampler`] learns between calls.
///
/// Created by [`Sampler::new_state`] and updated in place by every call.
/// The hyperparameters and the EP sites warm-start the next fit, and the
/// difference sample continues the Gibbs chain. With the `serde` feature
/// the state can be checkpointed; the RNG is not serialized and a restored
/// state is reseeded.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PreferentialState {
    dims: Option<usize>,
    log_lengthscales: Vec<f64>,
    log_noise: f64,
    diff: Vec<f64>,
    virtual_obs: Vec<VirtualObservation>,
    #[cfg_attr(feature = "serde", serde(skip))]
    rng: fastrand::Rng,
}

impl PreferentialState {
    /// An unfitted state drawing from `rng`.
    fn with_rng(rng: fastrand::Rng) -> Self {
        Self {
            dims: None,
            log_lengthscales: Vec::new(),
            log_noise: 0.0,
            diff: Vec::new(),
            virtual_obs: Vec::new(),
            rng,
        }
    }

    fn initialize(&mut self, dims: usize) {
        self.dims = Some(dims);
        self.log_lengthscales = vec![0.0; dims];
        self.log_noise = 0.0;
    }

    /// Reseeds the RNG, e.g. after restoring a checkpoint.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = fastrand::Rng::with_seed(seed);
    }

    /// Encoded dimensionality of the first fitted search space, or `None`
    /// before the first fit.
    #[must_use]
    pub fn dims(&self) -> Option<usize> {
        self.dims
    }

    /// Fitted lengthscales, one per encoded dimension.
    #[must_use]
    pub fn lengthscales(&self) -> Vec<f64> {
        self.log_lengthscales.iter().map(|l| l.exp()).collect()
    }

    /// Fitted observation-noise variance.
    #[must_use]
    pub fn noise_var(&self) -> f64 {
        self.log_noise.exp()
    }

    /// The current sample of the utility differences, one per preference
    /// in store order.
    #[must_use]
    pub fn diff(&self) -> &[f64] {
        &self.diff
    }

    /// The EP site of every preference, in store order.
    #[must_use]
    pub fn virtual_observations(&self) -> &[VirtualObservation] {
        &self.virtual_obs
    }
}

/// The GP conditioned on one sample of the judged differences, plus what
/// is needed to map its inputs back to configurations.
#[derive(Clone, Debug)]
pub struct FittedModel {
    model: SampledGp,
    transform: SearchSpaceTransform,
    trial_numbers: Vec<usize>,
    best_f: f64,
}

impl FittedModel {
    /// The sampled GP.
    #[must_use]
    pub fn model(&self) -> &SampledGp {
        &self.model
    }

    /// The encoder of the relative search space.
    #[must_use]
    pub fn transform(&self) -> &SearchSpaceTransform {
        &self.transform
    }

    /// Store numbers of the judged configurations, in the order of the
    /// model's points.
    #[must_use]
    pub fn trial_numbers(&self) -> &[usize] {
        &self.trial_numbers
    }

    /// Largest posterior mean over the judged configurations.
    #[must_use]
    pub fn best_f(&self) -> f64 {
        self.best_f
    }

    /// Posterior mean of the utility at a configuration.
    ///
    /// # Errors
    ///
    /// Returns encoder errors if `configuration` does not fit the relative
    /// search space.
    pub fn utility(&self, configuration: &Configuration) -> Result<f64> {
        Ok(self.model.posterior_mean(&self.transform.encode(configuration)?))
    }
}

// ---------------------------------------------------------------------------
// Sampler trait implementation
// ---------------------------------------------------------------------------

impl Sampler for PreferentialGpSampler {
    type State = PreferentialState;

    fn new_state(&self) -> PreferentialState {
        let rng = self
            .seed
            .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
        PreferentialState::with_rng(rng)
    }

    fn infer_relative_search_space(&self, storage: &dyn PreferenceStore) -> SearchSpace {
        IntersectionSearchSpace::calculate(&storage.read_all_configurations())
    }

    /// Fits the model and maximizes log-EI over `search_space`.
    ///
    /// Returns an empty configuration when there are no preferences yet or
    /// `search_space` is empty.
    ///
    /// # Errors
    ///
    /// See [`PreferentialGpSampler::fit_model`].
    fn sample_relative(
        &self,
        state: &mut PreferentialState,
        storage: &dyn PreferenceStore,
        search_space: &SearchSpace,
    ) -> Result<Configuration> {
        let Some(fitted) = self.fit_model(state, storage, search_space)? else {
            return Ok(Configuration::new());
        };
        let proposal = acquisition::optimize(
            &fitted.model,
            fitted.best_f,
            search_space,
            &fitted.transform,
            &self.acquisition_options(),
            &mut state.rng,
        )?;
        trace_info!(
            n_params = proposal.len(),
            n_judged = fitted.trial_numbers.len(),
            "relative configuration proposed"
        );
        Ok(proposal)
    }

    fn sample_independent(
        &self,
        _state: &mut PreferentialState,
        name: &str,
        distribution: &Distribution,
    ) -> ParamValue {
        trace_warn!(
            param = name,
            "parameter outside the relative search space, falling back to the independent sampler"
        );
        self.independent_sampler.sample_independent(name, distribution)
    }
}
