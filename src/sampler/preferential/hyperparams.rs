//! Maximum a posteriori fit of the kernel lengthscales and noise variance.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, Gamma};

use super::ep::{EpResult, VirtualObservation, expectation_propagation};
use super::kernel::{Kernel, KernelKind};
use super::optim::{BoundedProblem, minimize};
use crate::error::{Error, Result};

/// Log-hyperparameters are confined to `[-BOUND, BOUND]`.
const BOUND: f64 = 10.0;
/// Weight of the penalty outside the box.
const PENALTY: f64 = 1e3;
/// L-BFGS iterations per outer step.
const INNER_ITERS: u64 = 20;

/// Gamma prior on a positive hyperparameter, parameterized by shape and rate.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GammaPrior {
    shape: f64,
    rate: f64,
}

/// Gamma(5, 10), mode 0.4, for each lengthscale of the unit box.
pub(crate) const DEFAULT_LENGTHSCALE_PRIOR: GammaPrior = GammaPrior {
    shape: 5.0,
    rate: 10.0,
};

/// Gamma(5, 50), mode 0.08, for the noise variance.
pub(crate) const DEFAULT_NOISE_PRIOR: GammaPrior = GammaPrior {
    shape: 5.0,
    rate: 50.0,
};

impl GammaPrior {
    /// Creates a prior with density `∝ x^(shape-1) exp(-rate·x)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOption`] unless both parameters are positive
    /// and finite.
    pub fn new(shape: f64, rate: f64) -> Result<Self> {
        let invalid = || Error::InvalidOption {
            option: "gamma_prior",
            reason: "shape and rate must be positive and finite",
        };
        if shape.is_infinite() || rate.is_infinite() {
            return Err(invalid());
        }
        Gamma::new(shape, rate).map_err(|_| invalid())?;
        Ok(Self { shape, rate })
    }

    /// The shape parameter.
    #[must_use]
    pub fn shape(&self) -> f64 {
        self.shape
    }

    /// The rate parameter.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Log-density at `x`.
    #[must_use]
    pub fn ln_pdf(&self, x: f64) -> f64 {
        Gamma::new(self.shape, self.rate).map_or(f64::NEG_INFINITY, |g| g.ln_pdf(x))
    }
}

impl Default for GammaPrior {
    /// The lengthscale prior, Gamma(5, 10).
    fn default() -> Self {
        DEFAULT_LENGTHSCALE_PRIOR
    }
}

/// Settings shared by every marginal-likelihood evaluation of one fit.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FitOptions {
    pub(crate) kind: KernelKind,
    pub(crate) lengthscale_prior: GammaPrior,
    pub(crate) noise_prior: GammaPrior,
    pub(crate) ep_cycles: usize,
    pub(crate) max_fit_iters: usize,
    pub(crate) fit_tolerance: f64,
}

/// Fitted hyperparameters and the EP state at them.
#[derive(Clone, Debug)]
pub(crate) struct FitOutcome {
    pub(crate) log_lengthscales: Vec<f64>,
    pub(crate) log_noise: f64,
    pub(crate) ep: EpResult,
}

/// Splits `θ = [log ℓ.., log s]` into a kernel and a noise variance.
fn unpack(kind: KernelKind, theta: &[f64]) -> (Kernel, f64) {
    let d = theta.len().saturating_sub(1);
    let lengthscales = theta[..d].iter().map(|t| t.exp()).collect();
    let noise = theta.get(d).map_or(1.0, |t| t.exp());
    (Kernel::new(kind, lengthscales), noise)
}

/// Negative log posterior of `θ`, using the EP evidence as the likelihood.
fn loss(
    theta: &[f64],
    points: &[Vec<f64>],
    pairs: &[(usize, usize)],
    sites: &[VirtualObservation],
    opts: &FitOptions,
) -> f64 {
    let (kernel, noise) = unpack(opts.kind, theta);
    let ep = expectation_propagation(&kernel.matrix(points), pairs, noise, opts.ep_cycles, sites);
    let prior: f64 = kernel
        .lengthscales()
        .iter()
        .map(|&l| opts.lengthscale_prior.ln_pdf(l))
        .sum::<f64>()
        + opts.noise_prior.ln_pdf(noise);
    -(ep.log_z + prior)
}

/// Fits `θ` starting from `initial`, then reruns EP at the result.
///
/// The stored `sites` seed every EP evaluation during the fit. A solver
/// failure stops the outer loop and keeps the last accepted `θ`.
pub(crate) fn fit(
    points: &[Vec<f64>],
    pairs: &[(usize, usize)],
    initial: &[f64],
    sites: &[VirtualObservation],
    opts: &FitOptions,
) -> FitOutcome {
    let dim = initial.len();
    let mut theta: Vec<f64> = initial.iter().map(|t| t.clamp(-BOUND, BOUND)).collect();

    let mut steps = 0;
    while steps < opts.max_fit_iters {
        steps += 1;
        let problem = BoundedProblem::new(
            |t: &[f64]| Ok(loss(t, points, pairs, sites, opts)),
            vec![-BOUND; dim],
            vec![BOUND; dim],
            PENALTY,
        );
        let next = match minimize(problem, theta.clone(), INNER_ITERS) {
            Ok(next) => next,
            Err(_err) => {
                trace_debug!(error = %_err, steps, "hyperparameter solver failed, keeping last estimate");
                break;
            }
        };
        let delta = theta
            .iter()
            .zip(&next)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        theta = next;
        if delta < opts.fit_tolerance {
            break;
        }
    }
    trace_debug!(steps, theta = ?theta, "hyperparameter fit finished");

    let (kernel, noise) = unpack(opts.kind, &theta);
    let ep = expectation_propagation(&kernel.matrix(points), pairs, noise, opts.ep_cycles, sites);
    let log_noise = theta.pop().unwrap_or(0.0);
    FitOutcome {
        log_lengthscales: theta,
        log_noise,
        ep,
    }
}
