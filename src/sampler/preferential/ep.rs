//! Expectation Propagation for the orthant-truncated preference likelihood.
//!
//! Each preference `better ≻ worse` contributes the factor
//! `P(f(better) − f(worse) + ε > 0)` with Gaussian noise `ε`. EP replaces it
//! by a Gaussian site in natural parameters (a [`VirtualObservation`]) on the
//! difference `f(better) − f(worse)`, and keeps the point-space posterior in
//! sync with rank-1 updates.

use nalgebra::{DMatrix, DVector};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::special::truncnorm_mean_var_logz;

/// Floor for denominators and scales that must stay positive.
const EPS: f64 = 1e-20;

/// Gaussian site for one preference, in natural parameters.
///
/// `a` is the site precision and `b` the precision-weighted mean. A site of
/// `(0, 0)` carries no information.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VirtualObservation {
    /// Site precision.
    pub a: f64,
    /// Site linear term.
    pub b: f64,
}

/// Outcome of an EP run.
#[derive(Clone, Debug)]
pub struct EpResult {
    /// Posterior mean over points.
    pub mean: DVector<f64>,
    /// Posterior covariance over points.
    pub cov: DMatrix<f64>,
    /// Updated site for every preference.
    pub virtual_obs: Vec<VirtualObservation>,
    /// `Σ ln Z_i` of the last sweep.
    pub log_z: f64,
}

/// Runs EP from the prior `N(0, cov0)`.
///
/// Sites in `initial` are absorbed before the first sweep; preferences
/// beyond `initial.len()` start from an empty site. `cycles` full sweeps
/// over all preferences follow.
#[must_use]
pub fn expectation_propagation(
    cov0: &DMatrix<f64>,
    pairs: &[(usize, usize)],
    noise_var: f64,
    cycles: usize,
    initial: &[VirtualObservation],
) -> EpResult {
    let n = cov0.nrows();
    let m = pairs.len();
    let mut mu = DVector::<f64>::zeros(n);
    let mut cov = cov0.clone();
    let mut sites: Vec<VirtualObservation> = initial.iter().copied().take(m).collect();
    sites.resize(m, VirtualObservation::default());
    let mut log_zs = vec![0.0; m];

    for (&(better, worse), site) in pairs.iter().zip(&sites) {
        if site.a != 0.0 || site.b != 0.0 {
            rank_one_update(&mut mu, &mut cov, better, worse, site.a, site.b);
        }
    }

    for _ in 0..cycles {
        for (i, &(better, worse)) in pairs.iter().enumerate() {
            let mean1 = mu[better] - mu[worse];
            let var1 = cov[(better, better)] - cov[(better, worse)] - cov[(worse, better)]
                + cov[(worse, worse)];

            // cavity: remove this preference's own site
            let site = sites[i];
            let r0 = 1.0 / (1.0 - var1 * site.a).max(EPS);
            let var0 = (var1 * r0).max(EPS);
            let mean0 = (mean1 - var1 * site.b) * r0;

            let (a2, b2, log_z) = observation(var0, mean0, noise_var);
            rank_one_update(&mut mu, &mut cov, better, worse, a2 - site.a, b2 - site.b);
            sites[i] = VirtualObservation { a: a2, b: b2 };
            log_zs[i] = log_z;
        }
    }

    trace_debug!(
        n_points = n,
        n_preferences = m,
        cycles,
        "expectation propagation finished"
    );

    EpResult {
        mean: mu,
        cov,
        virtual_obs: sites,
        log_z: log_zs.iter().sum(),
    }
}

/// Moment-matched site for the cavity `N(mean0, var0)`.
///
/// Returns `(a, b, ln Z)`.
fn observation(var0: f64, mean0: f64, noise_var: f64) -> (f64, f64, f64) {
    let obs_sigma = (var0 + noise_var).sqrt();
    let alpha = -mean0 / obs_sigma.max(EPS);
    let (mean_norm, var_norm, log_z) = truncnorm_mean_var_logz(alpha);

    let denom = 1.0 / (noise_var + var_norm * var0).max(EPS);
    let a = (1.0 - var_norm) * denom;
    let b = (mean0 * (1.0 - var_norm) + obs_sigma * mean_norm) * denom;
    (a, b, log_z)
}

/// Adds a site change `(da, db)` on `f(better) − f(worse)` to the posterior.
fn rank_one_update(
    mu: &mut DVector<f64>,
    cov: &mut DMatrix<f64>,
    better: usize,
    worse: usize,
    da: f64,
    db: f64,
) {
    let sxy: DVector<f64> = cov.column(better) - cov.column(worse);
    let var1 = sxy[better] - sxy[worse];
    let mean1 = mu[better] - mu[worse];
    let dr = 1.0 / (1.0 + var1 * da).max(EPS);
    mu.axpy((db - mean1 * da) * dr, &sxy, 1.0);
    cov.ger(-da * dr, &sxy, &sxy, 1.0);
}
