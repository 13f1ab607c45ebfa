//! Gibbs sampling from a zero-mean Gaussian restricted to the positive orthant.

use nalgebra::DMatrix;

use crate::special::{log_ndtr, ndtri_exp};

/// Smallest admissible precision diagonal.
const MIN_PRECISION: f64 = 1e-12;

/// Runs `cycles` coordinate sweeps of a Gibbs chain on `N(0, precision⁻¹)`
/// conditioned on every coordinate being positive.
///
/// Row 0 of the result is `initial` (with non-positive entries lifted to
/// [`f64::MIN_POSITIVE`]); row `k` is the state after sweep `k`. Every
/// entry of every row is strictly positive.
#[must_use]
pub fn orthant_gibbs_sampling(
    precision: &DMatrix<f64>,
    initial: &[f64],
    cycles: usize,
    rng: &mut fastrand::Rng,
) -> Vec<Vec<f64>> {
    let dim = initial.len().min(precision.nrows());
    let diag: Vec<f64> = (0..dim)
        .map(|j| precision[(j, j)].max(MIN_PRECISION))
        .collect();
    let cond_std: Vec<f64> = diag.iter().map(|d| d.sqrt().recip()).collect();

    let mut chain: Vec<f64> = initial.iter().map(|&v| v.max(f64::MIN_POSITIVE)).collect();
    let mut out = Vec::with_capacity(cycles + 1);
    out.push(chain.clone());

    for _ in 0..cycles {
        for j in 0..dim {
            // E[x_j | x_-j] = x_j - (P_j · x) / P_jj
            let dot: f64 = (0..dim).map(|k| precision[(j, k)] * chain[k]).sum();
            let cond_mean = chain[j] - dot / diag[j];
            let lower = -cond_mean / cond_std[j];
            let z = one_side_trunc_norm(lower, rng);
            chain[j] = (z * cond_std[j] + cond_mean).max(f64::MIN_POSITIVE);
        }
        out.push(chain.clone());
    }

    trace_debug!(dim, cycles, "orthant gibbs sweeps finished");
    out
}

/// Draws `z ~ N(0, 1)` conditioned on `z ≥ lower`.
///
/// Redraws when the uniform variate lands so deep in the tail that the
/// inverse CDF is infinite.
pub fn one_side_trunc_norm(lower: f64, rng: &mut fastrand::Rng) -> f64 {
    loop {
        let z = trunc_norm_from_uniform(lower, rng.f64());
        if z.is_finite() {
            return z;
        }
    }
}

/// Inverse-CDF core of [`one_side_trunc_norm`] for a given uniform `u`.
///
/// Computes `-Φ⁻¹(exp(ln Φ(-lower) + ln u))` entirely in log space.
#[must_use]
pub fn trunc_norm_from_uniform(lower: f64, u: f64) -> f64 {
    -ndtri_exp(log_ndtr(-lower) + u.ln())
}
