//! Standard-normal special functions in forms that stay finite in the tails.
//!
//! Built on the error functions from `statrs`; everything else here is a
//! thin numerically-stable wrapper.

use statrs::function::erf::{erfc, erfc_inv};

const SQRT_2: f64 = core::f64::consts::SQRT_2;
const FRAC_1_SQRT_2: f64 = core::f64::consts::FRAC_1_SQRT_2;
/// `ln(sqrt(2π))`
const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_8;
/// `ln(sqrt(π/2))`
const LN_SQRT_PI_OVER_2: f64 = 0.225_791_352_644_727_4;
/// `sqrt(π/2)`
const SQRT_PI_OVER_2: f64 = 1.253_314_137_315_500_3;
const FRAC_1_SQRT_PI: f64 = 0.564_189_583_547_756_3;

/// Standard normal density.
pub(crate) fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x - LN_SQRT_2PI).exp()
}

/// Standard normal CDF.
pub(crate) fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x * FRAC_1_SQRT_2)
}

/// Scaled complementary error function `exp(x²)·erfc(x)`.
pub(crate) fn erfcx(x: f64) -> f64 {
    if x < 0.0 {
        if x < -26.6 {
            return f64::INFINITY;
        }
        return 2.0 * (x * x).exp() - erfcx(-x);
    }
    if x < 26.0 {
        return (x * x).exp() * erfc(x);
    }
    // asymptotic series, truncation error below 1e-12 for x >= 26
    let inv_2x2 = 0.5 / (x * x);
    let mut term = 1.0;
    let mut sum = 1.0;
    for n in 1..=4 {
        term *= -f64::from(2 * n - 1) * inv_2x2;
        sum += term;
    }
    sum * FRAC_1_SQRT_PI / x
}

/// `ln Φ(x)`, accurate for large negative `x`.
pub(crate) fn log_ndtr(x: f64) -> f64 {
    if x < -1.0 {
        (0.5 * erfcx(-x * FRAC_1_SQRT_2)).ln() - 0.5 * x * x
    } else {
        (-0.5 * erfc(x * FRAC_1_SQRT_2)).ln_1p()
    }
}

/// Inverse of the standard normal CDF.
pub(crate) fn ndtri(p: f64) -> f64 {
    -SQRT_2 * erfc_inv(2.0 * p)
}

/// `Φ⁻¹(exp(log_p))` without underflowing `exp(log_p)`.
///
/// Below the smallest normal probability the estimate is refined by Newton
/// steps on `log_ndtr`.
pub(crate) fn ndtri_exp(log_p: f64) -> f64 {
    if log_p == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    if log_p > -700.0 {
        return ndtri(log_p.exp());
    }
    let t = -2.0 * log_p;
    let mut x = -(t - t.ln() - (2.0 * core::f64::consts::PI).ln()).sqrt();
    for _ in 0..8 {
        let f = log_ndtr(x);
        // d/dx ln Φ(x) = φ(x)/Φ(x)
        let slope = (-0.5 * x * x - LN_SQRT_2PI - f).exp();
        let step = (f - log_p) / slope;
        x -= step;
        if step.abs() <= 1e-14 * x.abs() {
            break;
        }
    }
    x
}

/// `ln(1 − exp(x))` for `x < 0`.
pub(crate) fn log1mexp(x: f64) -> f64 {
    if x > -core::f64::consts::LN_2 {
        (-x.exp_m1()).ln()
    } else {
        (-x.exp()).ln_1p()
    }
}

/// Moments of a standard normal truncated to `z > alpha`.
///
/// Returns `(mean, variance, ln P(z > alpha))`.
pub(crate) fn truncnorm_mean_var_logz(alpha: f64) -> (f64, f64, f64) {
    let log_z = log_ndtr(-alpha);
    let mean = 1.0 / (SQRT_PI_OVER_2 * erfcx(alpha * FRAC_1_SQRT_2));
    let var = (1.0 - mean * (mean - alpha)).clamp(0.0, 1.0);
    (mean, var, log_z)
}

/// `ln(φ(z) + z·Φ(z))`, the log of expected improvement at unit scale.
pub(crate) fn log_h(z: f64) -> f64 {
    if z > -1.0 {
        return (norm_pdf(z) + z * norm_cdf(z)).ln();
    }
    let base = -0.5 * z * z - LN_SQRT_2PI;
    if z < -1e6 {
        return base - 2.0 * (-z).ln();
    }
    let w = (erfcx(-z * FRAC_1_SQRT_2) * -z).ln() + LN_SQRT_PI_OVER_2;
    base + log1mexp(w)
}
