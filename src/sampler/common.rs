//! Shared distribution-level utilities used by the encoder and the samplers.
//!
//! "Internal space" is the real line a distribution is modeled on before
//! normalization: log-space for log-scaled parameters, the index axis for
//! categoricals.

use crate::distribution::Distribution;
use crate::param::ParamValue;
use crate::rng_util;

/// Compute internal-space bounds for a distribution.
///
/// Discrete domains are widened by half a step on each side so every grid
/// value owns an equally wide cell; categoricals span `[0, n_choices]`.
/// Returns `None` for log-scaled domains with non-positive bounds.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn internal_bounds(distribution: &Distribution) -> Option<(f64, f64)> {
    match distribution {
        Distribution::Float(d) => {
            if d.log_scale {
                if d.low <= 0.0 || d.high <= 0.0 {
                    return None;
                }
                Some((d.low.ln(), d.high.ln()))
            } else if let Some(step) = d.step {
                Some((d.low - 0.5 * step, d.high + 0.5 * step))
            } else {
                Some((d.low, d.high))
            }
        }
        Distribution::Int(d) => {
            if d.log_scale {
                if d.low < 1 {
                    return None;
                }
                Some(((d.low as f64 - 0.5).ln(), (d.high as f64 + 0.5).ln()))
            } else {
                let half = 0.5 * d.step.unwrap_or(1) as f64;
                Some((d.low as f64 - half, d.high as f64 + half))
            }
        }
        Distribution::Categorical(d) => Some((0.0, d.n_choices as f64)),
    }
}

/// Index of the last grid point of a stepped float domain.
#[allow(clippy::cast_possible_truncation)]
fn float_steps(low: f64, high: f64, step: f64) -> i64 {
    if step <= 0.0 || high <= low {
        return 0;
    }
    ((high - low) / step + 1e-9).floor() as i64
}

/// Snap a float onto `low + k * step` with `k` in `0..=float_steps`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn snap_float(v: f64, low: f64, high: f64, step: f64) -> f64 {
    let k_max = float_steps(low, high, step);
    let k = (((v - low) / step).round() as i64).clamp(0, k_max);
    low + k as f64 * step
}

/// Snap an integer-valued float onto `low + k * step`, never past the last
/// grid point at or below `high`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn snap_int(v: f64, low: i64, high: i64, step: i64) -> i64 {
    let step = step.max(1);
    let k_max = high.saturating_sub(low).max(0) / step;
    let k = ((v - low as f64) / step as f64).round() as i64;
    low.saturating_add(k.clamp(0, k_max).saturating_mul(step))
}

/// Convert an internal-space value back to a `ParamValue`.
///
/// Snaps to the step grid, rounds integers, picks the categorical cell and
/// clamps to the declared bounds.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub(crate) fn from_internal(value: f64, distribution: &Distribution) -> ParamValue {
    match distribution {
        Distribution::Float(d) => {
            let v = if d.log_scale { value.exp() } else { value };
            let v = match d.step {
                Some(step) => snap_float(v, d.low, d.high, step),
                None => v,
            };
            ParamValue::Float(v.clamp(d.low, d.high))
        }
        Distribution::Int(d) => {
            let v = if d.log_scale { value.exp() } else { value };
            let v = match d.step {
                Some(step) => snap_int(v, d.low, d.high, step),
                None => v.round() as i64,
            };
            ParamValue::Int(v.clamp(d.low, d.high))
        }
        Distribution::Categorical(d) => {
            let last = d.n_choices.saturating_sub(1);
            let index = if value <= 0.0 {
                0
            } else {
                (value.floor() as usize).min(last)
            };
            ParamValue::Categorical(index)
        }
    }
}

/// Convert a `ParamValue` to its internal-space representation.
///
/// Returns `None` when the value variant does not match the distribution or
/// a categorical index is out of range.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn to_internal(value: &ParamValue, distribution: &Distribution) -> Option<f64> {
    match (value, distribution) {
        (ParamValue::Float(v), Distribution::Float(d)) => {
            Some(if d.log_scale { v.ln() } else { *v })
        }
        (ParamValue::Int(v), Distribution::Int(d)) => Some(if d.log_scale {
            (*v as f64).ln()
        } else {
            *v as f64
        }),
        (ParamValue::Categorical(i), Distribution::Categorical(d)) if *i < d.n_choices => {
            Some(*i as f64 + 0.5)
        }
        _ => None,
    }
}

/// Sample a random value for any distribution.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub(crate) fn sample_random(rng: &mut fastrand::Rng, distribution: &Distribution) -> ParamValue {
    match distribution {
        Distribution::Float(d) => {
            let value = if d.log_scale {
                let v = rng_util::f64_range(rng, d.low.ln(), d.high.ln()).exp();
                match d.step {
                    Some(step) => snap_float(v, d.low, d.high, step).clamp(d.low, d.high),
                    None => v,
                }
            } else if let Some(step) = d.step {
                let k = rng.i64(0..=float_steps(d.low, d.high, step));
                d.low + (k as f64) * step
            } else {
                rng_util::f64_range(rng, d.low, d.high)
            };
            ParamValue::Float(value)
        }
        Distribution::Int(d) => {
            let value = if d.log_scale {
                let v = rng_util::f64_range(rng, (d.low as f64).ln(), (d.high as f64).ln()).exp();
                let raw = match d.step {
                    Some(step) => snap_int(v, d.low, d.high, step),
                    None => v.round() as i64,
                };
                raw.clamp(d.low, d.high)
            } else if let Some(step) = d.step {
                let step = step.max(1);
                let k = rng.i64(0..=(d.high - d.low).max(0) / step);
                d.low + k * step
            } else {
                rng.i64(d.low..=d.high)
            };
            ParamValue::Int(value)
        }
        Distribution::Categorical(d) => ParamValue::Categorical(rng.usize(0..d.n_choices)),
    }
}
