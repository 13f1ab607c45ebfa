/// Generate a random `f64` in the range `[low, high)`.
#[inline]
pub(crate) fn f64_range(rng: &mut fastrand::Rng, low: f64, high: f64) -> f64 {
    low + rng.f64() * (high - low)
}

/// Derive a child seed so nested samplers do not share a stream.
#[inline]
pub(crate) fn child_seed(rng: &mut fastrand::Rng) -> u64 {
    rng.u64(..)
}
