//! GP posterior conditioned on one sample of the preference differences.

use nalgebra::{DMatrix, DVector};

use super::kernel::{Kernel, pairwise_precision};
use crate::error::Result;

/// The surrogate handed to the acquisition step.
///
/// Treats the sampled difference vector `diff` as noisy observations of
/// `f(better_i) − f(worse_i)` and conditions the GP on them:
///
/// ```text
/// mean(x)     = c(x)ᵀ P diff
/// cov(x, x')  = k(x, x') − c(x)ᵀ P c(x')
/// ```
///
/// where `c(x)_i = k(x, better_i) − k(x, worse_i)` and `P` is the
/// pairwise precision.
#[derive(Clone, Debug)]
pub struct SampledGp {
    kernel: Kernel,
    points: Vec<Vec<f64>>,
    pairs: Vec<(usize, usize)>,
    noise_var: f64,
    precision: DMatrix<f64>,
    /// `P · diff`
    weights: DVector<f64>,
}

impl SampledGp {
    /// Builds the model.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SingularMatrix`](crate::Error::SingularMatrix) if the
    /// pairwise precision cannot be formed.
    pub fn new(
        kernel: Kernel,
        points: Vec<Vec<f64>>,
        pairs: Vec<(usize, usize)>,
        noise_var: f64,
        diff: &[f64],
    ) -> Result<Self> {
        let precision = pairwise_precision(&kernel.matrix(&points), &pairs, noise_var)?;
        Ok(Self::from_precision(kernel, points, pairs, noise_var, precision, diff))
    }

    /// Builds the model around an already computed pairwise precision.
    pub(crate) fn from_precision(
        kernel: Kernel,
        points: Vec<Vec<f64>>,
        pairs: Vec<(usize, usize)>,
        noise_var: f64,
        precision: DMatrix<f64>,
        diff: &[f64],
    ) -> Self {
        let weights = &precision * DVector::from_column_slice(diff);
        Self {
            kernel,
            points,
            pairs,
            noise_var,
            precision,
            weights,
        }
    }

    /// Encoded points the model was conditioned on.
    #[must_use]
    pub fn points(&self) -> &[Vec<f64>] {
        &self.points
    }

    /// Largest posterior mean over the conditioning points, the incumbent
    /// for expected improvement.
    #[must_use]
    pub fn best_mean(&self) -> f64 {
        self.points
            .iter()
            .map(|p| self.posterior_mean(p))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// The kernel with fitted lengthscales.
    #[must_use]
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Observation-noise variance.
    #[must_use]
    pub fn noise_var(&self) -> f64 {
        self.noise_var
    }

    /// Joint posterior over `queries`.
    ///
    /// With `with_noise`, the noise variance is added to the diagonal.
    #[must_use]
    pub fn posterior(&self, queries: &[Vec<f64>], with_noise: bool) -> (DVector<f64>, DMatrix<f64>) {
        let cross = self.kernel.cross(queries, &self.points);
        let c = DMatrix::from_fn(queries.len(), self.pairs.len(), |q, i| {
            let (b, w) = self.pairs[i];
            cross[(q, b)] - cross[(q, w)]
        });
        let mean = &c * &self.weights;
        let mut cov = self.kernel.matrix(queries) - &c * &self.precision * c.transpose();
        if with_noise {
            for i in 0..queries.len() {
                cov[(i, i)] += self.noise_var;
            }
        }
        (mean, cov)
    }

    /// Posterior mean and standard deviation at a single point.
    #[must_use]
    pub fn mean_and_std(&self, x: &[f64]) -> (f64, f64) {
        let c = self.pair_covariance(x);
        let mean = c.dot(&self.weights);
        let var = 1.0 - c.dot(&(&self.precision * &c));
        (mean, var.max(0.0).sqrt())
    }

    /// Posterior mean at a single point.
    #[must_use]
    pub fn posterior_mean(&self, x: &[f64]) -> f64 {
        self.pair_covariance(x).dot(&self.weights)
    }

    fn pair_covariance(&self, x: &[f64]) -> DVector<f64> {
        let k: Vec<f64> = self.points.iter().map(|p| self.kernel.eval(x, p)).collect();
        DVector::from_iterator(self.pairs.len(), self.pairs.iter().map(|&(b, w)| k[b] - k[w]))
    }
}
