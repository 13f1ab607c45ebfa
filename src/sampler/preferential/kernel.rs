//! Matérn covariance over encoded points and the preference-space precision.

use nalgebra::DMatrix;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Precomputed √3 constant.
const SQRT_3: f64 = 1.732_050_807_568_877_2;
/// Precomputed √5 constant.
const SQRT_5: f64 = 2.236_067_977_499_79;

/// Smoothness of the Matérn kernel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KernelKind {
    /// Matérn ν = 3/2: `(1 + √3 r) exp(-√3 r)`.
    #[default]
    Matern32,
    /// Matérn ν = 5/2: `(1 + √5 r + 5/3 r²) exp(-√5 r)`.
    Matern52,
}

/// Matérn kernel with ARD lengthscales and unit signal variance.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    kind: KernelKind,
    lengthscales: Vec<f64>,
}

impl Kernel {
    /// Creates a kernel with one lengthscale per encoded dimension.
    #[must_use]
    pub fn new(kind: KernelKind, lengthscales: Vec<f64>) -> Self {
        Self { kind, lengthscales }
    }

    /// The kernel family.
    #[must_use]
    pub fn kind(&self) -> KernelKind {
        self.kind
    }

    /// Per-dimension lengthscales.
    #[must_use]
    pub fn lengthscales(&self) -> &[f64] {
        &self.lengthscales
    }

    /// `k(x1, x2)`.
    #[must_use]
    pub fn eval(&self, x1: &[f64], x2: &[f64]) -> f64 {
        let r_sq: f64 = x1
            .iter()
            .zip(x2)
            .zip(&self.lengthscales)
            .map(|((a, b), l)| {
                let d = (a - b) / l;
                d * d
            })
            .sum();
        let r = r_sq.sqrt();
        match self.kind {
            KernelKind::Matern32 => {
                let s = SQRT_3 * r;
                (1.0 + s) * (-s).exp()
            }
            KernelKind::Matern52 => {
                let s = SQRT_5 * r;
                (1.0 + s + 5.0 / 3.0 * r_sq) * (-s).exp()
            }
        }
    }

    /// Gram matrix `K[i, j] = k(x_i, x_j)`.
    #[must_use]
    pub fn matrix(&self, points: &[Vec<f64>]) -> DMatrix<f64> {
        let n = points.len();
        let mut k = DMatrix::zeros(n, n);
        for i in 0..n {
            k[(i, i)] = 1.0;
            for j in 0..i {
                let v = self.eval(&points[i], &points[j]);
                k[(i, j)] = v;
                k[(j, i)] = v;
            }
        }
        k
    }

    /// Cross-covariance `C[i, j] = k(a_i, b_j)`.
    #[must_use]
    pub fn cross(&self, a: &[Vec<f64>], b: &[Vec<f64>]) -> DMatrix<f64> {
        DMatrix::from_fn(a.len(), b.len(), |i, j| self.eval(&a[i], &b[j]))
    }
}

/// `(A K Aᵀ + s·I)⁻¹` for the ±1 incidence matrix `A` of `pairs`.
///
/// Uses
///
/// ```text
/// (sI + A K Aᵀ)⁻¹ = s⁻¹I − s⁻² A K (I + s⁻¹ AᵀA K)⁻¹ Aᵀ
/// ```
///
/// so only one `N×N` system is solved for `N` points, however many
/// preferences there are. The result is symmetrized.
///
/// # Errors
///
/// Returns [`Error::SingularMatrix`] if `I + s⁻¹ AᵀA K` cannot be factorized.
pub fn pairwise_precision(
    k: &DMatrix<f64>,
    pairs: &[(usize, usize)],
    noise_var: f64,
) -> Result<DMatrix<f64>> {
    let n = k.nrows();
    let m = pairs.len();
    let inv_s = 1.0 / noise_var;

    // B = I + s⁻¹ AᵀA K, built row by row from the rows of A K
    let mut b = DMatrix::<f64>::identity(n, n);
    for &(better, worse) in pairs {
        for c in 0..n {
            let ak = (k[(better, c)] - k[(worse, c)]) * inv_s;
            b[(better, c)] += ak;
            b[(worse, c)] -= ak;
        }
    }

    // X = K B⁻¹, solved as Bᵀ Xᵀ = K (K is symmetric)
    let xt = b
        .transpose()
        .lu()
        .solve(k)
        .ok_or(Error::SingularMatrix("pairwise precision"))?;
    let x = xt.transpose();

    let inv_s2 = inv_s * inv_s;
    let mut p = DMatrix::from_fn(m, m, |i, j| {
        let (bi, wi) = pairs[i];
        let (bj, wj) = pairs[j];
        -(x[(bi, bj)] - x[(bi, wj)] - x[(wi, bj)] + x[(wi, wj)]) * inv_s2
    });
    for i in 0..m {
        p[(i, i)] += inv_s;
    }
    let p = (&p + p.transpose()) * 0.5;
    if p.iter().all(|v| v.is_finite()) {
        Ok(p)
    } else {
        Err(Error::SingularMatrix("pairwise precision"))
    }
}
