//! Box-constrained L-BFGS on top of `argmin`.
//!
//! The objective is evaluated at the projection of `x` onto the box plus a
//! quadratic penalty on the distance to it, so the unconstrained solver
//! never leaves a region where the objective is defined.

use core::cell::RefCell;

use argmin::core::{CostFunction, Executor, Gradient, State};
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::quasinewton::LBFGS;
use finitediff::FiniteDiff;

use crate::error::Error;

/// History length of the L-BFGS solver.
const LBFGS_MEMORY: usize = 7;

type Lbfgs = LBFGS<MoreThuenteLineSearch<Vec<f64>, Vec<f64>, f64>, Vec<f64>, Vec<f64>, f64>;

/// An objective on the box `[lower, upper]` exposed as an `argmin` problem.
pub(crate) struct BoundedProblem<F> {
    objective: F,
    lower: Vec<f64>,
    upper: Vec<f64>,
    penalty: f64,
}

impl<F> BoundedProblem<F>
where
    F: Fn(&[f64]) -> crate::Result<f64>,
{
    pub(crate) fn new(objective: F, lower: Vec<f64>, upper: Vec<f64>, penalty: f64) -> Self {
        Self {
            objective,
            lower,
            upper,
            penalty,
        }
    }

    /// Clamps `x` into the box.
    pub(crate) fn project(&self, x: &[f64]) -> Vec<f64> {
        x.iter()
            .zip(self.lower.iter().zip(&self.upper))
            .map(|(&v, (&lo, &hi))| v.clamp(lo, hi))
            .collect()
    }

    fn penalized(&self, x: &[f64]) -> crate::Result<f64> {
        let p = self.project(x);
        let dist: f64 = x.iter().zip(&p).map(|(a, b)| (a - b) * (a - b)).sum();
        Ok((self.objective)(&p)? + self.penalty * dist)
    }
}

impl<F> CostFunction for BoundedProblem<F>
where
    F: Fn(&[f64]) -> crate::Result<f64>,
{
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        Ok(self.penalized(x)?)
    }
}

impl<F> Gradient for BoundedProblem<F>
where
    F: Fn(&[f64]) -> crate::Result<f64>,
{
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(&self, x: &Self::Param) -> Result<Self::Gradient, argmin::core::Error> {
        // central_diff wants an f64 closure; park the first failure and
        // surface it afterwards
        let failure: RefCell<Option<Error>> = RefCell::new(None);
        let cost = |x: &Vec<f64>| -> f64 {
            match self.penalized(x) {
                Ok(v) => v,
                Err(e) => {
                    let mut slot = failure.borrow_mut();
                    if slot.is_none() {
                        *slot = Some(e);
                    }
                    f64::NAN
                }
            }
        };
        let grad = x.central_diff(&cost);
        if let Some(e) = failure.take() {
            return Err(e.into());
        }
        if grad.iter().any(|g| !g.is_finite()) {
            return Err(Error::Internal("non-finite gradient").into());
        }
        Ok(grad)
    }
}

/// Runs L-BFGS from `x0` for at most `max_iters` iterations and returns the
/// best point found, projected into the box.
pub(crate) fn minimize<F>(
    problem: BoundedProblem<F>,
    x0: Vec<f64>,
    max_iters: u64,
) -> Result<Vec<f64>, argmin::core::Error>
where
    F: Fn(&[f64]) -> crate::Result<f64>,
{
    let (lower, upper) = (problem.lower.clone(), problem.upper.clone());
    let solver: Lbfgs = LBFGS::new(MoreThuenteLineSearch::new(), LBFGS_MEMORY);
    let res = Executor::new(problem, solver)
        .configure(|state| state.param(x0).max_iters(max_iters))
        .run()?;
    let best = res
        .state()
        .get_best_param()
        .ok_or(Error::Internal("optimizer returned no parameter"))?;
    Ok(best
        .iter()
        .zip(lower.iter().zip(&upper))
        .map(|(&v, (&lo, &hi))| v.clamp(lo, hi))
        .collect())
}
