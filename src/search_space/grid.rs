//! Exhaustive enumeration of finite search spaces.

use super::{Configuration, SearchSpace};
use crate::distribution::Distribution;
use crate::param::ParamValue;

/// Size of the Cartesian product of `search_space`, or `None` if any
/// parameter has a continuous domain.
///
/// Returned as `f64` so products of large domains saturate instead of
/// overflowing.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn grid_size(search_space: &SearchSpace) -> Option<f64> {
    search_space
        .iter()
        .map(|(_, dist)| dist.n_values().map(|n| n as f64))
        .try_fold(1.0, |acc, n| n.map(|n| acc * n))
}

/// Every value of a finite domain, in ascending order.
#[allow(clippy::cast_precision_loss)]
fn discrete_values(distribution: &Distribution) -> Option<Vec<ParamValue>> {
    match distribution {
        Distribution::Categorical(d) => Some((0..d.n_choices).map(ParamValue::Categorical).collect()),
        Distribution::Int(d) => {
            let step = d.step.unwrap_or(1).max(1);
            let mut values = Vec::new();
            let mut v = d.low;
            while v <= d.high {
                values.push(ParamValue::Int(v));
                match v.checked_add(step) {
                    Some(next) => v = next,
                    None => break,
                }
            }
            Some(values)
        }
        Distribution::Float(d) => {
            let n = distribution.n_values()?;
            let step = d.step?;
            Some(
                (0..n)
                    .map(|k| ParamValue::Float((d.low + k as f64 * step).min(d.high)))
                    .collect(),
            )
        }
    }
}

/// Iterator over the Cartesian product of a finite search space.
///
/// Yields every combination exactly once, with the first parameter (in name
/// order) varying slowest. Callers must bound the size with [`grid_size`]
/// before materializing a grid.
///
/// # Examples
///
/// ```
/// use pref_optimizer::parameter::{BoolParam, IntParam};
/// use pref_optimizer::search_space::{DiscreteGrid, SearchSpace};
///
/// let space = SearchSpace::new()
///     .with(&BoolParam::new("flag"))
///     .and_then(|s| s.with(&IntParam::new("n", 1, 3)))
///     .unwrap();
/// let grid = DiscreteGrid::new(&space).unwrap();
/// assert_eq!(grid.count(), 6);
/// ```
#[derive(Clone, Debug)]
pub struct DiscreteGrid {
    names: Vec<String>,
    values: Vec<Vec<ParamValue>>,
    cursor: Vec<usize>,
    exhausted: bool,
}

impl DiscreteGrid {
    /// Builds the grid, or `None` if any parameter is continuous.
    #[must_use]
    pub fn new(search_space: &SearchSpace) -> Option<Self> {
        let mut names = Vec::with_capacity(search_space.len());
        let mut values = Vec::with_capacity(search_space.len());
        for (name, dist) in search_space.iter() {
            names.push(name.to_owned());
            values.push(discrete_values(dist)?);
        }
        let exhausted = values.iter().any(Vec::is_empty);
        Some(Self {
            cursor: vec![0; names.len()],
            names,
            values,
            exhausted,
        })
    }
}

impl Iterator for DiscreteGrid {
    type Item = Configuration;

    fn next(&mut self) -> Option<Configuration> {
        if self.exhausted {
            return None;
        }
        let item = self
            .names
            .iter()
            .zip(&self.values)
            .zip(&self.cursor)
            .map(|((name, vals), &i)| (name.clone(), vals[i].clone()))
            .collect();

        // odometer advance, last dimension fastest
        self.exhausted = true;
        for dim in (0..self.cursor.len()).rev() {
            self.cursor[dim] += 1;
            if self.cursor[dim] < self.values[dim].len() {
                self.exhausted = false;
                break;
            }
            self.cursor[dim] = 0;
        }
        Some(item)
    }
}
