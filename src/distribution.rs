//! Parameter distribution types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::param::ParamValue;

/// Distribution for floating-point parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FloatDistribution {
    /// Lower bound (inclusive).
    pub low: f64,
    /// Upper bound (inclusive).
    pub high: f64,
    /// Whether to sample in log space.
    pub log_scale: bool,
    /// Optional step size for discretization.
    pub step: Option<f64>,
}

/// Distribution for integer parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntDistribution {
    /// Lower bound (inclusive).
    pub low: i64,
    /// Upper bound (inclusive).
    pub high: i64,
    /// Whether to sample in log space.
    pub log_scale: bool,
    /// Optional step size for discretization.
    pub step: Option<i64>,
}

/// Distribution for categorical parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CategoricalDistribution {
    /// Number of choices available.
    pub n_choices: usize,
}

/// Enum wrapping all parameter distribution types.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Distribution {
    /// A floating-point distribution.
    Float(FloatDistribution),
    /// An integer distribution.
    Int(IntDistribution),
    /// A categorical distribution.
    Categorical(CategoricalDistribution),
}

impl Distribution {
    /// Returns `true` for categorical distributions.
    #[must_use]
    pub fn is_categorical(&self) -> bool {
        matches!(self, Self::Categorical(_))
    }

    /// Whether `value` has this distribution's variant and lies within its
    /// bounds.
    #[must_use]
    pub fn contains(&self, value: &ParamValue) -> bool {
        match (self, value) {
            (Self::Float(d), ParamValue::Float(v)) => (d.low..=d.high).contains(v),
            (Self::Int(d), ParamValue::Int(v)) => (d.low..=d.high).contains(v),
            (Self::Categorical(d), ParamValue::Categorical(i)) => *i < d.n_choices,
            _ => false,
        }
    }

    /// Number of distinct values in a finite domain, or `None` for an
    /// unstepped float.
    ///
    /// Integer and stepped-float grids include the upper bound when it lies
    /// on the grid.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn n_values(&self) -> Option<usize> {
        match self {
            Self::Categorical(d) => Some(d.n_choices),
            Self::Int(d) => {
                let step = d.step.unwrap_or(1).max(1);
                let span = d.high.saturating_sub(d.low).max(0);
                usize::try_from(span / step).ok().map(|k| k.saturating_add(1))
            }
            Self::Float(d) => d.step.map(|step| {
                if step <= 0.0 || d.high < d.low {
                    1
                } else {
                    ((d.high - d.low) / step + 1e-9).floor() as usize + 1
                }
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_grid_includes_high() {
        let d = Distribution::Int(IntDistribution {
            low: 1,
            high: 10,
            log_scale: false,
            step: None,
        });
        assert_eq!(d.n_values(), Some(10));

        let stepped = Distribution::Int(IntDistribution {
            low: 0,
            high: 10,
            log_scale: false,
            step: Some(5),
        });
        assert_eq!(stepped.n_values(), Some(3));
    }

    #[test]
    fn float_grid_size() {
        let d = Distribution::Float(FloatDistribution {
            low: 0.0,
            high: 1.0,
            log_scale: false,
            step: Some(0.25),
        });
        assert_eq!(d.n_values(), Some(5));

        let continuous = Distribution::Float(FloatDistribution {
            low: 0.0,
            high: 1.0,
            log_scale: false,
            step: None,
        });
        assert_eq!(continuous.n_values(), None);
    }

    #[test]
    fn contains_checks_variant_and_bounds() {
        let d = Distribution::Int(IntDistribution {
            low: 1,
            high: 5,
            log_scale: false,
            step: None,
        });
        assert!(d.contains(&ParamValue::Int(5)));
        assert!(!d.contains(&ParamValue::Int(6)));
        assert!(!d.contains(&ParamValue::Float(3.0)));

        let c = Distribution::Categorical(CategoricalDistribution { n_choices: 2 });
        assert!(c.contains(&ParamValue::Categorical(1)));
        assert!(!c.contains(&ParamValue::Categorical(2)));
    }

    #[test]
    fn categorical_size() {
        let d = Distribution::Categorical(CategoricalDistribution { n_choices: 4 });
        assert!(d.is_categorical());
        assert_eq!(d.n_values(), Some(4));
    }
}
