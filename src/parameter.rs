//! Central parameter trait and built-in parameter types.
//!
//! A [`Parameter`] is a named, typed view of one search-space dimension.
//! Parameters are used to assemble a [`SearchSpace`] and to read typed
//! values back out of a proposed [`Configuration`].
//!
//! # Example
//!
//! ```
//! use pref_optimizer::parameter::{BoolParam, CategoricalParam, FloatParam, IntParam, Parameter};
//! use pref_optimizer::search_space::SearchSpace;
//!
//! let lr = FloatParam::new("lr", 1e-5, 1e-1).log_scale();
//! let layers = IntParam::new("layers", 1, 10);
//! let act = CategoricalParam::new("activation", vec!["relu", "tanh"]);
//! let dropout = BoolParam::new("dropout");
//!
//! let space = SearchSpace::new()
//!     .with(&lr)
//!     .and_then(|s| s.with(&layers))
//!     .and_then(|s| s.with(&act))
//!     .and_then(|s| s.with(&dropout))
//!     .unwrap();
//! assert_eq!(space.len(), 4);
//! ```

use core::fmt::Debug;

use crate::distribution::{
    CategoricalDistribution, Distribution, FloatDistribution, IntDistribution,
};
use crate::error::{Error, Result};
use crate::param::ParamValue;
use crate::search_space::Configuration;

/// A trait for named parameter types.
///
/// Implementors specify the distribution of their dimension and how to
/// convert the raw [`ParamValue`] back into a typed value.
pub trait Parameter: Debug {
    /// The typed value read back from a configuration.
    type Value;

    /// The parameter name; the key in search spaces and configurations.
    fn name(&self) -> &str;

    /// Returns the distribution that this parameter samples from.
    fn distribution(&self) -> Distribution;

    /// Converts a raw [`ParamValue`] into the typed value.
    ///
    /// # Errors
    ///
    /// Returns an error if the `ParamValue` variant doesn't match what this parameter expects.
    fn cast_param_value(&self, param_value: &ParamValue) -> Result<Self::Value>;

    /// Validates the parameter configuration.
    ///
    /// The default implementation accepts all configurations.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter configuration is invalid.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Reads this parameter's typed value from a configuration.
    ///
    /// Returns `Ok(None)` when the configuration does not contain the name.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored value has the wrong variant.
    fn get(&self, configuration: &Configuration) -> Result<Option<Self::Value>> {
        configuration
            .get(self.name())
            .map(|v| self.cast_param_value(v))
            .transpose()
    }
}

fn mismatch(name: &str, expected: &str, got: &ParamValue) -> Error {
    Error::ValueMismatch {
        name: name.to_owned(),
        reason: format!("expected {expected} value, got {}", got.kind()),
    }
}

/// A floating-point parameter with optional log-scale and step size.
///
/// # Example
///
/// ```
/// use pref_optimizer::parameter::{FloatParam, Parameter};
///
/// let x = FloatParam::new("x", 0.0, 1.0);
/// let lr = FloatParam::new("lr", 1e-5, 1e-1).log_scale();
/// let quarter = FloatParam::new("q", 0.0, 1.0).step(0.25);
/// assert!(quarter.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct FloatParam {
    name: String,
    low: f64,
    high: f64,
    log_scale: bool,
    step: Option<f64>,
}

impl FloatParam {
    /// Creates a new float parameter with the given bounds.
    #[must_use]
    pub fn new(name: impl Into<String>, low: f64, high: f64) -> Self {
        Self {
            name: name.into(),
            low,
            high,
            log_scale: false,
            step: None,
        }
    }

    /// Enables log-scale encoding and sampling.
    #[must_use]
    pub fn log_scale(mut self) -> Self {
        self.log_scale = true;
        self
    }

    /// Sets a step size, which makes the domain finite.
    #[must_use]
    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }
}

impl Parameter for FloatParam {
    type Value = f64;

    fn name(&self) -> &str {
        &self.name
    }

    fn distribution(&self) -> Distribution {
        Distribution::Float(FloatDistribution {
            low: self.low,
            high: self.high,
            log_scale: self.log_scale,
            step: self.step,
        })
    }

    fn cast_param_value(&self, param_value: &ParamValue) -> Result<f64> {
        match param_value {
            ParamValue::Float(v) => Ok(*v),
            other => Err(mismatch(&self.name, "float", other)),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.low > self.high {
            return Err(Error::InvalidBounds {
                low: self.low,
                high: self.high,
            });
        }
        if self.log_scale && self.low <= 0.0 {
            return Err(Error::InvalidLogBounds);
        }
        if let Some(step) = self.step
            && step <= 0.0
        {
            return Err(Error::InvalidStep);
        }
        Ok(())
    }
}

/// An integer parameter with optional log-scale and step size.
///
/// # Example
///
/// ```
/// use pref_optimizer::parameter::{IntParam, Parameter};
///
/// let n = IntParam::new("n", 1, 10);
/// let batch = IntParam::new("batch", 1, 1024).log_scale();
/// let units = IntParam::new("units", 32, 512).step(32);
/// assert!(units.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct IntParam {
    name: String,
    low: i64,
    high: i64,
    log_scale: bool,
    step: Option<i64>,
}

impl IntParam {
    /// Creates a new integer parameter with the given bounds.
    #[must_use]
    pub fn new(name: impl Into<String>, low: i64, high: i64) -> Self {
        Self {
            name: name.into(),
            low,
            high,
            log_scale: false,
            step: None,
        }
    }

    /// Enables log-scale encoding and sampling.
    #[must_use]
    pub fn log_scale(mut self) -> Self {
        self.log_scale = true;
        self
    }

    /// Sets a step size.
    #[must_use]
    pub fn step(mut self, step: i64) -> Self {
        self.step = Some(step);
        self
    }
}

impl Parameter for IntParam {
    type Value = i64;

    fn name(&self) -> &str {
        &self.name
    }

    fn distribution(&self) -> Distribution {
        Distribution::Int(IntDistribution {
            low: self.low,
            high: self.high,
            log_scale: self.log_scale,
            step: self.step,
        })
    }

    fn cast_param_value(&self, param_value: &ParamValue) -> Result<i64> {
        match param_value {
            ParamValue::Int(v) => Ok(*v),
            other => Err(mismatch(&self.name, "int", other)),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn validate(&self) -> Result<()> {
        if self.low > self.high {
            return Err(Error::InvalidBounds {
                low: self.low as f64,
                high: self.high as f64,
            });
        }
        if self.log_scale && self.low < 1 {
            return Err(Error::InvalidLogBounds);
        }
        if let Some(step) = self.step
            && step <= 0
        {
            return Err(Error::InvalidStep);
        }
        Ok(())
    }
}

/// A categorical parameter that selects from a list of choices.
///
/// # Example
///
/// ```
/// use pref_optimizer::parameter::{CategoricalParam, Parameter};
/// use pref_optimizer::ParamValue;
///
/// let opt = CategoricalParam::new("optimizer", vec!["sgd", "adam", "rmsprop"]);
/// assert_eq!(opt.cast_param_value(&ParamValue::Categorical(1)).unwrap(), "adam");
/// ```
#[derive(Clone, Debug)]
pub struct CategoricalParam<T: Clone> {
    name: String,
    choices: Vec<T>,
}

impl<T: Clone> CategoricalParam<T> {
    /// Creates a new categorical parameter with the given choices.
    #[must_use]
    pub fn new(name: impl Into<String>, choices: Vec<T>) -> Self {
        Self {
            name: name.into(),
            choices,
        }
    }

    /// The available choices, in index order.
    #[must_use]
    pub fn choices(&self) -> &[T] {
        &self.choices
    }
}

impl<T: Clone + Debug> Parameter for CategoricalParam<T> {
    type Value = T;

    fn name(&self) -> &str {
        &self.name
    }

    fn distribution(&self) -> Distribution {
        Distribution::Categorical(CategoricalDistribution {
            n_choices: self.choices.len(),
        })
    }

    fn cast_param_value(&self, param_value: &ParamValue) -> Result<T> {
        match param_value {
            ParamValue::Categorical(index) => {
                self.choices
                    .get(*index)
                    .cloned()
                    .ok_or_else(|| Error::ValueMismatch {
                        name: self.name.clone(),
                        reason: format!(
                            "choice index {index} out of range for {} choices",
                            self.choices.len()
                        ),
                    })
            }
            other => Err(mismatch(&self.name, "categorical", other)),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.choices.is_empty() {
            return Err(Error::EmptyChoices);
        }
        Ok(())
    }
}

/// A boolean parameter (equivalent to a categorical with `[false, true]`).
#[derive(Clone, Debug)]
pub struct BoolParam {
    name: String,
}

impl BoolParam {
    /// Creates a new boolean parameter.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Parameter for BoolParam {
    type Value = bool;

    fn name(&self) -> &str {
        &self.name
    }

    fn distribution(&self) -> Distribution {
        Distribution::Categorical(CategoricalDistribution { n_choices: 2 })
    }

    fn cast_param_value(&self, param_value: &ParamValue) -> Result<bool> {
        match param_value {
            ParamValue::Categorical(0) => Ok(false),
            ParamValue::Categorical(1) => Ok(true),
            other => Err(mismatch(&self.name, "boolean", other)),
        }
    }
}
