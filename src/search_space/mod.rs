//! Search spaces, configurations and the encoder between them and the unit box.
//!
//! A [`SearchSpace`] maps parameter names to [`Distribution`]s and a
//! [`Configuration`] maps the same names to [`ParamValue`]s. Both are ordered
//! by name, which fixes the dimension order of encoded vectors.
//!
//! - [`SearchSpaceTransform`] encodes configurations into `[0, 1]^d` and
//!   decodes vectors back.
//! - [`IntersectionSearchSpace`] finds the parameters shared by every
//!   judged configuration.
//! - [`DiscreteGrid`] enumerates finite search spaces.

mod grid;
mod intersection;
mod transform;

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use grid::{DiscreteGrid, grid_size};
pub use intersection::IntersectionSearchSpace;
pub use transform::SearchSpaceTransform;

use crate::distribution::Distribution;
use crate::error::{Error, Result};
use crate::param::ParamValue;
use crate::parameter::Parameter;

/// A named set of parameter distributions.
///
/// # Examples
///
/// ```
/// use pref_optimizer::parameter::{FloatParam, IntParam};
/// use pref_optimizer::search_space::SearchSpace;
///
/// let space = SearchSpace::new()
///     .with(&FloatParam::new("x", 0.0, 10.0))
///     .and_then(|s| s.with(&IntParam::new("n", 1, 5)))
///     .unwrap();
/// assert!(space.contains("x"));
/// assert_eq!(space.names().collect::<Vec<_>>(), ["n", "x"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchSpace {
    params: BTreeMap<String, Distribution>,
}

impl SearchSpace {
    /// Creates an empty search space.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a validated parameter, consuming and returning the space.
    ///
    /// # Errors
    ///
    /// Returns the parameter's validation error.
    pub fn with<P: Parameter>(mut self, param: &P) -> Result<Self> {
        param.validate()?;
        self.params
            .insert(param.name().to_owned(), param.distribution());
        Ok(self)
    }

    /// Inserts a raw distribution, returning the one it replaced.
    pub fn insert(&mut self, name: impl Into<String>, distribution: Distribution) -> Option<Distribution> {
        self.params.insert(name.into(), distribution)
    }

    /// Looks up the distribution of a parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Distribution> {
        self.params.get(name)
    }

    /// Returns `true` if the space contains `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if the space has no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterates `(name, distribution)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Distribution)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates parameter names in name order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    /// Parameters present in both spaces with identical distributions.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        self.params
            .iter()
            .filter(|(name, dist)| other.get(name) == Some(*dist))
            .map(|(name, dist)| (name.clone(), dist.clone()))
            .collect()
    }
}

impl FromIterator<(String, Distribution)> for SearchSpace {
    fn from_iter<I: IntoIterator<Item = (String, Distribution)>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

/// A named set of parameter values.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Configuration {
    params: BTreeMap<String, ParamValue>,
}

impl Configuration {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter value, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) -> Option<ParamValue> {
        self.params.insert(name.into(), value)
    }

    /// Looks up a parameter value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    /// Returns `true` if the configuration holds a value for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Number of parameter values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if no values are set. An empty relative proposal
    /// means "sample every parameter independently".
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterates `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Restricts the configuration to the parameters of `search_space`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParameter`] if a parameter of the space has no value.
    pub fn project(&self, search_space: &SearchSpace) -> Result<Self> {
        search_space
            .names()
            .map(|name| {
                self.params
                    .get(name)
                    .map(|v| (name.to_owned(), v.clone()))
                    .ok_or_else(|| Error::MissingParameter {
                        name: name.to_owned(),
                    })
            })
            .collect()
    }
}

impl FromIterator<(String, ParamValue)> for Configuration {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

impl Extend<(String, ParamValue)> for Configuration {
    fn extend<I: IntoIterator<Item = (String, ParamValue)>>(&mut self, iter: I) {
        self.params.extend(iter);
    }
}

/// Encodes `configuration` into the unit box of `search_space`.
///
/// # Errors
///
/// See [`SearchSpaceTransform::encode`].
pub fn encode(configuration: &Configuration, search_space: &SearchSpace) -> Result<Vec<f64>> {
    SearchSpaceTransform::new(search_space)?.encode(configuration)
}

/// Decodes a unit-box vector back into a configuration of `search_space`.
///
/// # Errors
///
/// See [`SearchSpaceTransform::decode`].
pub fn decode(encoded: &[f64], search_space: &SearchSpace) -> Result<Configuration> {
    SearchSpaceTransform::new(search_space)?.decode(encoded)
}
