//! Bidirectional mapping between configurations and the unit box.

use super::{Configuration, SearchSpace};
use crate::distribution::Distribution;
use crate::error::{Error, Result};
use crate::sampler::common::{from_internal, internal_bounds, to_internal};

/// Encoder/decoder for one search space.
///
/// Each parameter becomes one dimension in `[0, 1]`, in name order:
/// continuous and integer parameters are normalized by their (log-scaled,
/// half-step-widened) bounds, categorical parameters by the centre of their
/// index cell.
///
/// # Examples
///
/// ```
/// use pref_optimizer::parameter::{FloatParam, Parameter};
/// use pref_optimizer::search_space::{Configuration, SearchSpace, SearchSpaceTransform};
/// use pref_optimizer::ParamValue;
///
/// let space = SearchSpace::new().with(&FloatParam::new("x", 0.0, 10.0)).unwrap();
/// let transform = SearchSpaceTransform::new(&space).unwrap();
///
/// let mut config = Configuration::new();
/// config.insert("x", ParamValue::Float(2.5));
/// let encoded = transform.encode(&config).unwrap();
/// assert_eq!(encoded, vec![0.25]);
/// assert_eq!(transform.decode(&encoded).unwrap(), config);
/// ```
#[derive(Clone, Debug)]
pub struct SearchSpaceTransform {
    names: Vec<String>,
    distributions: Vec<Distribution>,
    bounds: Vec<(f64, f64)>,
}

impl SearchSpaceTransform {
    /// Builds the transform for `search_space`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLogBounds`] for a log-scaled parameter with a
    /// non-positive lower bound.
    pub fn new(search_space: &SearchSpace) -> Result<Self> {
        let mut names = Vec::with_capacity(search_space.len());
        let mut distributions = Vec::with_capacity(search_space.len());
        let mut bounds = Vec::with_capacity(search_space.len());
        for (name, dist) in search_space.iter() {
            names.push(name.to_owned());
            distributions.push(dist.clone());
            bounds.push(internal_bounds(dist).ok_or(Error::InvalidLogBounds)?);
        }
        Ok(Self {
            names,
            distributions,
            bounds,
        })
    }

    /// Dimensionality of the encoded vector.
    #[must_use]
    pub fn n_dims(&self) -> usize {
        self.names.len()
    }

    /// Parameter names, in dimension order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Distributions, in dimension order.
    #[must_use]
    pub fn distributions(&self) -> &[Distribution] {
        &self.distributions
    }

    /// Encodes a configuration that covers exactly this search space.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownParameter`] if the configuration has a name outside the space.
    /// - [`Error::MissingParameter`] if a parameter of the space has no value.
    /// - [`Error::ValueMismatch`] if a value does not fit its distribution.
    pub fn encode(&self, configuration: &Configuration) -> Result<Vec<f64>> {
        if let Some((name, _)) = configuration
            .iter()
            .find(|(name, _)| self.names.binary_search_by(|n| n.as_str().cmp(*name)).is_err())
        {
            return Err(Error::UnknownParameter {
                name: name.to_owned(),
            });
        }

        self.names
            .iter()
            .zip(&self.distributions)
            .zip(&self.bounds)
            .map(|((name, dist), &(lo, hi))| {
                let value = configuration
                    .get(name)
                    .ok_or_else(|| Error::MissingParameter { name: name.clone() })?;
                let internal = to_internal(value, dist).ok_or_else(|| Error::ValueMismatch {
                    name: name.clone(),
                    reason: format!("{} value does not fit {dist:?}", value.kind()),
                })?;
                Ok(to_normalized(internal, lo, hi))
            })
            .collect()
    }

    /// Decodes a vector of length [`n_dims`](Self::n_dims).
    ///
    /// Coordinates are clamped into `[0, 1]` before mapping back.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if the vector length is wrong.
    pub fn decode(&self, encoded: &[f64]) -> Result<Configuration> {
        if encoded.len() != self.n_dims() {
            return Err(Error::Internal("encoded vector length does not match search space"));
        }
        Ok(self
            .names
            .iter()
            .zip(&self.distributions)
            .zip(&self.bounds)
            .zip(encoded)
            .map(|(((name, dist), &(lo, hi)), &u)| {
                let internal = from_normalized(u.clamp(0.0, 1.0), lo, hi);
                (name.clone(), from_internal(internal, dist))
            })
            .collect())
    }
}

/// Convert an internal-space value to normalized [0, 1] using bounds.
fn to_normalized(value: f64, lo: f64, hi: f64) -> f64 {
    if (hi - lo).abs() < 1e-15 {
        0.5
    } else {
        (value - lo) / (hi - lo)
    }
}

/// Convert a normalized [0, 1] value back to internal space.
fn from_normalized(value: f64, lo: f64, hi: f64) -> f64 {
    lo + value * (hi - lo)
}
