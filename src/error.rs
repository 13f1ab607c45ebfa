/// Errors produced by search-space handling, the preference store boundary
/// and the preferential sampling engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the lower bound is greater than the upper bound.
    #[error("invalid bounds: low ({low}) must be less than or equal to high ({high})")]
    InvalidBounds {
        /// The lower bound value.
        low: f64,
        /// The upper bound value.
        high: f64,
    },

    /// Returned when log scale is used with non-positive bounds.
    #[error("invalid log bounds: low must be positive for log scale")]
    InvalidLogBounds,

    /// Returned when step size is not positive.
    #[error("invalid step: step must be positive")]
    InvalidStep,

    /// Returned when categorical choices are empty.
    #[error("categorical choices cannot be empty")]
    EmptyChoices,

    /// Returned when a configuration names a parameter the search space does not contain.
    #[error("unknown parameter '{name}': not part of the search space")]
    UnknownParameter {
        /// The name of the unexpected parameter.
        name: String,
    },

    /// Returned when a configuration lacks a parameter the search space requires.
    #[error("missing parameter '{name}': required by the search space")]
    MissingParameter {
        /// The name of the absent parameter.
        name: String,
    },

    /// Returned when a value does not fit its parameter's distribution.
    #[error("value mismatch for '{name}': {reason}")]
    ValueMismatch {
        /// The name of the offending parameter.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Returned when the encoded search space changes shape between calls.
    #[error(
        "dynamic search space is not supported: the model was fitted on {expected} dimensions \
         but the search space now has {got}"
    )]
    DynamicSearchSpace {
        /// Dimensionality the sampler state was created with.
        expected: usize,
        /// Dimensionality of the search space in the current call.
        got: usize,
    },

    /// Returned when a configuration number is not present in the store.
    #[error("unknown configuration number {0}")]
    UnknownConfiguration(usize),

    /// Returned when a reported preference is malformed.
    #[error("invalid preference ({better} over {worse}): {reason}")]
    InvalidPreference {
        /// The configuration reported as better.
        better: usize,
        /// The configuration reported as worse.
        worse: usize,
        /// Why the preference was rejected.
        reason: &'static str,
    },

    /// Returned when a sampler option is out of its valid range.
    #[error("invalid sampler option '{option}': {reason}")]
    InvalidOption {
        /// The builder option name.
        option: &'static str,
        /// Why the option was rejected.
        reason: &'static str,
    },

    /// Returned when a linear system in the covariance engine cannot be solved.
    #[error("singular matrix in {0}")]
    SingularMatrix(&'static str),

    /// Returned when an internal invariant is violated.
    #[error("internal error: {0}")]
    Internal(&'static str),
}

pub type Result<T> = core::result::Result<T, Error>;
