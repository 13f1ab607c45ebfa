//! Configuration and preference storage.
//!
//! The [`PreferenceStore`] trait is the boundary between the sampling engine
//! and whatever persists configurations and pairwise judgments. The engine
//! re-reads the full preference set on every refit and never caches it.
//!
//! # Available backends
//!
//! | Backend | Description |
//! |---------|-------------|
//! | [`MemoryStorage`] | In-memory records and preferences behind one read-write lock |
//!
//! # Implementing a custom backend
//!
//! A backend shared by several processes must make
//! [`report_preferences`](PreferenceStore::report_preferences) atomic: the
//! appended pairs and the state change of every referenced configuration
//! become visible together, so no two workers count the same judgment twice.

mod memory;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use memory::MemoryStorage;

use crate::error::Result;
use crate::search_space::{Configuration, SearchSpace};
use crate::types::TrialState;

/// A stored configuration together with the search space it was drawn from.
///
/// Records are immutable once pushed except for their `state`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConfigurationRecord {
    /// Store-assigned number, dense from zero in push order.
    pub number: usize,
    /// The proposed parameter values.
    pub params: Configuration,
    /// The distribution of every parameter in `params`.
    pub distributions: SearchSpace,
    /// Lifecycle state.
    pub state: TrialState,
}

/// Trait for storing configurations and pairwise preferences.
///
/// Implementations must be `Send + Sync`; one store may back several
/// studies running on different threads.
pub trait PreferenceStore: Send + Sync {
    /// Append a configuration in [`TrialState::Running`] and return its number.
    fn push_configuration(&self, params: Configuration, distributions: SearchSpace) -> usize;

    /// Read the records with the given numbers, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownConfiguration`](crate::Error::UnknownConfiguration)
    /// for a number that was never pushed.
    fn read_configurations(&self, numbers: &[usize]) -> Result<Vec<ConfigurationRecord>>;

    /// Read every record, ordered by number.
    fn read_all_configurations(&self) -> Vec<ConfigurationRecord>;

    /// Every `(better, worse)` pair committed so far, in report order.
    fn read_preferences(&self) -> Vec<(usize, usize)>;

    /// Append preferences and mark both sides of each pair `Complete`.
    ///
    /// All pairs are validated before anything is written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownConfiguration`](crate::Error::UnknownConfiguration)
    /// or [`Error::InvalidPreference`](crate::Error::InvalidPreference) when a
    /// pair references a missing configuration or compares one with itself.
    fn report_preferences(&self, preferences: &[(usize, usize)]) -> Result<()>;

    /// Mark a configuration as skipped by the evaluator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownConfiguration`](crate::Error::UnknownConfiguration)
    /// for a number that was never pushed.
    fn report_skip(&self, number: usize) -> Result<()>;

    /// Numbers of skipped configurations, ascending.
    fn skipped(&self) -> Vec<usize>;
}
