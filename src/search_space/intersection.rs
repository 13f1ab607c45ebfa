use super::SearchSpace;
use crate::storage::ConfigurationRecord;
use crate::types::TrialState;

/// Parameters shared by every judged configuration.
///
/// Only [`TrialState::Complete`] records take part. A parameter survives when
/// it appears in every such record with an identical distribution; if any two
/// records disagree on its distribution it is dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntersectionSearchSpace;

impl IntersectionSearchSpace {
    /// Computes the intersection over `records`.
    ///
    /// Returns an empty space when no record is complete.
    ///
    /// # Examples
    ///
    /// ```
    /// use pref_optimizer::parameter::{FloatParam, IntParam};
    /// use pref_optimizer::search_space::{Configuration, IntersectionSearchSpace, SearchSpace};
    /// use pref_optimizer::storage::{MemoryStorage, PreferenceStore};
    ///
    /// let store = MemoryStorage::new();
    /// let a = SearchSpace::new()
    ///     .with(&FloatParam::new("x", 0.0, 1.0))
    ///     .and_then(|s| s.with(&IntParam::new("n", 1, 3)))
    ///     .unwrap();
    /// let b = SearchSpace::new().with(&FloatParam::new("x", 0.0, 1.0)).unwrap();
    /// let first = store.push_configuration(Configuration::new(), a);
    /// let second = store.push_configuration(Configuration::new(), b);
    /// store.report_preferences(&[(first, second)]).unwrap();
    ///
    /// let common = IntersectionSearchSpace::calculate(&store.read_all_configurations());
    /// assert_eq!(common.names().collect::<Vec<_>>(), ["x"]);
    /// ```
    #[must_use]
    pub fn calculate(records: &[ConfigurationRecord]) -> SearchSpace {
        let mut complete = records.iter().filter(|r| r.state == TrialState::Complete);
        let Some(first) = complete.next() else {
            return SearchSpace::new();
        };
        complete.fold(first.distributions.clone(), |acc, record| {
            acc.intersect(&record.distributions)
        })
    }
}
