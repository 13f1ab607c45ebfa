//! Reading recorded preferences as a comparison graph over point indices.

use std::collections::HashMap;

/// Directed comparison graph built from `(better, worse)` store numbers.
///
/// Every configuration referenced by at least one preference becomes a
/// point with a dense index, assigned in order of first appearance. Indices
/// are only meaningful for the graph they came from; rebuilding from a
/// differently ordered preference list may reassign them.
///
/// # Examples
///
/// ```
/// use pref_optimizer::preference::PreferenceGraph;
///
/// let graph = PreferenceGraph::from_preferences(&[(7, 3), (7, 5), (5, 3)]);
/// assert_eq!(graph.trial_numbers(), [7, 3, 5]);
/// assert_eq!(graph.pairs(), [(0, 1), (0, 2), (2, 1)]);
/// assert_eq!(graph.n_points(), 3);
/// assert_eq!(graph.n_preferences(), 3);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreferenceGraph {
    trial_numbers: Vec<usize>,
    pairs: Vec<(usize, usize)>,
}

impl PreferenceGraph {
    /// Builds the graph. Duplicate pairs are kept; each is a separate judgment.
    #[must_use]
    pub fn from_preferences(preferences: &[(usize, usize)]) -> Self {
        let mut index: HashMap<usize, usize> = HashMap::new();
        let mut trial_numbers = Vec::new();
        let mut point = |number: usize| {
            *index.entry(number).or_insert_with(|| {
                trial_numbers.push(number);
                trial_numbers.len() - 1
            })
        };
        let pairs = preferences
            .iter()
            .map(|&(better, worse)| {
                let b = point(better);
                (b, point(worse))
            })
            .collect();
        Self {
            trial_numbers,
            pairs,
        }
    }

    /// Store numbers of the referenced configurations, indexed by point.
    #[must_use]
    pub fn trial_numbers(&self) -> &[usize] {
        &self.trial_numbers
    }

    /// `(better, worse)` point-index pairs, one per preference.
    #[must_use]
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    /// Number of distinct points.
    #[must_use]
    pub fn n_points(&self) -> usize {
        self.trial_numbers.len()
    }

    /// Number of preferences.
    #[must_use]
    pub fn n_preferences(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` when no preference has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
