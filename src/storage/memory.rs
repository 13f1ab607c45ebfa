use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{ConfigurationRecord, PreferenceStore};
use crate::error::{Error, Result};
use crate::search_space::{Configuration, SearchSpace};
use crate::types::TrialState;

#[derive(Debug, Default)]
struct Inner {
    records: Vec<ConfigurationRecord>,
    preferences: Vec<(usize, usize)>,
    skipped: BTreeSet<usize>,
}

/// In-memory store (the default).
///
/// A thin wrapper around `Arc<RwLock<…>>`; clones share the same data, so a
/// store can be handed to several studies or threads.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStorage {
    /// Creates a new, empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStorage {
    fn push_configuration(&self, params: Configuration, distributions: SearchSpace) -> usize {
        let mut inner = self.inner.write();
        let number = inner.records.len();
        inner.records.push(ConfigurationRecord {
            number,
            params,
            distributions,
            state: TrialState::Running,
        });
        number
    }

    fn read_configurations(&self, numbers: &[usize]) -> Result<Vec<ConfigurationRecord>> {
        let inner = self.inner.read();
        numbers
            .iter()
            .map(|&n| {
                inner
                    .records
                    .get(n)
                    .cloned()
                    .ok_or(Error::UnknownConfiguration(n))
            })
            .collect()
    }

    fn read_all_configurations(&self) -> Vec<ConfigurationRecord> {
        self.inner.read().records.clone()
    }

    fn read_preferences(&self) -> Vec<(usize, usize)> {
        self.inner.read().preferences.clone()
    }

    fn report_preferences(&self, preferences: &[(usize, usize)]) -> Result<()> {
        let mut inner = self.inner.write();
        let n = inner.records.len();
        for &(better, worse) in preferences {
            if better == worse {
                return Err(Error::InvalidPreference {
                    better,
                    worse,
                    reason: "a configuration cannot be preferred over itself",
                });
            }
            if better >= n {
                return Err(Error::UnknownConfiguration(better));
            }
            if worse >= n {
                return Err(Error::UnknownConfiguration(worse));
            }
        }

        for &(better, worse) in preferences {
            inner.records[better].state = TrialState::Complete;
            inner.records[worse].state = TrialState::Complete;
        }
        inner.preferences.extend_from_slice(preferences);
        trace_debug!(
            n_reported = preferences.len(),
            n_total = inner.preferences.len(),
            "preferences recorded"
        );
        Ok(())
    }

    fn report_skip(&self, number: usize) -> Result<()> {
        let mut inner = self.inner.write();
        if number >= inner.records.len() {
            return Err(Error::UnknownConfiguration(number));
        }
        inner.skipped.insert(number);
        Ok(())
    }

    fn skipped(&self) -> Vec<usize> {
        self.inner.read().skipped.iter().copied().collect()
    }
}
