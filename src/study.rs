//! Study orchestration for preference-driven optimization.

use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::sampler::Sampler;
use crate::search_space::{Configuration, SearchSpace};
use crate::storage::{ConfigurationRecord, MemoryStorage, PreferenceStore};
use crate::types::TrialState;

/// A study drives a human-in-the-loop optimization: it proposes
/// configurations, records which ones an evaluator preferred, and tells the
/// caller when enough candidates are waiting for judgment.
///
/// The study owns the sampler's model state behind a mutex, so one study can
/// be shared between a generator thread and an evaluator thread.
///
/// # Examples
///
/// ```
/// use pref_optimizer::parameter::FloatParam;
/// use pref_optimizer::sampler::RandomSampler;
/// use pref_optimizer::search_space::SearchSpace;
/// use pref_optimizer::PreferentialStudy;
///
/// let study = PreferentialStudy::new(RandomSampler::with_seed(0), 2);
/// let space = SearchSpace::new().with(&FloatParam::new("x", 0.0, 1.0)).unwrap();
///
/// let a = study.ask(&space).unwrap();
/// let b = study.ask(&space).unwrap();
/// assert!(!study.should_generate());
///
/// study.report_preference(&[a.number], &[b.number]).unwrap();
/// assert!(study.should_generate());
/// assert_eq!(study.best_configurations().unwrap()[0].number, a.number);
/// ```
pub struct PreferentialStudy<S: Sampler> {
    storage: Arc<dyn PreferenceStore>,
    sampler: S,
    state: Mutex<S::State>,
    enqueued: Mutex<VecDeque<Configuration>>,
    n_generate: usize,
}

impl<S: Sampler> PreferentialStudy<S> {
    /// Creates a study backed by a fresh [`MemoryStorage`].
    ///
    /// `n_generate` is the number of unjudged candidates to keep in flight;
    /// see [`should_generate`](Self::should_generate).
    #[must_use]
    pub fn new(sampler: S, n_generate: usize) -> Self {
        Self::with_storage(sampler, n_generate, Arc::new(MemoryStorage::new()))
    }

    /// Creates a study on an existing store.
    #[must_use]
    pub fn with_storage(sampler: S, n_generate: usize, storage: Arc<dyn PreferenceStore>) -> Self {
        let state = Mutex::new(sampler.new_state());
        Self {
            storage,
            sampler,
            state,
            enqueued: Mutex::new(VecDeque::new()),
            n_generate,
        }
    }

    /// Proposes a configuration for `search_space` and records it as
    /// [`TrialState::Running`].
    ///
    /// Values from the oldest [enqueued](Self::enqueue) configuration come
    /// first. Remaining parameters shared by every judged configuration are
    /// proposed jointly by the sampler's relative step; the rest are sampled
    /// independently.
    ///
    /// # Errors
    ///
    /// - [`Error::ValueMismatch`] if an enqueued value does not fit its
    ///   distribution; the configuration stays queued.
    /// - Errors from the sampler's relative step, e.g.
    ///   [`Error::DynamicSearchSpace`].
    pub fn ask(&self, search_space: &SearchSpace) -> Result<ConfigurationRecord> {
        let fixed = self.take_enqueued(search_space)?;
        let relative = self
            .sampler
            .infer_relative_search_space(self.storage.as_ref())
            .intersect(search_space);

        let params = {
            let mut state = self.state.lock();
            let mut params = if relative.names().any(|name| !fixed.contains(name)) {
                self.sampler
                    .sample_relative(&mut state, self.storage.as_ref(), &relative)?
            } else {
                Configuration::new()
            };
            for (name, value) in fixed.iter() {
                params.insert(name, value.clone());
            }
            for (name, distribution) in search_space.iter() {
                if !params.contains(name) {
                    let value = self.sampler.sample_independent(&mut state, name, distribution);
                    params.insert(name, value);
                }
            }
            params
        };

        let number = self
            .storage
            .push_configuration(params.clone(), search_space.clone());
        trace_debug!(number, n_relative = relative.len(), "configuration generated");
        Ok(ConfigurationRecord {
            number,
            params,
            distributions: search_space.clone(),
            state: TrialState::Running,
        })
    }

    /// Queues fixed parameter values for a future [`ask`](Self::ask).
    ///
    /// Queued configurations are consumed in FIFO order, one per `ask`.
    /// Parameters missing from `params` are sampled as usual; names outside
    /// the asked search space are ignored.
    pub fn enqueue(&self, params: Configuration) {
        self.enqueued.lock().push_back(params);
    }

    /// Number of configurations waiting in the [`enqueue`](Self::enqueue) queue.
    #[must_use]
    pub fn n_enqueued(&self) -> usize {
        self.enqueued.lock().len()
    }

    /// Pops the oldest queued configuration, restricted to `search_space`.
    fn take_enqueued(&self, search_space: &SearchSpace) -> Result<Configuration> {
        let mut queue = self.enqueued.lock();
        let Some(front) = queue.front() else {
            return Ok(Configuration::new());
        };

        let mut fixed = Configuration::new();
        for (name, value) in front.iter() {
            match search_space.get(name) {
                Some(distribution) if distribution.contains(value) => {
                    fixed.insert(name, value.clone());
                }
                Some(distribution) => {
                    return Err(Error::ValueMismatch {
                        name: name.to_owned(),
                        reason: format!(
                            "enqueued {} value does not fit {distribution:?}",
                            value.kind()
                        ),
                    });
                }
                None => {
                    trace_debug!(param = name, "enqueued parameter not in the search space");
                }
            }
        }
        queue.pop_front();
        Ok(fixed)
    }

    /// Records that every configuration in `better` was preferred over every
    /// configuration in `worse`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownConfiguration`] or [`Error::InvalidPreference`]
    /// if any pair is rejected by the store; nothing is recorded then.
    pub fn report_preference(&self, better: &[usize], worse: &[usize]) -> Result<()> {
        let pairs: Vec<(usize, usize)> = better
            .iter()
            .flat_map(|&b| worse.iter().map(move |&w| (b, w)))
            .collect();
        self.storage.report_preferences(&pairs)
    }

    /// Marks a configuration as skipped; it will not count as a pending
    /// candidate or as a best configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownConfiguration`] if `number` was never generated.
    pub fn skip(&self, number: usize) -> Result<()> {
        self.storage.report_skip(number)
    }

    /// Every recorded preference as `(better, worse)` records, in report order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownConfiguration`] if the store holds a
    /// preference on a configuration it does not hold.
    pub fn preferences(&self) -> Result<Vec<(ConfigurationRecord, ConfigurationRecord)>> {
        let records = self.storage.read_all_configurations();
        let lookup = |n: usize| records.get(n).cloned().ok_or(Error::UnknownConfiguration(n));
        self.storage
            .read_preferences()
            .into_iter()
            .map(|(b, w)| Ok((lookup(b)?, lookup(w)?)))
            .collect()
    }

    /// Configurations preferred at least once and never judged worse,
    /// excluding skipped ones, ordered by number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownConfiguration`] if the store holds a
    /// preference on a configuration it does not hold.
    pub fn best_configurations(&self) -> Result<Vec<ConfigurationRecord>> {
        let preferences = self.storage.read_preferences();
        let worse: BTreeSet<usize> = preferences.iter().map(|&(_, w)| w).collect();
        let skipped: BTreeSet<usize> = self.storage.skipped().into_iter().collect();
        let best: Vec<usize> = preferences
            .iter()
            .map(|&(b, _)| b)
            .filter(|b| !worse.contains(b) && !skipped.contains(b))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        self.storage.read_configurations(&best)
    }

    /// Whether the caller should generate another candidate.
    ///
    /// True while fewer than `n_generate` configurations are still in play,
    /// i.e. running or complete, never judged worse and not skipped.
    #[must_use]
    pub fn should_generate(&self) -> bool {
        let worse: BTreeSet<usize> = self
            .storage
            .read_preferences()
            .into_iter()
            .map(|(_, w)| w)
            .collect();
        let skipped: BTreeSet<usize> = self.storage.skipped().into_iter().collect();
        let active = self
            .storage
            .read_all_configurations()
            .iter()
            .filter(|r| matches!(r.state, TrialState::Running | TrialState::Complete))
            .filter(|r| !worse.contains(&r.number) && !skipped.contains(&r.number))
            .count();
        active < self.n_generate
    }

    /// Every generated configuration, ordered by number.
    #[must_use]
    pub fn configurations(&self) -> Vec<ConfigurationRecord> {
        self.storage.read_all_configurations()
    }

    /// The sampler driving this study.
    #[must_use]
    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    /// Target number of unjudged candidates.
    #[must_use]
    pub fn n_generate(&self) -> usize {
        self.n_generate
    }

    /// The backing store.
    #[must_use]
    pub fn storage(&self) -> &dyn PreferenceStore {
        self.storage.as_ref()
    }

    /// A copy of the sampler's current model state.
    #[must_use]
    pub fn sampler_state(&self) -> S::State
    where
        S::State: Clone,
    {
        self.state.lock().clone()
    }
}
