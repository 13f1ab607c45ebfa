//! Warning events emitted while proposing configurations.

#![cfg(feature = "tracing")]

use std::fmt;
use std::sync::{Arc, Mutex};

use pref_optimizer::parameter::{CategoricalParam, IntParam};
use pref_optimizer::sampler::{PreferentialGpSampler, Sampler};
use pref_optimizer::search_space::{Configuration, SearchSpace};
use pref_optimizer::storage::{MemoryStorage, PreferenceStore};
use pref_optimizer::ParamValue;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Collects the message of every `WARN` event.
#[derive(Clone, Default)]
struct Warnings(Arc<Mutex<Vec<String>>>);

impl Warnings {
    fn messages(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

struct Message(String);

impl Visit for Message {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for Warnings {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            let mut message = Message(String::new());
            event.record(&mut message);
            self.0.lock().unwrap().push(message.0);
        }
    }
}

fn space() -> SearchSpace {
    SearchSpace::new()
        .with(&CategoricalParam::new("c", vec!["a", "b", "c"]))
        .and_then(|s| s.with(&IntParam::new("n", 0, 4)))
        .unwrap()
}

fn judged_storage() -> MemoryStorage {
    let storage = MemoryStorage::new();
    for (c, n) in [(0, 0), (1, 2), (2, 4)] {
        let mut config = Configuration::new();
        config.insert("c", ParamValue::Categorical(c));
        config.insert("n", ParamValue::Int(n));
        storage.push_configuration(config, space());
    }
    storage.report_preferences(&[(1, 0), (1, 2)]).unwrap();
    storage
}

/// Runs one relative proposal with the given enumeration limit and returns
/// the warnings it logged.
fn warnings_for(limit: f64) -> Vec<String> {
    let sampler = PreferentialGpSampler::builder()
        .max_fit_iters(5)
        .raw_samples(64)
        .n_restarts(2)
        .enumeration_limit(limit)
        .seed(4)
        .build()
        .unwrap();
    let mut state = sampler.new_state();
    let storage = judged_storage();

    let warnings = Warnings::default();
    let subscriber = tracing_subscriber::registry().with(warnings.clone());
    tracing::subscriber::with_default(subscriber, || {
        sampler.sample_relative(&mut state, &storage, &space()).unwrap();
    });
    warnings.messages()
}

#[test]
fn relaxing_categoricals_logs_a_warning() {
    let messages = warnings_for(10.0);
    assert!(
        messages.iter().any(|m| m.contains("relaxing categorical")),
        "no relaxation warning in {messages:?}"
    );
}

#[test]
fn enumeration_logs_no_relaxation_warning() {
    let messages = warnings_for(1e6);
    assert!(
        !messages.iter().any(|m| m.contains("relaxing categorical")),
        "unexpected relaxation warning in {messages:?}"
    );
}

#[test]
fn fallback_sampling_logs_a_warning() {
    let sampler = PreferentialGpSampler::builder().seed(1).build().unwrap();
    let mut state = sampler.new_state();
    let distribution = space().get("n").cloned().unwrap();

    let warnings = Warnings::default();
    let subscriber = tracing_subscriber::registry().with(warnings.clone());
    tracing::subscriber::with_default(subscriber, || {
        let _ = sampler.sample_independent(&mut state, "n", &distribution);
    });
    assert!(
        warnings
            .messages()
            .iter()
            .any(|m| m.contains("falling back to the independent sampler")),
        "no fallback warning in {:?}",
        warnings.messages()
    );
}
