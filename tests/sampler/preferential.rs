use pref_optimizer::parameter::{CategoricalParam, FloatParam, IntParam, Parameter};
use pref_optimizer::sampler::preferential::acquisition::{AcquisitionPlan, AcquisitionWarning};
use pref_optimizer::sampler::{
    IndependentSampler, PreferentialGpSampler, PreferentialState, Sampler,
};
use pref_optimizer::search_space::{Configuration, SearchSpace};
use pref_optimizer::storage::{MemoryStorage, PreferenceStore};
use pref_optimizer::{Distribution, Error, ParamValue, PreferentialStudy};

fn quick_sampler(seed: u64) -> PreferentialGpSampler {
    PreferentialGpSampler::builder()
        .max_fit_iters(10)
        .raw_samples(128)
        .n_restarts(3)
        .acquisition_max_iters(50)
        .seed(seed)
        .build()
        .unwrap()
}

fn x_space() -> SearchSpace {
    SearchSpace::new().with(&FloatParam::new("x", 0.0, 10.0)).unwrap()
}

fn store_floats(storage: &MemoryStorage, xs: &[f64]) -> Vec<Configuration> {
    xs.iter()
        .map(|&x| {
            let mut config = Configuration::new();
            config.insert("x", ParamValue::Float(x));
            storage.push_configuration(config.clone(), x_space());
            config
        })
        .collect()
}

/// Posterior mean utility of each configuration, averaged over `refits`
/// successive draws of the Gibbs chain.
fn mean_utilities(
    sampler: &PreferentialGpSampler,
    state: &mut PreferentialState,
    storage: &MemoryStorage,
    space: &SearchSpace,
    configs: &[Configuration],
    refits: usize,
) -> Vec<f64> {
    let mut totals = vec![0.0; configs.len()];
    for _ in 0..refits {
        let fitted = sampler.fit_model(state, storage, space).unwrap().unwrap();
        for (total, config) in totals.iter_mut().zip(configs) {
            *total += fitted.utility(config).unwrap();
        }
    }
    totals.iter().map(|t| t / refits as f64).collect()
}

#[test]
fn preferred_configuration_gets_the_highest_utility() {
    let sampler = quick_sampler(5);
    let mut state = sampler.new_state();
    let storage = MemoryStorage::new();
    let configs = store_floats(&storage, &[0.0, 2.5, 5.0, 7.5, 10.0]);
    storage
        .report_preferences(&[(4, 0), (4, 1), (4, 2), (4, 3)])
        .unwrap();

    let utilities = mean_utilities(&sampler, &mut state, &storage, &x_space(), &configs, 5);
    for (i, &u) in utilities.iter().take(4).enumerate() {
        assert!(
            utilities[4] > u,
            "configuration 4 ({}) should beat configuration {i} ({u})",
            utilities[4]
        );
    }
}

#[test]
fn utilities_follow_reported_preferences() {
    let space = SearchSpace::new()
        .with(&FloatParam::new("a", 0.0, 1.0))
        .and_then(|s| s.with(&FloatParam::new("b", 0.0, 1.0)))
        .unwrap();
    let storage = MemoryStorage::new();
    let configs: Vec<Configuration> = [(0.9, 0.1), (0.6, 0.4), (0.4, 0.7), (0.1, 0.9)]
        .iter()
        .map(|&(a, b)| {
            let mut config = Configuration::new();
            config.insert("a", ParamValue::Float(a));
            config.insert("b", ParamValue::Float(b));
            storage.push_configuration(config.clone(), space.clone());
            config
        })
        .collect();
    let preferences = [(0, 1), (1, 2), (2, 3)];
    storage.report_preferences(&preferences).unwrap();

    let sampler = quick_sampler(9);
    let mut state = sampler.new_state();
    // a single draw of the differences can invert a close pair; the
    // chain average cannot
    let utilities = mean_utilities(&sampler, &mut state, &storage, &space, &configs, 40);
    for &(better, worse) in &preferences {
        assert!(
            utilities[better] >= utilities[worse] - 1e-6,
            "utility of {better} ({}) below {worse} ({})",
            utilities[better],
            utilities[worse]
        );
    }
}

#[test]
fn cold_start_defers_to_independent_sampling() {
    let space = x_space()
        .with(&CategoricalParam::new("c", vec!["a", "b", "c"]))
        .unwrap();
    let sampler = quick_sampler(1);
    let mut state = sampler.new_state();
    let storage = MemoryStorage::new();

    let proposal = sampler.sample_relative(&mut state, &storage, &space).unwrap();
    assert!(proposal.is_empty(), "no preferences should give an empty proposal");

    let mut first = Configuration::new();
    first.insert("x", ParamValue::Float(2.0));
    first.insert("c", ParamValue::Categorical(0));
    let mut second = Configuration::new();
    second.insert("x", ParamValue::Float(8.0));
    second.insert("c", ParamValue::Categorical(2));
    storage.push_configuration(first, space.clone());
    storage.push_configuration(second, space.clone());
    storage.report_preferences(&[(1, 0)]).unwrap();

    let relative = sampler.infer_relative_search_space(&storage);
    assert_eq!(relative, space);
    let proposal = sampler.sample_relative(&mut state, &storage, &relative).unwrap();
    assert_eq!(proposal.len(), 2);
    assert!(matches!(proposal.get("x"), Some(ParamValue::Float(x)) if (0.0..=10.0).contains(x)));
    assert!(matches!(proposal.get("c"), Some(ParamValue::Categorical(i)) if *i < 3));
}

#[test]
fn changing_dimensionality_between_calls_fails() {
    let sampler = quick_sampler(2);
    let mut state = sampler.new_state();
    let storage = MemoryStorage::new();
    store_floats(&storage, &[1.0, 9.0]);
    storage.report_preferences(&[(0, 1)]).unwrap();

    sampler.sample_relative(&mut state, &storage, &x_space()).unwrap();
    assert_eq!(state.dims(), Some(1));

    let narrower = SearchSpace::new();
    assert!(
        sampler
            .sample_relative(&mut state, &storage, &narrower)
            .unwrap()
            .is_empty(),
        "an empty space proposes nothing"
    );

    let wider = x_space().with(&IntParam::new("n", 1, 4)).unwrap();
    let err = sampler
        .sample_relative(&mut state, &storage, &wider)
        .unwrap_err();
    assert!(
        matches!(err, Error::DynamicSearchSpace { expected: 1, got: 2 }),
        "unexpected error {err:?}"
    );
}

#[test]
fn fit_moves_hyperparameters_and_keeps_them() {
    let sampler = quick_sampler(3);
    let mut state = sampler.new_state();
    let storage = MemoryStorage::new();
    store_floats(&storage, &[0.5, 3.0, 6.0, 9.5]);
    storage
        .report_preferences(&[(2, 0), (2, 1), (2, 3), (1, 0)])
        .unwrap();

    sampler.fit_model(&mut state, &storage, &x_space()).unwrap();
    let lengthscales = state.lengthscales();
    assert_eq!(lengthscales.len(), 1);
    assert!(
        (lengthscales[0] - 1.0).abs() > 1e-6 || (state.noise_var() - 1.0).abs() > 1e-6,
        "fit left the hyperparameters at their initial values"
    );
    assert_eq!(state.diff().len(), 4);
    assert!(state.diff().iter().all(|&d| d > 0.0));
    assert!(state.virtual_observations().iter().all(|s| s.a > 0.0));
}

#[test]
fn discrete_spaces_are_enumerated_below_the_limit() {
    let space = SearchSpace::new()
        .with(&CategoricalParam::new("c", vec!["a", "b", "c"]))
        .and_then(|s| s.with(&IntParam::new("n", 0, 4)))
        .unwrap();
    assert_eq!(
        AcquisitionPlan::choose(&space, 1e6),
        AcquisitionPlan::Enumerate { size: 15 }
    );
    assert_eq!(
        AcquisitionPlan::choose(&space, 10.0),
        AcquisitionPlan::Continuous {
            warning: Some(AcquisitionWarning::TooLarge {
                size: 15.0,
                limit: 10.0
            })
        }
    );

    let ints = SearchSpace::new().with(&IntParam::new("n", 0, 99)).unwrap();
    assert_eq!(
        AcquisitionPlan::choose(&ints, 10.0),
        AcquisitionPlan::Continuous { warning: None },
        "integer-only spaces relax without a warning"
    );

    for limit in [1e6, 10.0] {
        let sampler = PreferentialGpSampler::builder()
            .max_fit_iters(5)
            .raw_samples(64)
            .n_restarts(2)
            .enumeration_limit(limit)
            .seed(4)
            .build()
            .unwrap();
        let mut state = sampler.new_state();
        let storage = MemoryStorage::new();
        for (c, n) in [(0, 0), (1, 2), (2, 4)] {
            let mut config = Configuration::new();
            config.insert("c", ParamValue::Categorical(c));
            config.insert("n", ParamValue::Int(n));
            storage.push_configuration(config, space.clone());
        }
        storage.report_preferences(&[(1, 0), (1, 2)]).unwrap();

        let proposal = sampler.sample_relative(&mut state, &storage, &space).unwrap();
        assert!(matches!(proposal.get("c"), Some(ParamValue::Categorical(i)) if *i < 3));
        assert!(matches!(proposal.get("n"), Some(ParamValue::Int(n)) if (0..=4).contains(n)));
    }
}

#[derive(Debug)]
struct Constant;

impl IndependentSampler for Constant {
    fn sample_independent(&self, _name: &str, distribution: &Distribution) -> ParamValue {
        match distribution {
            Distribution::Float(d) => ParamValue::Float(d.low),
            Distribution::Int(d) => ParamValue::Int(d.low),
            Distribution::Categorical(_) => ParamValue::Categorical(0),
        }
    }
}

#[test]
fn parameters_outside_the_relative_space_use_the_fallback() {
    let sampler = PreferentialGpSampler::builder()
        .max_fit_iters(5)
        .raw_samples(64)
        .n_restarts(2)
        .independent_sampler(Constant)
        .seed(6)
        .build()
        .unwrap();
    let study = PreferentialStudy::new(sampler, 10);
    let space = x_space();

    let a = study.ask(&space).unwrap();
    let b = study.ask(&space).unwrap();
    assert_eq!(a.params.get("x"), Some(&ParamValue::Float(0.0)));
    assert_eq!(b.params.get("x"), Some(&ParamValue::Float(0.0)));
    study.report_preference(&[a.number], &[b.number]).unwrap();

    let extended = space.with(&IntParam::new("n", 3, 7)).unwrap();
    let c = study.ask(&extended).unwrap();
    assert_eq!(c.params.get("n"), Some(&ParamValue::Int(3)));
    let x = FloatParam::new("x", 0.0, 10.0).get(&c.params).unwrap().unwrap();
    assert!((0.0..=10.0).contains(&x));
}

#[test]
fn seeded_samplers_are_reproducible() {
    let run = || {
        let study = PreferentialStudy::new(quick_sampler(77), 10);
        let space = x_space();
        let a = study.ask(&space).unwrap();
        let b = study.ask(&space).unwrap();
        study.report_preference(&[b.number], &[a.number]).unwrap();
        let c = study.ask(&space).unwrap();
        study.report_preference(&[c.number], &[b.number]).unwrap();
        let d = study.ask(&space).unwrap();
        vec![a.params, b.params, c.params, d.params]
    };
    assert_eq!(run(), run());
}

#[test]
fn state_can_be_shared_across_sampler_instances() {
    let storage = MemoryStorage::new();
    store_floats(&storage, &[1.0, 4.0, 8.0]);
    storage.report_preferences(&[(1, 0), (1, 2)]).unwrap();

    let first = quick_sampler(8);
    let mut state = first.new_state();
    first.fit_model(&mut state, &storage, &x_space()).unwrap();
    let lengthscales = state.lengthscales();

    let mut restored = state.clone();
    restored.reseed(123);
    let second = quick_sampler(8);
    let proposal = second
        .sample_relative(&mut restored, &storage, &x_space())
        .unwrap();
    assert!(proposal.contains("x"));
    assert_eq!(restored.dims(), Some(1));
    assert_eq!(state.lengthscales(), lengthscales);
}
