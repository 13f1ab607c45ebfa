use pref_optimizer::parameter::{CategoricalParam, FloatParam, Parameter};
use pref_optimizer::sampler::{PreferentialGpSampler, Sampler};
use pref_optimizer::search_space::{Configuration, SearchSpace};
use pref_optimizer::storage::ConfigurationRecord;
use pref_optimizer::{ParamValue, PreferentialStudy, TrialState};

fn sampler(seed: u64) -> PreferentialGpSampler {
    PreferentialGpSampler::builder()
        .max_fit_iters(10)
        .raw_samples(128)
        .n_restarts(3)
        .acquisition_max_iters(50)
        .seed(seed)
        .build()
        .unwrap()
}

/// Distance to the evaluator's ideal brightness.
fn regret(record: &ConfigurationRecord) -> f64 {
    let x = FloatParam::new("brightness", 0.0, 1.0)
        .get(&record.params)
        .unwrap()
        .unwrap();
    (x - 0.7).abs()
}

fn judge<S: Sampler>(study: &PreferentialStudy<S>, a: &ConfigurationRecord, b: &ConfigurationRecord) {
    if regret(a) <= regret(b) {
        study.report_preference(&[a.number], &[b.number]).unwrap();
    } else {
        study.report_preference(&[b.number], &[a.number]).unwrap();
    }
}

#[test]
fn tournament_converges_towards_the_preferred_region() {
    let study = PreferentialStudy::new(sampler(2024), 2);
    let space = SearchSpace::new()
        .with(&FloatParam::new("brightness", 0.0, 1.0))
        .unwrap();

    let a = study.ask(&space).unwrap();
    let b = study.ask(&space).unwrap();
    judge(&study, &a, &b);

    for _ in 0..15 {
        let incumbent = study.best_configurations().unwrap().remove(0);
        let challenger = study.ask(&space).unwrap();
        judge(&study, &incumbent, &challenger);
    }

    let best = study.best_configurations().unwrap();
    assert_eq!(best.len(), 1, "a tournament has a single undefeated configuration");
    assert!(
        regret(&best[0]) < 0.15,
        "best brightness is {} away from the ideal",
        regret(&best[0])
    );
    assert_eq!(study.preferences().unwrap().len(), 16);
    assert!(
        study
            .configurations()
            .iter()
            .all(|r| r.state == TrialState::Complete)
    );

    let state = study.sampler_state();
    assert_eq!(state.dims(), Some(1));
    assert_eq!(state.diff().len(), 16);
}

#[test]
fn generation_loop_keeps_n_generate_candidates_pending() {
    let study = PreferentialStudy::new(sampler(3), 3);
    let space = SearchSpace::new()
        .with(&FloatParam::new("brightness", 0.0, 1.0))
        .and_then(|s| s.with(&CategoricalParam::new("palette", vec!["warm", "cool"])))
        .unwrap();

    let mut pending = Vec::new();
    while study.should_generate() {
        pending.push(study.ask(&space).unwrap());
    }
    assert_eq!(pending.len(), 3);

    // the evaluator keeps the best of the three
    pending.sort_by(|a, b| regret(a).total_cmp(&regret(b)));
    let worse: Vec<usize> = pending[1..].iter().map(|r| r.number).collect();
    study.report_preference(&[pending[0].number], &worse).unwrap();
    assert_eq!(study.preferences().unwrap().len(), 2);

    let mut generated = 0;
    while study.should_generate() {
        let record = study.ask(&space).unwrap();
        assert!(record.params.contains("palette"));
        generated += 1;
    }
    assert_eq!(generated, 2, "two rejected candidates must be replaced");

    study.skip(pending[0].number).unwrap();
    assert!(study.should_generate());
    assert!(study.best_configurations().unwrap().is_empty());
}

#[test]
fn enqueued_anchor_is_judged_alongside_model_proposals() {
    let study = PreferentialStudy::new(sampler(31), 4);
    let space = SearchSpace::new()
        .with(&FloatParam::new("brightness", 0.0, 1.0))
        .unwrap();
    let a = study.ask(&space).unwrap();
    let b = study.ask(&space).unwrap();
    judge(&study, &a, &b);

    let mut anchor = Configuration::new();
    anchor.insert("brightness", ParamValue::Float(0.5));
    study.enqueue(anchor.clone());

    let pinned = study.ask(&space).unwrap();
    assert_eq!(pinned.params, anchor);
    assert_eq!(study.n_enqueued(), 0);

    let proposed = study.ask(&space).unwrap();
    assert!(regret(&proposed) <= 0.7 + 1e-12);
    assert_eq!(study.configurations().len(), 4);
}
