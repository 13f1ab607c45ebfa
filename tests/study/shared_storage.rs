use std::sync::Arc;
use std::thread;

use pref_optimizer::parameter::{FloatParam, IntParam};
use pref_optimizer::sampler::RandomSampler;
use pref_optimizer::search_space::SearchSpace;
use pref_optimizer::storage::{MemoryStorage, PreferenceStore};
use pref_optimizer::{Error, PreferentialStudy};

fn space() -> SearchSpace {
    SearchSpace::new()
        .with(&FloatParam::new("x", 0.0, 1.0))
        .and_then(|s| s.with(&IntParam::new("n", 1, 8)))
        .unwrap()
}

#[test]
fn studies_on_one_store_see_each_others_work() {
    let storage: Arc<dyn PreferenceStore> = Arc::new(MemoryStorage::new());
    let generator = PreferentialStudy::with_storage(RandomSampler::with_seed(1), 4, Arc::clone(&storage));
    let evaluator = PreferentialStudy::with_storage(RandomSampler::with_seed(2), 4, Arc::clone(&storage));

    let a = generator.ask(&space()).unwrap();
    let b = generator.ask(&space()).unwrap();
    assert_eq!(evaluator.configurations().len(), 2);

    evaluator.report_preference(&[b.number], &[a.number]).unwrap();
    let best = generator.best_configurations().unwrap();
    assert_eq!(best.len(), 1);
    assert_eq!(best[0].number, b.number);
    assert_eq!(storage.read_preferences(), vec![(b.number, a.number)]);
}

#[test]
fn concurrent_asks_get_distinct_numbers() {
    let study = PreferentialStudy::new(RandomSampler::with_seed(3), usize::MAX);

    let mut numbers: Vec<usize> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    (0..25)
                        .map(|_| study.ask(&space()).unwrap().number)
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });
    numbers.sort_unstable();
    assert_eq!(numbers, (0..100).collect::<Vec<_>>());
}

#[test]
fn rejected_reports_leave_the_store_untouched() {
    let study = PreferentialStudy::new(RandomSampler::with_seed(4), 2);
    let a = study.ask(&space()).unwrap();
    let b = study.ask(&space()).unwrap();

    // the second pair is invalid, so neither is recorded
    let err = study
        .report_preference(&[a.number], &[b.number, 42])
        .unwrap_err();
    assert!(matches!(err, Error::UnknownConfiguration(42)));
    assert!(study.preferences().unwrap().is_empty());
    assert!(!study.should_generate());
}
