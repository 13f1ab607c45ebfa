use pref_optimizer::parameter::{CategoricalParam, FloatParam, IntParam, Parameter};
use pref_optimizer::sampler::RandomSampler;
use pref_optimizer::search_space::SearchSpace;
use pref_optimizer::PreferentialStudy;

fn draw<P: Parameter>(study: &PreferentialStudy<RandomSampler>, param: &P, n: usize) -> Vec<P::Value> {
    let space = SearchSpace::new().with(param).unwrap();
    (0..n)
        .map(|_| {
            let record = study.ask(&space).unwrap();
            param.get(&record.params).unwrap().unwrap()
        })
        .collect()
}

#[test]
fn test_random_sampler_uniform_float_distribution() {
    let study = PreferentialStudy::new(RandomSampler::with_seed(42), usize::MAX);
    let n_samples = 1000;
    let mut samples = draw(&study, &FloatParam::new("x", 0.0, 1.0), n_samples);

    for &s in &samples {
        assert!((0.0..=1.0).contains(&s), "sample {s} out of range [0, 1]");
    }

    // Check distribution is roughly uniform by looking at quartiles
    samples.sort_by(f64::total_cmp);

    let q1 = samples[n_samples / 4];
    let q2 = samples[n_samples / 2];
    let q3 = samples[3 * n_samples / 4];

    assert!((q1 - 0.25).abs() < 0.1, "Q1 {q1} should be close to 0.25");
    assert!(
        (q2 - 0.5).abs() < 0.1,
        "Q2 (median) {q2} should be close to 0.5"
    );
    assert!((q3 - 0.75).abs() < 0.1, "Q3 {q3} should be close to 0.75");
}

#[test]
fn test_random_sampler_uniform_int_distribution() {
    let study = PreferentialStudy::new(RandomSampler::with_seed(123), usize::MAX);
    let n_samples = 5000;
    let mut counts = [0u32; 10]; // counts for values 1-10

    for n in draw(&study, &IntParam::new("n", 1, 10), n_samples) {
        assert!((1..=10).contains(&n), "sample {n} out of range [1, 10]");
        counts[(n - 1) as usize] += 1;
    }

    let expected = n_samples as f64 / 10.0;
    for (i, &count) in counts.iter().enumerate() {
        let diff = (f64::from(count) - expected).abs() / expected;
        assert!(
            diff < 0.2,
            "value {} appeared {} times, expected ~{}, diff = {:.1}%",
            i + 1,
            count,
            expected,
            diff * 100.0
        );
    }
}

#[test]
fn test_random_sampler_uniform_categorical_distribution() {
    let study = PreferentialStudy::new(RandomSampler::with_seed(456), usize::MAX);
    let n_samples = 2000;
    let mut counts = [0u32; 4];
    let choices = ["a", "b", "c", "d"];

    let cat_param = CategoricalParam::new("c", choices.to_vec());
    for choice in draw(&study, &cat_param, n_samples) {
        let idx = choices.iter().position(|&c| c == choice).unwrap();
        counts[idx] += 1;
    }

    let expected = n_samples as f64 / 4.0;
    for (i, &count) in counts.iter().enumerate() {
        let diff = (f64::from(count) - expected).abs() / expected;
        assert!(
            diff < 0.15,
            "category {} appeared {} times, expected ~{}, diff = {:.1}%",
            i,
            count,
            expected,
            diff * 100.0
        );
    }
}

#[test]
fn test_random_sampler_reproducibility() {
    let study1 = PreferentialStudy::new(RandomSampler::with_seed(999), usize::MAX);
    let study2 = PreferentialStudy::new(RandomSampler::with_seed(999), usize::MAX);

    let values1 = draw(&study1, &FloatParam::new("x", 0.0, 100.0), 100);
    let values2 = draw(&study2, &FloatParam::new("x", 0.0, 100.0), 100);

    for (i, (v1, v2)) in values1.iter().zip(values2.iter()).enumerate() {
        assert_eq!(
            v1, v2,
            "values at configuration {i} should be identical with same seed: {v1} vs {v2}"
        );
    }
}

#[test]
fn test_random_sampler_ignores_preferences() {
    let study = PreferentialStudy::new(RandomSampler::with_seed(7), usize::MAX);
    let space = SearchSpace::new().with(&FloatParam::new("x", 0.0, 1.0)).unwrap();
    let a = study.ask(&space).unwrap();
    let b = study.ask(&space).unwrap();
    study.report_preference(&[a.number], &[b.number]).unwrap();

    let c = study.ask(&space).unwrap();
    let x = FloatParam::new("x", 0.0, 1.0).get(&c.params).unwrap().unwrap();
    assert!((0.0..=1.0).contains(&x));
}
