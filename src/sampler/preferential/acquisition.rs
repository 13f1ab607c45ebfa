//! Log expected improvement and its maximization over the search space.

use core::fmt;

use super::model::SampledGp;
use super::optim::{BoundedProblem, minimize};
use crate::error::Result;
use crate::rng_util;
use crate::search_space::{Configuration, DiscreteGrid, SearchSpace, SearchSpaceTransform, grid_size};
use crate::special::log_h;

/// Floor on the predictive standard deviation.
const MIN_STD: f64 = 1e-12;
/// Weight of the penalty outside the unit box.
const PENALTY: f64 = 1e3;

/// `ln EI` of a Gaussian prediction `N(mean, std²)` over the incumbent `best_f`.
///
/// Finite for every finite input, including predictions far below the
/// incumbent where `EI` itself underflows.
///
/// # Examples
///
/// ```
/// use pref_optimizer::sampler::preferential::acquisition::log_expected_improvement;
///
/// let near = log_expected_improvement(0.0, 1.0, 0.5);
/// let far = log_expected_improvement(-40.0, 1.0, 0.5);
/// assert!(far.is_finite() && far < near);
/// ```
#[must_use]
pub fn log_expected_improvement(mean: f64, std: f64, best_f: f64) -> f64 {
    let sigma = std.max(MIN_STD);
    log_h((mean - best_f) / sigma) + sigma.ln()
}

/// Why acquisition fell back to a continuous relaxation over a space with
/// categorical parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AcquisitionWarning {
    /// The space is fully discrete but has more combinations than the limit.
    TooLarge {
        /// Number of combinations.
        size: f64,
        /// The configured enumeration limit.
        limit: f64,
    },
    /// The space mixes categorical and continuous parameters.
    MixedContinuous,
}

impl fmt::Display for AcquisitionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge { size, limit } => write!(
                f,
                "search space has {size} combinations, above the enumeration limit {limit}; \
                 categorical parameters are optimized as continuous"
            ),
            Self::MixedContinuous => f.write_str(
                "search space mixes categorical and continuous parameters; \
                 categorical parameters are optimized as continuous",
            ),
        }
    }
}

/// How the acquisition function is maximized for a given search space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AcquisitionPlan {
    /// Score every combination of a fully discrete space.
    Enumerate {
        /// Number of combinations.
        size: usize,
    },
    /// Multi-start quasi-Newton over the encoded unit box.
    Continuous {
        /// Set when categorical parameters are relaxed.
        warning: Option<AcquisitionWarning>,
    },
}

impl AcquisitionPlan {
    /// Picks the strategy for `search_space` given the enumeration `limit`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pref_optimizer::parameter::{CategoricalParam, FloatParam};
    /// use pref_optimizer::sampler::preferential::acquisition::{AcquisitionPlan, AcquisitionWarning};
    /// use pref_optimizer::search_space::SearchSpace;
    ///
    /// let space = SearchSpace::new()
    ///     .with(&CategoricalParam::new("c", vec!["a", "b", "c"]))
    ///     .unwrap();
    /// assert_eq!(AcquisitionPlan::choose(&space, 1e6), AcquisitionPlan::Enumerate { size: 3 });
    ///
    /// let mixed = space.with(&FloatParam::new("x", 0.0, 1.0)).unwrap();
    /// assert_eq!(
    ///     AcquisitionPlan::choose(&mixed, 1e6),
    ///     AcquisitionPlan::Continuous { warning: Some(AcquisitionWarning::MixedContinuous) },
    /// );
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn choose(search_space: &SearchSpace, limit: f64) -> Self {
        let has_categorical = search_space.iter().any(|(_, d)| d.is_categorical());
        match grid_size(search_space) {
            Some(size) if size <= limit => Self::Enumerate {
                size: size as usize,
            },
            Some(size) => Self::Continuous {
                warning: has_categorical.then_some(AcquisitionWarning::TooLarge { size, limit }),
            },
            None => Self::Continuous {
                warning: has_categorical.then_some(AcquisitionWarning::MixedContinuous),
            },
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct AcquisitionOptions {
    pub(crate) enumeration_limit: f64,
    pub(crate) n_restarts: usize,
    pub(crate) raw_samples: usize,
    pub(crate) max_iters: u64,
}

/// Returns the configuration of `search_space` with the highest log-EI
/// under `model`.
pub(crate) fn optimize(
    model: &SampledGp,
    best_f: f64,
    search_space: &SearchSpace,
    transform: &SearchSpaceTransform,
    opts: &AcquisitionOptions,
    rng: &mut fastrand::Rng,
) -> Result<Configuration> {
    let score = |x: &[f64]| {
        let (mean, std) = model.mean_and_std(x);
        log_expected_improvement(mean, std, best_f)
    };

    let plan = AcquisitionPlan::choose(search_space, opts.enumeration_limit);
    match plan {
        AcquisitionPlan::Enumerate { size } => {
            if let Some(best) = enumerate(search_space, transform, &score)? {
                trace_debug!(size, "acquisition enumerated the search space");
                return Ok(best);
            }
        }
        AcquisitionPlan::Continuous { warning: Some(_w) } => {
            trace_warn!(warning = %_w, "relaxing categorical parameters for acquisition");
        }
        AcquisitionPlan::Continuous { warning: None } => {}
    }

    let x = continuous(transform.n_dims(), &score, opts, rng);
    transform.decode(&x)
}

fn enumerate<F>(
    search_space: &SearchSpace,
    transform: &SearchSpaceTransform,
    score: &F,
) -> Result<Option<Configuration>>
where
    F: Fn(&[f64]) -> f64,
{
    let Some(grid) = DiscreteGrid::new(search_space) else {
        return Ok(None);
    };
    let mut best: Option<(f64, Configuration)> = None;
    for config in grid {
        let value = score(&transform.encode(&config)?);
        if best.as_ref().is_none_or(|(b, _)| value > *b) {
            best = Some((value, config));
        }
    }
    Ok(best.map(|(_, c)| c))
}

fn continuous<F>(
    n_dims: usize,
    score: &F,
    opts: &AcquisitionOptions,
    rng: &mut fastrand::Rng,
) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let mut candidates: Vec<(f64, Vec<f64>)> = (0..opts.raw_samples.max(1))
        .map(|_| {
            let x: Vec<f64> = (0..n_dims)
                .map(|_| rng_util::f64_range(rng, 0.0, 1.0))
                .collect();
            (score(&x), x)
        })
        .collect();
    candidates.sort_by(|a, b| b.0.total_cmp(&a.0));
    candidates.truncate(opts.n_restarts.max(1));

    let mut best = (f64::NEG_INFINITY, vec![0.5; n_dims]);
    for (start_value, start) in candidates {
        let problem = BoundedProblem::new(
            |x: &[f64]| Ok(-score(x)),
            vec![0.0; n_dims],
            vec![1.0; n_dims],
            PENALTY,
        );
        let (value, x) = match minimize(problem, start.clone(), opts.max_iters) {
            Ok(x) => (score(&x), x),
            Err(_err) => {
                trace_debug!(error = %_err, "acquisition restart failed, keeping its start point");
                (start_value, start)
            }
        };
        if value > best.0 {
            best = (value, x);
        }
    }
    trace_debug!(log_ei = best.0, "continuous acquisition finished");
    best.1.iter().map(|v| v.clamp(0.0, 1.0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::{BoolParam, CategoricalParam, FloatParam, IntParam};
    use crate::sampler::preferential::kernel::{Kernel, KernelKind};

    #[test]
    fn log_ei_is_monotone_in_mean_and_finite_in_the_tail() {
        let a = log_expected_improvement(0.0, 0.5, 1.0);
        let b = log_expected_improvement(0.5, 0.5, 1.0);
        let c = log_expected_improvement(2.0, 0.5, 1.0);
        assert!(a < b && b < c);
        assert!(log_expected_improvement(-1e3, 1e-3, 0.0).is_finite());
        // zero std collapses to the plain improvement
        assert!(log_expected_improvement(1.0, 0.0, 0.0).abs() < 1e-6);
    }

    #[test]
    fn log_ei_matches_closed_form() {
        let (mean, std, best) = (0.3, 0.8, 0.5);
        let z: f64 = (mean - best) / std;
        let ei = std
            * ((-0.5 * z * z).exp() / (2.0 * core::f64::consts::PI).sqrt()
                + z * crate::special::norm_cdf(z));
        assert!((log_expected_improvement(mean, std, best) - ei.ln()).abs() < 1e-10);
    }

    #[test]
    fn plan_follows_the_enumeration_limit() {
        let discrete = SearchSpace::new()
            .with(&IntParam::new("n", 0, 9))
            .and_then(|s| s.with(&BoolParam::new("b")))
            .unwrap();
        assert_eq!(
            AcquisitionPlan::choose(&discrete, 20.0),
            AcquisitionPlan::Enumerate { size: 20 }
        );
        assert_eq!(
            AcquisitionPlan::choose(&discrete, 19.0),
            AcquisitionPlan::Continuous {
                warning: Some(AcquisitionWarning::TooLarge {
                    size: 20.0,
                    limit: 19.0
                })
            }
        );

        let ints_only = SearchSpace::new().with(&IntParam::new("n", 0, 99)).unwrap();
        assert_eq!(
            AcquisitionPlan::choose(&ints_only, 10.0),
            AcquisitionPlan::Continuous { warning: None }
        );

        let floats = SearchSpace::new().with(&FloatParam::new("x", 0.0, 1.0)).unwrap();
        assert_eq!(
            AcquisitionPlan::choose(&floats, 1e6),
            AcquisitionPlan::Continuous { warning: None }
        );
    }

    fn model_peaked_at(peak: f64) -> SampledGp {
        let points = vec![vec![0.0], vec![peak], vec![1.0]];
        SampledGp::new(
            Kernel::new(KernelKind::Matern52, vec![0.2]),
            points,
            vec![(1, 0), (1, 2)],
            1e-3,
            &[2.0, 2.0],
        )
        .unwrap()
    }

    #[test]
    fn enumeration_picks_the_best_category() {
        let space = SearchSpace::new()
            .with(&CategoricalParam::new("c", vec!["a", "b", "c", "d", "e"]))
            .unwrap();
        let transform = SearchSpaceTransform::new(&space).unwrap();
        // category index 2 encodes to 0.5
        let model = model_peaked_at(0.5);
        let best_f = model.posterior_mean(&[0.5]);
        let opts = AcquisitionOptions {
            enumeration_limit: 1e6,
            n_restarts: 2,
            raw_samples: 8,
            max_iters: 10,
        };
        let mut rng = fastrand::Rng::with_seed(1);
        let config = optimize(&model, best_f, &space, &transform, &opts, &mut rng).unwrap();
        let x = transform.encode(&config).unwrap();
        let expected = (0..5)
            .map(|i| (f64::from(i) + 0.5) / 5.0)
            .max_by(|a, b| {
                let (ma, sa) = model.mean_and_std(&[*a]);
                let (mb, sb) = model.mean_and_std(&[*b]);
                log_expected_improvement(ma, sa, best_f)
                    .total_cmp(&log_expected_improvement(mb, sb, best_f))
            })
            .unwrap();
        assert!((x[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn continuous_result_stays_in_the_box() {
        let space = SearchSpace::new().with(&FloatParam::new("x", -5.0, 5.0)).unwrap();
        let transform = SearchSpaceTransform::new(&space).unwrap();
        let model = model_peaked_at(0.6);
        let best_f = model.posterior_mean(&[0.6]);
        let opts = AcquisitionOptions {
            enumeration_limit: 1e6,
            n_restarts: 3,
            raw_samples: 64,
            max_iters: 50,
        };
        let mut rng = fastrand::Rng::with_seed(5);
        let config = optimize(&model, best_f, &space, &transform, &opts, &mut rng).unwrap();
        let x = transform.encode(&config).unwrap()[0];
        assert!((0.0..=1.0).contains(&x));

        // no raw candidate beats the refined optimum
        let (m, s) = model.mean_and_std(&[x]);
        let found = log_expected_improvement(m, s, best_f);
        for i in 0..=100 {
            let u = f64::from(i) / 100.0;
            let (m, s) = model.mean_and_std(&[u]);
            assert!(log_expected_improvement(m, s, best_f) <= found + 1e-2, "u = {u}");
        }
    }
}
