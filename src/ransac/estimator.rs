//! Generic RANSAC estimator

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{FiduciaError, Result};

// ============================================================================
// Model Fitting Strategy
// ============================================================================

/// Strategy that gives a [`Ransac`] engine its domain knowledge.
///
/// Implementations define what is being estimated (a line, a plane, a
/// homography, ...) and how to judge agreement between a data point and a
/// candidate model.
pub trait ModelFitter {
    /// The data point type the model is fitted to.
    type Param;
    /// The model type produced by a fit.
    type Model;

    /// Fits a candidate model to a subset of parameters.
    ///
    /// Returns `None` when the subset is degenerate (collinear points, zero
    /// baseline, ...), in which case the sampling round is skipped.
    fn fit(&self, sample: &[&Self::Param]) -> Option<Self::Model>;

    /// Whether a single parameter agrees with a candidate model.
    fn supports(&self, param: &Self::Param, model: &Self::Model) -> bool;
}

// ============================================================================
// Estimation Report
// ============================================================================

/// Outcome of an estimation or refinement run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimation<M> {
    /// The winning model.
    pub model: M,
    /// Number of parameters that support the model.
    pub support: usize,
    /// Number of rounds actually consumed.
    pub rounds: usize,
}

// ============================================================================
// RANSAC Engine
// ============================================================================

/// Random sample consensus engine over a [`ModelFitter`] strategy.
///
/// Each round draws a random subset of the parameters (distinct elements,
/// subset size uniform between the configured minimum and maximum), fits a
/// candidate to it, and counts how many of *all* parameters support the
/// candidate. The best candidate seen so far is kept; a round whose support
/// reaches the caller's limit ends the search early.
///
/// The engine owns its random source, so a seeded engine replays the same
/// sample sequence run after run.
///
/// # Example
///
/// ```
/// use fiducia::ransac::{ModelFitter, Ransac};
///
/// /// One-dimensional location model: the mean of the sampled values.
/// struct MeanFitter {
///     tolerance: f64,
/// }
///
/// impl ModelFitter for MeanFitter {
///     type Param = f64;
///     type Model = f64;
///
///     fn fit(&self, sample: &[&f64]) -> Option<f64> {
///         if sample.is_empty() {
///             return None;
///         }
///         Some(sample.iter().map(|v| **v).sum::<f64>() / sample.len() as f64)
///     }
///
///     fn supports(&self, param: &f64, model: &f64) -> bool {
///         (param - model).abs() < self.tolerance
///     }
/// }
///
/// let values = [0.1, -0.2, 0.05, 9.0, 0.0, -0.1];
/// let mut ransac = Ransac::seeded(MeanFitter { tolerance: 0.5 }, 2, 3, 7);
/// let found = ransac.estimate(&values, 5, 50).unwrap();
/// assert!(found.support >= 5);
/// assert!(found.model.abs() < 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct Ransac<F: ModelFitter> {
    fitter: F,
    min_sample: usize,
    max_sample: usize,
    rng: StdRng,
}

impl<F: ModelFitter> Ransac<F> {
    /// Creates an engine seeded from the operating system.
    ///
    /// # Panics
    /// Panics if `min_sample` is zero or exceeds `max_sample`.
    pub fn new(fitter: F, min_sample: usize, max_sample: usize) -> Self {
        Self::with_rng(fitter, min_sample, max_sample, StdRng::from_os_rng())
    }

    /// Creates an engine with a fixed seed for reproducible runs.
    ///
    /// # Panics
    /// Panics if `min_sample` is zero or exceeds `max_sample`.
    pub fn seeded(fitter: F, min_sample: usize, max_sample: usize, seed: u64) -> Self {
        Self::with_rng(fitter, min_sample, max_sample, StdRng::seed_from_u64(seed))
    }

    fn with_rng(fitter: F, min_sample: usize, max_sample: usize, rng: StdRng) -> Self {
        assert!(min_sample > 0, "Minimum sample size must be positive");
        assert!(
            min_sample <= max_sample,
            "Minimum sample size must not exceed maximum"
        );
        Self {
            fitter,
            min_sample,
            max_sample,
            rng,
        }
    }

    /// Estimates a model from contaminated parameters.
    ///
    /// Runs up to `max_rounds` sampling rounds and returns the candidate with
    /// the highest support. The search stops early the first time a candidate
    /// is supported by at least `support_limit` parameters. When candidates
    /// tie, the earliest one found wins.
    ///
    /// The returned support counts parameters out of all of `params`, not
    /// just the sampled subset. Whether it is high enough to act on is the
    /// caller's judgement.
    ///
    /// # Errors
    ///
    /// - [`FiduciaError::InsufficientData`] if `params` is smaller than the
    ///   minimum sample size.
    /// - [`FiduciaError::EstimationFailed`] if every round drew a degenerate
    ///   sample and no candidate was ever fitted.
    pub fn estimate(
        &mut self,
        params: &[F::Param],
        support_limit: usize,
        max_rounds: usize,
    ) -> Result<Estimation<F::Model>> {
        if params.len() < self.min_sample {
            return Err(FiduciaError::InsufficientData);
        }
        let max_sample = self.max_sample.min(params.len());

        let mut best: Option<(F::Model, usize)> = None;
        let mut rounds = 0;

        for round in 0..max_rounds {
            rounds = round + 1;

            let sample_len = self.rng.random_range(self.min_sample..=max_sample);
            let sample: Vec<&F::Param> =
                rand::seq::index::sample(&mut self.rng, params.len(), sample_len)
                    .iter()
                    .map(|i| &params[i])
                    .collect();

            let Some(candidate) = self.fitter.fit(&sample) else {
                trace!("round {}: degenerate sample of {}", round, sample_len);
                continue;
            };

            let support = self.support(params, &candidate);
            trace!(
                "round {}: sample {} supported by {}/{}",
                round,
                sample_len,
                support,
                params.len()
            );

            if best.as_ref().map_or(true, |(_, s)| support > *s) {
                best = Some((candidate, support));
                if support >= support_limit {
                    debug!(
                        "support limit reached after {} rounds ({}/{})",
                        rounds,
                        support,
                        params.len()
                    );
                    break;
                }
            }
        }

        match best {
            Some((model, support)) => Ok(Estimation {
                model,
                support,
                rounds,
            }),
            None => Err(FiduciaError::EstimationFailed),
        }
    }

    /// Refines a model by refitting it to its own supporters.
    ///
    /// Each round gathers every parameter supporting the current model and
    /// refits from that full set. Rounds repeat while the supporter count
    /// keeps growing, up to `max_rounds`; refinement also stops once the
    /// count reaches `support_limit`. A model nothing supports is returned
    /// unchanged with zero support.
    pub fn refine(
        &self,
        params: &[F::Param],
        support_limit: usize,
        max_rounds: usize,
        model: F::Model,
    ) -> Estimation<F::Model> {
        let mut model = model;
        let mut best_support = 0;
        let mut rounds = 0;

        for round in 0..max_rounds {
            rounds = round + 1;

            let supporters: Vec<&F::Param> = params
                .iter()
                .filter(|p| self.fitter.supports(p, &model))
                .collect();
            if supporters.len() <= best_support {
                break;
            }
            best_support = supporters.len();

            let Some(refitted) = self.fitter.fit(&supporters) else {
                break;
            };
            model = refitted;

            if best_support >= support_limit {
                break;
            }
        }

        debug!(
            "refined to support {}/{} in {} rounds",
            best_support,
            params.len(),
            rounds
        );
        Estimation {
            model,
            support: best_support,
            rounds,
        }
    }

    /// Number of parameters that support a model.
    pub fn support(&self, params: &[F::Param], model: &F::Model) -> usize {
        params
            .iter()
            .filter(|p| self.fitter.supports(p, model))
            .count()
    }

    /// Indices of the parameters that support a model, in input order.
    pub fn inliers(&self, params: &[F::Param], model: &F::Model) -> Vec<usize> {
        params
            .iter()
            .enumerate()
            .filter(|(_, p)| self.fitter.supports(p, model))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MeanFitter {
        tolerance: f64,
    }

    impl ModelFitter for MeanFitter {
        type Param = f64;
        type Model = f64;

        fn fit(&self, sample: &[&f64]) -> Option<f64> {
            if sample.is_empty() {
                return None;
            }
            Some(sample.iter().map(|v| **v).sum::<f64>() / sample.len() as f64)
        }

        fn supports(&self, param: &f64, model: &f64) -> bool {
            (param - model).abs() < self.tolerance
        }
    }

    /// Fitter whose every sample is degenerate.
    struct NeverFitter;

    impl ModelFitter for NeverFitter {
        type Param = f64;
        type Model = f64;

        fn fit(&self, _sample: &[&f64]) -> Option<f64> {
            None
        }

        fn supports(&self, _param: &f64, _model: &f64) -> bool {
            false
        }
    }

    #[test]
    fn test_identical_params_stop_in_one_round() {
        let params = [2.0; 8];
        let mut ransac = Ransac::seeded(MeanFitter { tolerance: 0.1 }, 1, 4, 3);

        let found = ransac.estimate(&params, 8, 100).unwrap();
        assert_eq!(found.rounds, 1);
        assert_eq!(found.support, 8);
        assert!((found.model - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_unreachable_limit_runs_all_rounds() {
        let params = [2.0; 4];
        let mut ransac = Ransac::seeded(MeanFitter { tolerance: 0.1 }, 1, 2, 3);

        let found = ransac.estimate(&params, 10, 7).unwrap();
        assert_eq!(found.rounds, 7);
        assert_eq!(found.support, 4);
    }

    #[test]
    fn test_too_few_params() {
        let mut ransac = Ransac::seeded(MeanFitter { tolerance: 0.1 }, 2, 4, 3);

        let err = ransac.estimate(&[1.0], 1, 10).unwrap_err();
        assert_eq!(err, crate::FiduciaError::InsufficientData);

        let err = ransac.estimate(&[], 1, 10).unwrap_err();
        assert_eq!(err, crate::FiduciaError::InsufficientData);
    }

    #[test]
    fn test_all_rounds_degenerate() {
        let params = [1.0, 2.0, 3.0];
        let mut ransac = Ransac::seeded(NeverFitter, 1, 2, 3);

        let err = ransac.estimate(&params, 2, 10).unwrap_err();
        assert_eq!(err, crate::FiduciaError::EstimationFailed);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let params = [0.0, 0.1, -0.1, 5.0, 0.05, -0.05, 7.0, 0.02];

        let mut first = Ransac::seeded(MeanFitter { tolerance: 0.5 }, 1, 3, 99);
        let mut second = Ransac::seeded(MeanFitter { tolerance: 0.5 }, 1, 3, 99);

        let a = first.estimate(&params, 6, 20).unwrap();
        let b = second.estimate(&params, 6, 20).unwrap();
        assert_eq!(a.rounds, b.rounds);
        assert_eq!(a.support, b.support);
        assert!((a.model - b.model).abs() < 1e-15);
    }

    #[test]
    fn test_refine_grows_support_until_stable() {
        let params = [0.0, 0.2, -0.2, 0.4, 10.0, 11.0];
        let ransac = Ransac::seeded(MeanFitter { tolerance: 0.5 }, 1, 2, 3);

        // Start from a model that only sees part of the cluster.
        let refined = ransac.refine(&params, 6, 10, 0.4);
        assert_eq!(refined.support, 4);
        let expected = (0.0 + 0.2 - 0.2 + 0.4) / 4.0;
        assert!((refined.model - expected).abs() < 1e-12);
    }

    #[test]
    fn test_refine_with_no_supporters_returns_input() {
        let params = [0.0, 0.1, -0.1];
        let ransac = Ransac::seeded(MeanFitter { tolerance: 0.5 }, 1, 2, 3);

        let refined = ransac.refine(&params, 3, 10, 50.0);
        assert_eq!(refined.support, 0);
        assert!((refined.model - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_inliers_in_input_order() {
        let params = [0.0, 3.0, 0.2, -0.4, 9.0];
        let ransac = Ransac::seeded(MeanFitter { tolerance: 0.5 }, 1, 2, 3);

        assert_eq!(ransac.inliers(&params, &0.0), vec![0, 2, 3]);
        assert_eq!(ransac.support(&params, &0.0), 3);
    }

    #[test]
    #[should_panic(expected = "Minimum sample size")]
    fn test_zero_min_sample_rejected() {
        let _ = Ransac::seeded(MeanFitter { tolerance: 0.5 }, 0, 2, 3);
    }
}
