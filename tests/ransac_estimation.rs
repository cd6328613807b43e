//! Integration tests for robust estimation
//!
//! A fixed one-dimensional data set with a six-value cluster and four
//! outliers. Whatever sample sequence the seed produces, any candidate
//! reaching the support limit must sit inside the cluster, and refinement
//! from there always converges to the same model.

mod common;

use common::MeanFitter;
use fiducia::ransac::Ransac;
use fiducia::FiduciaError;

/// Six values cluster near zero; 3, 4, 5 and -3 are outliers.
const PARAMS: [f64; 10] = [0.0, -1.0, 1.0, 0.5, -0.5, 3.0, 4.0, 5.0, -3.0, 0.25];

/// Mean of the full cluster, the unique fixed point of refinement.
const CLUSTER_MEAN: f64 = 0.25 / 6.0;

fn fitter() -> MeanFitter {
    MeanFitter { tolerance: 1.5 }
}

#[test]
fn test_estimate_finds_the_cluster() {
    let mut ransac = Ransac::seeded(fitter(), 1, 4, 0xa11ce);
    let found = ransac.estimate(&PARAMS, 5, 100).unwrap();

    // Only models inside the cluster can reach the support limit.
    assert!(found.support >= 5, "support {}", found.support);
    assert!(found.support <= 6);
    assert!(found.model.abs() < 1.0, "model {}", found.model);
    // Reaching the limit stops the sampling loop.
    assert!(found.rounds <= 100);
}

#[test]
fn test_refine_converges_to_cluster_mean() {
    let mut ransac = Ransac::seeded(fitter(), 1, 4, 0xa11ce);
    let found = ransac.estimate(&PARAMS, 5, 100).unwrap();

    let refined = ransac.refine(&PARAMS, 6, 10, found.model);
    assert_eq!(refined.support, 6);
    assert!((refined.model - CLUSTER_MEAN).abs() < 1e-12);
    assert!((refined.model - 0.042).abs() < 1e-3);
    // Convergence takes at most three rounds from any cluster model.
    assert!(refined.rounds <= 3, "rounds {}", refined.rounds);
}

#[test]
fn test_refinement_is_seed_independent() {
    // Different seeds find different candidates, but refinement washes the
    // difference out completely.
    for seed in [1, 2, 3, 99, 0xdead] {
        let mut ransac = Ransac::seeded(fitter(), 1, 4, seed);
        let found = ransac.estimate(&PARAMS, 5, 100).unwrap();
        let refined = ransac.refine(&PARAMS, 6, 10, found.model);

        assert_eq!(refined.support, 6, "seed {}", seed);
        assert!(
            (refined.model - CLUSTER_MEAN).abs() < 1e-12,
            "seed {}: {}",
            seed,
            refined.model
        );
    }
}

#[test]
fn test_inliers_of_refined_model() {
    let ransac = Ransac::seeded(fitter(), 1, 4, 7);
    let inliers = ransac.inliers(&PARAMS, &CLUSTER_MEAN);

    assert_eq!(inliers, vec![0, 1, 2, 3, 4, 9]);
    assert_eq!(ransac.support(&PARAMS, &CLUSTER_MEAN), 6);
}

#[test]
fn test_sample_bounds_clamp_to_input() {
    // Maximum sample size larger than the data set is clamped, not an error.
    let mut ransac = Ransac::seeded(fitter(), 1, 20, 11);
    let found = ransac.estimate(&PARAMS, 5, 100).unwrap();
    assert!(found.support >= 5);

    let refined = ransac.refine(&PARAMS, 6, 10, found.model);
    assert!((refined.model - CLUSTER_MEAN).abs() < 1e-12);
}

#[test]
fn test_insufficient_data_reported_before_sampling() {
    let mut ransac = Ransac::seeded(fitter(), 4, 6, 5);
    let err = ransac.estimate(&PARAMS[..3], 2, 100).unwrap_err();
    assert_eq!(err, FiduciaError::InsufficientData);
}
