//! Robust model estimation by random sample consensus
//!
//! Marker geometry recovered from images is contaminated: false detections,
//! mismatched correspondences, points from the wrong marker. RANSAC fits a
//! model to such data by repeatedly fitting candidates to small random
//! subsets and keeping the candidate that the most points agree with.
//!
//! The engine is generic. What a "model" is and what "agrees" means are
//! supplied through a [`ModelFitter`] implementation.

mod estimator;

pub use estimator::*;
