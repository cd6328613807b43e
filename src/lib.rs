//! Fiducia: estimation primitives for fiducial marker tracking
//!
//! Numerical building blocks for pipelines that lift detected markers into 3D
//! and track them across frames.
//!
//! # Features
//!
//! - **Spatial Queries**: labeled 3D point clouds with a cheap, reorderable
//!   view for nearest-first and windowed lookups
//! - **Robust Estimation**: a generic RANSAC engine driven by pluggable model
//!   fitting strategies, tolerant of heavily contaminated inputs
//! - **Recursive Filtering**: an unscented Kalman filter for nonlinear process
//!   and observation models, with compile-time dimension checks
//!
//! The three components are independent. A typical pipeline narrows a point
//! cloud down to nearby candidates, fits a model robustly with RANSAC, and
//! feeds the result into a filter to smooth it over time.

pub mod types;
pub mod models;
pub mod spatial;
pub mod ransac;
pub mod filters;

pub mod prelude {
    pub use crate::types::spaces::*;
    pub use crate::models::*;
    pub use crate::spatial::*;
    pub use crate::ransac::*;
    pub use crate::filters::ukf::*;
    pub use crate::{FiduciaError, Result};
}

/// Error types for the library
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FiduciaError {
    /// Fewer parameters were supplied than the minimum sample size
    InsufficientData,
    /// No sampling round produced a candidate model
    EstimationFailed,
    /// Matrix is singular and cannot be inverted
    SingularMatrix,
    /// Numerical computation became unstable
    NumericalInstability,
}

impl std::error::Error for FiduciaError {}

impl ::core::fmt::Display for FiduciaError {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        match self {
            FiduciaError::InsufficientData => {
                write!(f, "Not enough parameters for the minimum sample size")
            }
            FiduciaError::EstimationFailed => {
                write!(f, "No sampling round produced a candidate model")
            }
            FiduciaError::SingularMatrix => write!(f, "Matrix is singular"),
            FiduciaError::NumericalInstability => {
                write!(f, "Numerical instability detected")
            }
        }
    }
}

pub type Result<T> = ::core::result::Result<T, FiduciaError>;
