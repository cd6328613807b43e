//! Recursive state estimation filters
//!
//! - [`ukf::UnscentedKalmanFilter`]: sigma-point Kalman filter for nonlinear
//!   process and observation models

pub mod ukf;
