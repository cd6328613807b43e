//! Process (motion) models

use nalgebra::RealField;
use num_traits::Float;

use crate::types::spaces::{StateCovariance, StateVector};

// ============================================================================
// Process Model Trait
// ============================================================================

/// Nonlinear process model: how a tracked state evolves over one time step.
///
/// The filter never linearizes this function. It propagates sigma points
/// through it directly, so any smooth dynamics can be expressed, with the
/// time step baked into the model.
pub trait ProcessModel<T: RealField, const N: usize> {
    /// Advances a state by one time step.
    fn transition(&self, state: &StateVector<T, N>) -> StateVector<T, N>;

    /// Process noise covariance added after propagation.
    fn process_noise(&self) -> StateCovariance<T, N>;
}

// ============================================================================
// Constant Velocity Model (3D)
// ============================================================================

/// Constant velocity motion in 3D.
///
/// State layout: `[x, y, z, vx, vy, vz]`.
///
/// Process noise follows the white noise acceleration model with standard
/// deviation `sigma_a`, coupling each position to its velocity.
#[derive(Debug, Clone, Copy)]
pub struct ConstantVelocity3D<T: RealField> {
    /// Time step
    pub dt: T,
    /// Acceleration noise standard deviation
    pub sigma_a: T,
}

impl<T: RealField + Float + Copy> ConstantVelocity3D<T> {
    /// Creates a new 3D constant velocity model.
    ///
    /// # Panics
    /// Panics if `dt` is not positive or `sigma_a` is negative.
    pub fn new(dt: T, sigma_a: T) -> Self {
        assert!(dt > T::zero(), "Time step must be positive");
        assert!(
            sigma_a >= T::zero(),
            "Noise magnitude must be non-negative"
        );
        Self { dt, sigma_a }
    }
}

impl<T: RealField + Float + Copy> ProcessModel<T, 6> for ConstantVelocity3D<T> {
    fn transition(&self, state: &StateVector<T, 6>) -> StateVector<T, 6> {
        let x = *state.index(0);
        let y = *state.index(1);
        let z = *state.index(2);
        let vx = *state.index(3);
        let vy = *state.index(4);
        let vz = *state.index(5);

        StateVector::from_array([
            x + vx * self.dt,
            y + vy * self.dt,
            z + vz * self.dt,
            vx,
            vy,
            vz,
        ])
    }

    fn process_noise(&self) -> StateCovariance<T, 6> {
        let two = T::from(2.0).unwrap();
        let four = T::from(4.0).unwrap();
        let q = self.sigma_a * self.sigma_a;

        let dt2 = self.dt * self.dt;
        let dt3 = dt2 * self.dt / two;
        let dt4 = dt2 * dt2 / four;
        let z = T::zero();

        StateCovariance::from_matrix(
            nalgebra::matrix![
                dt4, z, z, dt3, z, z;
                z, dt4, z, z, dt3, z;
                z, z, dt4, z, z, dt3;
                dt3, z, z, dt2, z, z;
                z, dt3, z, z, dt2, z;
                z, z, dt3, z, z, dt2
            ]
            .scale(q),
        )
    }
}
