//! Observation (sensor) models

use nalgebra::RealField;

use crate::types::spaces::{Measurement, MeasurementCovariance, StateVector};

// ============================================================================
// Observation Model Trait
// ============================================================================

/// Nonlinear observation model: what a sensor reports about a state, plus
/// the actual sensor output the filter should reconcile against.
///
/// A correction step needs the predicted observation of every sigma point
/// and the sensor output at the same instant. The model carries both, so the
/// two cannot drift apart when several sensors feed one filter.
pub trait ObservationModel<T: RealField, const N: usize, const M: usize> {
    /// Maps a state into measurement space.
    fn observe(&self, state: &StateVector<T, N>) -> Measurement<T, M>;

    /// Measurement noise covariance.
    fn measurement_noise(&self) -> MeasurementCovariance<T, M>;

    /// The sensor output for the pending correction.
    fn measurement(&self) -> Measurement<T, M>;
}

// ============================================================================
// Position Sensor (3D)
// ============================================================================

/// Direct position sensor for a 3D constant velocity state.
///
/// Observes `[x, y, z]` of an `[x, y, z, vx, vy, vz]` state with isotropic
/// noise. This matches a marker detector that reports a 3D location but says
/// nothing about motion.
#[derive(Debug, Clone)]
pub struct PositionSensor3D<T: RealField> {
    /// Position noise standard deviation
    pub sigma: T,
    measurement: Measurement<T, 3>,
}

impl<T: RealField + Copy> PositionSensor3D<T> {
    /// Creates a new position sensor with no pending measurement.
    ///
    /// # Panics
    /// Panics if `sigma` is not positive.
    pub fn new(sigma: T) -> Self {
        assert!(sigma > T::zero(), "Noise magnitude must be positive");
        Self {
            sigma,
            measurement: Measurement::zeros(),
        }
    }

    /// Stores the sensor output for the next correction.
    pub fn set_measurement(&mut self, measurement: Measurement<T, 3>) {
        self.measurement = measurement;
    }
}

impl<T: RealField + Copy> ObservationModel<T, 6, 3> for PositionSensor3D<T> {
    fn observe(&self, state: &StateVector<T, 6>) -> Measurement<T, 3> {
        Measurement::from_array([*state.index(0), *state.index(1), *state.index(2)])
    }

    fn measurement_noise(&self) -> MeasurementCovariance<T, 3> {
        MeasurementCovariance::identity().scale(self.sigma * self.sigma)
    }

    fn measurement(&self) -> Measurement<T, 3> {
        self.measurement
    }
}
