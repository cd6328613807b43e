//! Unscented Kalman Filter (UKF) for nonlinear marker tracking
//!
//! The UKF propagates mean and covariance through nonlinear functions by
//! sampling the state distribution instead of linearizing it, so no Jacobians
//! are ever computed. Process and observation models are supplied per call as
//! plain trait implementations; writing one is as simple as writing the
//! dynamics.
//!
//! # Sigma Point Selection
//!
//! This implementation uses the symmetric Julier selection with a single
//! spread parameter κ. For an n-dimensional state:
//!
//! - χ₀ = μ with weight κ/(n+κ)
//! - χᵢ = μ + cᵢ and χᵢ₊ₙ = μ - cᵢ with weight 1/(2(n+κ)) each,
//!
//! where cᵢ is the i-th column of the matrix square root of (n+κ)Σ. The same
//! weights recover both means and covariances. κ may be negative as long as
//! n+κ stays positive; κ = 3-n matches fourth-order moments of a Gaussian.
//!
//! # Numerical Guards
//!
//! The covariance is symmetrized before every decomposition, and a failed
//! Cholesky is retried once with a small diagonal jitter. A covariance that
//! still is not positive definite surfaces as
//! [`FiduciaError::NumericalInstability`] instead of a panic, so a caller can
//! [`reset`](UnscentedKalmanFilter::reset) the filter and keep the pipeline
//! alive.
//!
//! # Example
//!
//! ```
//! use fiducia::filters::ukf::UnscentedKalmanFilter;
//! use fiducia::models::{ConstantVelocity3D, PositionSensor3D};
//! use fiducia::types::spaces::{Measurement, StateCovariance, StateVector};
//!
//! let process = ConstantVelocity3D::new(0.1, 0.5);
//! let mut sensor = PositionSensor3D::new(0.3);
//!
//! let mut filter = UnscentedKalmanFilter::new(
//!     StateVector::from_array([0.0; 6]),
//!     StateCovariance::identity(),
//!     1.0,
//! );
//!
//! // One frame: store the sensor output, then predict and correct.
//! sensor.set_measurement(Measurement::from_array([0.1, 0.0, -0.1]));
//! filter.step(&process, &sensor)?;
//!
//! assert!(filter.uncertainty() > 0.0);
//! # Ok::<(), fiducia::FiduciaError>(())
//! ```

use log::debug;
use nalgebra::{RealField, SMatrix, SVector};
use num_traits::Float;

use crate::models::{ObservationModel, ProcessModel};
use crate::types::spaces::{StateCovariance, StateVector};
use crate::{FiduciaError, Result};

// ============================================================================
// Sigma Points
// ============================================================================

/// Collection of sigma points with their weights.
///
/// For an n-dimensional state, there are 2n+1 sigma points.
#[derive(Debug, Clone)]
pub struct SigmaPoints<T: RealField, const N: usize> {
    /// The sigma points: [χ₀, χ₁, ..., χ₂ₙ]
    pub points: Vec<StateVector<T, N>>,
    /// Weight of the central point
    pub weight_center: T,
    /// Weight of every spread point
    pub weight_side: T,
}

impl<T: RealField + Float + Copy, const N: usize> SigmaPoints<T, N> {
    /// Generates sigma points around a state estimate.
    ///
    /// The covariance is symmetrized, scaled by n+κ, and decomposed with
    /// Cholesky. If the decomposition fails, it is retried once with a 1e-9
    /// diagonal jitter.
    ///
    /// # Panics
    /// Panics if n+κ is not positive.
    ///
    /// # Errors
    /// [`FiduciaError::NumericalInstability`] if the covariance is not
    /// positive definite even after regularization.
    pub fn generate(
        mean: &StateVector<T, N>,
        covariance: &StateCovariance<T, N>,
        kappa: T,
    ) -> Result<Self> {
        let n = T::from(N).unwrap();
        let spread = n + kappa;
        assert!(
            spread > T::zero(),
            "State dimension plus kappa must be positive"
        );

        let scaled = covariance.symmetrized().scale(spread);
        let root = match scaled.cholesky() {
            Some(root) => root,
            None => {
                debug!("covariance not positive definite, retrying with jitter");
                let jitter = StateCovariance::identity().scale(T::from(1e-9).unwrap());
                scaled
                    .add(&jitter)
                    .cholesky()
                    .ok_or(FiduciaError::NumericalInstability)?
            }
        };

        let mut points = Vec::with_capacity(2 * N + 1);

        // χ₀ = μ
        points.push(*mean);

        // χᵢ = μ ± column_i(√((n+κ)Σ))
        for i in 0..N {
            let offset = root.column(i).into_owned();
            points.push(StateVector::from_svector(mean.as_svector() + &offset));
            points.push(StateVector::from_svector(mean.as_svector() - &offset));
        }

        let two = T::from(2.0).unwrap();
        Ok(Self {
            points,
            weight_center: kappa / spread,
            weight_side: T::one() / (two * spread),
        })
    }

    /// Weight of the sigma point at `index` (0 is the central point).
    #[inline]
    pub fn weight(&self, index: usize) -> T {
        if index == 0 {
            self.weight_center
        } else {
            self.weight_side
        }
    }

    /// Pushes every point through a transformation and recovers the weighted
    /// mean and covariance of the images, plus optional additive noise.
    pub fn recover_mean_cov<const D: usize, F>(
        &self,
        transform: F,
        additive_noise: Option<&SMatrix<T, D, D>>,
    ) -> (SVector<T, D>, SMatrix<T, D, D>)
    where
        F: Fn(&StateVector<T, N>) -> SVector<T, D>,
    {
        let images: Vec<SVector<T, D>> = self.points.iter().map(transform).collect();

        let mut mean = images[0].scale(self.weight_center);
        for image in &images[1..] {
            mean += image.scale(self.weight_side);
        }

        let mut cov = SMatrix::zeros();
        for (index, image) in images.iter().enumerate() {
            let offset = image - mean;
            cov += (offset * offset.transpose()).scale(self.weight(index));
        }
        if let Some(noise) = additive_noise {
            cov += noise;
        }

        (mean, cov)
    }

    /// Weighted cross-covariance between the points and their images under a
    /// transformation.
    pub fn cross_covariance<const D: usize, F>(
        &self,
        state_mean: &SVector<T, N>,
        transform: F,
        transformed_mean: &SVector<T, D>,
    ) -> SMatrix<T, N, D>
    where
        F: Fn(&StateVector<T, N>) -> SVector<T, D>,
    {
        let mut cross = SMatrix::zeros();
        for (index, point) in self.points.iter().enumerate() {
            let state_offset = point.as_svector() - state_mean;
            let image_offset = transform(point) - transformed_mean;
            cross += (state_offset * image_offset.transpose()).scale(self.weight(index));
        }
        cross
    }
}

// ============================================================================
// Unscented Kalman Filter
// ============================================================================

/// An Unscented Kalman Filter owning its state estimate.
///
/// The filter holds the current mean and covariance and advances them in
/// place: [`predict`](UnscentedKalmanFilter::predict) propagates the estimate
/// through a [`ProcessModel`], and [`update`](UnscentedKalmanFilter::update)
/// corrects it against the measurement carried by an [`ObservationModel`].
/// Models are passed per call, so one filter can alternate between sensors.
///
/// # Type Parameters
///
/// - `T`: Scalar type
/// - `N`: State dimension
#[derive(Debug, Clone)]
pub struct UnscentedKalmanFilter<T: RealField, const N: usize> {
    state: StateVector<T, N>,
    covariance: StateCovariance<T, N>,
    kappa: T,
}

impl<T: RealField + Float + Copy, const N: usize> UnscentedKalmanFilter<T, N> {
    /// Creates a filter from an initial estimate and its uncertainty.
    ///
    /// # Panics
    /// Panics if N+κ is not positive.
    pub fn new(state: StateVector<T, N>, covariance: StateCovariance<T, N>, kappa: T) -> Self {
        let n = T::from(N).unwrap();
        assert!(
            n + kappa > T::zero(),
            "State dimension plus kappa must be positive"
        );
        Self {
            state,
            covariance,
            kappa,
        }
    }

    /// Current state estimate.
    #[inline]
    pub fn state(&self) -> &StateVector<T, N> {
        &self.state
    }

    /// Current state covariance.
    #[inline]
    pub fn covariance(&self) -> &StateCovariance<T, N> {
        &self.covariance
    }

    /// The sigma point spread parameter.
    #[inline]
    pub fn kappa(&self) -> T {
        self.kappa
    }

    /// Total variance (trace of the covariance), a scalar uncertainty measure.
    #[inline]
    pub fn uncertainty(&self) -> T {
        self.covariance.trace()
    }

    /// Replaces the estimate, e.g. after a track loss or a filter error.
    pub fn reset(&mut self, state: StateVector<T, N>, covariance: StateCovariance<T, N>) {
        self.state = state;
        self.covariance = covariance;
    }

    /// Advances the estimate by one time step of the process model.
    ///
    /// Sigma points are propagated through the nonlinear transition and the
    /// predicted statistics replace the current estimate, inflated by the
    /// model's process noise.
    ///
    /// # Errors
    /// [`FiduciaError::NumericalInstability`] if sigma points cannot be
    /// generated from the current covariance. The estimate is left unchanged.
    pub fn predict<P>(&mut self, process: &P) -> Result<()>
    where
        P: ProcessModel<T, N>,
    {
        let sigma = SigmaPoints::generate(&self.state, &self.covariance, self.kappa)?;
        let q = process.process_noise();

        let (mean, cov) = sigma.recover_mean_cov(
            |x| process.transition(x).into_svector(),
            Some(q.as_matrix()),
        );

        self.state = StateVector::from_svector(mean);
        self.covariance = StateCovariance::from_matrix(cov);
        Ok(())
    }

    /// Corrects the estimate against the observation model's measurement.
    ///
    /// Sigma points are pushed through the observation function to predict
    /// the measurement; the Kalman gain then folds the discrepancy with the
    /// model's actual [`measurement`](ObservationModel::measurement) back
    /// into the state.
    ///
    /// # Errors
    ///
    /// - [`FiduciaError::NumericalInstability`] if sigma points cannot be
    ///   generated from the current covariance.
    /// - [`FiduciaError::SingularMatrix`] if the innovation covariance cannot
    ///   be inverted.
    ///
    /// The estimate is left unchanged on error.
    pub fn update<O, const M: usize>(&mut self, observation: &O) -> Result<()>
    where
        O: ObservationModel<T, N, M>,
    {
        let sigma = SigmaPoints::generate(&self.state, &self.covariance, self.kappa)?;
        let r = observation.measurement_noise();

        let (z_mean, z_cov) = sigma.recover_mean_cov(
            |x| observation.observe(x).into_svector(),
            Some(r.as_matrix()),
        );

        let cross_cov = sigma.cross_covariance(
            self.state.as_svector(),
            |x| observation.observe(x).into_svector(),
            &z_mean,
        );

        // Kalman gain: K = C * S⁻¹
        let z_cov_inv = z_cov.try_inverse().ok_or(FiduciaError::SingularMatrix)?;
        let gain = cross_cov * z_cov_inv;

        let innovation = observation.measurement().into_svector() - z_mean;

        let mean = self.state.as_svector() + gain * innovation;
        // P = P - K * S * Kᵀ, re-symmetrized to absorb round-off
        let cov = self.covariance.as_matrix() - gain * z_cov * gain.transpose();

        self.state = StateVector::from_svector(mean);
        self.covariance = StateCovariance::from_matrix(cov).symmetrized();
        Ok(())
    }

    /// Performs a predict-update cycle with one sensor.
    pub fn step<P, O, const M: usize>(&mut self, process: &P, observation: &O) -> Result<()>
    where
        P: ProcessModel<T, N>,
        O: ObservationModel<T, N, M>,
    {
        self.predict(process)?;
        self.update(observation)
    }
}
