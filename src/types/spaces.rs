//! Vector space markers and typed vectors
//!
//! This module provides type-safe vectors that cannot be accidentally mixed
//! across different mathematical spaces. A filter state (marker pose and its
//! derivatives) and a sensor measurement may share a scalar type and even a
//! dimension, but adding one to the other is always a bug; the `Space` marker
//! makes that a compile error instead of a silent one.

use ::core::marker::PhantomData;
use ::core::ops::{Add, Mul, Neg, Sub};
use nalgebra::{RealField, SMatrix, SVector, Scalar};

// ============================================================================
// Vector Space Markers
// ============================================================================

/// Marker type for state space vectors (e.g., marker pose and velocity)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateSpace;

/// Marker type for measurement space vectors (e.g., sensor observations)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasurementSpace;

// ============================================================================
// Typed Vector
// ============================================================================

/// A vector tagged with the mathematical space it lives in.
///
/// Arithmetic is only defined between vectors of the same `Space`, so a
/// measurement can never leak into state arithmetic unnoticed.
///
/// # Type Parameters
///
/// - `T`: The scalar type (typically `f32` or `f64`)
/// - `N`: The dimension of the vector (const generic)
/// - `Space`: A marker type naming the space this vector belongs to
#[repr(transparent)]
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<T: Scalar, const N: usize, Space> {
    data: SVector<T, N>,
    _space: PhantomData<Space>,
}

impl<T: Scalar, const N: usize, Space> Vector<T, N, Space> {
    #[inline]
    fn wrap(data: SVector<T, N>) -> Self {
        Self {
            data,
            _space: PhantomData,
        }
    }

    /// Builds a vector from its components.
    #[inline]
    pub fn from_array(components: [T; N]) -> Self {
        Self::wrap(SVector::from(components))
    }

    /// Wraps an nalgebra vector into this space.
    #[inline]
    pub fn from_svector(data: SVector<T, N>) -> Self {
        Self::wrap(data)
    }

    /// Borrows the untagged nalgebra vector.
    #[inline]
    pub fn as_svector(&self) -> &SVector<T, N> {
        &self.data
    }

    /// Unwraps into the untagged nalgebra vector.
    #[inline]
    pub fn into_svector(self) -> SVector<T, N> {
        self.data
    }

    /// The components as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.data.as_slice()
    }

    /// Component at `index`, or `None` past the dimension.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    /// Component at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

impl<T: Scalar + Copy, const N: usize, Space: Clone> Copy for Vector<T, N, Space> {}

impl<T: RealField + Copy, const N: usize, Space> Vector<T, N, Space> {
    /// The zero vector of this space.
    #[inline]
    pub fn zeros() -> Self {
        Self::wrap(SVector::zeros())
    }

    /// Squared Euclidean norm.
    #[inline]
    pub fn norm_squared(&self) -> T {
        self.data.norm_squared()
    }

    /// Euclidean norm.
    #[inline]
    pub fn norm(&self) -> T {
        self.data.norm()
    }

    /// Component-wise scaling.
    #[inline]
    pub fn scale(&self, factor: T) -> Self {
        Self::wrap(self.data.scale(factor))
    }
}

// ============================================================================
// Type Aliases
// ============================================================================

/// A state vector in state space.
pub type StateVector<T, const N: usize> = Vector<T, N, StateSpace>;

/// A measurement vector in measurement space.
pub type Measurement<T, const M: usize> = Vector<T, M, MeasurementSpace>;

// ============================================================================
// Operations: Same-Space Addition/Subtraction
// ============================================================================

impl<T: RealField + Copy, const N: usize, Space> Add for Vector<T, N, Space> {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self::wrap(self.data + other.data)
    }
}

impl<T: RealField + Copy, const N: usize, Space> Sub for Vector<T, N, Space> {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::wrap(self.data - other.data)
    }
}

impl<T: RealField + Copy, const N: usize, Space> Neg for Vector<T, N, Space> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::wrap(-self.data)
    }
}

impl<T: RealField + Copy, const N: usize, Space> Mul<T> for Vector<T, N, Space> {
    type Output = Self;

    #[inline]
    fn mul(self, factor: T) -> Self {
        Self::wrap(self.data * factor)
    }
}

// ============================================================================
// Covariance Matrix
// ============================================================================

/// A covariance matrix bound to a specific vector space.
///
/// Wraps a square matrix that is expected to stay symmetric positive
/// semi-definite; the numerical operations a filter needs (scaling, inverse,
/// Cholesky factor, symmetrization) are exposed directly.
#[repr(transparent)]
#[derive(Debug, Clone, PartialEq)]
pub struct Covariance<T: Scalar, const N: usize, Space> {
    data: SMatrix<T, N, N>,
    _space: PhantomData<Space>,
}

impl<T: Scalar, const N: usize, Space> Covariance<T, N, Space> {
    #[inline]
    fn wrap(data: SMatrix<T, N, N>) -> Self {
        Self {
            data,
            _space: PhantomData,
        }
    }

    /// Wraps a raw matrix. The caller vouches that it is symmetric positive
    /// semi-definite.
    #[inline]
    pub fn from_matrix(data: SMatrix<T, N, N>) -> Self {
        Self::wrap(data)
    }

    /// Borrows the untagged matrix.
    #[inline]
    pub fn as_matrix(&self) -> &SMatrix<T, N, N> {
        &self.data
    }

    /// Unwraps into the untagged matrix.
    #[inline]
    pub fn into_matrix(self) -> SMatrix<T, N, N> {
        self.data
    }
}

impl<T: Scalar + Copy, const N: usize, Space: Clone> Copy for Covariance<T, N, Space> where
    SMatrix<T, N, N>: Copy
{
}

impl<T: RealField + Copy, const N: usize, Space> Covariance<T, N, Space> {
    /// The zero matrix.
    #[inline]
    pub fn zeros() -> Self {
        Self::wrap(SMatrix::zeros())
    }

    /// The identity matrix.
    #[inline]
    pub fn identity() -> Self {
        Self::wrap(SMatrix::identity())
    }

    /// A diagonal matrix from per-component variances.
    #[inline]
    pub fn from_diagonal(variances: &SVector<T, N>) -> Self {
        Self::wrap(SMatrix::from_diagonal(variances))
    }

    /// Uniform scaling.
    #[inline]
    pub fn scale(&self, factor: T) -> Self {
        Self::wrap(self.data.scale(factor))
    }

    /// Sum of two covariances.
    #[inline]
    pub fn add(&self, other: &Self) -> Self {
        Self::wrap(self.data + other.data)
    }

    /// Trace, the total variance.
    #[inline]
    pub fn trace(&self) -> T {
        self.data.trace()
    }

    /// Returns the symmetric part (A + Aᵀ)/2 of the matrix.
    ///
    /// Covariance arithmetic accumulates tiny asymmetries through repeated
    /// multiplication. Restoring exact symmetry keeps later Cholesky
    /// decompositions from failing on round-off alone.
    #[inline]
    pub fn symmetrized(&self) -> Self {
        let two = T::one() + T::one();
        Self::wrap((self.data + self.data.transpose()).unscale(two))
    }

    /// Inverse, or `None` when singular.
    #[inline]
    pub fn try_inverse(&self) -> Option<Self> {
        self.data.try_inverse().map(Self::wrap)
    }

    /// Lower-triangular Cholesky factor, or `None` when the matrix is not
    /// positive definite.
    #[inline]
    pub fn cholesky(&self) -> Option<SMatrix<T, N, N>> {
        nalgebra::Cholesky::new(self.data).map(|c| c.l())
    }
}

impl<T: RealField + Copy, const N: usize, Space> Add for Covariance<T, N, Space> {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self::wrap(self.data + other.data)
    }
}

// ============================================================================
// Type Aliases for Covariance
// ============================================================================

/// Covariance matrix in state space.
pub type StateCovariance<T, const N: usize> = Covariance<T, N, StateSpace>;

/// Covariance matrix in measurement space.
pub type MeasurementCovariance<T, const M: usize> = Covariance<T, M, MeasurementSpace>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_arithmetic_within_a_space() {
        let a: Measurement<f64, 3> = Measurement::from_array([2.0, -1.0, 4.0]);
        let b: Measurement<f64, 3> = Measurement::from_array([1.0, 1.0, -2.0]);

        let sum = a + b;
        assert!((sum.index(0) - 3.0).abs() < 1e-12);
        assert!(sum.index(1).abs() < 1e-12);

        let diff = a - b;
        assert!((diff.index(2) - 6.0).abs() < 1e-12);

        let flipped = -(a.scale(2.0));
        assert!((flipped.index(0) + 4.0).abs() < 1e-12);
        assert!(((a * 0.5).index(2) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_vector_accessors() {
        let v: StateVector<f64, 4> = StateVector::from_array([7.0, 8.0, 9.0, 10.0]);

        assert_eq!(v.as_slice(), &[7.0, 8.0, 9.0, 10.0]);
        assert_eq!(v.get(3), Some(&10.0));
        assert_eq!(v.get(4), None);
        assert!((v.norm_squared() - 294.0).abs() < 1e-12);
        assert!((StateVector::<f64, 4>::zeros().norm()).abs() < 1e-12);
    }

    #[test]
    fn test_covariance_construction_and_trace() {
        let diag: StateCovariance<f64, 3> =
            StateCovariance::from_diagonal(&nalgebra::vector![4.0, 9.0, 16.0]);
        assert!((diag.trace() - 29.0).abs() < 1e-12);
        assert!((diag.as_matrix()[(1, 1)] - 9.0).abs() < 1e-12);
        assert!(diag.as_matrix()[(0, 2)].abs() < 1e-12);

        let scaled = StateCovariance::<f64, 3>::identity().scale(0.5);
        let total = Covariance::add(&diag, &scaled);
        assert!((total.trace() - 30.5).abs() < 1e-12);
    }

    #[test]
    fn test_symmetrized_restores_symmetry() {
        let skewed: StateCovariance<f64, 2> =
            StateCovariance::from_matrix(nalgebra::matrix![2.0, 0.6; 0.2, 1.0]);
        let sym = skewed.symmetrized();

        assert!((sym.as_matrix()[(0, 1)] - 0.4).abs() < 1e-12);
        assert!((sym.as_matrix()[(1, 0)] - 0.4).abs() < 1e-12);
        // The diagonal is untouched.
        assert!((sym.as_matrix()[(0, 0)] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_cholesky_and_inverse_reject_degenerate_input() {
        let indefinite: MeasurementCovariance<f64, 2> =
            MeasurementCovariance::from_matrix(nalgebra::matrix![1.0, 3.0; 3.0, 1.0]);
        assert!(indefinite.cholesky().is_none());

        let singular: MeasurementCovariance<f64, 2> =
            MeasurementCovariance::from_matrix(nalgebra::matrix![1.0, 1.0; 1.0, 1.0]);
        assert!(singular.try_inverse().is_none());

        let fine = MeasurementCovariance::<f64, 2>::identity().scale(2.0);
        let inverse = fine.try_inverse().unwrap();
        assert!((inverse.as_matrix()[(0, 0)] - 0.5).abs() < 1e-12);
        let root = fine.cholesky().unwrap();
        assert!((root[(0, 0)] - 2.0_f64.sqrt()).abs() < 1e-12);
    }
}
