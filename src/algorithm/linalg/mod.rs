//! Dense linear algebra kernels
//!
//! Small, dense, row-major routines used by the root solvers:
//!
//! - [`lu`] - LU decomposition with partial pivoting and triangular solves,
//!   generic over real and complex scalars
//! - [`eig`] - balancing, Householder Hessenberg reduction, Francis
//!   double-shift QR for eigenvalues and inverse iteration for eigenvectors
//! - [`nullspace`] - numerical null space through one-sided Jacobi rotations
//!
//! All matrices are `&[T]` slices in row-major order with explicit
//! dimensions, matching the layout of [`crate::tensor::Tensor`].

pub mod eig;
pub mod lu;
pub mod nullspace;

pub use eig::{eigenvector_inverse_iteration, eigvals};
pub use lu::{LuDecomposition, lu_decompose, solve};
pub use nullspace::{JacobiRotation, null_space};

use crate::dtype::Complex128;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Trait for scalars that support the factorizations in this module.
///
/// Implemented for `f64` and [`Complex128`], so the same LU code drives the
/// real linear shortcut and complex inverse iteration.
pub trait LinalgElement:
    Copy
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Additive identity
    fn zero() -> Self;
    /// Multiplicative identity
    fn one() -> Self;
    /// Absolute value (modulus for complex numbers)
    fn abs_val(self) -> f64;
    /// Returns machine epsilon for this type
    #[inline]
    fn epsilon_val() -> f64 {
        f64::EPSILON
    }
}

impl LinalgElement for f64 {
    #[inline]
    fn zero() -> Self {
        0.0
    }
    #[inline]
    fn one() -> Self {
        1.0
    }
    #[inline]
    fn abs_val(self) -> f64 {
        self.abs()
    }
}

impl LinalgElement for Complex128 {
    #[inline]
    fn zero() -> Self {
        Complex128::ZERO
    }
    #[inline]
    fn one() -> Self {
        Complex128::ONE
    }
    #[inline]
    fn abs_val(self) -> f64 {
        self.magnitude()
    }
}

/// Identity matrix [n × n] in row-major order
pub fn identity_matrix<T: LinalgElement>(n: usize) -> Vec<T> {
    let mut out = vec![T::zero(); n * n];
    for i in 0..n {
        out[i * n + i] = T::one();
    }
    out
}
