//! Element trait unifying the real and complex domains for generic kernels

use super::complex::Complex128;
use super::DataType;
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Trait for element types usable in numerical kernels
///
/// Implemented by `f64` and `Complex128`. Kernels such as the LU runner are
/// written once over `T: Element` and monomorphized per domain.
pub trait Element:
    Copy
    + Debug
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + 'static
{
    /// DataType tag for a scalar of this element type
    const SCALAR: DataType;
    /// DataType tag for a dense matrix of this element type
    const DENSE_MATRIX: DataType;

    /// Additive identity
    fn zero() -> Self;

    /// Multiplicative identity
    fn one() -> Self;

    /// Magnitude as f64, used for pivot selection
    fn abs_val(&self) -> f64;

    /// True when every component is finite (no NaN/Inf)
    fn is_finite_val(&self) -> bool;

    /// Widen an f64 into this element type
    fn from_f64(v: f64) -> Self;
}

impl Element for f64 {
    const SCALAR: DataType = DataType::RealScalar;
    const DENSE_MATRIX: DataType = DataType::RealDenseMatrix;

    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }

    fn abs_val(&self) -> f64 {
        self.abs()
    }

    fn is_finite_val(&self) -> bool {
        self.is_finite()
    }

    fn from_f64(v: f64) -> Self {
        v
    }
}

impl Element for Complex128 {
    const SCALAR: DataType = DataType::ComplexScalar;
    const DENSE_MATRIX: DataType = DataType::ComplexDenseMatrix;

    fn zero() -> Self {
        Complex128::ZERO
    }

    fn one() -> Self {
        Complex128::ONE
    }

    fn abs_val(&self) -> f64 {
        self.magnitude()
    }

    fn is_finite_val(&self) -> bool {
        self.is_finite()
    }

    fn from_f64(v: f64) -> Self {
        Complex128::new(v, 0.0)
    }
}
