//! Numeric domain model for numdag terminals
//!
//! This module provides the `DataType` enum tagging the concrete runtime type
//! of a terminal value, the `Complex128` number type, and the `Element` trait
//! that lets numerical kernels be written once and monomorphized per domain.

pub mod complex;
mod element;

pub use complex::Complex128;
pub use element::Element;

use std::fmt;

/// Concrete runtime type of a terminal value
///
/// Dispatch keys on the tuple of operand `DataType`s jointly with the
/// operation, so two operations over the same operand types, or one operation
/// over different operand types, reach distinct runners.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Real (f64) scalar
    RealScalar,
    /// Complex (2x f64) scalar
    ComplexScalar,
    /// Real dense column-major matrix
    RealDenseMatrix,
    /// Complex dense column-major matrix
    ComplexDenseMatrix,
}

impl DataType {
    /// Whether values of this type live in the complex domain
    pub fn is_complex(&self) -> bool {
        matches!(self, DataType::ComplexScalar | DataType::ComplexDenseMatrix)
    }

    /// Whether values of this type are scalars
    pub fn is_scalar(&self) -> bool {
        matches!(self, DataType::RealScalar | DataType::ComplexScalar)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::RealScalar => "real scalar",
            DataType::ComplexScalar => "complex scalar",
            DataType::RealDenseMatrix => "real dense matrix",
            DataType::ComplexDenseMatrix => "complex dense matrix",
        };
        write!(f, "{}", name)
    }
}
