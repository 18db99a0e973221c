//! Terminal data model: immutable scalar and dense-matrix values
//!
//! Terminals hold the concrete numeric data at the leaves of an expression
//! graph and in the registers of evaluated expression nodes. They are
//! immutable once constructed; operations always produce fresh terminals.
//!
//! Matrix data is column-major: entry `(i, j)` of an `m x n` matrix lives at
//! buffer index `j*m + i`.

pub mod storage;

pub use storage::Buffer;

use crate::dtype::{Complex128, DataType, Element};
use crate::error::{Error, Result};

/// Immutable dense column-major matrix over element type `T`
#[derive(Debug, Clone)]
pub struct DenseMatrix<'a, T> {
    rows: usize,
    cols: usize,
    data: Buffer<'a, T>,
}

impl<'a, T: Element> DenseMatrix<'a, T> {
    /// Construct from a buffer, validating that its length is exactly
    /// `rows * cols`
    pub fn new(data: Buffer<'a, T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::BufferSize {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Construct an owning matrix from a `Vec`
    pub fn owned(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        Self::new(Buffer::Owned(data), rows, cols)
    }

    /// Construct a viewing matrix over caller data
    pub fn viewed(data: &'a [T], rows: usize, cols: usize) -> Result<Self> {
        Self::new(Buffer::Viewed(data), rows, cols)
    }

    /// Row count
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column count
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The column-major element buffer
    pub fn as_slice(&self) -> &[T] {
        self.data.as_slice()
    }

    /// Entry at row `i`, column `j`
    pub fn get(&self, i: usize, j: usize) -> T {
        debug_assert!(i < self.rows && j < self.cols);
        self.as_slice()[j * self.rows + i]
    }

    /// True when the matrix exclusively owns its buffer
    pub fn owns_data(&self) -> bool {
        self.data.is_owned()
    }
}

/// A terminal value: real/complex scalar or dense matrix
///
/// The lifetime parameter bounds any viewed matrix buffers; terminals built
/// from owned data (including every runner result) are `Terminal<'static>`.
#[derive(Debug, Clone)]
pub enum Terminal<'a> {
    /// Real scalar value
    RealScalar(f64),
    /// Complex scalar value
    ComplexScalar(Complex128),
    /// Real dense matrix
    RealDenseMatrix(DenseMatrix<'a, f64>),
    /// Complex dense matrix
    ComplexDenseMatrix(DenseMatrix<'a, Complex128>),
}

impl<'a> Terminal<'a> {
    /// Construct a real scalar terminal
    pub fn real_scalar(v: f64) -> Terminal<'static> {
        Terminal::RealScalar(v)
    }

    /// Construct a complex scalar terminal
    pub fn complex_scalar(v: Complex128) -> Terminal<'static> {
        Terminal::ComplexScalar(v)
    }

    /// Construct an owning real matrix terminal
    pub fn owned_real_matrix(
        data: Vec<f64>,
        rows: usize,
        cols: usize,
    ) -> Result<Terminal<'static>> {
        Ok(Terminal::RealDenseMatrix(DenseMatrix::owned(data, rows, cols)?))
    }

    /// Construct a real matrix terminal viewing caller data
    pub fn viewed_real_matrix(data: &'a [f64], rows: usize, cols: usize) -> Result<Self> {
        Ok(Terminal::RealDenseMatrix(DenseMatrix::viewed(data, rows, cols)?))
    }

    /// Construct an owning complex matrix terminal
    pub fn owned_complex_matrix(
        data: Vec<Complex128>,
        rows: usize,
        cols: usize,
    ) -> Result<Terminal<'static>> {
        Ok(Terminal::ComplexDenseMatrix(DenseMatrix::owned(
            data, rows, cols,
        )?))
    }

    /// Construct a complex matrix terminal viewing caller data
    pub fn viewed_complex_matrix(
        data: &'a [Complex128],
        rows: usize,
        cols: usize,
    ) -> Result<Self> {
        Ok(Terminal::ComplexDenseMatrix(DenseMatrix::viewed(
            data, rows, cols,
        )?))
    }

    /// Concrete runtime type tag, the dispatch key component
    pub fn data_type(&self) -> DataType {
        match self {
            Terminal::RealScalar(_) => DataType::RealScalar,
            Terminal::ComplexScalar(_) => DataType::ComplexScalar,
            Terminal::RealDenseMatrix(_) => DataType::RealDenseMatrix,
            Terminal::ComplexDenseMatrix(_) => DataType::ComplexDenseMatrix,
        }
    }

    /// Logical row count (scalars are 1x1)
    pub fn rows(&self) -> usize {
        match self {
            Terminal::RealScalar(_) | Terminal::ComplexScalar(_) => 1,
            Terminal::RealDenseMatrix(m) => m.rows(),
            Terminal::ComplexDenseMatrix(m) => m.rows(),
        }
    }

    /// Logical column count (scalars are 1x1)
    pub fn cols(&self) -> usize {
        match self {
            Terminal::RealScalar(_) | Terminal::ComplexScalar(_) => 1,
            Terminal::RealDenseMatrix(m) => m.cols(),
            Terminal::ComplexDenseMatrix(m) => m.cols(),
        }
    }

    /// Entry at `(i, j)`, widened to complex; scalars index as 1x1
    pub fn value_at(&self, i: usize, j: usize) -> Complex128 {
        match self {
            Terminal::RealScalar(v) => {
                debug_assert!(i == 0 && j == 0);
                Complex128::from(*v)
            }
            Terminal::ComplexScalar(v) => {
                debug_assert!(i == 0 && j == 0);
                *v
            }
            Terminal::RealDenseMatrix(m) => Complex128::from(m.get(i, j)),
            Terminal::ComplexDenseMatrix(m) => m.get(i, j),
        }
    }

    /// Type-invariant value comparison with absolute/relative tolerance
    ///
    /// Shapes must agree (scalars compare equal to 1x1 matrices); each entry
    /// pair must satisfy `|a-b| <= abs_tol` or `|a-b| <= rel_tol * |b|`.
    /// Real and complex terminals compare by value, so a complex matrix with
    /// zero imaginary parts equals its real counterpart.
    pub fn maths_equals(&self, other: &Terminal<'_>, abs_tol: f64, rel_tol: f64) -> bool {
        if self.rows() != other.rows() || self.cols() != other.cols() {
            return false;
        }
        for j in 0..self.cols() {
            for i in 0..self.rows() {
                let a = self.value_at(i, j);
                let b = other.value_at(i, j);
                let diff = (a - b).magnitude();
                if diff > abs_tol && diff > rel_tol * b.magnitude() {
                    return false;
                }
            }
        }
        true
    }
}
