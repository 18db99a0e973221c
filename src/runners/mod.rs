//! Operation kernels ("runners") and their registration
//!
//! Each runner is a free function implementing one operation for one operand
//! type combination. `build_table` assembles the process-wide registry the
//! dispatcher routes through; it runs once, at first dispatch.
//!
//! Kernels are written as generic cores over [`Element`] and registered
//! through thin domain-specific entry points, so the real and complex paths
//! share one implementation of the numerics.

mod arithmetic;
mod lu;
mod mtimes;
mod transpose;

#[cfg(test)]
mod tests;

use crate::dispatch::Registry;
use crate::dtype::{Complex128, DataType, Element};
use crate::error::Result;
use crate::graph::Registers;
use crate::terminal::Terminal;

/// Every concrete terminal type, for registration loops
pub(crate) const ALL_TYPES: [DataType; 4] = [
    DataType::RealScalar,
    DataType::ComplexScalar,
    DataType::RealDenseMatrix,
    DataType::ComplexDenseMatrix,
];

/// Assemble the full runner registry
pub(crate) fn build_table() -> crate::dispatch::Table {
    let mut registry = Registry::new();
    lu::register(&mut registry);
    mtimes::register(&mut registry);
    arithmetic::register(&mut registry);
    transpose::register(&mut registry);
    registry.finish()
}

/// Shape and copied data of a terminal, viewed in the real domain
///
/// Only called from runners registered over real operand types.
pub(crate) fn real_parts(t: &Terminal<'_>) -> (usize, usize, Vec<f64>) {
    match t {
        Terminal::RealScalar(v) => (1, 1, vec![*v]),
        Terminal::RealDenseMatrix(m) => (m.rows(), m.cols(), m.as_slice().to_vec()),
        _ => unreachable!("real runner dispatched over complex operand"),
    }
}

/// Shape and copied data of a terminal, widened to the complex domain
pub(crate) fn complex_parts(t: &Terminal<'_>) -> (usize, usize, Vec<Complex128>) {
    match t {
        Terminal::RealScalar(v) => (1, 1, vec![Complex128::from(*v)]),
        Terminal::ComplexScalar(v) => (1, 1, vec![*v]),
        Terminal::RealDenseMatrix(m) => (
            m.rows(),
            m.cols(),
            m.as_slice().iter().map(|&v| Complex128::from(v)).collect(),
        ),
        Terminal::ComplexDenseMatrix(m) => (m.rows(), m.cols(), m.as_slice().to_vec()),
    }
}

/// Wrap a computed real result as a terminal: scalar when flagged, matrix
/// otherwise
pub(crate) fn real_result(
    data: Vec<f64>,
    rows: usize,
    cols: usize,
    as_scalar: bool,
) -> Result<Terminal<'static>> {
    if as_scalar && rows == 1 && cols == 1 {
        Ok(Terminal::real_scalar(data[0]))
    } else {
        Terminal::owned_real_matrix(data, rows, cols)
    }
}

/// Wrap a computed complex result as a terminal: scalar when flagged, matrix
/// otherwise
pub(crate) fn complex_result(
    data: Vec<Complex128>,
    rows: usize,
    cols: usize,
    as_scalar: bool,
) -> Result<Terminal<'static>> {
    if as_scalar && rows == 1 && cols == 1 {
        Ok(Terminal::complex_scalar(data[0]))
    } else {
        Terminal::owned_complex_matrix(data, rows, cols)
    }
}

/// Single-result register list
pub(crate) fn single(result: Terminal<'static>) -> Registers {
    let mut regs = Registers::new();
    regs.push(result);
    regs
}

/// True when both operands are scalar terminals, so the result stays scalar
pub(crate) fn scalar_operands(args: &[&Terminal<'_>]) -> bool {
    args.iter().all(|t| t.data_type().is_scalar())
}

/// Generic element access used by the elementwise cores
pub(crate) struct DenseView<T> {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<T>,
}

impl<T: Element> DenseView<T> {
    pub(crate) fn new(parts: (usize, usize, Vec<T>)) -> Self {
        Self {
            rows: parts.0,
            cols: parts.1,
            data: parts.2,
        }
    }

    pub(crate) fn is_unit(&self) -> bool {
        self.rows == 1 && self.cols == 1
    }
}
