//! Transpose runners
//!
//! Plain transpose: entry `(i, j)` of the result is entry `(j, i)` of the
//! operand. Complex entries are NOT conjugated; a conjugate transpose would
//! be a separate operation.

use super::{complex_parts, complex_result, real_parts, real_result, scalar_operands, single};
use crate::dispatch::Registry;
use crate::dtype::{DataType, Element};
use crate::error::Result;
use crate::graph::{OpKind, Registers};
use crate::terminal::Terminal;

pub(super) fn register(registry: &mut Registry) {
    registry.register(OpKind::Transpose, &[DataType::RealScalar], transpose_real);
    registry.register(
        OpKind::Transpose,
        &[DataType::RealDenseMatrix],
        transpose_real,
    );
    registry.register(
        OpKind::Transpose,
        &[DataType::ComplexScalar],
        transpose_complex,
    );
    registry.register(
        OpKind::Transpose,
        &[DataType::ComplexDenseMatrix],
        transpose_complex,
    );
}

fn transpose_real<'t>(args: &[&Terminal<'t>]) -> Result<Registers> {
    let (m, n, data) = real_parts(args[0]);
    let t = transpose_core(m, n, &data);
    Ok(single(real_result(t, n, m, scalar_operands(args))?))
}

fn transpose_complex<'t>(args: &[&Terminal<'t>]) -> Result<Registers> {
    let (m, n, data) = complex_parts(args[0]);
    let t = transpose_core(m, n, &data);
    Ok(single(complex_result(t, n, m, scalar_operands(args))?))
}

fn transpose_core<T: Element>(m: usize, n: usize, data: &[T]) -> Vec<T> {
    let mut out = vec![T::zero(); m * n];
    for j in 0..n {
        for i in 0..m {
            out[i * n + j] = data[j * m + i];
        }
    }
    out
}
