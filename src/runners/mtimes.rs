//! Matrix product runners
//!
//! A scalar operand (or 1x1 matrix, which commutes the same way) scales the
//! other operand; otherwise this is the usual matrix product and the inner
//! dimensions must agree. Mixing real and complex operands promotes the
//! computation to the complex domain.

use super::{
    complex_parts, complex_result, real_parts, real_result, scalar_operands, single, DenseView,
    ALL_TYPES,
};
use crate::dispatch::Registry;
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::graph::{OpKind, Registers};
use crate::terminal::Terminal;

pub(super) fn register(registry: &mut Registry) {
    for a in ALL_TYPES {
        for b in ALL_TYPES {
            let runner = if a.is_complex() || b.is_complex() {
                mtimes_complex
            } else {
                mtimes_real
            };
            registry.register(OpKind::Mtimes, &[a, b], runner);
        }
    }
}

fn mtimes_real<'t>(args: &[&Terminal<'t>]) -> Result<Registers> {
    let a = DenseView::new(real_parts(args[0]));
    let b = DenseView::new(real_parts(args[1]));
    let c = mtimes_core(&a, &b)?;
    Ok(single(real_result(
        c.data,
        c.rows,
        c.cols,
        scalar_operands(args),
    )?))
}

fn mtimes_complex<'t>(args: &[&Terminal<'t>]) -> Result<Registers> {
    let a = DenseView::new(complex_parts(args[0]));
    let b = DenseView::new(complex_parts(args[1]));
    let c = mtimes_core(&a, &b)?;
    Ok(single(complex_result(
        c.data,
        c.rows,
        c.cols,
        scalar_operands(args),
    )?))
}

fn mtimes_core<T: Element>(a: &DenseView<T>, b: &DenseView<T>) -> Result<DenseView<T>> {
    if a.is_unit() {
        let s = a.data[0];
        return Ok(DenseView::new((
            b.rows,
            b.cols,
            b.data.iter().map(|&v| s * v).collect(),
        )));
    }
    if b.is_unit() {
        let s = b.data[0];
        return Ok(DenseView::new((
            a.rows,
            a.cols,
            a.data.iter().map(|&v| v * s).collect(),
        )));
    }
    if a.cols != b.rows {
        return Err(Error::dimensions(
            "MTIMES",
            (a.rows, a.cols),
            (b.rows, b.cols),
        ));
    }

    let (m, k, n) = (a.rows, a.cols, b.cols);
    let mut c = vec![T::zero(); m * n];
    for j in 0..n {
        for p in 0..k {
            let bpj = b.data[j * k + p];
            for i in 0..m {
                let update = a.data[p * m + i] * bpj;
                c[j * m + i] = c[j * m + i] + update;
            }
        }
    }
    Ok(DenseView::new((m, n, c)))
}
