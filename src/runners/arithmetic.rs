//! Elementwise arithmetic runners: PLUS, MINUS, NEGATE
//!
//! PLUS carries the full operand-type matrix, promoting mixed real/complex
//! pairs to complex. MINUS is registered for same-domain pairs only; a mixed
//! pair has no runner and dispatching one is a dispatch error.
//!
//! A 1x1 operand broadcasts against any shape; otherwise shapes must agree.

use super::{
    complex_parts, complex_result, real_parts, real_result, scalar_operands, single, DenseView,
    ALL_TYPES,
};
use crate::dispatch::Registry;
use crate::dtype::{Complex128, Element};
use crate::error::{Error, Result};
use crate::graph::{OpKind, Registers};
use crate::terminal::Terminal;

pub(super) fn register(registry: &mut Registry) {
    for a in ALL_TYPES {
        for b in ALL_TYPES {
            let plus = if a.is_complex() || b.is_complex() {
                plus_complex
            } else {
                plus_real
            };
            registry.register(OpKind::Plus, &[a, b], plus);

            // Same-domain only; mixed-domain MINUS is left unregistered
            if a.is_complex() == b.is_complex() {
                let minus = if a.is_complex() { minus_complex } else { minus_real };
                registry.register(OpKind::Minus, &[a, b], minus);
            }
        }
    }
    for t in ALL_TYPES {
        let negate = if t.is_complex() {
            negate_complex
        } else {
            negate_real
        };
        registry.register(OpKind::Negate, &[t], negate);
    }
}

fn plus_real<'t>(args: &[&Terminal<'t>]) -> Result<Registers> {
    binary_real(args, "PLUS", |a, b| a + b)
}

fn minus_real<'t>(args: &[&Terminal<'t>]) -> Result<Registers> {
    binary_real(args, "MINUS", |a, b| a - b)
}

fn plus_complex<'t>(args: &[&Terminal<'t>]) -> Result<Registers> {
    binary_complex(args, "PLUS", |a, b| a + b)
}

fn minus_complex<'t>(args: &[&Terminal<'t>]) -> Result<Registers> {
    binary_complex(args, "MINUS", |a, b| a - b)
}

fn negate_real<'t>(args: &[&Terminal<'t>]) -> Result<Registers> {
    let a = DenseView::new(real_parts(args[0]));
    let data = a.data.iter().map(|&v| -v).collect();
    Ok(single(real_result(
        data,
        a.rows,
        a.cols,
        scalar_operands(args),
    )?))
}

fn negate_complex<'t>(args: &[&Terminal<'t>]) -> Result<Registers> {
    let a = DenseView::new(complex_parts(args[0]));
    let data = a.data.iter().map(|&v| -v).collect();
    Ok(single(complex_result(
        data,
        a.rows,
        a.cols,
        scalar_operands(args),
    )?))
}

fn binary_real<'t>(
    args: &[&Terminal<'t>],
    op: &'static str,
    f: fn(f64, f64) -> f64,
) -> Result<Registers> {
    let a = DenseView::new(real_parts(args[0]));
    let b = DenseView::new(real_parts(args[1]));
    let c = elementwise(&a, &b, op, f)?;
    Ok(single(real_result(
        c.data,
        c.rows,
        c.cols,
        scalar_operands(args),
    )?))
}

fn binary_complex<'t>(
    args: &[&Terminal<'t>],
    op: &'static str,
    f: fn(Complex128, Complex128) -> Complex128,
) -> Result<Registers> {
    let a = DenseView::new(complex_parts(args[0]));
    let b = DenseView::new(complex_parts(args[1]));
    let c = elementwise(&a, &b, op, f)?;
    Ok(single(complex_result(
        c.data,
        c.rows,
        c.cols,
        scalar_operands(args),
    )?))
}

fn elementwise<T: Element>(
    a: &DenseView<T>,
    b: &DenseView<T>,
    op: &'static str,
    f: fn(T, T) -> T,
) -> Result<DenseView<T>> {
    if a.is_unit() {
        let s = a.data[0];
        return Ok(DenseView::new((
            b.rows,
            b.cols,
            b.data.iter().map(|&v| f(s, v)).collect(),
        )));
    }
    if b.is_unit() {
        let s = b.data[0];
        return Ok(DenseView::new((
            a.rows,
            a.cols,
            a.data.iter().map(|&v| f(v, s)).collect(),
        )));
    }
    if a.rows != b.rows || a.cols != b.cols {
        return Err(Error::dimensions(op, (a.rows, a.cols), (b.rows, b.cols)));
    }
    Ok(DenseView::new((
        a.rows,
        a.cols,
        a.data
            .iter()
            .zip(b.data.iter())
            .map(|(&x, &y)| f(x, y))
            .collect(),
    )))
}
