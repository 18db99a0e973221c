//! LU decomposition runners
//!
//! Decomposes the operand `A` (`m x n`) into `L` (`m x minmn`, unit lower
//! trapezoidal, rows in the original order) and `U` (`minmn x n`, upper
//! trapezoidal), `minmn = min(m, n)`, such that `L * U == A` to rounding.
//! Results land in the registers as L then U.
//!
//! Scalar operands short-circuit: L is the scalar 1 and U is the value.
//! Dense operands go through the factorization primitive; its singular
//! condition is recovered here and reported as a warning, and the best-effort
//! factors are still produced. Any other primitive failure propagates.

use super::{single, DenseView};
use crate::dispatch::Registry;
use crate::dtype::{DataType, Element};
use crate::error::Result;
use crate::graph::{OpKind, Registers};
use crate::linalg::{getrf, FactorError};
use crate::terminal::Terminal;

pub(super) fn register(registry: &mut Registry) {
    registry.register(OpKind::Lu, &[DataType::RealScalar], lu_real_scalar);
    registry.register(OpKind::Lu, &[DataType::ComplexScalar], lu_complex_scalar);
    registry.register(OpKind::Lu, &[DataType::RealDenseMatrix], lu_real_dense);
    registry.register(
        OpKind::Lu,
        &[DataType::ComplexDenseMatrix],
        lu_complex_dense,
    );
}

fn warn_singular(detail: &dyn std::fmt::Display) {
    log::warn!("singular system detected in matrix decomposition");
    log::warn!("factorization details: {}", detail);
}

fn lu_real_scalar<'t>(args: &[&Terminal<'t>]) -> Result<Registers> {
    let Terminal::RealScalar(v) = args[0] else {
        unreachable!("runner registered for real scalars")
    };
    if *v == 0.0 {
        warn_singular(&"scalar operand is zero");
    }
    let mut regs = single(Terminal::real_scalar(1.0));
    regs.push(Terminal::real_scalar(*v));
    Ok(regs)
}

fn lu_complex_scalar<'t>(args: &[&Terminal<'t>]) -> Result<Registers> {
    let Terminal::ComplexScalar(v) = args[0] else {
        unreachable!("runner registered for complex scalars")
    };
    if v.magnitude() == 0.0 {
        warn_singular(&"scalar operand is zero");
    }
    let mut regs = single(Terminal::real_scalar(1.0));
    regs.push(Terminal::complex_scalar(*v));
    Ok(regs)
}

fn lu_real_dense<'t>(args: &[&Terminal<'t>]) -> Result<Registers> {
    let Terminal::RealDenseMatrix(m) = args[0] else {
        unreachable!("runner registered for real dense matrices")
    };
    let (l, u) = lu_dense(m.rows(), m.cols(), m.as_slice())?;
    let mut regs = single(Terminal::owned_real_matrix(l.data, l.rows, l.cols)?);
    regs.push(Terminal::owned_real_matrix(u.data, u.rows, u.cols)?);
    Ok(regs)
}

fn lu_complex_dense<'t>(args: &[&Terminal<'t>]) -> Result<Registers> {
    let Terminal::ComplexDenseMatrix(m) = args[0] else {
        unreachable!("runner registered for complex dense matrices")
    };
    let (l, u) = lu_dense(m.rows(), m.cols(), m.as_slice())?;
    let mut regs = single(Terminal::owned_complex_matrix(l.data, l.rows, l.cols)?);
    regs.push(Terminal::owned_complex_matrix(u.data, u.rows, u.cols)?);
    Ok(regs)
}

/// Dense kernel shared by the real and complex runners
///
/// Factors a copy of the operand buffer, then unpacks the primitive's
/// in-place result and pivot sequence into explicit L and U.
fn lu_dense<T: Element>(
    m: usize,
    n: usize,
    data: &[T],
) -> Result<(DenseView<T>, DenseView<T>)> {
    let minmn = m.min(n);
    if minmn == 0 {
        return Ok((
            DenseView::new((m, 0, Vec::new())),
            DenseView::new((0, n, Vec::new())),
        ));
    }

    // The primitive factors in place, so work on a copy
    let mut a: Vec<T> = data.to_vec();
    let mut ipiv = vec![0i32; minmn];
    match getrf(m, n, &mut a, m, &mut ipiv) {
        Ok(()) => {}
        Err(e @ FactorError::Singular { .. }) => {
            // Recoverable: keep whatever partial factorization is in the
            // buffer and carry on
            warn_singular(&e);
        }
        Err(fault) => return Err(fault.into()),
    }

    // U (minmn x n): upper triangle for columns before minmn, the complete
    // column from there on (trapezoidal when n > m). U strides in minmn, the
    // factored buffer strides in m.
    let mut u = vec![T::zero(); minmn * n];
    for col in 0..minmn - 1 {
        for row in 0..=col {
            u[col * minmn + row] = a[col * m + row];
        }
    }
    for col in (minmn - 1)..n {
        for row in 0..minmn {
            u[col * minmn + row] = a[col * m + row];
        }
    }

    // Net row permutation from the interchange sequence: perm starts as the
    // identity and replays each recorded swap in order, giving
    // perm[k] = original row now resident at buffer row k.
    let mut perm: Vec<usize> = (0..m).collect();
    for (i, &p) in ipiv.iter().enumerate() {
        let piv = (p - 1) as usize;
        if piv != i {
            perm.swap(i, piv);
        }
    }

    // Strip U out of the factored buffer: unit diagonal, zero upper triangle
    a[0] = T::one();
    for col in 1..minmn {
        a[col * m + col] = T::one();
        for row in 0..col {
            a[col * m + row] = T::zero();
        }
    }

    // L (m x minmn): undo the row interchanges while copying out. Output row
    // i lives at buffer row inv[i], the inverse of the net permutation.
    let mut inv = vec![0usize; m];
    for (k, &orig) in perm.iter().enumerate() {
        inv[orig] = k;
    }
    let mut l = vec![T::zero(); m * minmn];
    for i in 0..m {
        let src = inv[i];
        for col in 0..minmn {
            l[col * m + i] = a[col * m + src];
        }
    }

    Ok((DenseView::new((m, minmn, l)), DenseView::new((minmn, n, u))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconstruct<T: Element>(l: &DenseView<T>, u: &DenseView<T>) -> Vec<T> {
        let mut out = vec![T::zero(); l.rows * u.cols];
        for j in 0..u.cols {
            for i in 0..l.rows {
                let mut acc = T::zero();
                for k in 0..l.cols {
                    acc = acc + l.data[k * l.rows + i] * u.data[j * u.rows + k];
                }
                out[j * l.rows + i] = acc;
            }
        }
        out
    }

    #[test]
    fn test_lu_dense_reconstructs_square() {
        let a = vec![4.0, 6.0, 2.0, 3.0, 3.0, 1.0, 1.0, 2.0, 5.0];
        let (l, u) = lu_dense(3, 3, &a).unwrap();
        assert_eq!((l.rows, l.cols), (3, 3));
        assert_eq!((u.rows, u.cols), (3, 3));

        let back = reconstruct(&l, &u);
        for (x, y) in back.iter().zip(a.iter()) {
            assert!((x - y).abs() < 1e-14);
        }
    }

    #[test]
    fn test_lu_dense_unit_lower_diagonal_in_original_row_order() {
        let a = vec![1.0, 3.0, 2.0, 4.0];
        let (l, _) = lu_dense(2, 2, &a).unwrap();
        // Column 0 pivots on row 1 (value 3); L carries the original row
        // order, so the unit entry sits at the pivot row
        assert_eq!(l.data[1], 1.0);
        assert!((l.data[0] - 1.0 / 3.0).abs() < 1e-15);
    }

    #[test]
    fn test_lu_dense_long_pivot_cycle_reconstructs() {
        // Pivot sequence (1,2)(2,3)(3,4) composes to a 4-cycle, the case
        // where naive permutation unwinding goes wrong. Column magnitudes
        // force each step to pivot one row down.
        let a = vec![
            1.0, 9.0, 2.0, 3.0, // col 0: pivot row 1
            2.0, 1.0, 8.0, 3.0, // col 1 after elimination: pivot from row 2
            1.0, 2.0, 1.0, 9.0, // col 2 after elimination: pivot from row 3
            5.0, 1.0, 2.0, 1.0,
        ];
        let (l, u) = lu_dense(4, 4, &a).unwrap();
        let back = reconstruct(&l, &u);
        for (x, y) in back.iter().zip(a.iter()) {
            assert!((x - y).abs() < 1e-13, "got {x}, want {y}");
        }
    }

    #[test]
    fn test_lu_dense_empty() {
        let (l, u) = lu_dense::<f64>(0, 0, &[]).unwrap();
        assert_eq!((l.rows, l.cols), (0, 0));
        assert_eq!((u.rows, u.cols), (0, 0));
    }
}
