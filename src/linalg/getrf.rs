//! In-place LU factorization with partial pivoting
//!
//! Unblocked right-looking elimination over a column-major buffer, following
//! the `xgetrf` conventions: the strict lower triangle of the output holds
//! the multipliers of a unit-lower-triangular L, the upper triangle holds U,
//! and `ipiv` records the row interchanged with row `i` at elimination step
//! `i` (1-based, length `min(m, n)`).

use crate::dtype::Element;
use thiserror::Error;

/// Outcome discriminants of the factorization primitive
///
/// Only [`FactorError::Singular`] is recoverable: the factorization still
/// completes best-effort (elimination continues past a zero pivot, as in
/// LAPACK), so the buffer and pivot sequence remain usable. Every other
/// discriminant is a primitive fault and leaves the buffer unspecified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactorError {
    /// Numerically singular input; `pivot` is the first zero-pivot
    /// elimination step, 1-based
    #[error("numerically singular system: zero pivot at elimination step {pivot}")]
    Singular {
        /// First elimination step with an exactly zero pivot, 1-based
        pivot: usize,
    },

    /// Input contains NaN or infinity
    #[error("non-finite value in factorization input")]
    NonFinite,

    /// Buffer, leading dimension, or pivot array inconsistent with the shape
    #[error(
        "malformed factorization dimensions: m={m}, n={n}, lda={lda}, \
         buffer={len}, pivots={pivots}"
    )]
    BadDimensions {
        /// Declared row count
        m: usize,
        /// Declared column count
        n: usize,
        /// Declared leading dimension
        lda: usize,
        /// Buffer length supplied
        len: usize,
        /// Pivot array length supplied
        pivots: usize,
    },
}

impl FactorError {
    /// True for the singular-system condition, the only recoverable one
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FactorError::Singular { .. })
    }
}

/// Factor `a` in place as `P * A = L * U` with partial pivoting
///
/// `a` is an `m x n` column-major buffer with leading dimension `lda`
/// (`lda >= m`); on success it holds the packed factorization. `ipiv` must
/// have length `min(m, n)` and receives the 1-based row-interchange
/// sequence: at step `i` (1-based), row `i` was swapped with row `ipiv[i-1]`.
///
/// A zero pivot does not stop elimination; the first such step is reported
/// via [`FactorError::Singular`] once the (partial) factorization is
/// complete, and the buffer contents remain meaningful. Non-finite input and
/// malformed dimensions are faults and fail before touching the buffer.
pub fn getrf<T: Element>(
    m: usize,
    n: usize,
    a: &mut [T],
    lda: usize,
    ipiv: &mut [i32],
) -> Result<(), FactorError> {
    let minmn = m.min(n);
    if lda < m.max(1) || a.len() < lda * n || ipiv.len() != minmn {
        return Err(FactorError::BadDimensions {
            m,
            n,
            lda,
            len: a.len(),
            pivots: ipiv.len(),
        });
    }
    if minmn == 0 {
        return Ok(());
    }
    for j in 0..n {
        for i in 0..m {
            if !a[j * lda + i].is_finite_val() {
                return Err(FactorError::NonFinite);
            }
        }
    }

    let mut singular_at = 0usize;

    for j in 0..minmn {
        // Pivot search: first row of maximum magnitude in column j, rows j..m
        let mut p = j;
        let mut max_val = a[j * lda + j].abs_val();
        for i in (j + 1)..m {
            let v = a[j * lda + i].abs_val();
            if v > max_val {
                max_val = v;
                p = i;
            }
        }
        ipiv[j] = (p + 1) as i32;

        if max_val != 0.0 {
            if p != j {
                for col in 0..n {
                    a.swap(col * lda + j, col * lda + p);
                }
            }
            // Multipliers below the pivot
            let pivot = a[j * lda + j];
            for i in (j + 1)..m {
                a[j * lda + i] = a[j * lda + i] / pivot;
            }
        } else if singular_at == 0 {
            // Whole remaining column is zero; record and carry on
            singular_at = j + 1;
        }

        // Rank-1 trailing update (no-op below a zero pivot: the column of
        // multipliers is zero)
        for col in (j + 1)..n {
            let ujc = a[col * lda + j];
            for i in (j + 1)..m {
                let update = a[j * lda + i] * ujc;
                a[col * lda + i] = a[col * lda + i] - update;
            }
        }
    }

    if singular_at != 0 {
        Err(FactorError::Singular { pivot: singular_at })
    } else {
        Ok(())
    }
}
