//! Native dense factorization primitives
//!
//! The LU runner consumes [`getrf`] as its factorization primitive. It is
//! implemented natively rather than bound to a vendor BLAS/LAPACK, but keeps
//! the LAPACK calling conventions: in-place column-major buffer with a
//! leading dimension, 1-based pivot sequence, and a distinguished recoverable
//! condition for numerically singular input.

mod getrf;

pub use getrf::{getrf, FactorError};
