//! Error types for numdag

use crate::dtype::DataType;
use crate::graph::OpKind;
use crate::linalg::FactorError;
use thiserror::Error;

/// Result type alias using numdag's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or evaluating an expression graph
#[derive(Error, Debug)]
pub enum Error {
    /// Wrong operand count for an operation's declared arity
    #[error("Operation {op:?} takes {expected} operand(s), got {got}")]
    Arity {
        /// The operation being constructed
        op: OpKind,
        /// Declared operand arity
        expected: usize,
        /// Operand count supplied
        got: usize,
    },

    /// Matrix buffer length does not match the declared shape
    #[error("Buffer of length {len} cannot back a {rows}x{cols} matrix")]
    BufferSize {
        /// Declared row count
        rows: usize,
        /// Declared column count
        cols: usize,
        /// Actual buffer length
        len: usize,
    },

    /// No runner registered for an (operation, operand-type) combination
    #[error("No runner registered for {op:?} over operand types {operand_types:?}")]
    NoRunner {
        /// The operation being dispatched
        op: OpKind,
        /// Concrete types of the operands, in order
        operand_types: Vec<DataType>,
    },

    /// Operand shapes incompatible with the operation
    #[error("{op}: incompatible dimensions {lhs_rows}x{lhs_cols} and {rhs_rows}x{rhs_cols}")]
    DimensionMismatch {
        /// The operation name
        op: &'static str,
        /// Left operand rows
        lhs_rows: usize,
        /// Left operand columns
        lhs_cols: usize,
        /// Right operand rows
        rhs_rows: usize,
        /// Right operand columns
        rhs_cols: usize,
    },

    /// Fatal failure from the dense factorization primitive
    ///
    /// The singular-system condition never takes this path; it is recovered
    /// at the runner boundary and surfaced as a warning.
    #[error("Factorization primitive fault: {0}")]
    Primitive(#[from] FactorError),

    /// A node's registers were read before the node was evaluated
    #[error("Registers read before evaluation")]
    EmptyRegisters,

    /// A node was submitted for evaluation a second time
    #[error("Expression node already evaluated; registers are write-once")]
    AlreadyEvaluated,

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an arity construction error
    pub fn arity(op: OpKind, expected: usize, got: usize) -> Self {
        Self::Arity { op, expected, got }
    }

    /// Create a dimension mismatch error for a named operation
    pub fn dimensions(
        op: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    ) -> Self {
        Self::DimensionMismatch {
            op,
            lhs_rows: lhs.0,
            lhs_cols: lhs.1,
            rhs_rows: rhs.0,
            rhs_cols: rhs.1,
        }
    }
}
