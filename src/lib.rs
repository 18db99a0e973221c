//! # numdag
//!
//! **Expression-DAG evaluation engine for numerical linear algebra.**
//!
//! numdag evaluates expressions (matrix products, decompositions, elementwise
//! arithmetic) built as a directed acyclic graph of operations over scalar and
//! dense-matrix operands. Each operation node is routed to a numerical kernel
//! ("runner") selected jointly on the operation and the concrete runtime types
//! of its operands, and results land in per-node write-once registers.
//!
//! ## Architecture
//!
//! - **Terminals**: immutable real/complex scalar and column-major dense
//!   matrix values, with explicit owned-vs-viewed buffer semantics
//! - **Graph**: arena of nodes addressed by [`graph::NodeId`]; terminal nodes
//!   hold data, expression nodes hold operands and registers
//! - **Execution list**: dependency-ordered, deduplicated linearization of the
//!   DAG; shared sub-expressions evaluate exactly once
//! - **Dispatcher**: routes each node to the unique runner registered for its
//!   (operation, operand-type-tuple) combination
//! - **Runners**: the kernels themselves; LU decomposition, matrix product,
//!   elementwise arithmetic, transpose
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use numdag::prelude::*;
//!
//! let mut g = Graph::new();
//! let a = g.terminal(Terminal::owned_real_matrix(vec![4.0, 6.0, 3.0, 3.0], 2, 2)?);
//! let lu = g.expr(OpKind::Lu, &[a])?;
//! run_tree(&mut g, lu)?;
//!
//! let l = &g.registers(lu)?[0];
//! let u = &g.registers(lu)?[1];
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dispatch;
pub mod dtype;
pub mod error;
pub mod graph;
pub mod linalg;
pub mod runners;
pub mod terminal;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dispatch::Dispatcher;
    pub use crate::dtype::{Complex128, DataType};
    pub use crate::error::{Error, Result};
    pub use crate::graph::exec::{run_tree, ExecutionList};
    pub use crate::graph::{Graph, NodeId, OpKind};
    pub use crate::terminal::{DenseMatrix, Terminal};
}
