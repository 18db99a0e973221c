//! Dispatcher: routes expression nodes to registered runners
//!
//! Dispatch is multiple: the runner is selected jointly on the operation tag
//! and the concrete runtime types of the already-evaluated operands, so LU
//! over a real scalar, LU over a real dense matrix, and LU over a complex
//! dense matrix are three distinct registry entries.
//!
//! The registry is pure data: built once at first use into process-wide
//! state and never mutated afterwards. The dispatcher performs no numerical
//! work; it resolves operand terminals, forms the type key, and hands the
//! node's registers to the unique matching runner.

use crate::dtype::DataType;
use crate::error::{Error, Result};
use crate::graph::{Graph, Node, NodeId, OpKind, Registers};
use crate::terminal::Terminal;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Concrete operand types of a node, in operand order
pub type OperandTypes = SmallVec<[DataType; 2]>;

/// A runner: one numerical kernel for one (operation, operand-type) pairing
///
/// Runners read operand terminals and return the result terminals for the
/// node's registers. They own no state and never see the graph.
pub type RunnerFn = for<'t> fn(&[&Terminal<'t>]) -> Result<Registers>;

pub(crate) type Table = HashMap<(OpKind, OperandTypes), RunnerFn>;

static TABLE: OnceLock<Table> = OnceLock::new();

fn table() -> &'static Table {
    TABLE.get_or_init(crate::runners::build_table)
}

/// Builder for the runner registry, passed to the registration code
#[derive(Default)]
pub(crate) struct Registry {
    entries: Table,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register `runner` for `op` over the given operand type tuple
    ///
    /// Each (operation, type-tuple) pair maps to exactly one runner; a
    /// duplicate registration is a programming error.
    pub(crate) fn register(&mut self, op: OpKind, types: &[DataType], runner: RunnerFn) {
        let key = (op, OperandTypes::from_slice(types));
        let previous = self.entries.insert(key, runner);
        debug_assert!(previous.is_none(), "duplicate runner for {op}");
    }

    pub(crate) fn finish(self) -> Table {
        self.entries
    }
}

/// Routing layer walking an execution sequence node by node
///
/// Construction is cheap; the underlying registry is shared process-wide.
#[derive(Debug, Default, Clone, Copy)]
pub struct Dispatcher;

impl Dispatcher {
    /// Create a dispatcher over the process-wide runner registry
    pub fn new() -> Self {
        Self
    }

    /// True when a runner is registered for the combination
    pub fn is_registered(&self, op: OpKind, types: &[DataType]) -> bool {
        table().contains_key(&(op, OperandTypes::from_slice(types)))
    }

    /// Evaluate one node, writing its results into its registers
    ///
    /// Terminal nodes are their own value and dispatch is a no-op. For an
    /// expression node, every operand must already hold a value (terminal
    /// data or a populated register), which the execution-list ordering
    /// guarantees. No runner for the (operation, operand-type) combination
    /// is a dispatch error and leaves the registers untouched.
    pub fn dispatch(&self, graph: &mut Graph<'_>, id: NodeId) -> Result<()> {
        let (op, operand_ids) = match graph.node(id) {
            Node::Terminal(_) => return Ok(()),
            Node::Expr(e) => {
                if e.is_evaluated() {
                    return Err(Error::AlreadyEvaluated);
                }
                (e.op(), SmallVec::<[NodeId; 2]>::from_slice(e.operands()))
            }
        };

        let registers = {
            let operands = operand_ids
                .iter()
                .map(|&oid| graph.operand_terminal(oid))
                .collect::<Result<SmallVec<[&Terminal<'_>; 2]>>>()?;
            let types: OperandTypes = operands.iter().map(|t| t.data_type()).collect();
            let runner = table().get(&(op, types.clone())).ok_or_else(|| Error::NoRunner {
                op,
                operand_types: types.to_vec(),
            })?;
            runner(&operands)?
        };

        graph.set_registers(id, registers)
    }
}
