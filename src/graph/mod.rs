//! Expression node model: arena-backed DAG of terminals and operations
//!
//! Nodes live in a [`Graph`] arena and are addressed by [`NodeId`], giving
//! every node a stable identity independent of how many dependents reference
//! it. A node is either a terminal (concrete data) or an expression (an
//! operation over operand nodes with a write-once register list for its
//! results).

pub mod exec;

use crate::error::{Error, Result};
use crate::terminal::Terminal;
use smallvec::SmallVec;
use std::fmt;

/// Operation identity of an expression node
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// LU decomposition with partial pivoting; results are L then U
    Lu,
    /// Matrix product (scalar operands scale the other operand)
    Mtimes,
    /// Elementwise addition with scalar broadcast
    Plus,
    /// Elementwise subtraction with scalar broadcast
    Minus,
    /// Elementwise negation
    Negate,
    /// Plain (non-conjugating) transpose
    Transpose,
}

impl OpKind {
    /// Declared operand count
    pub fn operand_arity(self) -> usize {
        match self {
            OpKind::Lu | OpKind::Negate | OpKind::Transpose => 1,
            OpKind::Mtimes | OpKind::Plus | OpKind::Minus => 2,
        }
    }

    /// Declared result count (registers populated on evaluation)
    pub fn result_arity(self) -> usize {
        match self {
            OpKind::Lu => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpKind::Lu => "LU",
            OpKind::Mtimes => "MTIMES",
            OpKind::Plus => "PLUS",
            OpKind::Minus => "MINUS",
            OpKind::Negate => "NEGATE",
            OpKind::Transpose => "TRANSPOSE",
        };
        write!(f, "{}", name)
    }
}

/// Stable handle to a node in a [`Graph`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Index into the graph arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Result slots of an evaluated expression node
///
/// Registers hold owned terminals, so they carry no borrows of graph data.
pub type Registers = SmallVec<[Terminal<'static>; 2]>;

/// An operation over operand nodes, plus its write-once result registers
#[derive(Debug)]
pub struct ExprNode {
    op: OpKind,
    operands: SmallVec<[NodeId; 2]>,
    registers: Registers,
}

impl ExprNode {
    /// Operation identity
    pub fn op(&self) -> OpKind {
        self.op
    }

    /// Operand nodes, in order, fixed at construction
    pub fn operands(&self) -> &[NodeId] {
        &self.operands
    }

    /// Result registers; empty until the node is evaluated
    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    /// True once the dispatcher has populated the registers
    pub fn is_evaluated(&self) -> bool {
        !self.registers.is_empty()
    }
}

/// A node in the expression graph
#[derive(Debug)]
pub enum Node<'a> {
    /// Leaf holding concrete data
    Terminal(Terminal<'a>),
    /// Operation over other nodes
    Expr(ExprNode),
}

/// Arena of expression-graph nodes
///
/// The graph owns every node; callers hold [`NodeId`]s. Sharing a node
/// between multiple dependents makes the graph a DAG, and the execution list
/// evaluates the shared node exactly once.
#[derive(Debug, Default)]
pub struct Graph<'a> {
    nodes: Vec<Node<'a>>,
}

impl<'a> Graph<'a> {
    /// Create an empty graph
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the graph holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a terminal node
    pub fn terminal(&mut self, value: Terminal<'a>) -> NodeId {
        self.push(Node::Terminal(value))
    }

    /// Add an expression node over existing nodes
    ///
    /// Fails when the operand count does not match the operation's declared
    /// arity; this is the only construction-time failure.
    pub fn expr(&mut self, op: OpKind, operands: &[NodeId]) -> Result<NodeId> {
        if operands.len() != op.operand_arity() {
            return Err(Error::arity(op, op.operand_arity(), operands.len()));
        }
        debug_assert!(operands.iter().all(|id| id.index() < self.nodes.len()));
        Ok(self.push(Node::Expr(ExprNode {
            op,
            operands: SmallVec::from_slice(operands),
            registers: SmallVec::new(),
        })))
    }

    /// The node behind a handle
    pub fn node(&self, id: NodeId) -> &Node<'a> {
        &self.nodes[id.index()]
    }

    /// Registers of an evaluated expression node
    ///
    /// Fails with [`Error::EmptyRegisters`] before evaluation; terminal nodes
    /// have no registers and fail the same way.
    pub fn registers(&self, id: NodeId) -> Result<&Registers> {
        match self.node(id) {
            Node::Expr(e) if e.is_evaluated() => Ok(e.registers()),
            _ => Err(Error::EmptyRegisters),
        }
    }

    /// Terminal value a node contributes when used as an operand
    ///
    /// Terminal nodes contribute their data directly; evaluated expression
    /// nodes contribute their first register.
    pub fn operand_terminal(&self, id: NodeId) -> Result<&Terminal<'a>> {
        match self.node(id) {
            Node::Terminal(t) => Ok(t),
            Node::Expr(e) => e.registers().first().ok_or(Error::EmptyRegisters),
        }
    }

    /// Populate an expression node's registers, exactly once
    pub(crate) fn set_registers(&mut self, id: NodeId, registers: Registers) -> Result<()> {
        match &mut self.nodes[id.index()] {
            Node::Expr(e) => {
                if e.is_evaluated() {
                    return Err(Error::AlreadyEvaluated);
                }
                debug_assert_eq!(registers.len(), e.op.result_arity());
                e.registers = registers;
                Ok(())
            }
            Node::Terminal(_) => Err(Error::Internal(
                "terminal nodes have no registers".to_string(),
            )),
        }
    }

    fn push(&mut self, node: Node<'a>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }
}
