//! Execution list builder: dependency-ordered linearization of a DAG
//!
//! Depth-first post-order traversal from the root(s), with a visited set
//! keyed on node identity. Every reachable node appears exactly once, strictly
//! after all of its operands, so a shared sub-expression is evaluated once
//! and its registers are reused by every dependent.
//!
//! The input graph is trusted to be acyclic; the builder does not detect
//! cycles (a cyclic input would recurse without bound).

use super::{Graph, Node, NodeId};
use crate::dispatch::Dispatcher;
use crate::error::Result;
use std::collections::HashSet;

/// Dependency-ordered, deduplicated evaluation sequence
#[derive(Debug)]
pub struct ExecutionList {
    order: Vec<NodeId>,
}

impl ExecutionList {
    /// Linearize the sub-graph reachable from `root`
    pub fn new(graph: &Graph<'_>, root: NodeId) -> Self {
        Self::from_roots(graph, &[root])
    }

    /// Linearize the union of sub-graphs reachable from several roots
    pub fn from_roots(graph: &Graph<'_>, roots: &[NodeId]) -> Self {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        for &root in roots {
            dfs(graph, root, &mut visited, &mut order);
        }
        Self { order }
    }

    /// Nodes in evaluation order
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order.iter().copied()
    }

    /// Number of distinct nodes in the sequence
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True for an empty sequence
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The sequence as a slice
    pub fn as_slice(&self) -> &[NodeId] {
        &self.order
    }
}

impl<'l> IntoIterator for &'l ExecutionList {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'l, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter().copied()
    }
}

/// Append `id` after its operands, first visit only (post-order DFS)
fn dfs(graph: &Graph<'_>, id: NodeId, visited: &mut HashSet<NodeId>, order: &mut Vec<NodeId>) {
    if !visited.insert(id) {
        return;
    }
    if let Node::Expr(e) = graph.node(id) {
        for &operand in e.operands() {
            dfs(graph, operand, visited, order);
        }
    }
    order.push(id);
}

/// Evaluate the sub-graph reachable from `root` to completion
///
/// Builds the execution list and dispatches every node in order. On return,
/// every expression node reachable from `root` holds its results in its
/// registers.
pub fn run_tree(graph: &mut Graph<'_>, root: NodeId) -> Result<()> {
    let list = ExecutionList::new(graph, root);
    let dispatcher = Dispatcher::new();
    for id in &list {
        dispatcher.dispatch(graph, id)?;
    }
    Ok(())
}
