//! Lightweight, copyable references to graph nodes.

use std::fmt;
use std::ptr::NonNull;

use smallvec::SmallVec;

use crate::shape::{Shape, Strides};

use super::arena::{Graph, Result};
use super::node::{Node, NodeId, NodeKind};

/// A `(graph, index)` pair identifying one node.
///
/// Handles are `Copy` and cheap to pass around; all introspection is an O(1)
/// lookup through the owning graph. Two handles are equal when they name the
/// same index in the same graph instance.
#[derive(Clone, Copy)]
pub struct NodeHandle<'g> {
    graph: &'g Graph,
    id: NodeId,
}

impl<'g> NodeHandle<'g> {
    pub(crate) fn new(graph: &'g Graph, id: NodeId) -> Self {
        NodeHandle { graph, id }
    }

    /// Shared panic shim for the non-`try` constructor conveniences.
    pub(crate) fn unwrap(result: Result<Self>, op: &str) -> Self {
        result.unwrap_or_else(|err| panic!("graph {op} failed: {err}"))
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Clones out the full node record for pattern matching.
    pub fn node(&self) -> Node {
        self.graph.node_unchecked(self.id)
    }

    pub fn kind(&self) -> NodeKind {
        self.node().kind()
    }

    pub fn shape(&self) -> Shape {
        self.node().shape
    }

    pub fn strides(&self) -> Strides {
        self.node().strides
    }

    pub fn rank(&self) -> usize {
        self.shape().rank()
    }

    /// Handles to this node's operands, in argument order.
    pub fn operands(&self) -> SmallVec<[NodeHandle<'g>; 2]> {
        self.node()
            .op
            .operands()
            .into_iter()
            .map(|id| NodeHandle::new(self.graph, id))
            .collect()
    }

    /// The literal behind an Immediate node.
    pub fn immediate_value(&self) -> Result<f32> {
        match self.node().op {
            super::node::NodeOp::Immediate(value) => Ok(value),
            op => Err(super::arena::KindError {
                node: self.id,
                expected: NodeKind::Immediate,
                actual: op.kind(),
            }
            .into()),
        }
    }

    /// The runtime buffer currently bound to a Tensor node, if any.
    ///
    /// Fails with a [`KindError`](super::arena::KindError) on any other
    /// variant.
    pub fn tensor_data(&self) -> Result<Option<NonNull<f32>>> {
        self.graph.tensor_data(self.id)
    }

    /// Binds (or clears) the runtime buffer of a Tensor node. The builder
    /// stores the pointer opaquely and never dereferences it.
    pub fn set_tensor_data(&self, data: Option<NonNull<f32>>) -> Result<()> {
        self.graph.set_tensor_data(self.id, data)
    }
}

impl PartialEq for NodeHandle<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.graph, other.graph) && self.id == other.id
    }
}

impl Eq for NodeHandle<'_> {}

impl fmt::Debug for NodeHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeHandle({:?}, {:?})", self.id, self.shape())
    }
}
