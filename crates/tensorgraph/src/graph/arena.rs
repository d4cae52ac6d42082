//! Append-only arena that owns every node of a computation graph.
//!
//! The arena is the single mutable resource of the builder: op constructors
//! validate their inputs against the shape algebra, append exactly one node,
//! and hand back a [`NodeHandle`]. Nodes are never removed or reordered, so
//! reading `nodes()` in index order yields a topological order: an operand's
//! id is always lower than its consumer's.
//!
//! Interior mutability (a `RefCell` around the node store) is what lets
//! lightweight `Copy` handles build new nodes through a shared `&Graph`.
//! Construction is single-threaded by design; concurrent readers may traverse
//! the graph only once building has finished.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::ptr::NonNull;

use thiserror::Error;

use crate::shape::{
    broadcast_shapes, canonical_strides, element_count, normalize_reduce_axes, reduced_shape,
    Shape, ShapeError, Strides,
};

use super::handle::NodeHandle;
use super::node::{BinaryKind, Node, NodeId, NodeKind, NodeOp, ReduceKind, UnaryKind};

/// Crate-wide result alias; the error type defaults to [`GraphError`].
pub type Result<T, E = GraphError> = std::result::Result<T, E>;

/// Any failure surfaced by the graph builder.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    Kind(#[from] KindError),
    #[error(transparent)]
    Internal(#[from] InternalError),
}

/// A variant-specific accessor was invoked on the wrong node variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("node {node:?} is a {actual:?} node, expected {expected:?}")]
pub struct KindError {
    pub node: NodeId,
    pub expected: NodeKind,
    pub actual: NodeKind,
}

/// Caller bugs the builder cannot recover from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InternalError {
    #[error("node id {node:?} is out of range (graph has {len} nodes)")]
    NodeOutOfRange { node: NodeId, len: usize },
    #[error("handle belongs to a different graph")]
    ForeignHandle,
}

#[derive(Default)]
struct GraphInner {
    nodes: Vec<Node>,
    inputs: Vec<NodeId>,
    weights: Vec<NodeId>,
}

impl GraphInner {
    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }
}

/// Owns the node arena plus the input and weight registries.
///
/// Inputs are the Tensor nodes the runtime binds buffers to before execution;
/// weights are the trainable subset of the inputs. Both registries hold node
/// ids in registration order.
#[derive(Default)]
pub struct Graph {
    inner: RefCell<GraphInner>,
}

impl Graph {
    pub fn new() -> Self {
        Graph::default()
    }

    /// Registers an externally supplied tensor of the given shape.
    pub fn try_input(&self, dims: impl IntoIterator<Item = usize>) -> Result<NodeHandle<'_>> {
        self.register_tensor("input", Shape::new(dims), false)
    }

    pub fn input(&self, dims: impl IntoIterator<Item = usize>) -> NodeHandle<'_> {
        NodeHandle::unwrap(self.try_input(dims), "input")
    }

    /// Rank-1 convenience for [`Graph::try_input`].
    pub fn try_input_1d(&self, len: usize) -> Result<NodeHandle<'_>> {
        self.try_input([len])
    }

    pub fn input_1d(&self, len: usize) -> NodeHandle<'_> {
        NodeHandle::unwrap(self.try_input_1d(len), "input")
    }

    /// Registers a trainable tensor: an input that is also listed in
    /// [`Graph::weights`].
    pub fn try_weight(&self, dims: impl IntoIterator<Item = usize>) -> Result<NodeHandle<'_>> {
        self.register_tensor("weight", Shape::new(dims), true)
    }

    pub fn weight(&self, dims: impl IntoIterator<Item = usize>) -> NodeHandle<'_> {
        NodeHandle::unwrap(self.try_weight(dims), "weight")
    }

    /// Rank-1 convenience for [`Graph::try_weight`].
    pub fn try_weight_1d(&self, len: usize) -> Result<NodeHandle<'_>> {
        self.try_weight([len])
    }

    pub fn weight_1d(&self, len: usize) -> NodeHandle<'_> {
        NodeHandle::unwrap(self.try_weight_1d(len), "weight")
    }

    /// Appends a scalar literal node with the empty shape.
    pub fn immediate(&self, value: f32) -> NodeHandle<'_> {
        let id = self.inner.borrow_mut().push(Node {
            op: NodeOp::Immediate(value),
            shape: Shape::scalar(),
            strides: Strides::new(),
        });
        NodeHandle::new(self, id)
    }

    /// Appends a unary op; shape and strides are copied from the operand.
    pub fn try_unary(&self, kind: UnaryKind, x: NodeHandle<'_>) -> Result<NodeHandle<'_>> {
        self.check_operand(x)?;
        let (shape, strides) = self.layout(x.id());
        let id = self.inner.borrow_mut().push(Node {
            op: NodeOp::Unary { kind, x: x.id() },
            shape,
            strides,
        });
        Ok(NodeHandle::new(self, id))
    }

    /// Appends a binary op; the output shape is the broadcast of the operand
    /// shapes with canonical strides.
    pub fn try_binary(
        &self,
        kind: BinaryKind,
        lhs: NodeHandle<'_>,
        rhs: NodeHandle<'_>,
    ) -> Result<NodeHandle<'_>> {
        self.check_operand(lhs)?;
        self.check_operand(rhs)?;
        let op = kind.name();
        let shape = broadcast_shapes(op, &lhs.shape(), &rhs.shape())?;
        let strides = canonical_strides(op, &shape)?;
        let id = self.inner.borrow_mut().push(Node {
            op: NodeOp::Binary {
                kind,
                lhs: lhs.id(),
                rhs: rhs.id(),
            },
            shape,
            strides,
        });
        Ok(NodeHandle::new(self, id))
    }

    /// Appends a reduction. Axes are normalized and sorted before storage;
    /// duplicates fail with a [`ShapeError`].
    pub fn try_reduce(
        &self,
        kind: ReduceKind,
        x: NodeHandle<'_>,
        axes: &[isize],
        keepdim: bool,
    ) -> Result<NodeHandle<'_>> {
        self.check_operand(x)?;
        let op = kind.name();
        let x_shape = x.shape();
        let axes = normalize_reduce_axes(op, axes, x_shape.rank())?;
        let shape = reduced_shape(op, &x_shape, &axes, keepdim)?;
        let strides = canonical_strides(op, &shape)?;
        let id = self.inner.borrow_mut().push(Node {
            op: NodeOp::Reduce {
                kind,
                x: x.id(),
                axes,
                keepdim,
            },
            shape,
            strides,
        });
        Ok(NodeHandle::new(self, id))
    }

    /// Appends a view over `x` with a caller-resolved layout. The store only
    /// re-verifies the shape/stride rank agreement and element-count
    /// preservation; `-1` placeholders must already be resolved.
    pub fn try_view(
        &self,
        x: NodeHandle<'_>,
        shape: Shape,
        strides: Strides,
    ) -> Result<NodeHandle<'_>> {
        self.check_operand(x)?;
        if shape.rank() != strides.len() {
            return Err(ShapeError::RankMismatch {
                op: "view",
                expected: shape.rank(),
                actual: strides.len(),
            }
            .into());
        }
        let src = x.shape();
        let src_elems = element_count("view", &src)?;
        let dst_elems = element_count("view", &shape)?;
        if src_elems != dst_elems {
            return Err(ShapeError::ElementCountMismatch {
                op: "view",
                src,
                src_elems,
                dst_elems,
            }
            .into());
        }
        let id = self.inner.borrow_mut().push(Node {
            op: NodeOp::View { x: x.id() },
            shape,
            strides,
        });
        Ok(NodeHandle::new(self, id))
    }

    /// Number of nodes appended so far.
    pub fn len(&self) -> usize {
        self.inner.borrow().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All nodes in append (= topological) order.
    ///
    /// The returned guard borrows the graph; drop it before building further
    /// nodes.
    pub fn nodes(&self) -> Ref<'_, [Node]> {
        Ref::map(self.inner.borrow(), |inner| inner.nodes.as_slice())
    }

    /// Ids of every registered input, in registration order.
    pub fn inputs(&self) -> Ref<'_, [NodeId]> {
        Ref::map(self.inner.borrow(), |inner| inner.inputs.as_slice())
    }

    /// Ids of the trainable subset of the inputs.
    pub fn weights(&self) -> Ref<'_, [NodeId]> {
        Ref::map(self.inner.borrow(), |inner| inner.weights.as_slice())
    }

    /// Clones out the node behind `id`.
    pub fn node(&self, id: NodeId) -> Result<Node> {
        let inner = self.inner.borrow();
        inner
            .nodes
            .get(id.index())
            .cloned()
            .ok_or_else(|| {
                InternalError::NodeOutOfRange {
                    node: id,
                    len: inner.nodes.len(),
                }
                .into()
            })
    }

    /// Builds a handle for an existing node id.
    pub fn handle(&self, id: NodeId) -> Result<NodeHandle<'_>> {
        let len = self.len();
        if id.index() >= len {
            return Err(InternalError::NodeOutOfRange { node: id, len }.into());
        }
        Ok(NodeHandle::new(self, id))
    }

    fn register_tensor(
        &self,
        op: &'static str,
        shape: Shape,
        trainable: bool,
    ) -> Result<NodeHandle<'_>> {
        for &dim in shape.dims() {
            if dim == 0 {
                return Err(ShapeError::InvalidDimension { op, dim: 0 }.into());
            }
        }
        let strides = canonical_strides(op, &shape)?;
        let mut inner = self.inner.borrow_mut();
        let id = inner.push(Node {
            op: NodeOp::Tensor { data: None },
            shape,
            strides,
        });
        inner.inputs.push(id);
        if trainable {
            inner.weights.push(id);
        }
        drop(inner);
        Ok(NodeHandle::new(self, id))
    }

    fn check_operand(&self, handle: NodeHandle<'_>) -> Result<(), InternalError> {
        if !std::ptr::eq(self, handle.graph()) {
            return Err(InternalError::ForeignHandle);
        }
        let len = self.len();
        if handle.id().index() >= len {
            return Err(InternalError::NodeOutOfRange {
                node: handle.id(),
                len,
            });
        }
        Ok(())
    }

    fn layout(&self, id: NodeId) -> (Shape, Strides) {
        let inner = self.inner.borrow();
        let node = &inner.nodes[id.index()];
        (node.shape.clone(), node.strides.clone())
    }

    pub(crate) fn node_unchecked(&self, id: NodeId) -> Node {
        self.inner.borrow().nodes[id.index()].clone()
    }

    pub(crate) fn tensor_data(&self, id: NodeId) -> Result<Option<NonNull<f32>>> {
        match &self.inner.borrow().nodes[id.index()].op {
            NodeOp::Tensor { data } => Ok(*data),
            other => Err(KindError {
                node: id,
                expected: NodeKind::Tensor,
                actual: other.kind(),
            }
            .into()),
        }
    }

    pub(crate) fn set_tensor_data(&self, id: NodeId, data: Option<NonNull<f32>>) -> Result<()> {
        match &mut self.inner.borrow_mut().nodes[id.index()].op {
            NodeOp::Tensor { data: slot } => {
                *slot = data;
                Ok(())
            }
            other => Err(KindError {
                node: id,
                expected: NodeKind::Tensor,
                actual: other.kind(),
            }
            .into()),
        }
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Graph")
            .field("nodes", &inner.nodes.len())
            .field("inputs", &inner.inputs.len())
            .field("weights", &inner.weights.len())
            .finish()
    }
}
