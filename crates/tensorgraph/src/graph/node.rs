//! The closed algebra of graph node variants.
//!
//! Nodes refer to their operands by [`NodeId`], never by reference, so the
//! arena's backing storage can grow freely while handles stay valid. Each
//! node carries its fully resolved output layout; downstream passes never
//! recompute shapes.

use std::ptr::NonNull;

use smallvec::SmallVec;

use crate::shape::{Axes, Shape, Strides};

/// Index of a node inside its owning [`Graph`](super::Graph).
///
/// Ids are assigned in append order, so a node's id is strictly greater than
/// the ids of all of its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Elementwise unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryKind {
    Exp,
    Log,
    Sin,
}

impl UnaryKind {
    pub fn name(self) -> &'static str {
        match self {
            UnaryKind::Exp => "exp",
            UnaryKind::Log => "log",
            UnaryKind::Sin => "sin",
        }
    }
}

/// Elementwise binary operators. `CmpEq` yields 0.0/1.0 per element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryKind {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    CmpEq,
    Max,
}

impl BinaryKind {
    pub fn name(self) -> &'static str {
        match self {
            BinaryKind::Add => "add",
            BinaryKind::Sub => "sub",
            BinaryKind::Mul => "mul",
            BinaryKind::Div => "div",
            BinaryKind::Pow => "pow",
            BinaryKind::CmpEq => "cmp_eq",
            BinaryKind::Max => "max",
        }
    }
}

/// Reduction operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReduceKind {
    Sum,
    Max,
}

impl ReduceKind {
    pub fn name(self) -> &'static str {
        match self {
            ReduceKind::Sum => "sum",
            ReduceKind::Max => "max",
        }
    }
}

/// Per-variant payload of a graph node.
#[derive(Debug, Clone)]
pub enum NodeOp {
    /// Externally supplied buffer. The runtime sets the slot between builds
    /// and executions; the builder never dereferences it.
    Tensor { data: Option<NonNull<f32>> },
    /// Scalar literal; always the empty shape.
    Immediate(f32),
    Unary {
        kind: UnaryKind,
        x: NodeId,
    },
    Binary {
        kind: BinaryKind,
        lhs: NodeId,
        rhs: NodeId,
    },
    Reduce {
        kind: ReduceKind,
        x: NodeId,
        /// Strictly increasing, normalized axes. Empty means a full
        /// collapse of every dimension.
        axes: Axes,
        keepdim: bool,
    },
    /// Same data as `x` behind a different shape/stride layout.
    View { x: NodeId },
}

impl NodeOp {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeOp::Tensor { .. } => NodeKind::Tensor,
            NodeOp::Immediate(_) => NodeKind::Immediate,
            NodeOp::Unary { .. } => NodeKind::Unary,
            NodeOp::Binary { .. } => NodeKind::Binary,
            NodeOp::Reduce { .. } => NodeKind::Reduce,
            NodeOp::View { .. } => NodeKind::View,
        }
    }

    /// Operand ids in argument order; empty for leaves.
    pub fn operands(&self) -> SmallVec<[NodeId; 2]> {
        match self {
            NodeOp::Tensor { .. } | NodeOp::Immediate(_) => SmallVec::new(),
            NodeOp::Unary { x, .. } | NodeOp::Reduce { x, .. } | NodeOp::View { x } => {
                SmallVec::from_slice(&[*x])
            }
            NodeOp::Binary { lhs, rhs, .. } => SmallVec::from_slice(&[*lhs, *rhs]),
        }
    }
}

/// A node together with its resolved output layout.
///
/// Immutable once appended, except for the data slot on Tensor payloads.
#[derive(Debug, Clone)]
pub struct Node {
    pub op: NodeOp,
    pub shape: Shape,
    pub strides: Strides,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        self.op.kind()
    }
}

/// Payload-free discriminant used for introspection and kind errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Tensor,
    Immediate,
    Unary,
    Binary,
    Reduce,
    View,
}
