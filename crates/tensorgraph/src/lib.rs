//! Computation graph builder for tensor expressions.
//!
//! `tensorgraph` constructs directed acyclic graphs of tensor operations
//! drawn from a closed algebra: externally bound tensors, scalar immediates,
//! elementwise unary/binary ops, reductions, and views. Every node carries a
//! fully resolved shape and stride layout computed at construction time, so
//! downstream passes (schedulers, code generators, autodiff) can lower the
//! graph without re-checking any shape rule.
//!
//! The builder performs no evaluation and no rewriting: composite operations
//! like `matmul`, `sigmoid`, and the comparisons are lowered to primitive
//! nodes as they are constructed, and structurally identical subtrees stay
//! distinct nodes.
//!
//! ```
//! use tensorgraph::Graph;
//!
//! let graph = Graph::new();
//! let x = graph.input([3, 1, 5]);
//! let y = graph.input([4, 5]);
//! let z = (x + y).sigmoid();
//! assert_eq!(z.shape(), [3, 4, 5]);
//! assert_eq!(z.strides().as_slice(), &[20, 5, 1]);
//! ```
//!
//! Nodes are stored in an append-only arena and refer to each other by
//! index, so reading [`Graph::nodes`] front to back visits operands before
//! their consumers.

pub mod graph;
mod ops;
pub mod shape;

pub use graph::{
    BinaryKind, Graph, GraphError, InternalError, KindError, Node, NodeHandle, NodeId, NodeKind,
    NodeOp, ReduceKind, Result, UnaryKind,
};
pub use shape::{Shape, ShapeError, Strides};
