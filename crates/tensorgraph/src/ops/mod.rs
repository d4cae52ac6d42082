//! Operator constructors layered on top of the graph store.
//!
//! Every module here attaches methods to [`NodeHandle`](crate::NodeHandle):
//! primitive lifts into the node algebra, plus the composite rewrites
//! (negation, cosine, sigmoid, comparisons, min, matmul) that lower to
//! combinations of primitives at construction time.

mod compare;
mod elementwise;
mod linalg;
mod reduce;
mod view;
