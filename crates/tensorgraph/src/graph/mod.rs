//! Graph arena, node algebra, and handles.

pub mod arena;
pub mod handle;
pub mod node;

pub use arena::{Graph, GraphError, InternalError, KindError, Result};
pub use handle::NodeHandle;
pub use node::{BinaryKind, Node, NodeId, NodeKind, NodeOp, ReduceKind, UnaryKind};
