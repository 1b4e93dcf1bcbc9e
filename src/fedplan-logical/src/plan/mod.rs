//! Logical plan tree.

mod node;
mod tree;

pub use node::{
    AccessNode, AccessPattern, JoinNode, JoinStrategy, JoinType, NodeKind, NodeType, SelectNode,
    SetOpType,
};
pub use tree::{NodeId, PlanNode, PlanTree};
