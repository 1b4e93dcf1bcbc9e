//! Logical layer for fedplan.
//!
//! `fedplan-logical` holds the language objects the planner reasons about
//! and the plan tree it rewrites.
//!
//! # Overview
//!
//! - **Language objects**: expressions, criteria and commands as closed enums,
//!   with a pre-order walker that never enters subquery commands
//! - **Plan tree**: an arena of typed nodes addressed by `NodeId`, with the
//!   restructuring operations rewrite rules need (insert parent, splice out,
//!   swap join inputs)
//! - **Validation**: structural checks for rewritten trees
//!
//! # Example
//!
//! ```rust
//! use fedplan_core::{DataType, ElementSymbol, GroupSymbol};
//! use fedplan_logical::expr::col;
//! use fedplan_logical::plan::{AccessNode, JoinNode, JoinType, NodeKind, PlanTree};
//!
//! let g1 = GroupSymbol::new("pm1.g1");
//! let g2 = GroupSymbol::new("pm2.g1");
//! let left = ElementSymbol::new(g1.clone(), "e1", DataType::Int64);
//! let right = ElementSymbol::new(g2.clone(), "e1", DataType::Int64);
//!
//! let join = JoinNode::new(JoinType::Inner).with_equality(col(left), col(right));
//! let mut plan = PlanTree::new(NodeKind::Join(join));
//! let root = plan.root();
//! plan.add_child(root, NodeKind::Access(AccessNode::new(g1)));
//! plan.add_child(root, NodeKind::Access(AccessNode::new(g2)));
//!
//! println!("{}", plan.explain());
//! ```

pub mod command;
pub mod criteria;
pub mod expr;
pub mod language;
pub mod plan;
pub mod validation;

pub use command::{Command, Query, Subquery, SubqueryPlan};
pub use criteria::{
    CompareCriteria, CompareOp, CompoundOp, Criteria, DependentSetCriteria, ExistsCriteria,
    MatchCriteria, Quantifier, SetCriteria, SubqueryCompareCriteria, SubquerySetCriteria,
};
pub use expr::{
    col, lit, AggregateFunction, AggregateSymbol, Expr, Function, FunctionDescriptor,
    PushdownMode,
};
pub use language::LanguageObject;
pub use plan::{
    AccessNode, AccessPattern, JoinNode, JoinStrategy, JoinType, NodeId, NodeKind, NodeType,
    PlanTree, SelectNode,
};
pub use validation::{StructuralValidationError, StructuralValidator};
