//! Structural validation for plan trees.
//!
//! Rewrites splice nodes in and out of the arena; this module checks that
//! the result is still a well-formed tree:
//! - every reachable node is reached once
//! - parent links agree with child lists
//! - node arity matches the node type
//! - join equality expressions are paired

use std::collections::HashSet;

use crate::plan::{NodeId, NodeKind, PlanTree};

/// A structural validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralValidationError {
    /// A node is reachable along more than one path.
    NodeShared {
        /// The shared node.
        node: NodeId,
    },

    /// A node's parent link disagrees with its position.
    BrokenParentLink {
        /// The node.
        node: NodeId,
        /// Parent according to the child lists.
        expected: Option<NodeId>,
        /// Parent recorded on the node.
        actual: Option<NodeId>,
    },

    /// A node has the wrong number of children.
    InvalidArity {
        /// The node.
        node: NodeId,
        /// Node type name.
        operator: String,
        /// Expected number of children.
        expected: usize,
        /// Actual number of children.
        actual: usize,
    },

    /// Left and right join expressions differ in length.
    UnpairedJoinExpressions {
        /// The join node.
        node: NodeId,
        /// Number of left expressions.
        left: usize,
        /// Number of right expressions.
        right: usize,
    },
}

impl std::fmt::Display for StructuralValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NodeShared { node } => write!(f, "Node {node} is reachable more than once"),
            Self::BrokenParentLink {
                node,
                expected,
                actual,
            } => write!(
                f,
                "Node {node} records parent {actual:?} but is a child of {expected:?}"
            ),
            Self::InvalidArity {
                node,
                operator,
                expected,
                actual,
            } => write!(
                f,
                "Invalid arity for {operator} {node}: expected {expected} children, got {actual}"
            ),
            Self::UnpairedJoinExpressions { node, left, right } => write!(
                f,
                "Join {node} has {left} left expressions but {right} right expressions"
            ),
        }
    }
}

impl std::error::Error for StructuralValidationError {}

/// Structural validator for plan trees.
pub struct StructuralValidator;

impl StructuralValidator {
    /// Validate the tree reachable from the root.
    ///
    /// Returns `Ok(())` if the tree is well formed, or every error found.
    pub fn validate(tree: &PlanTree) -> Result<(), Vec<StructuralValidationError>> {
        let mut errors = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![(tree.root(), None)];

        while let Some((id, expected_parent)) = stack.pop() {
            if !visited.insert(id) {
                errors.push(StructuralValidationError::NodeShared { node: id });
                continue;
            }

            let actual = tree.parent(id);
            if actual != expected_parent {
                errors.push(StructuralValidationError::BrokenParentLink {
                    node: id,
                    expected: expected_parent,
                    actual,
                });
            }

            Self::validate_node(tree, id, &mut errors);
            stack.extend(tree.children(id).iter().map(|&c| (c, Some(id))));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_node(tree: &PlanTree, id: NodeId, errors: &mut Vec<StructuralValidationError>) {
        let ty = tree.node_type(id);
        let actual = tree.children(id).len();
        if let Some(expected) = ty.arity() {
            if actual != expected {
                errors.push(StructuralValidationError::InvalidArity {
                    node: id,
                    operator: ty.name().to_string(),
                    expected,
                    actual,
                });
            }
        }

        if let NodeKind::Join(join) = tree.kind(id) {
            if join.left_expressions.len() != join.right_expressions.len() {
                errors.push(StructuralValidationError::UnpairedJoinExpressions {
                    node: id,
                    left: join.left_expressions.len(),
                    right: join.right_expressions.len(),
                });
            }
        }
    }
}

/// Get the maximum depth of the tree.
pub fn plan_depth(tree: &PlanTree) -> usize {
    fn depth(tree: &PlanTree, id: NodeId) -> usize {
        1 + tree
            .children(id)
            .iter()
            .map(|&c| depth(tree, c))
            .max()
            .unwrap_or(0)
    }
    depth(tree, tree.root())
}

#[cfg(test)]
mod tests {
    use fedplan_core::{DataType, ElementSymbol, GroupSymbol};

    use super::*;
    use crate::criteria::Criteria;
    use crate::expr::{col, lit};
    use crate::plan::{AccessNode, JoinNode, JoinType, SelectNode};

    fn access(group: &str) -> NodeKind {
        NodeKind::Access(AccessNode::new(GroupSymbol::new(group)))
    }

    fn e(group: &str) -> ElementSymbol {
        ElementSymbol::new(GroupSymbol::new(group), "e1", DataType::Int64)
    }

    #[test]
    fn test_valid_join_plan() {
        let join = JoinNode::new(JoinType::Inner).with_equality(col(e("pm1.g1")), col(e("pm2.g1")));
        let mut tree = PlanTree::new(NodeKind::Join(join));
        let root = tree.root();
        let left = tree.add_child(root, access("pm1.g1"));
        tree.add_child(root, access("pm2.g1"));
        tree.add_as_parent(
            left,
            NodeKind::Select(SelectNode::new(Criteria::eq(col(e("pm1.g1")), lit(1i64)))),
        );

        assert!(StructuralValidator::validate(&tree).is_ok());
        assert_eq!(plan_depth(&tree), 3);
    }

    #[test]
    fn test_join_arity() {
        let mut tree = PlanTree::new(NodeKind::Join(JoinNode::new(JoinType::Cross)));
        let root = tree.root();
        tree.add_child(root, access("pm1.g1"));

        let errors = StructuralValidator::validate(&tree).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            StructuralValidationError::InvalidArity {
                expected: 2,
                actual: 1,
                ..
            }
        )));
    }

    #[test]
    fn test_unpaired_join_expressions() {
        let mut join = JoinNode::new(JoinType::Inner);
        join.left_expressions.push(col(e("pm1.g1")));
        let mut tree = PlanTree::new(NodeKind::Join(join));
        let root = tree.root();
        tree.add_child(root, access("pm1.g1"));
        tree.add_child(root, access("pm2.g1"));

        let errors = StructuralValidator::validate(&tree).unwrap_err();
        assert_eq!(
            errors,
            vec![StructuralValidationError::UnpairedJoinExpressions {
                node: root,
                left: 1,
                right: 0
            }]
        );
    }

    #[test]
    fn test_select_without_child() {
        let tree = PlanTree::new(NodeKind::Select(SelectNode::new(Criteria::eq(
            lit(1i64),
            lit(1i64),
        ))));
        let errors = StructuralValidator::validate(&tree).unwrap_err();
        assert!(errors[0].to_string().contains("Select"));
    }
}
