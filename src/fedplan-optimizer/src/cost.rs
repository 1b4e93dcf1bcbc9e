//! Cost estimation.
//!
//! The optimizer treats cost estimation as an oracle: `None` means the
//! estimate is unknown, never zero. Known costs are finite and non-negative.

use common_error::{FedplanError, FedplanResult};
use fedplan_logical::plan::{JoinStrategy, JoinType, NodeId, NodeKind, PlanTree};

/// A local filter is assumed to keep a third of its input.
const SELECT_REDUCTION: f64 = 3.0;

/// Estimates the cost of plan subtrees and join alternatives.
pub trait CostOracle: Send + Sync {
    /// Cost (row count) of the subtree rooted at `node`.
    fn estimate_subtree_cost(&self, tree: &PlanTree, node: NodeId) -> FedplanResult<Option<f64>>;

    /// Cost of running `join` as a dependent join with the given dependent side.
    fn estimate_dependent_join_cost(
        &self,
        tree: &PlanTree,
        join: NodeId,
        dependent_is_right: bool,
        strategy: JoinStrategy,
    ) -> FedplanResult<Option<f64>>;

    /// Cost of an ordinary join of the two inputs.
    fn estimate_join_cost(
        &self,
        tree: &PlanTree,
        independent: NodeId,
        dependent: NodeId,
        strategy: JoinStrategy,
    ) -> FedplanResult<f64>;
}

/// Cost model driven by the cardinality estimates on access nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CardinalityCostModel;

impl CardinalityCostModel {
    fn cardinality(tree: &PlanTree, node: NodeId) -> Option<f64> {
        let child = |i: usize| {
            tree.children(node)
                .get(i)
                .and_then(|&c| Self::cardinality(tree, c))
        };

        match tree.kind(node) {
            NodeKind::Access(access) => access.est_cardinality,
            NodeKind::Null => Some(0.0),
            NodeKind::Select(_) => child(0).map(|c| c / SELECT_REDUCTION),
            NodeKind::Join(join) => {
                let (left, right) = (child(0)?, child(1)?);
                if join.join_type == JoinType::Cross || join.join_criteria.is_empty() {
                    Some(left * right)
                } else {
                    Some(left.max(right))
                }
            }
            NodeKind::SetOp { .. } => tree
                .children(node)
                .iter()
                .map(|&c| Self::cardinality(tree, c))
                .sum(),
            NodeKind::Project { .. }
            | NodeKind::Sort { .. }
            | NodeKind::Group { .. }
            | NodeKind::DupRemove
            | NodeKind::Source { .. } => child(0),
        }
    }
}

impl CostOracle for CardinalityCostModel {
    fn estimate_subtree_cost(&self, tree: &PlanTree, node: NodeId) -> FedplanResult<Option<f64>> {
        Ok(Self::cardinality(tree, node))
    }

    fn estimate_dependent_join_cost(
        &self,
        tree: &PlanTree,
        join: NodeId,
        dependent_is_right: bool,
        _strategy: JoinStrategy,
    ) -> FedplanResult<Option<f64>> {
        let (Some(left), Some(right)) = (tree.first_child(join), tree.last_child(join)) else {
            return Err(FedplanError::cost_estimation(format!(
                "join {join} has no inputs"
            )));
        };
        let (independent, dependent) = if dependent_is_right {
            (left, right)
        } else {
            (right, left)
        };

        let (Some(ind), Some(dep)) = (
            Self::cardinality(tree, independent),
            Self::cardinality(tree, dependent),
        ) else {
            return Ok(None);
        };
        // The dependent side only returns rows matching the independent values.
        Ok(Some(ind + ind.min(dep)))
    }

    fn estimate_join_cost(
        &self,
        tree: &PlanTree,
        independent: NodeId,
        dependent: NodeId,
        strategy: JoinStrategy,
    ) -> FedplanResult<f64> {
        let (Some(ind), Some(dep)) = (
            Self::cardinality(tree, independent),
            Self::cardinality(tree, dependent),
        ) else {
            return Err(FedplanError::cost_estimation(format!(
                "no cardinality for join inputs {independent} and {dependent}"
            )));
        };
        Ok(match strategy {
            JoinStrategy::NestedLoop => ind * dep,
            JoinStrategy::Merge | JoinStrategy::PartitionedSort | JoinStrategy::NestedTable => {
                ind + dep
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use fedplan_core::{DataType, ElementSymbol, GroupSymbol};
    use fedplan_logical::criteria::Criteria;
    use fedplan_logical::expr::{col, lit};
    use fedplan_logical::plan::{AccessNode, JoinNode, SelectNode};

    use super::*;

    fn e1(group: &str) -> ElementSymbol {
        ElementSymbol::new(GroupSymbol::new(group), "e1", DataType::Int64)
    }

    fn join_tree(
        left: Option<f64>,
        right: Option<f64>,
        join: JoinNode,
    ) -> (PlanTree, NodeId, NodeId, NodeId) {
        let mut tree = PlanTree::new(NodeKind::Join(join));
        let root = tree.root();
        let mut l = AccessNode::new(GroupSymbol::new("pm1.g1"));
        l.est_cardinality = left;
        let mut r = AccessNode::new(GroupSymbol::new("pm2.g1"));
        r.est_cardinality = right;
        let l = tree.add_child(root, NodeKind::Access(l));
        let r = tree.add_child(root, NodeKind::Access(r));
        (tree, root, l, r)
    }

    fn equi_join() -> JoinNode {
        JoinNode::new(JoinType::Inner).with_equality(col(e1("pm1.g1")), col(e1("pm2.g1")))
    }

    #[test]
    fn test_subtree_cost() {
        let (mut tree, root, l, _) = join_tree(Some(30.0), Some(100.0), equi_join());
        let model = CardinalityCostModel;

        assert_eq!(model.estimate_subtree_cost(&tree, root).unwrap(), Some(100.0));

        let select = tree.add_as_parent(
            l,
            NodeKind::Select(SelectNode::new(Criteria::eq(col(e1("pm1.g1")), lit(1i64)))),
        );
        assert_eq!(model.estimate_subtree_cost(&tree, select).unwrap(), Some(10.0));
    }

    #[test]
    fn test_cross_join_cost_is_product() {
        let (tree, root, _, _) = join_tree(Some(3.0), Some(4.0), JoinNode::new(JoinType::Cross));
        assert_eq!(
            CardinalityCostModel.estimate_subtree_cost(&tree, root).unwrap(),
            Some(12.0)
        );
    }

    #[test]
    fn test_unknown_cardinality_propagates() {
        let (tree, root, _, _) = join_tree(Some(3.0), None, equi_join());
        let model = CardinalityCostModel;

        assert_eq!(model.estimate_subtree_cost(&tree, root).unwrap(), None);
        assert_eq!(
            model
                .estimate_dependent_join_cost(&tree, root, true, JoinStrategy::Merge)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_dependent_join_cost() {
        let (tree, root, l, r) = join_tree(Some(5.0), Some(1000.0), equi_join());
        let model = CardinalityCostModel;

        let right_dep = model
            .estimate_dependent_join_cost(&tree, root, true, JoinStrategy::Merge)
            .unwrap();
        assert_eq!(right_dep, Some(10.0));

        let left_dep = model
            .estimate_dependent_join_cost(&tree, root, false, JoinStrategy::Merge)
            .unwrap();
        assert_eq!(left_dep, Some(1005.0));

        assert_eq!(
            model.estimate_join_cost(&tree, l, r, JoinStrategy::Merge).unwrap(),
            1005.0
        );
        assert_eq!(
            model.estimate_join_cost(&tree, l, r, JoinStrategy::NestedLoop).unwrap(),
            5000.0
        );
    }

    #[test]
    fn test_join_cost_requires_estimates() {
        let (tree, _, l, r) = join_tree(None, Some(10.0), equi_join());
        let err = CardinalityCostModel
            .estimate_join_cost(&tree, l, r, JoinStrategy::Merge)
            .unwrap_err();
        assert!(matches!(err, FedplanError::CostEstimationError(_)));
    }
}
