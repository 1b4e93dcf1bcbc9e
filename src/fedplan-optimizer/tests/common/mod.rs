//! Shared fixtures for the optimizer integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use common_config::{FedplanConfig, OptimizerConfig};
use common_error::{FedplanError, FedplanResult};
use fedplan_core::{DataType, ElementSymbol, GroupSymbol, ModelId};
use fedplan_logical::expr::col;
use fedplan_logical::{
    AccessNode, JoinNode, JoinStrategy, JoinType, NodeId, NodeKind, PlanTree,
};
use fedplan_optimizer::{CardinalityCostModel, CostOracle};

pub fn e1(group: &str) -> ElementSymbol {
    ElementSymbol::new(GroupSymbol::new(group), "e1", DataType::Int64)
}

pub fn access(group: &str, model: Option<&str>, cardinality: Option<f64>) -> AccessNode {
    let mut node = AccessNode::new(GroupSymbol::new(group));
    node.model_id = model.map(ModelId::new);
    node.est_cardinality = cardinality;
    node
}

/// `left.e1 = right.e1` over two access nodes.
pub fn equi_join(join_type: JoinType, left: AccessNode, right: AccessNode) -> (PlanTree, NodeId) {
    let join = JoinNode::new(join_type).with_equality(
        col(e1(left.group.resolved_name())),
        col(e1(right.group.resolved_name())),
    );
    let mut plan = PlanTree::new(NodeKind::Join(join));
    let root = plan.root();
    plan.add_child(root, NodeKind::Access(left));
    plan.add_child(root, NodeKind::Access(right));
    (plan, root)
}

pub fn debug_config() -> FedplanConfig {
    FedplanConfig {
        optimizer: OptimizerConfig::default().with_record_debug(true).with_trace(true),
        ..FedplanConfig::default()
    }
}

/// Group read by the dependent (right) input of a converted join.
pub fn dependent_group(plan: &PlanTree, join: NodeId) -> Option<String> {
    plan.join(join)?.dependent_value_source.as_ref()?;
    let right = plan.last_child(join)?;
    let source = plan.find_join_source_node(right);
    plan.access(source).map(|a| a.group.to_string())
}

/// Cardinality model that counts how often it is asked.
#[derive(Debug, Default)]
pub struct CountingOracle {
    inner: CardinalityCostModel,
    calls: AtomicUsize,
}

impl CountingOracle {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl CostOracle for CountingOracle {
    fn estimate_subtree_cost(&self, tree: &PlanTree, node: NodeId) -> FedplanResult<Option<f64>> {
        self.tick();
        self.inner.estimate_subtree_cost(tree, node)
    }

    fn estimate_dependent_join_cost(
        &self,
        tree: &PlanTree,
        join: NodeId,
        dependent_is_right: bool,
        strategy: JoinStrategy,
    ) -> FedplanResult<Option<f64>> {
        self.tick();
        self.inner
            .estimate_dependent_join_cost(tree, join, dependent_is_right, strategy)
    }

    fn estimate_join_cost(
        &self,
        tree: &PlanTree,
        independent: NodeId,
        dependent: NodeId,
        strategy: JoinStrategy,
    ) -> FedplanResult<f64> {
        self.tick();
        self.inner
            .estimate_join_cost(tree, independent, dependent, strategy)
    }
}

/// Oracle whose statistics service is down.
#[derive(Debug, Default)]
pub struct FailingOracle;

impl CostOracle for FailingOracle {
    fn estimate_subtree_cost(&self, _tree: &PlanTree, _node: NodeId) -> FedplanResult<Option<f64>> {
        Err(FedplanError::cost_estimation("statistics unavailable"))
    }

    fn estimate_dependent_join_cost(
        &self,
        _tree: &PlanTree,
        _join: NodeId,
        _dependent_is_right: bool,
        _strategy: JoinStrategy,
    ) -> FedplanResult<Option<f64>> {
        Err(FedplanError::cost_estimation("statistics unavailable"))
    }

    fn estimate_join_cost(
        &self,
        _tree: &PlanTree,
        _independent: NodeId,
        _dependent: NodeId,
        _strategy: JoinStrategy,
    ) -> FedplanResult<f64> {
        Err(FedplanError::cost_estimation("statistics unavailable"))
    }
}
