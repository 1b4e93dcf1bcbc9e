//! Removal of redundant SELECT nodes.

use common_error::FedplanResult;
use fedplan_logical::{NodeId, NodeType, PlanTree};
use log::debug;

use super::{OptimizationRule, RuleKind, RuleStack, Transformed};
use crate::context::RuleContext;

/// Removes SELECT nodes whose criteria is already enforced.
///
/// A SELECT is redundant when the SELECT directly beneath it has the same
/// criteria, or when it is a dependent set whose criteria the access node
/// below it already carries.
pub struct CleanCriteria;

impl OptimizationRule for CleanCriteria {
    fn name(&self) -> &'static str {
        RuleKind::CleanCriteria.name()
    }

    fn description(&self) -> &'static str {
        "Removes SELECT nodes that repeat criteria already applied below them"
    }

    fn execute(
        &self,
        plan: &mut PlanTree,
        ctx: &mut RuleContext<'_>,
        _rules: &mut RuleStack,
    ) -> FedplanResult<Transformed> {
        let mut changed = false;

        while let Some(select) = find_redundant(plan) {
            if let Some(payload) = plan.select(select) {
                let criteria = payload.criteria.to_string();
                debug!("Removing redundant criteria {criteria} at {select}");
                ctx.record(|| format!("Removing redundant criteria: {criteria}"));
            }
            plan.splice_out(select)?;
            changed = true;
        }

        Ok(changed.into())
    }
}

fn find_redundant(plan: &PlanTree) -> Option<NodeId> {
    plan.find_all(plan.root(), &[NodeType::Select], &[])
        .into_iter()
        .find(|&id| is_redundant(plan, id))
}

fn is_redundant(plan: &PlanTree, id: NodeId) -> bool {
    let Some(select) = plan.select(id) else {
        return false;
    };
    let Some(child) = plan.first_child(id) else {
        return false;
    };

    if plan
        .select(child)
        .is_some_and(|below| below.criteria == select.criteria)
    {
        return true;
    }

    if !select.is_dependent_set {
        return false;
    }
    let mut current = child;
    while plan.select(current).is_some() {
        match plan.first_child(current) {
            Some(next) => current = next,
            None => return false,
        }
    }
    plan.access(current)
        .is_some_and(|access| access.pushed_criteria.contains(&select.criteria))
}

#[cfg(test)]
mod tests {
    use common_config::FedplanConfig;
    use fedplan_core::testing::MetadataFixture;
    use fedplan_core::{BasicCapabilitiesFinder, DataType, ElementSymbol, GroupSymbol};
    use fedplan_logical::criteria::{Criteria, DependentSetCriteria};
    use fedplan_logical::expr::{col, lit};
    use fedplan_logical::{AccessNode, NodeKind, SelectNode};

    use super::*;
    use crate::analysis::AnalysisRecord;
    use crate::cost::CardinalityCostModel;

    fn e1() -> ElementSymbol {
        ElementSymbol::new(GroupSymbol::new("pm1.g1"), "e1", DataType::Int64)
    }

    fn run(plan: &mut PlanTree) -> bool {
        let md = MetadataFixture::two_sources();
        let finder = BasicCapabilitiesFinder::new();
        let config = FedplanConfig::default();
        let mut analysis = AnalysisRecord::new(false);
        let mut ctx = RuleContext {
            metadata: &md,
            capabilities: &finder,
            cost_oracle: &CardinalityCostModel,
            analysis: &mut analysis,
            config: &config,
        };
        CleanCriteria
            .execute(plan, &mut ctx, &mut RuleStack::new())
            .unwrap()
            .changed
    }

    #[test]
    fn test_duplicate_select_removed() {
        let crit = Criteria::eq(col(e1()), lit(1i64));
        let mut plan = PlanTree::new(NodeKind::Access(AccessNode::new(GroupSymbol::new("pm1.g1"))));
        let access = plan.root();
        let lower = plan.add_as_parent(access, NodeKind::Select(SelectNode::new(crit.clone())));
        plan.add_as_parent(lower, NodeKind::Select(SelectNode::new(crit)));

        assert!(run(&mut plan));
        assert_eq!(plan.root(), lower);
        assert_eq!(plan.node_count(), 2);
        assert!(!run(&mut plan));
    }

    #[test]
    fn test_distinct_selects_kept() {
        let mut plan = PlanTree::new(NodeKind::Access(AccessNode::new(GroupSymbol::new("pm1.g1"))));
        let access = plan.root();
        let lower = plan.add_as_parent(
            access,
            NodeKind::Select(SelectNode::new(Criteria::eq(col(e1()), lit(1i64)))),
        );
        plan.add_as_parent(
            lower,
            NodeKind::Select(SelectNode::new(Criteria::eq(col(e1()), lit(2i64)))),
        );

        assert!(!run(&mut plan));
        assert_eq!(plan.node_count(), 3);
    }

    #[test]
    fn test_pushed_dependent_set_removed() {
        let crit = Criteria::DependentSet(DependentSetCriteria {
            expr: col(e1()),
            value_source_id: "$dsc/id99".to_string(),
            value_expr: col(ElementSymbol::new(GroupSymbol::new("pm2.g1"), "e1", DataType::Int64)),
        });
        let mut access = AccessNode::new(GroupSymbol::new("pm1.g1"));
        access.pushed_criteria.push(crit.clone());

        let mut plan = PlanTree::new(NodeKind::Access(access));
        let access = plan.root();
        let local = plan.add_as_parent(
            access,
            NodeKind::Select(SelectNode::new(Criteria::eq(col(e1()), lit(1i64)))),
        );
        plan.add_as_parent(
            local,
            NodeKind::Select(SelectNode {
                criteria: crit,
                is_dependent_set: true,
            }),
        );

        assert!(run(&mut plan));
        assert_eq!(plan.root(), local);
    }
}
