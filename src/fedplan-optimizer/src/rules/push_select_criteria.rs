//! Delegation of SELECT criteria to access nodes.

use common_error::FedplanResult;
use fedplan_logical::language::LanguageObject;
use fedplan_logical::{NodeId, NodeType, PlanTree};
use log::debug;

use super::{OptimizationRule, RuleKind, RuleStack, Transformed};
use crate::context::RuleContext;
use crate::validator;

/// Moves SELECT criteria into the access node below when the source can
/// evaluate them.
///
/// Only SELECT nodes separated from an ACCESS node by other SELECT nodes are
/// considered. Criteria the source cannot evaluate stay local.
pub struct PushSelectCriteria;

impl OptimizationRule for PushSelectCriteria {
    fn name(&self) -> &'static str {
        RuleKind::PushSelectCriteria.name()
    }

    fn description(&self) -> &'static str {
        "Pushes SELECT criteria into the access node of a source that supports them"
    }

    fn execute(
        &self,
        plan: &mut PlanTree,
        ctx: &mut RuleContext<'_>,
        _rules: &mut RuleStack,
    ) -> FedplanResult<Transformed> {
        let mut changed = false;

        // Reverse pre-order visits the SELECT nearest each access node first.
        let selects = plan.find_all(plan.root(), &[NodeType::Select], &[]);
        for select in selects.into_iter().rev() {
            changed |= push_select(plan, ctx, select)?;
        }

        Ok(changed.into())
    }
}

/// The access node below a chain of SELECT nodes starting at `select`.
fn access_below(plan: &PlanTree, select: NodeId) -> Option<NodeId> {
    let mut current = plan.first_child(select)?;
    while plan.select(current).is_some() {
        current = plan.first_child(current)?;
    }
    plan.access(current).map(|_| current)
}

fn push_select(
    plan: &mut PlanTree,
    ctx: &mut RuleContext<'_>,
    select: NodeId,
) -> FedplanResult<bool> {
    let Some(access) = access_below(plan, select) else {
        return Ok(false);
    };
    let (Some(payload), Some(model)) = (
        plan.select(select),
        plan.access(access).and_then(|a| a.model_id.clone()),
    ) else {
        return Ok(false);
    };
    let criteria = payload.criteria.clone();

    let verdict = validator::validate(
        LanguageObject::Criteria(&criteria),
        Some(&model),
        ctx.metadata,
        ctx.capabilities,
    )?;
    if !verdict.valid {
        let reason = verdict.reason.unwrap_or_default();
        debug!("Criteria {criteria} stays local: {reason}");
        ctx.record(|| format!("Criteria {criteria} cannot be pushed to {model}: {reason}"));
        return Ok(false);
    }

    plan.splice_out(select)?;
    let Some(node) = plan.access_mut(access) else {
        return Ok(false);
    };
    node.pushed_criteria.push(criteria);

    let referenced: Vec<_> = node
        .pushed_criteria
        .iter()
        .flat_map(|c| c.elements())
        .collect();
    node.access_patterns
        .retain(|pattern| !pattern.is_satisfied_by(&referenced));

    debug!("Pushed criteria into {access} for model {model}");
    Ok(true)
}
