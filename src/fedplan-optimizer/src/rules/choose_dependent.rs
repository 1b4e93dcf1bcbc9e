//! Dependent-join selection.
//!
//! A dependent join evaluates one input first and feeds its join values to
//! the other input as an IN list, so the dependent source only returns
//! matching rows. The rule finds joins where that is legal, decides which
//! side (if any) becomes dependent, and rewrites the tree:
//!
//! ```text
//!   Join(a = b)                  Join(a = b) [$dsc/id0]
//!   ├─ Access(pm1.g1)     =>     ├─ Access(pm1.g1)
//!   └─ Access(pm2.g1)            └─ Select(b IN <$dsc/id0:a>)
//!                                   └─ Access(pm2.g1)
//! ```
//!
//! The dependent input always ends up on the right.

use std::sync::atomic::{AtomicUsize, Ordering};

use common_display::truncate_string;
use common_error::{FedplanError, FedplanResult};
use fedplan_logical::criteria::{Criteria, DependentSetCriteria};
use fedplan_logical::{JoinType, NodeId, NodeKind, NodeType, PlanTree, SelectNode};
use log::debug;

use super::{OptimizationRule, RuleKind, RuleStack, Transformed};
use crate::context::RuleContext;

/// Source of dependent value-source ids. Ids are unique for the lifetime of
/// the process.
static NEXT_VALUE_SOURCE_ID: AtomicUsize = AtomicUsize::new(0);

/// A join with at least one input that may become dependent.
#[derive(Debug, Clone, Copy)]
struct CandidateJoin {
    join: NodeId,
    left_candidate: bool,
    right_candidate: bool,
}

/// Turns eligible joins into dependent joins.
pub struct ChooseDependent;

impl OptimizationRule for ChooseDependent {
    fn name(&self) -> &'static str {
        RuleKind::ChooseDependent.name()
    }

    fn description(&self) -> &'static str {
        "Makes one input of an equi-join dependent on the values of the other"
    }

    fn execute(
        &self,
        plan: &mut PlanTree,
        ctx: &mut RuleContext<'_>,
        rules: &mut RuleStack,
    ) -> FedplanResult<Transformed> {
        let candidates = find_candidates(plan, ctx);

        let mut converted = false;
        for candidate in candidates {
            converted |= decide(plan, ctx, candidate)?;
        }

        if converted {
            // Pushed in reverse: cleanup runs first, so push-down never acts on
            // dependent sets that cleanup removes.
            rules.push(RuleKind::PushSelectCriteria);
            rules.push(RuleKind::CleanCriteria);
        }
        Ok(converted.into())
    }
}

/// Pre-order scan for joins, not descending below access nodes.
fn find_candidates(plan: &PlanTree, ctx: &mut RuleContext<'_>) -> Vec<CandidateJoin> {
    let mut candidates = Vec::new();

    for join in plan.find_all(plan.root(), &[NodeType::Join], &[NodeType::Access]) {
        let children = plan.children(join).to_vec();
        let mut candidate = CandidateJoin {
            join,
            left_candidate: false,
            right_candidate: false,
        };

        for (i, &child) in children.iter().enumerate() {
            let source = plan.find_join_source_node(child);
            let Some(access) = plan.access(source) else {
                continue;
            };
            if access.make_not_dependent || !is_valid_join(plan, ctx, join, child, source) {
                continue;
            }
            if i + 1 < children.len() {
                candidate.left_candidate = true;
            } else {
                candidate.right_candidate = true;
            }
        }

        if candidate.left_candidate || candidate.right_candidate {
            candidates.push(candidate);
        }
    }

    candidates
}

/// Whether `child` may become the dependent input of `join`.
///
/// `source` is the node `child` reads from, used in messages.
fn is_valid_join(
    plan: &PlanTree,
    ctx: &mut RuleContext<'_>,
    join: NodeId,
    child: NodeId,
    source: NodeId,
) -> bool {
    let Some(payload) = plan.join(join) else {
        return false;
    };

    let rejection = if matches!(payload.join_type, JoinType::Cross | JoinType::FullOuter) {
        Some("parent join is CROSS or FULL OUTER")
    } else if payload.join_criteria.is_empty() {
        Some("parent join has no join criteria")
    } else if payload.left_expressions.is_empty() {
        Some("parent join has no equality expressions")
    } else if payload.join_type.is_outer() && plan.inner_side_join_node(join) != Some(child) {
        Some("it is on outer side of a join")
    } else if payload.dependent_value_source.is_some() {
        Some("parent join is already dependent")
    } else {
        None
    };

    match rejection {
        Some(reason) => {
            debug!("Rejecting {} for dependent join: {}", describe(plan, source), reason);
            ctx.record(|| {
                format!(
                    "Rejecting dependent access node as {reason}: {}",
                    describe(plan, source)
                )
            });
            false
        }
        None => true,
    }
}

/// Decide one candidate, converting it if chosen.
fn decide(
    plan: &mut PlanTree,
    ctx: &mut RuleContext<'_>,
    candidate: CandidateJoin,
) -> FedplanResult<bool> {
    let join = candidate.join;
    let (Some(left), Some(right)) = (plan.first_child(join), plan.last_child(join)) else {
        return Err(FedplanError::internal(format!("join {join} has no inputs")));
    };
    let strategy = join_payload(plan, join)?.strategy;

    let (source, sibling) = if candidate.left_candidate {
        (left, right)
    } else {
        (right, left)
    };
    let both = candidate.left_candidate && candidate.right_candidate;

    if let Some(chosen) = choose_dep_without_costing(plan, ctx, source, both.then_some(sibling)) {
        return mark_dependent(plan, chosen, join);
    }

    let oracle = ctx.cost_oracle;
    let mut dep_join_cost =
        oracle.estimate_dependent_join_cost(plan, join, !candidate.left_candidate, strategy)?;
    let (mut dependent, mut independent) = (source, sibling);

    if both {
        let sibling_cost = oracle.estimate_dependent_join_cost(plan, join, true, strategy)?;
        if let Some(cost) = sibling_cost {
            if dep_join_cost.map_or(true, |current| cost < current) {
                dependent = sibling;
                independent = source;
                dep_join_cost = Some(cost);
            }
        }
    }

    if let Some(dep_join_cost) = dep_join_cost {
        return decide_for_against(plan, ctx, join, dep_join_cost, independent, dependent);
    }

    // No dependent join estimate: fall back to input cardinalities.
    let threshold = ctx.config.dependent_join.independent_cardinality_threshold;
    let source_cost = oracle.estimate_subtree_cost(plan, source)?;
    let sibling_cost = oracle.estimate_subtree_cost(plan, sibling)?;

    match (source_cost, sibling_cost) {
        (Some(src), sib) if both && src < threshold && sib.map_or(true, |sib| src < sib) => {
            ctx.record(|| {
                format!("Making {} dependent as its sibling is small", describe(plan, sibling))
            });
            mark_dependent(plan, sibling, join)
        }
        (_, Some(sib)) if sib < threshold => {
            ctx.record(|| {
                format!("Making {} dependent as its sibling is small", describe(plan, source))
            });
            mark_dependent(plan, source, join)
        }
        _ => {
            debug!("No dependent join chosen for {}", describe(plan, join));
            Ok(false)
        }
    }
}

/// Heuristics that decide without consulting costs.
///
/// Unsatisfied access patterns force a side dependent, since only the
/// dependent values can satisfy them. Otherwise a MAKEDEP hint wins, left
/// first.
fn choose_dep_without_costing(
    plan: &PlanTree,
    ctx: &mut RuleContext<'_>,
    root1: NodeId,
    root2: Option<NodeId>,
) -> Option<NodeId> {
    let source1 = plan.find_join_source_node(root1);
    let source2 = root2.map(|r| plan.find_join_source_node(r));
    let access1 = plan.access(source1);
    let access2 = source2.and_then(|s| plan.access(s));

    let patterns1 = access1.is_some_and(|a| a.has_unsatisfied_access_patterns());
    let patterns2 = access2.is_some_and(|a| a.has_unsatisfied_access_patterns());

    if patterns1 {
        if patterns2 {
            ctx.record(|| {
                format!(
                    "Neither access node can be made dependent because both have \
                     unsatisfied access patterns: {} {}",
                    describe(plan, source1),
                    source2.map(|s| describe(plan, s)).unwrap_or_default()
                )
            });
            return None;
        }
        return Some(root1);
    }
    if let (true, Some(root2), Some(source2)) = (patterns2, root2, source2) {
        ctx.record(|| {
            format!(
                "Making access node dependent to satisfy access pattern: {}",
                describe(plan, source2)
            )
        });
        return Some(root2);
    }

    if access1.is_some_and(|a| a.make_dependent) {
        ctx.record(|| {
            format!("Making access node dependent due to hint: {}", describe(plan, source1))
        });
        return Some(root1);
    }
    let hint2 = access2.is_some_and(|a| a.make_dependent);
    if let (true, Some(root2), Some(source2)) = (hint2, root2, source2) {
        ctx.record(|| {
            format!("Making access node dependent due to hint: {}", describe(plan, source2))
        });
        return Some(root2);
    }

    None
}

/// Compare the dependent join against the ordinary join and convert if cheaper.
fn decide_for_against(
    plan: &mut PlanTree,
    ctx: &mut RuleContext<'_>,
    join: NodeId,
    dep_join_cost: f64,
    independent: NodeId,
    dependent: NodeId,
) -> FedplanResult<bool> {
    let strategy = join_payload(plan, join)?.strategy;
    let join_cost = ctx
        .cost_oracle
        .estimate_join_cost(plan, independent, dependent, strategy)?;

    let payload = join_payload_mut(plan, join)?;
    payload.est_dep_join_cost = Some(dep_join_cost);
    payload.est_join_cost = Some(join_cost);

    debug!(
        "Join {join}: dependent cost {dep_join_cost}, ordinary cost {join_cost}"
    );
    ctx.record(|| {
        format!(
            "Dependent join cost {dep_join_cost} versus join cost {join_cost} for {}",
            describe(plan, join)
        )
    });

    if dep_join_cost < join_cost {
        mark_dependent(plan, dependent, join)
    } else {
        Ok(false)
    }
}

/// Rewrite `join` so that its input `dependent_root` is dependent.
///
/// A dependent-set SELECT is stacked above the input for each equality
/// pair, and the inputs are swapped when the dependent one was on the
/// left. Returns false, leaving the tree as is, when the join has no
/// independent expressions.
fn mark_dependent(
    plan: &mut PlanTree,
    dependent_root: NodeId,
    join: NodeId,
) -> FedplanResult<bool> {
    let is_left = plan.first_child(join) == Some(dependent_root);
    let payload = join_payload(plan, join)?;
    let (independent, dependent) = if is_left {
        (payload.right_expressions.clone(), payload.left_expressions.clone())
    } else {
        (payload.left_expressions.clone(), payload.right_expressions.clone())
    };

    if independent.is_empty() {
        return Ok(false);
    }

    let id = format!("$dsc/id{}", NEXT_VALUE_SOURCE_ID.fetch_add(1, Ordering::Relaxed));
    join_payload_mut(plan, join)?.dependent_value_source = Some(id.clone());

    let mut top = dependent_root;
    for (dep, indep) in dependent.into_iter().zip(independent) {
        let criteria = Criteria::DependentSet(DependentSetCriteria {
            expr: dep,
            value_source_id: id.clone(),
            value_expr: indep,
        });
        top = plan.add_as_parent(
            top,
            NodeKind::Select(SelectNode {
                criteria,
                is_dependent_set: true,
            }),
        );
    }

    if is_left {
        plan.swap_join_children(join)?;
    }

    debug!("Made {} dependent with value source {id}", describe(plan, dependent_root));
    Ok(true)
}

fn join_payload(plan: &PlanTree, join: NodeId) -> FedplanResult<&fedplan_logical::JoinNode> {
    plan.join(join)
        .ok_or_else(|| FedplanError::internal(format!("node {join} is not a join")))
}

fn join_payload_mut(
    plan: &mut PlanTree,
    join: NodeId,
) -> FedplanResult<&mut fedplan_logical::JoinNode> {
    plan.join_mut(join)
        .ok_or_else(|| FedplanError::internal(format!("node {join} is not a join")))
}

/// Longest node detail text shown in decision messages.
const MAX_DETAIL_LEN: usize = 120;

fn describe(plan: &PlanTree, id: NodeId) -> String {
    let name = plan.node_type(id).name();
    match plan.kind(id).details() {
        Some(details) => format!("{name}{id} ({})", truncate_string(&details, MAX_DETAIL_LEN)),
        None => format!("{name}{id}"),
    }
}
