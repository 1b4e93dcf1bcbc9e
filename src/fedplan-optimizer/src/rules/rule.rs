//! Optimization rule trait and framework.
//!
//! Rules rewrite the plan tree in place. A rule may push follow-up rules
//! onto the stack it was popped from; the driver keeps popping until the
//! stack is empty or its budget runs out.

use common_display::indent;
use common_error::FedplanResult;
use fedplan_logical::PlanTree;

use super::RuleStack;
use crate::analysis::AnalysisRecord;
use crate::context::RuleContext;

/// A single rewrite rule.
///
/// A rewrite must keep the query's result unchanged: it may move where work
/// happens but never which rows are produced.
pub trait OptimizationRule: Send + Sync {
    /// Get the name of this rule.
    fn name(&self) -> &'static str;

    /// Get a description of what this rule does.
    fn description(&self) -> &'static str {
        "No description available"
    }

    /// Rewrite `plan` in place, pushing any follow-up rules onto `rules`.
    fn execute(
        &self,
        plan: &mut PlanTree,
        ctx: &mut RuleContext<'_>,
        rules: &mut RuleStack,
    ) -> FedplanResult<Transformed>;
}

/// Whether a rule execution changed the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transformed {
    /// Whether the plan was actually changed.
    pub changed: bool,
}

impl Transformed {
    /// The plan was changed.
    pub fn yes() -> Self {
        Self { changed: true }
    }

    /// The plan was left as is.
    pub fn no() -> Self {
        Self { changed: false }
    }
}

impl From<bool> for Transformed {
    fn from(changed: bool) -> Self {
        Self { changed }
    }
}

/// A trace entry for a single rule execution.
#[derive(Debug, Clone)]
pub struct RuleTrace {
    /// The name of the rule that was executed.
    pub rule_name: String,
    /// The plan before the rule ran (as explain string).
    pub before: String,
    /// The plan after the rule ran (as explain string).
    pub after: String,
    /// Whether the rule actually changed the plan.
    pub changed: bool,
}

impl RuleTrace {
    /// Create a new trace entry.
    pub fn new(
        rule_name: impl Into<String>,
        before: impl Into<String>,
        after: impl Into<String>,
        changed: bool,
    ) -> Self {
        Self {
            rule_name: rule_name.into(),
            before: before.into(),
            after: after.into(),
            changed,
        }
    }
}

/// The result of optimization.
#[derive(Debug, Clone)]
pub struct OptimizedPlan {
    /// The rewritten plan.
    pub plan: PlanTree,
    /// Number of rules popped and executed.
    pub rule_executions: usize,
    /// Number of executions that changed the plan.
    pub rules_applied: usize,
    /// Detailed trace of rule executions (if tracing was enabled).
    pub trace: Vec<RuleTrace>,
    /// Decision lines recorded during the pass.
    pub analysis: AnalysisRecord,
}

impl OptimizedPlan {
    /// Format the trace as a human-readable string.
    pub fn format_trace(&self) -> String {
        let mut output = format!(
            "Optimization ran {} rules, {} changed the plan\n",
            self.rule_executions, self.rules_applied
        );

        if self.trace.is_empty() {
            output.push_str("  (no trace available)\n");
        } else {
            for (i, entry) in self.trace.iter().filter(|t| t.changed).enumerate() {
                output.push_str(&format!(
                    "\n--- Rule {} applied: {} ---\n",
                    i + 1,
                    entry.rule_name
                ));
                output.push_str("Before:\n");
                output.push_str(&indent(&entry.before, "  "));
                output.push_str("\nAfter:\n");
                output.push_str(&indent(&entry.after, "  "));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use fedplan_core::GroupSymbol;
    use fedplan_logical::{AccessNode, NodeKind};

    use super::*;

    #[test]
    fn test_transformed() {
        assert!(!Transformed::no().changed);
        assert!(Transformed::yes().changed);
        assert_eq!(Transformed::from(true), Transformed::yes());
    }

    #[test]
    fn test_rule_trace() {
        let trace = RuleTrace::new("TestRule", "before", "after", true);
        assert_eq!(trace.rule_name, "TestRule");
        assert!(trace.changed);
    }

    #[test]
    fn test_format_trace() {
        let plan = PlanTree::new(NodeKind::Access(AccessNode::new(GroupSymbol::new("pm1.g1"))));
        let mut result = OptimizedPlan {
            plan,
            rule_executions: 3,
            rules_applied: 1,
            trace: Vec::new(),
            analysis: AnalysisRecord::default(),
        };
        assert!(result.format_trace().contains("(no trace available)"));

        result
            .trace
            .push(RuleTrace::new("ChooseDependent", "Join", "Join [dep]", true));
        let text = result.format_trace();
        assert!(text.starts_with("Optimization ran 3 rules, 1 changed the plan"));
        assert!(text.contains("--- Rule 1 applied: ChooseDependent ---"));
        assert!(text.contains("After:\n  Join [dep]"));
    }
}
