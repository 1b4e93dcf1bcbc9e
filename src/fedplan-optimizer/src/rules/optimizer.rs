//! The optimizer driver.
//!
//! Pops rules off a [`RuleStack`] until it is empty. Rules may push
//! follow-ups, so the driver bounds the number of executions.

use std::collections::HashMap;

use common_config::FedplanConfig;
use common_error::FedplanResult;
use fedplan_core::{CapabilitiesFinder, QueryMetadata};
use fedplan_logical::PlanTree;
use log::{debug, warn};

use super::rule::{OptimizationRule, OptimizedPlan, RuleTrace};
use super::{ChooseDependent, CleanCriteria, PushSelectCriteria, RuleKind, RuleStack};
use crate::analysis::AnalysisRecord;
use crate::context::RuleContext;
use crate::cost::CostOracle;

/// Rule-stack optimizer.
///
/// # Termination
///
/// Every rule in the default registry pushes follow-ups only when it changed
/// the plan, and each change consumes something finite (a join candidate or
/// a SELECT node). `max_rule_executions` bounds custom registries as well.
pub struct Optimizer {
    /// Registered rules.
    rules: HashMap<RuleKind, Box<dyn OptimizationRule>>,
    /// Configuration.
    config: FedplanConfig,
}

impl Optimizer {
    /// Create an optimizer with no rules.
    pub fn new(config: FedplanConfig) -> Self {
        Self {
            rules: HashMap::new(),
            config,
        }
    }

    /// Create an optimizer with the standard rules and the given config.
    pub fn with_config(config: FedplanConfig) -> Self {
        let mut optimizer = Self::new(config);
        optimizer.register(RuleKind::ChooseDependent, ChooseDependent);
        optimizer.register(RuleKind::CleanCriteria, CleanCriteria);
        optimizer.register(RuleKind::PushSelectCriteria, PushSelectCriteria);
        optimizer
    }

    /// Register (or replace) the implementation of a rule.
    pub fn register<R: OptimizationRule + 'static>(&mut self, kind: RuleKind, rule: R) {
        self.rules.insert(kind, Box::new(rule));
    }

    /// Get the configuration.
    pub fn config(&self) -> &FedplanConfig {
        &self.config
    }

    /// Run the rules on the stack against `plan`.
    ///
    /// Metadata and cost failures abort the pass. A rule with no registered
    /// implementation is an internal error.
    pub fn optimize(
        &self,
        plan: PlanTree,
        mut rules: RuleStack,
        metadata: &dyn QueryMetadata,
        capabilities: &dyn CapabilitiesFinder,
        cost_oracle: &dyn CostOracle,
    ) -> FedplanResult<OptimizedPlan> {
        let mut plan = plan;
        let mut analysis = AnalysisRecord::new(self.config.optimizer.record_debug);
        let mut rule_executions = 0;
        let mut rules_applied = 0;
        let mut trace = Vec::new();

        while let Some(kind) = rules.pop() {
            if rule_executions >= self.config.optimizer.max_rule_executions {
                warn!(
                    "Optimizer reached max rule executions ({}), {} rules left unexecuted",
                    self.config.optimizer.max_rule_executions,
                    rules.len() + 1
                );
                break;
            }

            let rule = self.rules.get(&kind).ok_or_else(|| {
                common_error::FedplanError::internal(format!("no rule registered for {kind}"))
            })?;

            let before = self.config.optimizer.enable_trace.then(|| plan.explain());
            let mut ctx = RuleContext {
                metadata,
                capabilities,
                cost_oracle,
                analysis: &mut analysis,
                config: &self.config,
            };
            let result = rule.execute(&mut plan, &mut ctx, &mut rules)?;
            rule_executions += 1;

            if result.changed {
                rules_applied += 1;
                debug!("Rule '{}' changed the plan (execution {})", rule.name(), rule_executions);

                if let Some(before) = before {
                    trace.push(RuleTrace::new(rule.name(), before, plan.explain(), true));
                }
            }
        }

        Ok(OptimizedPlan {
            plan,
            rule_executions,
            rules_applied,
            trace,
            analysis,
        })
    }
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::with_config(FedplanConfig::default())
    }
}
