//! Query optimizer for fedplan plans.
//!
//! Decides which criteria a source can evaluate and which joins should run
//! as dependent joins, rewriting the plan tree accordingly.

pub mod analysis;
pub mod capabilities_util;
pub mod context;
pub mod cost;
pub mod rules;
pub mod validator;

pub use analysis::AnalysisRecord;
pub use context::RuleContext;
pub use cost::{CardinalityCostModel, CostOracle};
pub use rules::{
    ChooseDependent, CleanCriteria, OptimizationRule, OptimizedPlan, Optimizer,
    PushSelectCriteria, RuleKind, RuleStack, RuleTrace, Transformed,
};
pub use validator::{
    can_push_language_object, validate, validate_subquery_pushdown, PushdownVerdict,
};

use common_config::FedplanConfig;
use common_error::FedplanResult;
use fedplan_core::{CapabilitiesFinder, QueryMetadata};
use fedplan_logical::PlanTree;

/// Run dependent-join selection and its follow-up rules on `plan`.
pub fn optimize(
    plan: PlanTree,
    config: &FedplanConfig,
    metadata: &dyn QueryMetadata,
    capabilities: &dyn CapabilitiesFinder,
    cost_oracle: &dyn CostOracle,
) -> FedplanResult<OptimizedPlan> {
    let mut rules = RuleStack::new();
    rules.push(RuleKind::ChooseDependent);
    Optimizer::with_config(config.clone()).optimize(
        plan,
        rules,
        metadata,
        capabilities,
        cost_oracle,
    )
}
