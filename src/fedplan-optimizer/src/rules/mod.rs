//! Optimization rules for fedplan plans.
//!
//! Rules are executed from a LIFO [`RuleStack`] by the [`Optimizer`]:
//!
//! - **ChooseDependent**: turns eligible equi-joins into dependent joins,
//!   then schedules the two rules below
//! - **CleanCriteria**: drops SELECT nodes whose criteria is already enforced
//! - **PushSelectCriteria**: moves SELECT criteria into access nodes when the
//!   source supports them

mod choose_dependent;
mod clean_criteria;
mod optimizer;
mod push_select_criteria;
mod rule;
mod rule_stack;

pub use choose_dependent::ChooseDependent;
pub use clean_criteria::CleanCriteria;
pub use optimizer::Optimizer;
pub use push_select_criteria::PushSelectCriteria;
pub use rule::{OptimizationRule, OptimizedPlan, RuleTrace, Transformed};
pub use rule_stack::{RuleKind, RuleStack};
