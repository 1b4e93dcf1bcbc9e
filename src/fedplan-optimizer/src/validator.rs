//! Pushdown validation.
//!
//! Decides whether a whole language object can be evaluated by one source.
//! The walk is pre-order and stops at the first construct the source cannot
//! handle. Subquery commands are never walked into; each subquery gets its
//! own pushdown check against the model it would run on.

use std::ops::ControlFlow;
use std::sync::Arc;

use common_error::FedplanResult;
use fedplan_core::{
    CapabilitiesFinder, Capability, ModelId, QueryMetadata, SourceCapabilities,
};
use fedplan_logical::command::Subquery;
use fedplan_logical::criteria::{CompareOp, CompoundOp, Criteria, Quantifier};
use fedplan_logical::expr::{Expr, PushdownMode};
use fedplan_logical::language::{self, LanguageObject};
use log::trace;

use crate::capabilities_util;

/// Outcome of a pushdown check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushdownVerdict {
    /// Whether the object can be pushed.
    pub valid: bool,
    /// Why it cannot, when it cannot.
    pub reason: Option<String>,
}

impl PushdownVerdict {
    fn accepted() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    fn rejected(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// Check whether `obj` can be evaluated by the source behind `model`.
///
/// Without a model, or for a virtual model, the answer is no. A source with
/// no capability record accepts everything. Metadata failures are returned
/// as errors rather than verdicts.
pub fn validate(
    obj: LanguageObject<'_>,
    model: Option<&ModelId>,
    metadata: &dyn QueryMetadata,
    finder: &dyn CapabilitiesFinder,
) -> FedplanResult<PushdownVerdict> {
    let Some(model) = model else {
        return Ok(PushdownVerdict::rejected("no model to push to"));
    };
    if metadata.is_virtual_model(model)? {
        return Ok(PushdownVerdict::rejected(format!("model {model} is virtual")));
    }
    let Some(caps) = finder.find_capabilities(&metadata.full_name(model)?)? else {
        return Ok(PushdownVerdict::accepted());
    };

    CriteriaCapabilityValidator {
        model,
        caps,
        metadata,
        finder,
    }
    .run(obj)
}

/// Boolean form of [`validate`].
pub fn can_push_language_object(
    obj: LanguageObject<'_>,
    model: Option<&ModelId>,
    metadata: &dyn QueryMetadata,
    finder: &dyn CapabilitiesFinder,
) -> FedplanResult<bool> {
    Ok(validate(obj, model, metadata, finder)?.valid)
}

/// Check whether a subquery can run on the same source as its parent.
///
/// A subquery planned as a single childless access node over a non-XML
/// query brings its own model, which must share a connector with `model`.
/// Any other subquery is checked against `model` alone. Correlated
/// subqueries are then validated as a whole against the resolved model,
/// treating outer references as local columns.
///
/// Returns the model the subquery would run on, or `None` if it cannot be
/// pushed.
pub fn validate_subquery_pushdown(
    subquery: &Subquery,
    model: Option<&ModelId>,
    metadata: &dyn QueryMetadata,
    finder: &dyn CapabilitiesFinder,
) -> FedplanResult<Option<ModelId>> {
    let mut resolved = model.cloned();

    if let Some(query) = subquery.access_query() {
        let sub_model = metadata.model_id(&query.from[0])?;
        match &resolved {
            None => resolved = Some(sub_model),
            Some(current) => {
                if !capabilities_util::is_same_connector(current, &sub_model, metadata, finder)? {
                    return Ok(None);
                }
            }
        }
    }

    let Some(resolved) = resolved else {
        return Ok(None);
    };

    if subquery.is_correlated() {
        if !capabilities_util::supports(
            Capability::QuerySubqueriesCorrelated,
            &resolved,
            metadata,
            finder,
        )? {
            return Ok(None);
        }
        let command = LanguageObject::Command(&subquery.command);
        if !can_push_language_object(command, Some(&resolved), metadata, finder)? {
            return Ok(None);
        }
        // Outer-scope references are checked as if evaluated by the same source.
        for (_, outer) in &subquery.correlated_references {
            let outer = LanguageObject::Expr(outer);
            if !can_push_language_object(outer, Some(&resolved), metadata, finder)? {
                return Ok(None);
            }
        }
    }

    Ok(Some(resolved))
}

/// Walks a language object against one source's capabilities.
struct CriteriaCapabilityValidator<'a> {
    model: &'a ModelId,
    caps: Arc<SourceCapabilities>,
    metadata: &'a dyn QueryMetadata,
    finder: &'a dyn CapabilitiesFinder,
}

/// `Ok(None)` passes, `Ok(Some(reason))` rejects.
type Check = FedplanResult<Option<String>>;

impl CriteriaCapabilityValidator<'_> {
    fn run(&self, obj: LanguageObject<'_>) -> FedplanResult<PushdownVerdict> {
        let flow = language::walk(obj, &mut |node| match self.check(node) {
            Ok(None) => ControlFlow::Continue(()),
            Ok(Some(reason)) => ControlFlow::Break(Ok(reason)),
            Err(e) => ControlFlow::Break(Err(e)),
        });

        match flow {
            ControlFlow::Continue(()) => Ok(PushdownVerdict::accepted()),
            ControlFlow::Break(Ok(reason)) => {
                trace!("Cannot push to {}: {}", self.model, reason);
                Ok(PushdownVerdict::rejected(reason))
            }
            ControlFlow::Break(Err(e)) => Err(e),
        }
    }

    fn check(&self, obj: LanguageObject<'_>) -> Check {
        match obj {
            LanguageObject::Expr(expr) => self.check_expr(expr),
            LanguageObject::Criteria(crit) => self.check_criteria(crit),
            LanguageObject::Command(_) => Ok(None),
            LanguageObject::XmlNamespaces(_) | LanguageObject::XmlAttributes(_) => {
                Ok(Some("XML constructs are evaluated locally".to_string()))
            }
        }
    }

    fn check_expr(&self, expr: &Expr) -> Check {
        match expr {
            Expr::Column(_) | Expr::Literal(_) => Ok(None),
            Expr::Aggregate(agg) => {
                let supported = capabilities_util::supports_aggregate_function(
                    agg,
                    self.model,
                    self.metadata,
                    self.finder,
                )?;
                Ok((!supported).then(|| format!("aggregate {agg} is not supported")))
            }
            Expr::Case(_) => Ok(self.require(Capability::QueryCase)),
            Expr::SearchedCase(_) => Ok(self.require(Capability::QuerySearchedCase)),
            Expr::Function(func) => {
                if expr.is_constant_foldable() {
                    return Ok(None);
                }
                if func.descriptor.pushdown == PushdownMode::Cannot {
                    return Ok(Some(format!("function {} cannot be pushed down", func.name)));
                }
                let supported = capabilities_util::supports_scalar_function(
                    func,
                    self.model,
                    self.metadata,
                    self.finder,
                )?;
                Ok((!supported).then(|| format!("function {func} is not supported")))
            }
            Expr::ScalarSubquery(subquery) => {
                if let Some(reason) = self.require(Capability::QuerySubqueriesScalar) {
                    return Ok(Some(reason));
                }
                self.check_subquery(subquery)
            }
            Expr::XmlElement(_) | Expr::XmlForest(_) => {
                Ok(Some("XML constructs are evaluated locally".to_string()))
            }
        }
    }

    fn check_criteria(&self, crit: &Criteria) -> Check {
        match crit {
            Criteria::Compare(c) => self.check_compare(c.op, crit),
            Criteria::Compound { op, .. } => Ok(match op {
                CompoundOp::Or => self.require(Capability::CriteriaOr),
                CompoundOp::And => None,
            }),
            Criteria::Not(_) => Ok(self.require(Capability::CriteriaNot)),
            Criteria::IsNull { negated, .. } => Ok(self
                .require(Capability::CriteriaIsNull)
                .or_else(|| self.require_not(*negated))),
            Criteria::Match(m) => {
                let escape = m.escape.and_then(|_| self.require(Capability::CriteriaLikeEscape));
                if let Some(reason) = self
                    .require(Capability::CriteriaLike)
                    .or(escape)
                    .or_else(|| self.require_not(m.negated))
                {
                    return Ok(Some(reason));
                }
                self.check_searchable(crit, true)
            }
            Criteria::Set(s) => {
                if let Some(reason) = self.check_in(crit, s.negated)? {
                    return Ok(Some(reason));
                }
                Ok(self
                    .caps
                    .max_in_criteria_size()
                    .filter(|&max| s.values.len() > max)
                    .map(|max| format!("IN list of {} values exceeds {max}", s.values.len())))
            }
            Criteria::DependentSet(_) => self.check_in(crit, false),
            Criteria::SubquerySet(s) => {
                if let Some(reason) = self.check_in(crit, s.negated)? {
                    return Ok(Some(reason));
                }
                if let Some(reason) = self.require(Capability::CriteriaInSubquery) {
                    return Ok(Some(reason));
                }
                self.check_subquery(&s.subquery)
            }
            Criteria::Exists(e) => {
                if let Some(reason) = self.require(Capability::CriteriaExists) {
                    return Ok(Some(reason));
                }
                self.check_subquery(&e.subquery)
            }
            Criteria::SubqueryCompare(s) => {
                let quantified = match s.quantifier {
                    Quantifier::All => Capability::CriteriaQuantifiedAll,
                    Quantifier::Some | Quantifier::Any => Capability::CriteriaQuantifiedSome,
                };
                if let Some(reason) = self.require(quantified) {
                    return Ok(Some(reason));
                }
                if let Some(reason) = self.check_compare(s.op, crit)? {
                    return Ok(Some(reason));
                }
                self.check_subquery(&s.subquery)
            }
        }
    }

    fn check_compare(&self, op: CompareOp, crit: &Criteria) -> Check {
        let needed = match op {
            CompareOp::Eq | CompareOp::Ne => Capability::CriteriaCompareEq,
            CompareOp::Lt | CompareOp::Gt | CompareOp::Le | CompareOp::Ge => {
                Capability::CriteriaCompareOrdered
            }
        };
        let needs_not = matches!(op, CompareOp::Ne | CompareOp::Lt | CompareOp::Gt);
        if let Some(reason) = self.require(needed).or_else(|| self.require_not(needs_not)) {
            return Ok(Some(reason));
        }
        self.check_searchable(crit, false)
    }

    fn check_in(&self, crit: &Criteria, negated: bool) -> Check {
        if let Some(reason) = self
            .require(Capability::CriteriaIn)
            .or_else(|| self.require_not(negated))
        {
            return Ok(Some(reason));
        }
        self.check_searchable(crit, false)
    }

    fn check_subquery(&self, subquery: &Subquery) -> Check {
        let resolved =
            validate_subquery_pushdown(subquery, Some(self.model), self.metadata, self.finder)?;
        Ok(resolved
            .is_none()
            .then(|| format!("subquery cannot be pushed to {}", self.model)))
    }

    /// Every column the criteria references must be searchable.
    fn check_searchable(&self, crit: &Criteria, like: bool) -> Check {
        for element in crit.elements() {
            let searchability = self.metadata.element_searchability(&element)?;
            let ok = if like {
                searchability.supports_like()
            } else {
                searchability.supports_compare()
            };
            if !ok {
                return Ok(Some(format!("{element} is not searchable as {searchability:?}")));
            }
        }
        Ok(None)
    }

    fn require(&self, capability: Capability) -> Option<String> {
        (!self.caps.supports_capability(capability))
            .then(|| format!("{capability} is not supported by {}", self.model))
    }

    fn require_not(&self, needed: bool) -> Option<String> {
        if needed {
            self.require(Capability::CriteriaNot)
        } else {
            None
        }
    }
}
