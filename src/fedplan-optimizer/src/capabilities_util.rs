//! Capability questions asked against a model.
//!
//! Every helper answers `false` for virtual models and for models without a
//! capability record. Only metadata and lookup failures are errors.

use std::sync::Arc;

use common_error::FedplanResult;
use fedplan_core::{
    CapabilitiesFinder, Capability, ModelId, QueryMetadata, SourceCapabilities,
};
use fedplan_logical::expr::{AggregateFunction, AggregateSymbol, Function, PushdownMode};

/// Capability record of a physical model.
pub fn capabilities_for(
    model: &ModelId,
    metadata: &dyn QueryMetadata,
    finder: &dyn CapabilitiesFinder,
) -> FedplanResult<Option<Arc<SourceCapabilities>>> {
    if metadata.is_virtual_model(model)? {
        return Ok(None);
    }
    finder.find_capabilities(&metadata.full_name(model)?)
}

/// Whether the source behind `model` declares `capability`.
pub fn supports(
    capability: Capability,
    model: &ModelId,
    metadata: &dyn QueryMetadata,
    finder: &dyn CapabilitiesFinder,
) -> FedplanResult<bool> {
    Ok(capabilities_for(model, metadata, finder)?
        .is_some_and(|caps| caps.supports_capability(capability)))
}

/// Whether the aggregate can be evaluated by the source.
pub fn supports_aggregate_function(
    aggregate: &AggregateSymbol,
    model: &ModelId,
    metadata: &dyn QueryMetadata,
    finder: &dyn CapabilitiesFinder,
) -> FedplanResult<bool> {
    let Some(caps) = capabilities_for(model, metadata, finder)? else {
        return Ok(false);
    };
    if !caps.supports_capability(Capability::QueryAggregates) {
        return Ok(false);
    }

    let function_capability = match aggregate.func {
        AggregateFunction::Count if aggregate.arg.is_none() => Capability::QueryAggregatesCountStar,
        AggregateFunction::Count => Capability::QueryAggregatesCount,
        AggregateFunction::Sum => Capability::QueryAggregatesSum,
        AggregateFunction::Avg => Capability::QueryAggregatesAvg,
        AggregateFunction::Min => Capability::QueryAggregatesMin,
        AggregateFunction::Max => Capability::QueryAggregatesMax,
    };
    if !caps.supports_capability(function_capability) {
        return Ok(false);
    }

    Ok(!aggregate.distinct || caps.supports_capability(Capability::QueryAggregatesDistinct))
}

/// Whether the scalar function can be evaluated by the source.
///
/// Functions that must be pushed are accepted outright. Conversions and
/// format functions with a literal pattern also ask the source's translator.
pub fn supports_scalar_function(
    function: &Function,
    model: &ModelId,
    metadata: &dyn QueryMetadata,
    finder: &dyn CapabilitiesFinder,
) -> FedplanResult<bool> {
    let Some(caps) = capabilities_for(model, metadata, finder)? else {
        return Ok(false);
    };
    if function.descriptor.pushdown == PushdownMode::Must {
        return Ok(true);
    }
    if !caps.supports_function(&function.name) {
        return Ok(false);
    }
    if let Some((source, target)) = function.conversion_types() {
        return Ok(caps.supports_convert(source, target));
    }
    if let Some((pattern, format)) = function.format_pattern() {
        return Ok(caps.supports_format_literal(pattern, format));
    }
    Ok(true)
}

/// Whether two models are served by the same connector.
///
/// Equal physical models always are. Distinct models are when both declare
/// the same `ConnectorId`. Virtual models never are.
pub fn is_same_connector(
    a: &ModelId,
    b: &ModelId,
    metadata: &dyn QueryMetadata,
    finder: &dyn CapabilitiesFinder,
) -> FedplanResult<bool> {
    if metadata.is_virtual_model(a)? || metadata.is_virtual_model(b)? {
        return Ok(false);
    }
    if a == b {
        return Ok(true);
    }

    let (Some(caps_a), Some(caps_b)) = (
        capabilities_for(a, metadata, finder)?,
        capabilities_for(b, metadata, finder)?,
    ) else {
        return Ok(false);
    };
    Ok(match (caps_a.connector_id(), caps_b.connector_id()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    })
}
