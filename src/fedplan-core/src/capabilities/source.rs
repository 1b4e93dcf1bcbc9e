//! Per-source capability record.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Capability, ExecutionFactory, Format};
use crate::types::{DataType, Value};

/// What a single source can evaluate.
///
/// Built once while the source is registered and shared read-only through
/// `Arc` afterwards. Unset capabilities and functions are unsupported.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceCapabilities {
    capabilities: BTreeMap<Capability, bool>,
    /// Keys are lower-cased.
    functions: BTreeMap<String, bool>,
    properties: BTreeMap<Capability, Value>,
    #[serde(skip)]
    translator: Option<Arc<dyn ExecutionFactory>>,
}

impl SourceCapabilities {
    /// Create an empty record where nothing is supported.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `capability` is declared supported.
    pub fn supports_capability(&self, capability: Capability) -> bool {
        self.capabilities.get(&capability).copied().unwrap_or(false)
    }

    /// Whether the scalar function `name` is supported. Case-insensitive.
    pub fn supports_function(&self, name: &str) -> bool {
        self.functions
            .get(&name.to_lowercase())
            .copied()
            .unwrap_or(false)
    }

    /// Declare support for a capability.
    ///
    /// Enabling `QueryAggregates` goes through [`Self::enable_aggregate_pushdown`].
    /// Disabling it touches nothing else.
    pub fn set_capability_support(&mut self, capability: Capability, supported: bool) {
        if capability == Capability::QueryAggregates && supported {
            self.enable_aggregate_pushdown();
        } else {
            self.capabilities.insert(capability, supported);
        }
    }

    /// Enable aggregates together with GROUP BY and HAVING.
    pub fn enable_aggregate_pushdown(&mut self) {
        self.capabilities.insert(Capability::QueryAggregates, true);
        self.capabilities.insert(Capability::QueryGroupBy, true);
        self.capabilities.insert(Capability::QueryHaving, true);
    }

    /// Declare support for a scalar function.
    pub fn set_function_support(&mut self, name: &str, supported: bool) {
        self.functions.insert(name.to_lowercase(), supported);
    }

    /// Set a property value such as `MaxInCriteriaSize`.
    pub fn set_source_property(&mut self, key: Capability, value: impl Into<Value>) {
        self.properties.insert(key, value.into());
    }

    /// Get a property value.
    pub fn source_property(&self, key: Capability) -> Option<&Value> {
        self.properties.get(&key)
    }

    /// Largest IN list the source accepts, when declared as a positive integer.
    pub fn max_in_criteria_size(&self) -> Option<usize> {
        self.source_property(Capability::MaxInCriteriaSize)
            .and_then(Value::as_int64)
            .filter(|size| *size > 0)
            .and_then(|size| usize::try_from(size).ok())
    }

    /// Connector identity, when declared.
    pub fn connector_id(&self) -> Option<&Value> {
        self.source_property(Capability::ConnectorId)
            .filter(|v| !v.is_null())
    }

    /// Bind the connector factory that answers conversion and format checks.
    pub fn set_translator(&mut self, translator: Arc<dyn ExecutionFactory>) {
        self.translator = Some(translator);
    }

    /// Whether a translator is bound.
    pub fn has_translator(&self) -> bool {
        self.translator.is_some()
    }

    /// Whether the source converts `source` into `target`.
    ///
    /// Without a bound translator conversions are assumed supported.
    pub fn supports_convert(&self, source: DataType, target: DataType) -> bool {
        self.translator
            .as_ref()
            .map_or(true, |t| t.supports_convert(source, target))
    }

    /// Whether the source accepts `literal` as a `format` pattern.
    ///
    /// Without a bound translator no pattern is accepted.
    pub fn supports_format_literal(&self, literal: &str, format: Format) -> bool {
        self.translator
            .as_ref()
            .is_some_and(|t| t.supports_format_literal(literal, format))
    }
}

impl fmt::Display for SourceCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SourceCapabilities")?;
        for (capability, supported) in &self.capabilities {
            writeln!(f, "  {capability}: {supported}")?;
        }
        for (key, value) in &self.properties {
            writeln!(f, "  {key} = {value}")?;
        }
        for (name, supported) in &self.functions {
            writeln!(f, "  function {name}: {supported}")?;
        }
        Ok(())
    }
}
