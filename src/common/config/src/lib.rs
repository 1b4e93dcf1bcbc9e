//! Configuration management for fedplan.
//!
//! Provides the knobs consumed by the optimizer driver and the dependent-join
//! rule. Everything has a usable default so callers only override what they need.

use common_error::{FedplanError, FedplanResult};
use serde::{Deserialize, Serialize};

/// Cardinality below which a side is considered small enough to drive a
/// dependent join when no cost estimate is available.
pub const DEFAULT_INDEPENDENT_CARDINALITY: f64 = 10.0;

/// Global fedplan configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FedplanConfig {
    /// Optimizer driver configuration.
    pub optimizer: OptimizerConfig,
    /// Dependent-join selection configuration.
    pub dependent_join: DependentJoinConfig,
}

impl FedplanConfig {
    /// Parse a configuration from JSON. Missing sections fall back to defaults.
    pub fn from_json(json: &str) -> FedplanResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize this configuration to pretty JSON.
    pub fn to_json_pretty(&self) -> FedplanResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> FedplanResult<()> {
        if self.optimizer.max_rule_executions == 0 {
            return Err(FedplanError::invalid_parameter(
                "optimizer.max_rule_executions must be at least 1",
            ));
        }
        let threshold = self.dependent_join.independent_cardinality_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(FedplanError::invalid_parameter(format!(
                "dependent_join.independent_cardinality_threshold must be a non-negative number, got {threshold}"
            )));
        }
        Ok(())
    }
}

/// Configuration for the rule-stack optimizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Upper bound on rule executions in one optimization.
    pub max_rule_executions: usize,
    /// Capture before/after explain output for every rule that changes the plan.
    pub enable_trace: bool,
    /// Record human-readable planning decisions in the analysis record.
    pub record_debug: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_rule_executions: 100,
            enable_trace: false,
            record_debug: false,
        }
    }
}

impl OptimizerConfig {
    /// Set the rule execution budget.
    #[must_use]
    pub fn with_max_rule_executions(mut self, max: usize) -> Self {
        self.max_rule_executions = max;
        self
    }

    /// Enable or disable plan tracing.
    #[must_use]
    pub fn with_trace(mut self, enable: bool) -> Self {
        self.enable_trace = enable;
        self
    }

    /// Enable or disable debug recording.
    #[must_use]
    pub fn with_record_debug(mut self, enable: bool) -> Self {
        self.record_debug = enable;
        self
    }
}

/// Configuration for dependent-join selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependentJoinConfig {
    /// Cardinality threshold used by the fallback heuristic.
    pub independent_cardinality_threshold: f64,
}

impl Default for DependentJoinConfig {
    fn default() -> Self {
        Self {
            independent_cardinality_threshold: DEFAULT_INDEPENDENT_CARDINALITY,
        }
    }
}

impl DependentJoinConfig {
    /// Set the cardinality threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.independent_cardinality_threshold = threshold;
        self
    }
}
