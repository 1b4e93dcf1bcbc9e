//! Per-pass planning context.

use common_config::FedplanConfig;
use fedplan_core::{CapabilitiesFinder, QueryMetadata};

use crate::analysis::AnalysisRecord;
use crate::cost::CostOracle;

/// Everything a rule consults besides the plan itself.
///
/// Lookups are shared and read-only. The analysis record is owned by the
/// pass and collects decision lines.
pub struct RuleContext<'a> {
    /// Metadata lookups.
    pub metadata: &'a dyn QueryMetadata,
    /// Capability lookups.
    pub capabilities: &'a dyn CapabilitiesFinder,
    /// Cost estimation.
    pub cost_oracle: &'a dyn CostOracle,
    /// Decision log.
    pub analysis: &'a mut AnalysisRecord,
    /// Configuration of the pass.
    pub config: &'a FedplanConfig,
}

impl RuleContext<'_> {
    /// Record a decision line, building it only when debug recording is on.
    pub fn record(&mut self, line: impl FnOnce() -> String) {
        if self.analysis.record_debug() {
            self.analysis.println(line());
        }
    }
}
