//! Checks a source delegates to its connector.

use serde::{Deserialize, Serialize};

use crate::types::DataType;

/// Kind of pattern passed to a format or parse function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    /// Date and timestamp patterns.
    Date,
    /// Number patterns.
    Number,
}

/// Connector-side answers that a static capability map cannot give.
pub trait ExecutionFactory: Send + Sync + std::fmt::Debug {
    /// Whether the source converts `source` values into `target`.
    fn supports_convert(&self, source: DataType, target: DataType) -> bool;

    /// Whether the source understands `literal` as a `format` pattern.
    fn supports_format_literal(&self, literal: &str, format: Format) -> bool;
}
