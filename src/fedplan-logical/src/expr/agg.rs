//! Aggregate function calls.

use fedplan_core::DataType;
use serde::{Deserialize, Serialize};

use super::Expr;

/// Aggregate function types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateFunction {
    /// Count rows or non-null values.
    Count,
    /// Sum of values.
    Sum,
    /// Average value.
    Avg,
    /// Minimum value.
    Min,
    /// Maximum value.
    Max,
}

impl AggregateFunction {
    /// SQL name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Count => "COUNT",
            Self::Sum => "SUM",
            Self::Avg => "AVG",
            Self::Min => "MIN",
            Self::Max => "MAX",
        }
    }
}

/// An aggregate call. `arg` is `None` only for `COUNT(*)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSymbol {
    /// Aggregate function.
    pub func: AggregateFunction,
    /// Argument.
    pub arg: Option<Box<Expr>>,
    /// Whether DISTINCT was specified.
    pub distinct: bool,
}

impl AggregateSymbol {
    /// Create an aggregate over `arg`.
    pub fn new(func: AggregateFunction, arg: Expr) -> Self {
        Self {
            func,
            arg: Some(Box::new(arg)),
            distinct: false,
        }
    }

    /// Create `COUNT(*)`.
    pub fn count_star() -> Self {
        Self {
            func: AggregateFunction::Count,
            arg: None,
            distinct: false,
        }
    }

    /// Mark as DISTINCT.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Whether this is `COUNT(*)`.
    pub fn is_count_star(&self) -> bool {
        self.func == AggregateFunction::Count && self.arg.is_none()
    }

    /// Result type.
    pub fn data_type(&self) -> DataType {
        match self.func {
            AggregateFunction::Count => DataType::Int64,
            AggregateFunction::Avg => DataType::Float64,
            _ => self
                .arg
                .as_ref()
                .map_or(DataType::Null, |arg| arg.data_type()),
        }
    }
}

impl std::fmt::Display for AggregateSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.func.name())?;
        if self.distinct {
            write!(f, "DISTINCT ")?;
        }
        match &self.arg {
            Some(arg) => write!(f, "{arg})"),
            None => write!(f, "*)"),
        }
    }
}
