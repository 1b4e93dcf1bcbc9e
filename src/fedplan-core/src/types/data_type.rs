//! Data type definitions for fedplan symbols and literals.

use serde::{Deserialize, Serialize};

/// Runtime data type of an element, literal or function result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Null type (unknown or absent).
    Null,
    /// Boolean type.
    Bool,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point.
    Float64,
    /// Arbitrary precision decimal.
    Decimal,
    /// UTF-8 string.
    String,
    /// Binary data.
    Binary,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Timestamp.
    Timestamp,
    /// XML document or fragment.
    Xml,
}

impl DataType {
    /// Check if this type is numeric.
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Int32 | Self::Int64 | Self::Float64 | Self::Decimal
        )
    }

    /// Check if this type is a temporal type.
    pub const fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::Time | Self::Timestamp)
    }

    /// Get the display name for this type.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Bool => "Bool",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::Float64 => "Float64",
            Self::Decimal => "Decimal",
            Self::String => "String",
            Self::Binary => "Binary",
            Self::Date => "Date",
            Self::Time => "Time",
            Self::Timestamp => "Timestamp",
            Self::Xml => "Xml",
        }
    }

    /// Check if a value of this type converts to `target` without a source round trip.
    pub fn is_implicit_conversion(&self, target: &Self) -> bool {
        if self == target {
            return true;
        }

        matches!(
            (self, target),
            (Self::Null, _)
                | (Self::Int32, Self::Int64 | Self::Float64 | Self::Decimal)
                | (Self::Int64, Self::Float64 | Self::Decimal)
                | (Self::Date, Self::Timestamp)
        )
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
