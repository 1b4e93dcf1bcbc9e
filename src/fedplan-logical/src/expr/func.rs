//! Scalar function calls.

use fedplan_core::{DataType, Format, Value};
use serde::{Deserialize, Serialize};

use super::Expr;

/// Where a function may be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PushdownMode {
    /// Either locally or at the source.
    #[default]
    Can,
    /// Only locally.
    Cannot,
    /// Only at the source.
    Must,
}

/// Determinism classification for functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Determinism {
    /// Same inputs always produce the same output.
    #[default]
    Deterministic,
    /// Output may vary between calls (e.g. `now()`, `rand()`).
    NonDeterministic,
}

/// Resolved function metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    /// Pushdown restriction.
    pub pushdown: PushdownMode,
    /// Determinism.
    pub determinism: Determinism,
}

/// Function call expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    /// Function name.
    pub name: String,
    /// Arguments.
    pub args: Vec<Expr>,
    /// Result type.
    pub return_type: DataType,
    /// Resolved descriptor.
    pub descriptor: FunctionDescriptor,
}

/// Built-in function names the planner treats specially.
pub mod builtin {
    /// Type conversion.
    pub const CONVERT: &str = "convert";
    /// Type conversion, SQL spelling.
    pub const CAST: &str = "cast";

    /// Functions whose second argument is a date pattern.
    pub const DATE_FORMAT_FUNCTIONS: &[&str] = &[
        "formatdate",
        "formattime",
        "formattimestamp",
        "parsedate",
        "parsetime",
        "parsetimestamp",
    ];

    /// Functions whose second argument is a number pattern.
    pub const NUMBER_FORMAT_FUNCTIONS: &[&str] = &[
        "formatinteger",
        "formatlong",
        "formatdouble",
        "formatfloat",
        "formatbiginteger",
        "formatbigdecimal",
        "parseinteger",
        "parselong",
        "parsedouble",
        "parsefloat",
        "parsebiginteger",
        "parsebigdecimal",
    ];
}

impl Function {
    /// Create a pushable, deterministic function call.
    pub fn new(name: impl Into<String>, args: Vec<Expr>, return_type: DataType) -> Self {
        Self {
            name: name.into(),
            args,
            return_type,
            descriptor: FunctionDescriptor::default(),
        }
    }

    /// Set the pushdown restriction.
    pub fn with_pushdown(mut self, pushdown: PushdownMode) -> Self {
        self.descriptor.pushdown = pushdown;
        self
    }

    /// Set the determinism.
    pub fn with_determinism(mut self, determinism: Determinism) -> Self {
        self.descriptor.determinism = determinism;
        self
    }

    /// Whether this is a CONVERT or CAST.
    pub fn is_conversion(&self) -> bool {
        self.name.eq_ignore_ascii_case(builtin::CONVERT)
            || self.name.eq_ignore_ascii_case(builtin::CAST)
    }

    /// Source and target types of a conversion.
    pub fn conversion_types(&self) -> Option<(DataType, DataType)> {
        if !self.is_conversion() {
            return None;
        }
        let source = self.args.first()?.data_type();
        Some((source, self.return_type))
    }

    /// The literal pattern of a format or parse function, with its kind.
    ///
    /// Returns `None` for other functions and for non-literal patterns.
    pub fn format_pattern(&self) -> Option<(&str, Format)> {
        let name = self.name.to_lowercase();
        let format = if builtin::DATE_FORMAT_FUNCTIONS.contains(&name.as_str()) {
            Format::Date
        } else if builtin::NUMBER_FORMAT_FUNCTIONS.contains(&name.as_str()) {
            Format::Number
        } else {
            return None;
        };
        match self.args.get(1) {
            Some(Expr::Literal(Value::String(pattern))) => Some((pattern.as_str(), format)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{arg}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::lit;

    #[test]
    fn test_format_pattern() {
        let f = Function::new(
            "FORMATDATE",
            vec![lit(0i64), lit("yyyy-MM-dd")],
            DataType::String,
        );
        assert_eq!(f.format_pattern(), Some(("yyyy-MM-dd", Format::Date)));

        let f = Function::new("parseDouble", vec![lit("1"), lit("#.#")], DataType::Float64);
        assert_eq!(f.format_pattern(), Some(("#.#", Format::Number)));

        let f = Function::new("concat", vec![lit("a"), lit("b")], DataType::String);
        assert_eq!(f.format_pattern(), None);
    }

    #[test]
    fn test_conversion_types() {
        let f = Function::new("CAST", vec![lit("12")], DataType::Int64);
        assert_eq!(f.conversion_types(), Some((DataType::String, DataType::Int64)));
        assert!(Function::new("ucase", vec![], DataType::String)
            .conversion_types()
            .is_none());
    }
}
