//! Scalar expressions.

use fedplan_core::{DataType, ElementSymbol, Value};
use serde::{Deserialize, Serialize};

use super::{AggregateSymbol, Function, XmlElement, XmlForest};
use crate::command::Subquery;
use crate::criteria::Criteria;

/// CASE with an operand: `CASE operand WHEN w THEN t ... ELSE e END`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseExpr {
    /// Operand compared against each WHEN value.
    pub operand: Box<Expr>,
    /// (WHEN value, THEN result) pairs.
    pub branches: Vec<(Expr, Expr)>,
    /// ELSE result.
    pub else_expr: Option<Box<Expr>>,
}

/// Searched CASE: `CASE WHEN crit THEN t ... ELSE e END`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchedCaseExpr {
    /// (WHEN criteria, THEN result) pairs.
    pub branches: Vec<(Criteria, Expr)>,
    /// ELSE result.
    pub else_expr: Option<Box<Expr>>,
}

/// A scalar expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Column reference.
    Column(ElementSymbol),
    /// Constant.
    Literal(Value),
    /// Scalar function call.
    Function(Function),
    /// Aggregate call.
    Aggregate(AggregateSymbol),
    /// CASE with operand.
    Case(CaseExpr),
    /// Searched CASE.
    SearchedCase(SearchedCaseExpr),
    /// Scalar subquery.
    ScalarSubquery(Box<Subquery>),
    /// XMLELEMENT.
    XmlElement(XmlElement),
    /// XMLFOREST.
    XmlForest(XmlForest),
}

impl Expr {
    /// Result type of the expression.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Column(e) => e.data_type,
            Self::Literal(v) => v.data_type(),
            Self::Function(f) => f.return_type,
            Self::Aggregate(a) => a.data_type(),
            Self::Case(c) => c
                .branches
                .first()
                .map_or(DataType::Null, |(_, then)| then.data_type()),
            Self::SearchedCase(c) => c
                .branches
                .first()
                .map_or(DataType::Null, |(_, then)| then.data_type()),
            Self::ScalarSubquery(s) => s.data_type(),
            Self::XmlElement(_) | Self::XmlForest(_) => DataType::Xml,
        }
    }

    /// Whether the value can be computed once, before the query runs.
    ///
    /// Literals are, and so are deterministic functions over such arguments.
    pub fn is_constant_foldable(&self) -> bool {
        match self {
            Self::Literal(_) => true,
            Self::Function(f) => {
                f.descriptor.determinism == super::Determinism::Deterministic
                    && f.args.iter().all(Self::is_constant_foldable)
            }
            _ => false,
        }
    }

    /// Get as a column reference.
    pub fn as_column(&self) -> Option<&ElementSymbol> {
        match self {
            Self::Column(e) => Some(e),
            _ => None,
        }
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Column(e) => write!(f, "{e}"),
            Self::Literal(v) => write!(f, "{v}"),
            Self::Function(func) => write!(f, "{func}"),
            Self::Aggregate(agg) => write!(f, "{agg}"),
            Self::Case(c) => {
                write!(f, "CASE {}", c.operand)?;
                for (when, then) in &c.branches {
                    write!(f, " WHEN {when} THEN {then}")?;
                }
                if let Some(e) = &c.else_expr {
                    write!(f, " ELSE {e}")?;
                }
                write!(f, " END")
            }
            Self::SearchedCase(c) => {
                write!(f, "CASE")?;
                for (when, then) in &c.branches {
                    write!(f, " WHEN {when} THEN {then}")?;
                }
                if let Some(e) = &c.else_expr {
                    write!(f, " ELSE {e}")?;
                }
                write!(f, " END")
            }
            Self::ScalarSubquery(s) => write!(f, "({})", s.command),
            Self::XmlElement(x) => write!(f, "XMLELEMENT(NAME {}, ...)", x.name),
            Self::XmlForest(_) => write!(f, "XMLFOREST(...)"),
        }
    }
}

impl From<ElementSymbol> for Expr {
    fn from(e: ElementSymbol) -> Self {
        Self::Column(e)
    }
}

impl From<Value> for Expr {
    fn from(v: Value) -> Self {
        Self::Literal(v)
    }
}

impl From<Function> for Expr {
    fn from(f: Function) -> Self {
        Self::Function(f)
    }
}

impl From<AggregateSymbol> for Expr {
    fn from(a: AggregateSymbol) -> Self {
        Self::Aggregate(a)
    }
}

#[cfg(test)]
mod tests {
    use fedplan_core::GroupSymbol;

    use super::*;
    use crate::expr::{col, lit, Determinism};

    fn e1() -> ElementSymbol {
        ElementSymbol::new(GroupSymbol::new("pm1.g1"), "e1", DataType::Int32)
    }

    #[test]
    fn test_constant_folding() {
        assert!(lit(1i64).is_constant_foldable());
        assert!(!col(e1()).is_constant_foldable());

        let f = Function::new("abs", vec![lit(-1i64)], DataType::Int64);
        assert!(Expr::from(f.clone()).is_constant_foldable());

        let rand = f.with_determinism(Determinism::NonDeterministic);
        assert!(!Expr::from(rand).is_constant_foldable());

        let on_column = Function::new("abs", vec![col(e1())], DataType::Int64);
        assert!(!Expr::from(on_column).is_constant_foldable());
    }

    #[test]
    fn test_data_type() {
        assert_eq!(col(e1()).data_type(), DataType::Int32);
        assert_eq!(
            Expr::from(AggregateSymbol::count_star()).data_type(),
            DataType::Int64
        );
        let forest = Expr::XmlForest(XmlForest {
            namespaces: None,
            args: vec![],
        });
        assert_eq!(forest.data_type(), DataType::Xml);
    }

    #[test]
    fn test_display() {
        let f = Function::new("concat", vec![col(e1()), lit("x")], DataType::String);
        assert_eq!(Expr::from(f).to_string(), "concat(pm1.g1.e1, 'x')");
    }
}
