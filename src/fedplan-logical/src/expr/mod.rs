//! Expression language objects.

mod agg;
mod expression;
mod func;
mod xml;

pub use agg::{AggregateFunction, AggregateSymbol};
pub use expression::{CaseExpr, Expr, SearchedCaseExpr};
pub use func::{builtin, Determinism, Function, FunctionDescriptor, PushdownMode};
pub use xml::{XmlAttributes, XmlElement, XmlForest, XmlNamespaces};

use fedplan_core::{ElementSymbol, Value};

/// Column reference expression.
pub fn col(element: ElementSymbol) -> Expr {
    Expr::Column(element)
}

/// Literal expression.
pub fn lit(value: impl Into<Value>) -> Expr {
    Expr::Literal(value.into())
}
