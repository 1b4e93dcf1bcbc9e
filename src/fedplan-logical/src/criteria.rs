//! Criteria (boolean predicates).

use fedplan_core::ElementSymbol;
use serde::{Deserialize, Serialize};

use crate::command::Subquery;
use crate::expr::Expr;
use crate::language::{self, LanguageObject};

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `<>`
    Ne,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
}

impl CompareOp {
    /// SQL symbol.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
        }
    }
}

/// Logical connective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompoundOp {
    /// AND
    And,
    /// OR
    Or,
}

/// Quantifier of a subquery comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quantifier {
    /// ALL
    All,
    /// SOME
    Some,
    /// ANY
    Any,
}

/// `left op right`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareCriteria {
    /// Left operand.
    pub left: Expr,
    /// Operator.
    pub op: CompareOp,
    /// Right operand.
    pub right: Expr,
}

/// `left [NOT] LIKE right [ESCAPE c]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCriteria {
    /// Matched expression.
    pub left: Expr,
    /// Pattern.
    pub right: Expr,
    /// Explicit escape character. `None` uses the default escape.
    pub escape: Option<char>,
    /// NOT LIKE.
    pub negated: bool,
}

/// `expr [NOT] IN (values)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetCriteria {
    /// Tested expression.
    pub expr: Expr,
    /// Value list.
    pub values: Vec<Expr>,
    /// NOT IN.
    pub negated: bool,
}

/// IN criteria whose values come from the independent side of a dependent join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependentSetCriteria {
    /// Dependent-side expression.
    pub expr: Expr,
    /// Id of the value source the join feeds.
    pub value_source_id: String,
    /// Independent-side expression providing the values.
    pub value_expr: Expr,
}

/// `expr [NOT] IN (subquery)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubquerySetCriteria {
    /// Tested expression.
    pub expr: Expr,
    /// Subquery.
    pub subquery: Subquery,
    /// NOT IN.
    pub negated: bool,
}

/// `[NOT] EXISTS (subquery)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistsCriteria {
    /// Subquery.
    pub subquery: Subquery,
    /// NOT EXISTS.
    pub negated: bool,
}

/// `left op ALL|SOME|ANY (subquery)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubqueryCompareCriteria {
    /// Left operand.
    pub left: Expr,
    /// Operator.
    pub op: CompareOp,
    /// Quantifier.
    pub quantifier: Quantifier,
    /// Subquery.
    pub subquery: Subquery,
}

/// A boolean predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Criteria {
    /// Comparison.
    Compare(CompareCriteria),
    /// AND / OR over several criteria.
    Compound {
        /// Connective.
        op: CompoundOp,
        /// Operands.
        criteria: Vec<Criteria>,
    },
    /// NOT.
    Not(Box<Criteria>),
    /// `expr IS [NOT] NULL`
    IsNull {
        /// Tested expression.
        expr: Expr,
        /// IS NOT NULL.
        negated: bool,
    },
    /// LIKE.
    Match(MatchCriteria),
    /// IN list.
    Set(SetCriteria),
    /// Dependent join values.
    DependentSet(DependentSetCriteria),
    /// IN subquery.
    SubquerySet(SubquerySetCriteria),
    /// EXISTS.
    Exists(ExistsCriteria),
    /// Quantified comparison.
    SubqueryCompare(SubqueryCompareCriteria),
}

impl Criteria {
    /// Build a comparison.
    pub fn compare(left: Expr, op: CompareOp, right: Expr) -> Self {
        Self::Compare(CompareCriteria { left, op, right })
    }

    /// Build `left = right`.
    pub fn eq(left: Expr, right: Expr) -> Self {
        Self::compare(left, CompareOp::Eq, right)
    }

    /// Build a conjunction.
    pub fn and(criteria: Vec<Criteria>) -> Self {
        Self::Compound {
            op: CompoundOp::And,
            criteria,
        }
    }

    /// Build a disjunction.
    pub fn or(criteria: Vec<Criteria>) -> Self {
        Self::Compound {
            op: CompoundOp::Or,
            criteria,
        }
    }

    /// Build a negation.
    #[allow(clippy::should_implement_trait)]
    pub fn not(criteria: Criteria) -> Self {
        Self::Not(Box::new(criteria))
    }

    /// Build a LIKE predicate.
    pub fn like(left: Expr, pattern: Expr, escape: Option<char>, negated: bool) -> Self {
        Self::Match(MatchCriteria {
            left,
            right: pattern,
            escape,
            negated,
        })
    }

    /// Build an IN list predicate.
    pub fn in_list(expr: Expr, values: Vec<Expr>, negated: bool) -> Self {
        Self::Set(SetCriteria {
            expr,
            values,
            negated,
        })
    }

    /// Elements referenced by this criteria, in pre-order, not looking into subqueries.
    pub fn elements(&self) -> Vec<ElementSymbol> {
        language::collect_elements(LanguageObject::Criteria(self))
    }

    /// Split top-level AND conjuncts.
    pub fn conjuncts(&self) -> Vec<&Criteria> {
        match self {
            Self::Compound {
                op: CompoundOp::And,
                criteria,
            } => criteria.iter().flat_map(Self::conjuncts).collect(),
            other => vec![other],
        }
    }
}

fn fmt_list(f: &mut std::fmt::Formatter<'_>, values: &[Expr]) -> std::fmt::Result {
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{v}")?;
    }
    Ok(())
}

impl std::fmt::Display for Criteria {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let not = |negated: bool| if negated { "NOT " } else { "" };
        match self {
            Self::Compare(c) => write!(f, "{} {} {}", c.left, c.op.symbol(), c.right),
            Self::Compound { op, criteria } => {
                let sep = match op {
                    CompoundOp::And => " AND ",
                    CompoundOp::Or => " OR ",
                };
                write!(f, "(")?;
                for (i, c) in criteria.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{sep}")?;
                    }
                    write!(f, "{c}")?;
                }
                write!(f, ")")
            }
            Self::Not(c) => write!(f, "NOT ({c})"),
            Self::IsNull { expr, negated } => write!(f, "{expr} IS {}NULL", not(*negated)),
            Self::Match(m) => {
                write!(f, "{} {}LIKE {}", m.left, not(m.negated), m.right)?;
                if let Some(c) = m.escape {
                    write!(f, " ESCAPE '{c}'")?;
                }
                Ok(())
            }
            Self::Set(s) => {
                write!(f, "{} {}IN (", s.expr, not(s.negated))?;
                fmt_list(f, &s.values)?;
                write!(f, ")")
            }
            Self::DependentSet(d) => {
                write!(f, "{} IN <{}:{}>", d.expr, d.value_source_id, d.value_expr)
            }
            Self::SubquerySet(s) => {
                write!(f, "{} {}IN ({})", s.expr, not(s.negated), s.subquery.command)
            }
            Self::Exists(e) => write!(f, "{}EXISTS ({})", not(e.negated), e.subquery.command),
            Self::SubqueryCompare(s) => {
                let q = match s.quantifier {
                    Quantifier::All => "ALL",
                    Quantifier::Some => "SOME",
                    Quantifier::Any => "ANY",
                };
                write!(f, "{} {} {q} ({})", s.left, s.op.symbol(), s.subquery.command)
            }
        }
    }
}
