//! Pre-order traversal over language objects.
//!
//! Traversal never enters subquery commands: a subquery is a separate
//! pushdown question. For dependent-set criteria only the dependent-side
//! expression is visited.

use std::ops::ControlFlow;

use fedplan_core::ElementSymbol;

use crate::command::Command;
use crate::criteria::Criteria;
use crate::expr::{Expr, XmlAttributes, XmlNamespaces};

/// A borrowed node of the language tree.
#[derive(Debug, Clone, Copy)]
pub enum LanguageObject<'a> {
    /// Expression.
    Expr(&'a Expr),
    /// Criteria.
    Criteria(&'a Criteria),
    /// Command.
    Command(&'a Command),
    /// XMLNAMESPACES clause.
    XmlNamespaces(&'a XmlNamespaces),
    /// XMLATTRIBUTES clause.
    XmlAttributes(&'a XmlAttributes),
}

impl<'a> From<&'a Expr> for LanguageObject<'a> {
    fn from(e: &'a Expr) -> Self {
        Self::Expr(e)
    }
}

impl<'a> From<&'a Criteria> for LanguageObject<'a> {
    fn from(c: &'a Criteria) -> Self {
        Self::Criteria(c)
    }
}

impl<'a> From<&'a Command> for LanguageObject<'a> {
    fn from(c: &'a Command) -> Self {
        Self::Command(c)
    }
}

impl<'a> LanguageObject<'a> {
    /// Direct children in evaluation order.
    pub fn children(self) -> Vec<LanguageObject<'a>> {
        let mut out = Vec::new();
        match self {
            Self::Expr(expr) => match expr {
                Expr::Column(_) | Expr::Literal(_) | Expr::ScalarSubquery(_) => {}
                Expr::Function(f) => out.extend(f.args.iter().map(Self::Expr)),
                Expr::Aggregate(a) => out.extend(a.arg.as_deref().map(Self::Expr)),
                Expr::Case(c) => {
                    out.push(Self::Expr(&c.operand));
                    for (when, then) in &c.branches {
                        out.push(Self::Expr(when));
                        out.push(Self::Expr(then));
                    }
                    out.extend(c.else_expr.as_deref().map(Self::Expr));
                }
                Expr::SearchedCase(c) => {
                    for (when, then) in &c.branches {
                        out.push(Self::Criteria(when));
                        out.push(Self::Expr(then));
                    }
                    out.extend(c.else_expr.as_deref().map(Self::Expr));
                }
                Expr::XmlElement(x) => {
                    out.extend(x.namespaces.as_ref().map(Self::XmlNamespaces));
                    out.extend(x.attributes.as_ref().map(Self::XmlAttributes));
                    out.extend(x.content.iter().map(Self::Expr));
                }
                Expr::XmlForest(x) => {
                    out.extend(x.namespaces.as_ref().map(Self::XmlNamespaces));
                    out.extend(x.args.iter().map(Self::Expr));
                }
            },
            Self::Criteria(crit) => match crit {
                Criteria::Compare(c) => {
                    out.push(Self::Expr(&c.left));
                    out.push(Self::Expr(&c.right));
                }
                Criteria::Compound { criteria, .. } => {
                    out.extend(criteria.iter().map(Self::Criteria));
                }
                Criteria::Not(c) => out.push(Self::Criteria(c)),
                Criteria::IsNull { expr, .. } => out.push(Self::Expr(expr)),
                Criteria::Match(m) => {
                    out.push(Self::Expr(&m.left));
                    out.push(Self::Expr(&m.right));
                }
                Criteria::Set(s) => {
                    out.push(Self::Expr(&s.expr));
                    out.extend(s.values.iter().map(Self::Expr));
                }
                Criteria::DependentSet(d) => out.push(Self::Expr(&d.expr)),
                Criteria::SubquerySet(s) => out.push(Self::Expr(&s.expr)),
                Criteria::Exists(_) => {}
                Criteria::SubqueryCompare(s) => out.push(Self::Expr(&s.left)),
            },
            Self::Command(cmd) => {
                if let Command::Query(q) = cmd {
                    out.extend(q.select.iter().map(Self::Expr));
                    out.extend(q.criteria.as_ref().map(Self::Criteria));
                    out.extend(q.group_by.iter().map(Self::Expr));
                    out.extend(q.having.as_ref().map(Self::Criteria));
                }
            }
            Self::XmlNamespaces(_) => {}
            Self::XmlAttributes(a) => out.extend(a.args.iter().map(Self::Expr)),
        }
        out
    }
}

/// Visit `root` and its descendants in pre-order until `visit` breaks.
pub fn walk<'a, B>(
    root: LanguageObject<'a>,
    visit: &mut impl FnMut(LanguageObject<'a>) -> ControlFlow<B>,
) -> ControlFlow<B> {
    visit(root)?;
    for child in root.children() {
        walk(child, visit)?;
    }
    ControlFlow::Continue(())
}

/// Column references under `root`, in pre-order.
pub fn collect_elements(root: LanguageObject<'_>) -> Vec<ElementSymbol> {
    let mut elements = Vec::new();
    let _ = walk::<()>(root, &mut |obj| {
        if let LanguageObject::Expr(Expr::Column(e)) = obj {
            elements.push(e.clone());
        }
        ControlFlow::Continue(())
    });
    elements
}
