//! Commands and subqueries.

use fedplan_core::{DataType, ElementSymbol, GroupSymbol};
use serde::{Deserialize, Serialize};

use crate::criteria::Criteria;
use crate::expr::Expr;

/// A SELECT query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Query {
    /// Projected expressions.
    pub select: Vec<Expr>,
    /// FROM groups, in order.
    pub from: Vec<GroupSymbol>,
    /// WHERE criteria.
    pub criteria: Option<Criteria>,
    /// GROUP BY expressions.
    pub group_by: Vec<Expr>,
    /// HAVING criteria.
    pub having: Option<Criteria>,
    /// Whether this is an XML document query.
    pub is_xml: bool,
}

impl Query {
    /// Start a query with a select list.
    pub fn select(select: Vec<Expr>) -> Self {
        Self {
            select,
            ..Self::default()
        }
    }

    /// Add a FROM group.
    pub fn from(mut self, group: GroupSymbol) -> Self {
        self.from.push(group);
        self
    }

    /// Set the WHERE criteria.
    pub fn filter(mut self, criteria: Criteria) -> Self {
        self.criteria = Some(criteria);
        self
    }

    /// Set GROUP BY.
    pub fn group_by(mut self, exprs: Vec<Expr>) -> Self {
        self.group_by = exprs;
        self
    }

    /// Set HAVING.
    pub fn having(mut self, criteria: Criteria) -> Self {
        self.having = Some(criteria);
        self
    }

    /// Mark as an XML document query.
    pub fn xml(mut self) -> Self {
        self.is_xml = true;
        self
    }
}

/// A resolved command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// SELECT query.
    Query(Query),
    /// Anything else (procedures, updates), kept as text.
    Other(String),
}

impl Command {
    /// Get as a query.
    pub fn as_query(&self) -> Option<&Query> {
        match self {
            Self::Query(q) => Some(q),
            Self::Other(_) => None,
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Query(q) => {
                write!(f, "SELECT ")?;
                for (i, e) in q.select.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{e}")?;
                }
                if !q.from.is_empty() {
                    write!(f, " FROM ")?;
                    for (i, g) in q.from.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{g}")?;
                    }
                }
                if let Some(c) = &q.criteria {
                    write!(f, " WHERE {c}")?;
                }
                Ok(())
            }
            Self::Other(text) => f.write_str(text),
        }
    }
}

/// How a subquery was planned, when it has been.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubqueryPlan {
    /// An access node sending `command` to one source.
    Access {
        /// Command the access node runs.
        command: Option<Box<Command>>,
        /// Whether the access node has a child.
        has_child: bool,
    },
    /// A relational plan with local processing.
    Relational,
    /// Any other processor plan.
    NonRelational,
}

/// A subquery with its correlation and planning state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subquery {
    /// The subquery command.
    pub command: Box<Command>,
    /// Outer elements referenced inside, with the expressions bound to them.
    pub correlated_references: Vec<(ElementSymbol, Expr)>,
    /// Realized plan.
    pub plan: Option<SubqueryPlan>,
}

impl Subquery {
    /// Create an uncorrelated, unplanned subquery.
    pub fn new(command: Command) -> Self {
        Self {
            command: Box::new(command),
            correlated_references: Vec::new(),
            plan: None,
        }
    }

    /// Add a correlated reference.
    pub fn with_correlated_reference(mut self, element: ElementSymbol, expr: Expr) -> Self {
        self.correlated_references.push((element, expr));
        self
    }

    /// Attach the realized plan.
    pub fn with_plan(mut self, plan: SubqueryPlan) -> Self {
        self.plan = Some(plan);
        self
    }

    /// Attach a bare access plan running this subquery's own command.
    pub fn planned_as_access(self) -> Self {
        let command = self.command.clone();
        self.with_plan(SubqueryPlan::Access {
            command: Some(command),
            has_child: false,
        })
    }

    /// Whether the subquery references outer columns.
    pub fn is_correlated(&self) -> bool {
        !self.correlated_references.is_empty()
    }

    /// The query an unadorned access plan sends, if the plan has that shape.
    ///
    /// Such a plan is an access node without children running a non-XML
    /// query with at least one FROM group.
    pub fn access_query(&self) -> Option<&Query> {
        let Some(SubqueryPlan::Access {
            command: Some(command),
            has_child: false,
        }) = &self.plan
        else {
            return None;
        };
        match command.as_ref() {
            Command::Query(q) if !q.is_xml && !q.from.is_empty() => Some(q),
            _ => None,
        }
    }

    /// Type of the first projected column.
    pub fn data_type(&self) -> DataType {
        self.command
            .as_query()
            .and_then(|q| q.select.first())
            .map_or(DataType::Null, Expr::data_type)
    }
}
