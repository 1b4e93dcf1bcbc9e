//! Plan node kinds and their typed payloads.

use fedplan_core::{ElementSymbol, GroupSymbol, ModelId};
use serde::{Deserialize, Serialize};

use crate::criteria::Criteria;
use crate::expr::Expr;

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinType {
    /// INNER JOIN
    Inner,
    /// LEFT OUTER JOIN
    LeftOuter,
    /// RIGHT OUTER JOIN
    RightOuter,
    /// FULL OUTER JOIN
    FullOuter,
    /// CROSS JOIN
    Cross,
}

impl JoinType {
    /// LEFT, RIGHT and FULL outer joins.
    pub const fn is_outer(&self) -> bool {
        matches!(self, Self::LeftOuter | Self::RightOuter | Self::FullOuter)
    }

    /// The join type after swapping the two inputs.
    pub const fn reverse(&self) -> Self {
        match self {
            Self::LeftOuter => Self::RightOuter,
            Self::RightOuter => Self::LeftOuter,
            other => *other,
        }
    }

    /// SQL name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::LeftOuter => "LEFT OUTER JOIN",
            Self::RightOuter => "RIGHT OUTER JOIN",
            Self::FullOuter => "FULL OUTER JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

/// Physical join algorithm chosen so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JoinStrategy {
    /// Nested loop.
    #[default]
    NestedLoop,
    /// Sort merge.
    Merge,
    /// Partitioned sort merge.
    PartitionedSort,
    /// Nested table (lateral).
    NestedTable,
}

/// JOIN payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinNode {
    /// Join type.
    pub join_type: JoinType,
    /// Join strategy.
    pub strategy: JoinStrategy,
    /// Join criteria.
    pub join_criteria: Vec<Criteria>,
    /// Left side of each equality criteria, paired by position with `right_expressions`.
    pub left_expressions: Vec<Expr>,
    /// Right side of each equality criteria.
    pub right_expressions: Vec<Expr>,
    /// Id of the value source feeding the dependent side, once converted.
    pub dependent_value_source: Option<String>,
    /// Estimated cost as a dependent join.
    pub est_dep_join_cost: Option<f64>,
    /// Estimated cost as an ordinary join.
    pub est_join_cost: Option<f64>,
}

impl JoinNode {
    /// Create a join without criteria.
    pub fn new(join_type: JoinType) -> Self {
        Self {
            join_type,
            strategy: JoinStrategy::default(),
            join_criteria: Vec::new(),
            left_expressions: Vec::new(),
            right_expressions: Vec::new(),
            dependent_value_source: None,
            est_dep_join_cost: None,
            est_join_cost: None,
        }
    }

    /// Add an equality criteria `left = right`, recording both sides.
    pub fn with_equality(mut self, left: Expr, right: Expr) -> Self {
        self.join_criteria
            .push(Criteria::eq(left.clone(), right.clone()));
        self.left_expressions.push(left);
        self.right_expressions.push(right);
        self
    }

    /// Add a non-equality join criteria.
    pub fn with_criteria(mut self, criteria: Criteria) -> Self {
        self.join_criteria.push(criteria);
        self
    }

    /// Set the strategy.
    pub fn with_strategy(mut self, strategy: JoinStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Elements that must all be constrained before a source can be queried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPattern {
    /// Required elements.
    pub elements: Vec<ElementSymbol>,
}

impl AccessPattern {
    /// Create an access pattern.
    pub fn new(elements: Vec<ElementSymbol>) -> Self {
        Self { elements }
    }

    /// Whether every required element appears in `referenced`.
    pub fn is_satisfied_by(&self, referenced: &[ElementSymbol]) -> bool {
        self.elements.iter().all(|e| referenced.contains(e))
    }
}

/// ACCESS payload: one command sent to one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessNode {
    /// Group read by the access.
    pub group: GroupSymbol,
    /// Model of the source, once resolved.
    pub model_id: Option<ModelId>,
    /// Access patterns not yet satisfied.
    pub access_patterns: Vec<AccessPattern>,
    /// MAKEDEP hint.
    pub make_dependent: bool,
    /// MAKENOTDEP hint.
    pub make_not_dependent: bool,
    /// Estimated row count.
    pub est_cardinality: Option<f64>,
    /// Criteria already delegated to the source.
    pub pushed_criteria: Vec<Criteria>,
}

impl AccessNode {
    /// Create an access node for `group`.
    pub fn new(group: GroupSymbol) -> Self {
        Self {
            group,
            model_id: None,
            access_patterns: Vec::new(),
            make_dependent: false,
            make_not_dependent: false,
            est_cardinality: None,
            pushed_criteria: Vec::new(),
        }
    }

    /// Set the model.
    pub fn with_model(mut self, model_id: ModelId) -> Self {
        self.model_id = Some(model_id);
        self
    }

    /// Set the cardinality estimate.
    pub fn with_cardinality(mut self, cardinality: f64) -> Self {
        self.est_cardinality = Some(cardinality);
        self
    }

    /// Add an access pattern.
    pub fn with_access_pattern(mut self, pattern: AccessPattern) -> Self {
        self.access_patterns.push(pattern);
        self
    }

    /// Set the MAKEDEP hint.
    pub fn make_dependent(mut self) -> Self {
        self.make_dependent = true;
        self
    }

    /// Set the MAKENOTDEP hint.
    pub fn make_not_dependent(mut self) -> Self {
        self.make_not_dependent = true;
        self
    }

    /// Whether unsatisfied access patterns remain.
    pub fn has_unsatisfied_access_patterns(&self) -> bool {
        !self.access_patterns.is_empty()
    }
}

/// SELECT payload: a local filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectNode {
    /// Filter criteria.
    pub criteria: Criteria,
    /// Whether this filter was created for a dependent join.
    pub is_dependent_set: bool,
}

impl SelectNode {
    /// Create an ordinary filter.
    pub fn new(criteria: Criteria) -> Self {
        Self {
            criteria,
            is_dependent_set: false,
        }
    }
}

/// Set operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetOpType {
    /// UNION
    Union,
    /// INTERSECT
    Intersect,
    /// EXCEPT
    Except,
}

/// Plan node kind with its payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Join of exactly two children.
    Join(JoinNode),
    /// Source access.
    Access(AccessNode),
    /// Filter.
    Select(SelectNode),
    /// Projection.
    Project {
        /// Output expressions.
        select: Vec<Expr>,
    },
    /// Sort.
    Sort {
        /// Sort keys.
        keys: Vec<Expr>,
    },
    /// Grouping.
    Group {
        /// Grouping expressions.
        group_by: Vec<Expr>,
    },
    /// Set operation.
    SetOp {
        /// Operation.
        op: SetOpType,
        /// ALL variant.
        all: bool,
    },
    /// Duplicate removal.
    DupRemove,
    /// Source of a nested plan or virtual group.
    Source {
        /// Group produced.
        group: GroupSymbol,
    },
    /// Produces no rows.
    Null,
}

/// Node kind without payload, used for searching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// JOIN
    Join,
    /// ACCESS
    Access,
    /// SELECT
    Select,
    /// PROJECT
    Project,
    /// SORT
    Sort,
    /// GROUP
    Group,
    /// SET-OP
    SetOp,
    /// DUP-REMOVE
    DupRemove,
    /// SOURCE
    Source,
    /// NULL
    Null,
}

impl NodeType {
    /// Display name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Join => "Join",
            Self::Access => "Access",
            Self::Select => "Select",
            Self::Project => "Project",
            Self::Sort => "Sort",
            Self::Group => "Group",
            Self::SetOp => "SetOp",
            Self::DupRemove => "DupRemove",
            Self::Source => "Source",
            Self::Null => "Null",
        }
    }

    /// Number of children a well-formed node of this type has, when fixed.
    pub const fn arity(&self) -> Option<usize> {
        match self {
            Self::Join => Some(2),
            Self::Select | Self::Project | Self::Sort | Self::Group | Self::DupRemove => Some(1),
            Self::Null => Some(0),
            Self::Access | Self::Source | Self::SetOp => None,
        }
    }
}

impl NodeKind {
    /// The payload-free type.
    pub const fn node_type(&self) -> NodeType {
        match self {
            Self::Join(_) => NodeType::Join,
            Self::Access(_) => NodeType::Access,
            Self::Select(_) => NodeType::Select,
            Self::Project { .. } => NodeType::Project,
            Self::Sort { .. } => NodeType::Sort,
            Self::Group { .. } => NodeType::Group,
            Self::SetOp { .. } => NodeType::SetOp,
            Self::DupRemove => NodeType::DupRemove,
            Self::Source { .. } => NodeType::Source,
            Self::Null => NodeType::Null,
        }
    }

    /// One-line description for explain output.
    pub fn details(&self) -> Option<String> {
        match self {
            Self::Join(j) => {
                let mut parts = vec![j.join_type.name().to_string()];
                if !j.join_criteria.is_empty() {
                    let crit: Vec<_> = j.join_criteria.iter().map(ToString::to_string).collect();
                    parts.push(crit.join(" AND "));
                }
                if let Some(id) = &j.dependent_value_source {
                    parts.push(format!("dependent {id}"));
                }
                Some(parts.join(", "))
            }
            Self::Access(a) => {
                let mut parts = vec![a.group.to_string()];
                if let Some(model) = &a.model_id {
                    parts.push(format!("model={model}"));
                }
                if a.make_dependent {
                    parts.push("MAKEDEP".to_string());
                }
                if a.make_not_dependent {
                    parts.push("MAKENOTDEP".to_string());
                }
                if !a.pushed_criteria.is_empty() {
                    let crit: Vec<_> = a.pushed_criteria.iter().map(ToString::to_string).collect();
                    parts.push(format!("WHERE {}", crit.join(" AND ")));
                }
                Some(parts.join(", "))
            }
            Self::Select(s) => Some(if s.is_dependent_set {
                format!("{} [dependent]", s.criteria)
            } else {
                s.criteria.to_string()
            }),
            Self::Project { select } => {
                let cols: Vec<_> = select.iter().map(ToString::to_string).collect();
                Some(cols.join(", "))
            }
            Self::Source { group } => Some(group.to_string()),
            Self::SetOp { op, all } => Some(format!("{op:?}{}", if *all { " ALL" } else { "" })),
            Self::Sort { .. } | Self::Group { .. } | Self::DupRemove | Self::Null => None,
        }
    }
}
