//! Pushdown-relevant source features.

use serde::{Deserialize, Serialize};

/// A feature a source may declare support for, or a property key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Capability {
    /// `=` and `<>` comparisons.
    CriteriaCompareEq,
    /// `<`, `>`, `<=`, `>=` comparisons.
    CriteriaCompareOrdered,
    /// NOT, also required by negated predicate forms.
    CriteriaNot,
    /// OR.
    CriteriaOr,
    /// IS NULL.
    CriteriaIsNull,
    /// LIKE.
    CriteriaLike,
    /// LIKE with an explicit ESCAPE character.
    CriteriaLikeEscape,
    /// IN with a value list.
    CriteriaIn,
    /// IN with a subquery.
    CriteriaInSubquery,
    /// EXISTS.
    CriteriaExists,
    /// Quantified comparison with ALL.
    CriteriaQuantifiedAll,
    /// Quantified comparison with SOME or ANY.
    CriteriaQuantifiedSome,
    /// Aggregate functions in general.
    QueryAggregates,
    /// COUNT(expr).
    QueryAggregatesCount,
    /// COUNT(*).
    QueryAggregatesCountStar,
    /// SUM.
    QueryAggregatesSum,
    /// AVG.
    QueryAggregatesAvg,
    /// MIN.
    QueryAggregatesMin,
    /// MAX.
    QueryAggregatesMax,
    /// DISTINCT inside aggregates.
    QueryAggregatesDistinct,
    /// GROUP BY.
    QueryGroupBy,
    /// HAVING.
    QueryHaving,
    /// CASE with an operand.
    QueryCase,
    /// Searched CASE.
    QuerySearchedCase,
    /// Scalar subqueries.
    QuerySubqueriesScalar,
    /// Correlated subqueries.
    QuerySubqueriesCorrelated,
    /// Property: largest IN list the source accepts.
    MaxInCriteriaSize,
    /// Property: identity of the connector behind the source.
    ConnectorId,
}

impl Capability {
    /// Every capability, in declaration order.
    pub const ALL: [Self; 28] = [
        Self::CriteriaCompareEq,
        Self::CriteriaCompareOrdered,
        Self::CriteriaNot,
        Self::CriteriaOr,
        Self::CriteriaIsNull,
        Self::CriteriaLike,
        Self::CriteriaLikeEscape,
        Self::CriteriaIn,
        Self::CriteriaInSubquery,
        Self::CriteriaExists,
        Self::CriteriaQuantifiedAll,
        Self::CriteriaQuantifiedSome,
        Self::QueryAggregates,
        Self::QueryAggregatesCount,
        Self::QueryAggregatesCountStar,
        Self::QueryAggregatesSum,
        Self::QueryAggregatesAvg,
        Self::QueryAggregatesMin,
        Self::QueryAggregatesMax,
        Self::QueryAggregatesDistinct,
        Self::QueryGroupBy,
        Self::QueryHaving,
        Self::QueryCase,
        Self::QuerySearchedCase,
        Self::QuerySubqueriesScalar,
        Self::QuerySubqueriesCorrelated,
        Self::MaxInCriteriaSize,
        Self::ConnectorId,
    ];

    /// Upper-case name used in explain output.
    pub const fn name(self) -> &'static str {
        match self {
            Self::CriteriaCompareEq => "CRITERIA_COMPARE_EQ",
            Self::CriteriaCompareOrdered => "CRITERIA_COMPARE_ORDERED",
            Self::CriteriaNot => "CRITERIA_NOT",
            Self::CriteriaOr => "CRITERIA_OR",
            Self::CriteriaIsNull => "CRITERIA_ISNULL",
            Self::CriteriaLike => "CRITERIA_LIKE",
            Self::CriteriaLikeEscape => "CRITERIA_LIKE_ESCAPE",
            Self::CriteriaIn => "CRITERIA_IN",
            Self::CriteriaInSubquery => "CRITERIA_IN_SUBQUERY",
            Self::CriteriaExists => "CRITERIA_EXISTS",
            Self::CriteriaQuantifiedAll => "CRITERIA_QUANTIFIED_ALL",
            Self::CriteriaQuantifiedSome => "CRITERIA_QUANTIFIED_SOME",
            Self::QueryAggregates => "QUERY_AGGREGATES",
            Self::QueryAggregatesCount => "QUERY_AGGREGATES_COUNT",
            Self::QueryAggregatesCountStar => "QUERY_AGGREGATES_COUNT_STAR",
            Self::QueryAggregatesSum => "QUERY_AGGREGATES_SUM",
            Self::QueryAggregatesAvg => "QUERY_AGGREGATES_AVG",
            Self::QueryAggregatesMin => "QUERY_AGGREGATES_MIN",
            Self::QueryAggregatesMax => "QUERY_AGGREGATES_MAX",
            Self::QueryAggregatesDistinct => "QUERY_AGGREGATES_DISTINCT",
            Self::QueryGroupBy => "QUERY_GROUP_BY",
            Self::QueryHaving => "QUERY_HAVING",
            Self::QueryCase => "QUERY_CASE",
            Self::QuerySearchedCase => "QUERY_SEARCHED_CASE",
            Self::QuerySubqueriesScalar => "QUERY_SUBQUERIES_SCALAR",
            Self::QuerySubqueriesCorrelated => "QUERY_SUBQUERIES_CORRELATED",
            Self::MaxInCriteriaSize => "MAX_IN_CRITERIA_SIZE",
            Self::ConnectorId => "CONNECTOR_ID",
        }
    }

    /// Whether this key carries a property value rather than a flag.
    pub const fn is_property(self) -> bool {
        matches!(self, Self::MaxInCriteriaSize | Self::ConnectorId)
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
