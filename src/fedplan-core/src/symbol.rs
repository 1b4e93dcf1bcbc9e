//! Resolved symbols: models, groups and elements.

use serde::{Deserialize, Serialize};

use crate::types::DataType;

/// Identifier of a physical or virtual model (a data source binding).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelId(String);

impl ModelId {
    /// Create a model id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A table-like group referenced in a FROM clause.
///
/// When the group is aliased, `name` holds the alias and `definition` the
/// fully qualified name metadata is resolved against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupSymbol {
    /// Name as written in the query (alias when aliased).
    pub name: String,
    /// Fully qualified definition for aliased groups.
    pub definition: Option<String>,
}

impl GroupSymbol {
    /// Create an unaliased group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: None,
        }
    }

    /// Create an aliased group.
    pub fn aliased(alias: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            name: alias.into(),
            definition: Some(definition.into()),
        }
    }

    /// The name metadata lookups use.
    pub fn resolved_name(&self) -> &str {
        self.definition.as_deref().unwrap_or(&self.name)
    }
}

impl std::fmt::Display for GroupSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.definition {
            Some(def) => write!(f, "{def} AS {}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// A group-qualified column reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementSymbol {
    /// Owning group.
    pub group: GroupSymbol,
    /// Short column name.
    pub name: String,
    /// Column type.
    pub data_type: DataType,
}

impl ElementSymbol {
    /// Create an element of `group`.
    pub fn new(group: GroupSymbol, name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            group,
            name: name.into(),
            data_type,
        }
    }

    /// Fully qualified name (`group.column`) against the group definition.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.group.resolved_name(), self.name)
    }
}

impl std::fmt::Display for ElementSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.group.name, self.name)
    }
}
