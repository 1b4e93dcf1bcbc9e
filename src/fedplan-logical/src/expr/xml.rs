//! XML construction expressions.

use serde::{Deserialize, Serialize};

use super::Expr;

/// XMLNAMESPACES clause: (prefix, uri) pairs. An empty prefix is the default namespace.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct XmlNamespaces {
    /// Declared namespaces.
    pub namespaces: Vec<(String, String)>,
}

/// XMLATTRIBUTES clause.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct XmlAttributes {
    /// Attribute value expressions.
    pub args: Vec<Expr>,
}

/// XMLELEMENT call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XmlElement {
    /// Element name.
    pub name: String,
    /// Optional namespaces.
    pub namespaces: Option<XmlNamespaces>,
    /// Optional attributes.
    pub attributes: Option<XmlAttributes>,
    /// Content expressions.
    pub content: Vec<Expr>,
}

/// XMLFOREST call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XmlForest {
    /// Optional namespaces.
    pub namespaces: Option<XmlNamespaces>,
    /// Forest members.
    pub args: Vec<Expr>,
}
