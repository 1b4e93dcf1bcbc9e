//! Metadata contract consumed by the planner.

use common_error::FedplanResult;
use serde::{Deserialize, Serialize};

use crate::symbol::{ElementSymbol, GroupSymbol, ModelId};

/// How an element may be used in pushed-down predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Searchability {
    /// Cannot appear in any predicate.
    Unsearchable,
    /// Only LIKE predicates.
    LikeOnly,
    /// Every predicate except LIKE.
    AllExceptLike,
    /// Every predicate.
    #[default]
    Searchable,
}

impl Searchability {
    /// Usable in comparison, IN and set predicates.
    pub const fn supports_compare(self) -> bool {
        matches!(self, Self::Searchable | Self::AllExceptLike)
    }

    /// Usable in LIKE predicates.
    pub const fn supports_like(self) -> bool {
        matches!(self, Self::Searchable | Self::LikeOnly)
    }
}

/// Resolved metadata the optimizer consults.
///
/// Implementations return `FedplanError::MetadataError` when an object
/// cannot be resolved.
pub trait QueryMetadata: Send + Sync {
    /// Model a group belongs to.
    fn model_id(&self, group: &GroupSymbol) -> FedplanResult<ModelId>;

    /// Name of the model, used for capability lookup.
    fn full_name(&self, model: &ModelId) -> FedplanResult<String>;

    /// Whether the model is virtual (a view layer with no connector).
    fn is_virtual_model(&self, model: &ModelId) -> FedplanResult<bool>;

    /// Searchability of an element.
    fn element_searchability(&self, element: &ElementSymbol) -> FedplanResult<Searchability>;
}
