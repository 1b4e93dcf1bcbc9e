//! Testing utilities and helpers for fedplan-core.
//!
//! `MetadataFixture` is an in-memory `QueryMetadata` used by the planner
//! tests to describe models, groups and element searchability.

use std::collections::{HashMap, HashSet};

use common_error::{metadata_err, FedplanError, FedplanResult};

use crate::metadata::{QueryMetadata, Searchability};
use crate::symbol::{ElementSymbol, GroupSymbol, ModelId};
use crate::types::DataType;

/// In-memory metadata.
#[derive(Debug, Clone, Default)]
pub struct MetadataFixture {
    /// Model id to virtual flag.
    models: HashMap<ModelId, bool>,
    /// Group definition to model.
    groups: HashMap<String, ModelId>,
    /// Element full name to searchability. Absent elements are searchable.
    searchability: HashMap<String, Searchability>,
    /// Element full names whose lookup fails.
    broken_elements: HashSet<String>,
}

impl MetadataFixture {
    /// Create an empty fixture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Two physical models `pm1` and `pm2` with groups `pm1.g1`, `pm1.g2`,
    /// `pm2.g1` and `pm2.g2`, plus a virtual model `vm1` with group `vm1.g1`.
    pub fn two_sources() -> Self {
        let mut fixture = Self::new();
        fixture.add_model("pm1", false);
        fixture.add_model("pm2", false);
        fixture.add_model("vm1", true);
        fixture.add_group("pm1.g1", "pm1");
        fixture.add_group("pm1.g2", "pm1");
        fixture.add_group("pm2.g1", "pm2");
        fixture.add_group("pm2.g2", "pm2");
        fixture.add_group("vm1.g1", "vm1");
        fixture
    }

    /// Register a model.
    pub fn add_model(&mut self, name: &str, is_virtual: bool) -> ModelId {
        let id = ModelId::new(name);
        self.models.insert(id.clone(), is_virtual);
        id
    }

    /// Register a group under an existing model.
    pub fn add_group(&mut self, group_name: &str, model_name: &str) -> GroupSymbol {
        self.groups
            .insert(group_name.to_string(), ModelId::new(model_name));
        GroupSymbol::new(group_name)
    }

    /// Build an element of a registered group.
    pub fn element(&self, group_name: &str, name: &str, data_type: DataType) -> ElementSymbol {
        ElementSymbol::new(GroupSymbol::new(group_name), name, data_type)
    }

    /// Override the searchability of an element.
    pub fn set_searchability(&mut self, element: &ElementSymbol, searchability: Searchability) {
        self.searchability
            .insert(element.full_name(), searchability);
    }

    /// Make lookups for an element fail with a metadata error.
    pub fn break_element(&mut self, element: &ElementSymbol) {
        self.broken_elements.insert(element.full_name());
    }
}

impl QueryMetadata for MetadataFixture {
    fn model_id(&self, group: &GroupSymbol) -> FedplanResult<ModelId> {
        self.groups
            .get(group.resolved_name())
            .cloned()
            .ok_or_else(|| {
                FedplanError::metadata(format!("group '{}' has no model", group.resolved_name()))
            })
    }

    fn full_name(&self, model: &ModelId) -> FedplanResult<String> {
        if self.models.contains_key(model) {
            Ok(model.as_str().to_string())
        } else {
            Err(FedplanError::metadata(format!("unknown model '{model}'")))
        }
    }

    fn is_virtual_model(&self, model: &ModelId) -> FedplanResult<bool> {
        self.models
            .get(model)
            .copied()
            .ok_or_else(|| FedplanError::metadata(format!("unknown model '{model}'")))
    }

    fn element_searchability(&self, element: &ElementSymbol) -> FedplanResult<Searchability> {
        let full_name = element.full_name();
        if self.broken_elements.contains(&full_name) {
            metadata_err!("searchability of '{full_name}' is unavailable");
        }
        if !self.groups.contains_key(element.group.resolved_name()) {
            metadata_err!("element '{full_name}' belongs to an unknown group");
        }
        Ok(self
            .searchability
            .get(&full_name)
            .copied()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_sources_fixture() {
        let md = MetadataFixture::two_sources();

        let model = md.model_id(&GroupSymbol::new("pm2.g1")).unwrap();
        assert_eq!(model, ModelId::new("pm2"));
        assert!(!md.is_virtual_model(&model).unwrap());
        assert!(md.is_virtual_model(&ModelId::new("vm1")).unwrap());
        assert_eq!(md.full_name(&model).unwrap(), "pm2");
    }

    #[test]
    fn test_aliased_group_uses_definition() {
        let md = MetadataFixture::two_sources();
        let model = md.model_id(&GroupSymbol::aliased("x", "pm1.g2")).unwrap();
        assert_eq!(model, ModelId::new("pm1"));
    }

    #[test]
    fn test_unknown_objects_are_metadata_errors() {
        let md = MetadataFixture::two_sources();

        let err = md.model_id(&GroupSymbol::new("pm9.g1")).unwrap_err();
        assert!(matches!(err, FedplanError::MetadataError(_)));

        let err = md.is_virtual_model(&ModelId::new("pm9")).unwrap_err();
        assert!(matches!(err, FedplanError::MetadataError(_)));
    }

    #[test]
    fn test_searchability_overrides() {
        let mut md = MetadataFixture::two_sources();
        let e1 = md.element("pm1.g1", "e1", DataType::String);
        let e2 = md.element("pm1.g1", "e2", DataType::String);

        md.set_searchability(&e1, Searchability::LikeOnly);
        md.break_element(&e2);

        assert_eq!(md.element_searchability(&e1).unwrap(), Searchability::LikeOnly);
        assert!(md.element_searchability(&e2).is_err());
        assert_eq!(
            md.element_searchability(&md.element("pm1.g1", "e3", DataType::Int64))
                .unwrap(),
            Searchability::Searchable
        );
    }
}
