//! Integration tests for fedplan-core
//!
//! These tests cover the registry and metadata contract through the public
//! API without duplicating the unit tests in individual modules.

use std::sync::Arc;

use fedplan_core::testing::MetadataFixture;
use fedplan_core::*;
use proptest::prelude::*;

#[derive(Debug)]
struct DateOnlyTranslator;

impl ExecutionFactory for DateOnlyTranslator {
    fn supports_convert(&self, _source: DataType, target: DataType) -> bool {
        target.is_temporal()
    }

    fn supports_format_literal(&self, _literal: &str, format: Format) -> bool {
        format == Format::Date
    }
}

fn oracle_like_caps() -> SourceCapabilities {
    let mut caps = SourceCapabilities::new();
    caps.set_capability_support(Capability::CriteriaCompareEq, true);
    caps.set_capability_support(Capability::CriteriaLike, true);
    caps.set_capability_support(Capability::CriteriaNot, true);
    caps.set_function_support("concat", true);
    caps.set_source_property(Capability::MaxInCriteriaSize, 1000i64);
    caps.set_source_property(Capability::ConnectorId, "oracle");
    caps
}

#[test]
fn test_finder_shares_capabilities() {
    let finder = BasicCapabilitiesFinder::new().with_source("pm1", oracle_like_caps());

    let a = finder.find_capabilities("pm1").unwrap().unwrap();
    let b = finder.find_capabilities("pm1").unwrap().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.max_in_criteria_size(), Some(1000));
    assert_eq!(a.connector_id(), Some(&Value::from("oracle")));
}

#[test]
fn test_capabilities_serde_round_trip() {
    let mut caps = oracle_like_caps();
    caps.set_translator(Arc::new(DateOnlyTranslator));

    let json = serde_json::to_string(&caps).unwrap();
    let restored: SourceCapabilities = serde_json::from_str(&json).unwrap();

    assert!(restored.supports_capability(Capability::CriteriaLike));
    assert!(restored.supports_function("CONCAT"));
    assert_eq!(restored.max_in_criteria_size(), Some(1000));
    // The translator binding belongs to the running connector.
    assert!(!restored.has_translator());
    assert!(caps.has_translator());
}

#[test]
fn test_translator_is_shared_by_clones() {
    let mut caps = SourceCapabilities::new();
    caps.set_translator(Arc::new(DateOnlyTranslator));
    let cloned = caps.clone();

    assert!(cloned.supports_convert(DataType::String, DataType::Date));
    assert!(!cloned.supports_convert(DataType::String, DataType::Int64));
    assert!(cloned.supports_format_literal("yyyy", Format::Date));
}

#[test]
fn test_metadata_fixture_as_trait_object() {
    let md: Box<dyn QueryMetadata> = Box::new(MetadataFixture::two_sources());
    let model = md.model_id(&GroupSymbol::new("pm1.g1")).unwrap();

    assert_eq!(md.full_name(&model).unwrap(), "pm1");
    assert!(!md.is_virtual_model(&model).unwrap());
}

#[test]
fn test_value_display_for_properties() {
    assert_eq!(Value::from(5i64).to_string(), "5");
    assert_eq!(Value::from("x").to_string(), "'x'");
    assert_eq!(format!("{:?}", Value::Int64(42)), "Int64(42)");
}

proptest! {
    #[test]
    fn test_function_names_ignore_case(name in "[a-zA-Z]{1,12}") {
        let mut caps = SourceCapabilities::new();
        caps.set_function_support(&name, true);
        prop_assert!(caps.supports_function(&name.to_uppercase()));
        prop_assert!(caps.supports_function(&name.to_lowercase()));
    }

    #[test]
    fn test_non_positive_in_sizes_are_unbounded(size in i64::MIN..=0) {
        let mut caps = SourceCapabilities::new();
        caps.set_source_property(Capability::MaxInCriteriaSize, size);
        prop_assert_eq!(caps.max_in_criteria_size(), None);
    }
}
