//! Unit tests for common-config crate

use common_config::{
    DEFAULT_INDEPENDENT_CARDINALITY, DependentJoinConfig, FedplanConfig, OptimizerConfig,
};

#[test]
fn test_fedplan_config_default() {
    let config = FedplanConfig::default();

    assert_eq!(config.optimizer.max_rule_executions, 100);
    assert!(!config.optimizer.enable_trace);
    assert!(!config.optimizer.record_debug);
    assert_eq!(
        config.dependent_join.independent_cardinality_threshold,
        DEFAULT_INDEPENDENT_CARDINALITY
    );
}

#[test]
fn test_default_threshold_is_ten_rows() {
    assert_eq!(DEFAULT_INDEPENDENT_CARDINALITY, 10.0);
}

#[test]
fn test_optimizer_config_builders() {
    let config = OptimizerConfig::default()
        .with_max_rule_executions(7)
        .with_trace(true)
        .with_record_debug(true);

    assert_eq!(config.max_rule_executions, 7);
    assert!(config.enable_trace);
    assert!(config.record_debug);
}

#[test]
fn test_dependent_join_config_builder() {
    let config = DependentJoinConfig::default().with_threshold(250.0);
    assert_eq!(config.independent_cardinality_threshold, 250.0);
}

#[test]
fn test_fedplan_config_serialization() {
    let mut config = FedplanConfig::default();
    config.optimizer.max_rule_executions = 12;
    config.optimizer.enable_trace = true;
    config.dependent_join.independent_cardinality_threshold = 50.0;

    let json = serde_json::to_string(&config).unwrap();
    let deserialized: FedplanConfig = serde_json::from_str(&json).unwrap();

    assert_eq!(deserialized, config);
}

#[test]
fn test_from_json_fills_missing_sections() {
    let config = FedplanConfig::from_json(r#"{"optimizer": {"enable_trace": true}}"#).unwrap();

    assert!(config.optimizer.enable_trace);
    assert_eq!(config.optimizer.max_rule_executions, 100);
    assert_eq!(config.dependent_join, DependentJoinConfig::default());
}

#[test]
fn test_from_json_empty_object() {
    let config = FedplanConfig::from_json("{}").unwrap();
    assert_eq!(config, FedplanConfig::default());
}

#[test]
fn test_from_json_rejects_malformed_input() {
    let err = FedplanConfig::from_json("{optimizer:").unwrap_err();
    assert!(err.to_string().starts_with("SerdeJsonError"));
}

#[test]
fn test_from_json_rejects_zero_budget() {
    let err = FedplanConfig::from_json(r#"{"optimizer": {"max_rule_executions": 0}}"#).unwrap_err();
    assert!(err.to_string().contains("max_rule_executions"));
}

#[test]
fn test_from_json_rejects_negative_threshold() {
    let err = FedplanConfig::from_json(
        r#"{"dependent_join": {"independent_cardinality_threshold": -1.0}}"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("independent_cardinality_threshold"));
}

#[test]
fn test_to_json_pretty_round_trip() {
    let config = FedplanConfig::default();
    let json = config.to_json_pretty().unwrap();
    assert!(json.contains("max_rule_executions"));
    assert_eq!(FedplanConfig::from_json(&json).unwrap(), config);
}

#[test]
fn test_config_debug_format() {
    let config = FedplanConfig::default();
    let debug_str = format!("{:?}", config);
    assert!(debug_str.contains("FedplanConfig"));
    assert!(debug_str.contains("OptimizerConfig"));
    assert!(debug_str.contains("DependentJoinConfig"));
}

#[test]
fn test_config_clone() {
    let mut config = FedplanConfig::default();
    config.optimizer.record_debug = true;

    let cloned = config.clone();
    assert_eq!(cloned.optimizer.record_debug, config.optimizer.record_debug);
}
