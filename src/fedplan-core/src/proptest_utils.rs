//! Property-based tests for the capability registry.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::capabilities::{Capability, SourceCapabilities};
    use crate::types::Value;

    // =========================================================================
    // Strategies
    // =========================================================================

    fn arb_capability() -> impl Strategy<Value = Capability> {
        prop::sample::select(Capability::ALL.to_vec())
    }

    fn arb_settings() -> impl Strategy<Value = Vec<(Capability, bool)>> {
        prop::collection::vec((arb_capability(), any::<bool>()), 0..20)
    }

    fn arb_simple_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Int64),
            "[a-zA-Z0-9]{0,20}".prop_map(Value::String),
        ]
    }

    // =========================================================================
    // Properties
    // =========================================================================

    proptest! {
        #[test]
        fn prop_unset_capabilities_are_unsupported(
            settings in arb_settings(),
            probe in arb_capability(),
        ) {
            let mut caps = SourceCapabilities::new();
            let mut touched = false;
            for (cap, supported) in &settings {
                caps.set_capability_support(*cap, *supported);
                touched |= *cap == probe;
                if *cap == Capability::QueryAggregates && *supported {
                    touched |= matches!(probe, Capability::QueryGroupBy | Capability::QueryHaving);
                }
            }
            if !touched {
                prop_assert!(!caps.supports_capability(probe));
            }
        }

        #[test]
        fn prop_unset_functions_are_unsupported(
            known in prop::collection::vec("[a-z]{1,8}", 0..10),
            probe in "[A-Z]{9,12}",
        ) {
            let mut caps = SourceCapabilities::new();
            for name in &known {
                caps.set_function_support(name, true);
            }
            prop_assert!(!caps.supports_function(&probe));
        }

        #[test]
        fn prop_aggregate_cascade_survives_later_writes(
            before in arb_settings(),
            after in arb_settings(),
        ) {
            let mut caps = SourceCapabilities::new();
            for (cap, supported) in &before {
                caps.set_capability_support(*cap, *supported);
            }
            caps.set_capability_support(Capability::QueryAggregates, true);
            prop_assert!(caps.supports_capability(Capability::QueryGroupBy));
            prop_assert!(caps.supports_capability(Capability::QueryHaving));

            for (cap, supported) in &after {
                if !matches!(cap, Capability::QueryGroupBy | Capability::QueryHaving) {
                    caps.set_capability_support(*cap, *supported);
                }
            }
            prop_assert!(caps.supports_capability(Capability::QueryGroupBy));
            prop_assert!(caps.supports_capability(Capability::QueryHaving));
        }

        #[test]
        fn prop_source_properties_round_trip(value in arb_simple_value()) {
            let mut caps = SourceCapabilities::new();
            caps.set_source_property(Capability::ConnectorId, value.clone());
            prop_assert_eq!(caps.source_property(Capability::ConnectorId), Some(&value));
        }
    }
}
