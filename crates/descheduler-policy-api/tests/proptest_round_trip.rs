// crates/descheduler-policy-api/tests/proptest_round_trip.rs
// ============================================================================
// Module: Policy Round Trip Property-Based Tests
// Description: Canonical -> v1alpha2 -> canonical over generated documents.
// Purpose: Check lossless conversion across optionality and ordering.
// ============================================================================

//! Property-based tests for document round trips.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use descheduler_policy_api::internal;
use descheduler_policy_api::registry_builder;
use descheduler_policy_api::v1alpha2;
use descheduler_policy_runtime::ArgsObject;
use descheduler_policy_runtime::ArgsRegistry;
use descheduler_policy_runtime::TypedArgs;
use proptest::collection::vec;
use proptest::option::of;
use proptest::prelude::*;
use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct LimitArgs {
    limit: u32,
    labels: Vec<String>,
}

impl TypedArgs for LimitArgs {
    const KIND: &'static str = "LimitArgs";
}

fn name() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9-]{0,10}"
}

fn names() -> impl Strategy<Value = Option<Vec<String>>> {
    of(vec(name(), 0..4))
}

fn plugin_set() -> impl Strategy<Value = internal::PluginSet> {
    (names(), names()).prop_map(|(enabled, disabled)| internal::PluginSet {
        enabled,
        disabled,
    })
}

fn plugins() -> impl Strategy<Value = internal::Plugins> {
    (plugin_set(), plugin_set(), plugin_set(), plugin_set(), plugin_set(), plugin_set()).prop_map(
        |(pre_sort, sort, deschedule, balance, filter, pre_eviction_filter)| internal::Plugins {
            pre_sort,
            sort,
            deschedule,
            balance,
            filter,
            pre_eviction_filter,
        },
    )
}

fn plugin_config() -> impl Strategy<Value = internal::PluginConfig> {
    (name(), of((any::<u32>(), vec(name(), 0..3)))).prop_map(|(name, args)| {
        internal::PluginConfig {
            name,
            args: args.map(|(limit, labels)| {
                ArgsObject::new(LimitArgs {
                    limit,
                    labels,
                })
            }),
        }
    })
}

fn profile() -> impl Strategy<Value = internal::DeschedulerProfile> {
    (name(), of(vec(plugin_config(), 0..3)), plugins()).prop_map(
        |(name, plugin_configs, plugins)| internal::DeschedulerProfile {
            name,
            plugin_configs,
            plugins,
        },
    )
}

fn secret_reference() -> impl Strategy<Value = internal::SecretReference> {
    (name(), name()).prop_map(|(namespace, name)| internal::SecretReference {
        namespace,
        name,
    })
}

fn metrics_provider() -> impl Strategy<Value = internal::MetricsProvider> {
    let source = prop_oneof![
        Just(internal::MetricsSource::KubernetesMetrics),
        Just(internal::MetricsSource::Prometheus),
    ];
    let prometheus = of((name(), of(of(secret_reference())))).prop_map(|prometheus| {
        prometheus.map(|(url, token)| internal::Prometheus {
            url,
            auth_token: token.map(|secret_reference| internal::AuthToken {
                secret_reference,
            }),
        })
    });
    (source, prometheus).prop_map(|(source, prometheus)| internal::MetricsProvider {
        source,
        prometheus,
    })
}

fn policy() -> impl Strategy<Value = internal::DeschedulerPolicy> {
    (
        of(vec(profile(), 0..3)),
        of(name()),
        (of(any::<u32>()), of(any::<u32>()), of(any::<u32>())),
        of(any::<bool>()),
        of(any::<bool>()),
        of(vec(metrics_provider(), 0..3)),
        of(any::<i64>()),
    )
        .prop_map(
            |(profiles, node_selector, caps, notify, collector, providers, grace)| {
                internal::DeschedulerPolicy {
                    profiles,
                    node_selector,
                    max_no_of_pods_to_evict_per_node: caps.0,
                    max_no_of_pods_to_evict_per_namespace: caps.1,
                    max_no_of_pods_to_evict_total: caps.2,
                    eviction_failure_event_notification: notify,
                    metrics_collector: collector.map(|enabled| internal::MetricsCollector {
                        enabled,
                    }),
                    metrics_providers: providers,
                    grace_period_seconds: grace,
                }
            },
        )
}

proptest! {
    #[test]
    fn canonical_documents_round_trip(original in policy()) {
        let conversions = registry_builder().build().unwrap();
        let mut args = ArgsRegistry::new();
        args.register_kind::<LimitArgs>().unwrap();
        let scope = conversions.scope(&args);
        let versioned: v1alpha2::DeschedulerPolicy = scope.convert(&original).unwrap();
        let back: internal::DeschedulerPolicy = scope.convert(&versioned).unwrap();
        prop_assert_eq!(back, original);
    }

    #[test]
    fn versioned_documents_survive_yaml(original in policy()) {
        let conversions = registry_builder().build().unwrap();
        let mut args = ArgsRegistry::new();
        args.register_kind::<LimitArgs>().unwrap();
        let scope = conversions.scope(&args);
        let versioned: v1alpha2::DeschedulerPolicy = scope.convert(&original).unwrap();
        let text = serde_yaml::to_string(&versioned).unwrap();
        let parsed: v1alpha2::DeschedulerPolicy = serde_yaml::from_str(&text).unwrap();
        let back: internal::DeschedulerPolicy = scope.convert(&parsed).unwrap();
        prop_assert_eq!(back, original);
    }
}
