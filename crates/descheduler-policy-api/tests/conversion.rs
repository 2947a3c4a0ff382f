// crates/descheduler-policy-api/tests/conversion.rs
// ============================================================================
// Module: v1alpha2 Conversion Tests
// Description: Round trips, optionality, enum tags, order, and payloads.
// ============================================================================

//! ## Overview
//! Drives full documents through the registry built by
//! [`descheduler_policy_api::registry_builder`].

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
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use descheduler_policy_api::internal;
use descheduler_policy_api::registry_builder;
use descheduler_policy_api::v1alpha2;
use descheduler_policy_runtime::ArgsError;
use descheduler_policy_runtime::ArgsObject;
use descheduler_policy_runtime::ArgsRegistry;
use descheduler_policy_runtime::ConversionError;
use descheduler_policy_runtime::ConversionOrigin;
use descheduler_policy_runtime::ConversionRegistry;
use descheduler_policy_runtime::RawArgs;
use descheduler_policy_runtime::RegistrationError;
use descheduler_policy_runtime::Scope;
use descheduler_policy_runtime::TypedArgs;
use serde::Deserialize;
use serde::Serialize;
use support::TestResult;
use support::ensure;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyPluginArgs {
    threshold: u32,
    namespaces: Vec<String>,
}

impl TypedArgs for MyPluginArgs {
    const KIND: &'static str = "MyPluginArgs";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct OtherPluginArgs {
    enabled: bool,
}

impl TypedArgs for OtherPluginArgs {
    const KIND: &'static str = "OtherPluginArgs";
}

fn conversions() -> ConversionRegistry {
    registry_builder().build().expect("v1alpha2 conversions register")
}

fn args() -> ArgsRegistry {
    let mut args = ArgsRegistry::new();
    args.register_plugin::<MyPluginArgs>("myPlugin").expect("bind myPlugin");
    args
}

fn my_plugin_args() -> MyPluginArgs {
    MyPluginArgs {
        threshold: 3,
        namespaces: vec!["kube-system".to_string(), "default".to_string()],
    }
}

fn secret_reference() -> internal::SecretReference {
    internal::SecretReference {
        namespace: "ns1".to_string(),
        name: "tok".to_string(),
    }
}

fn canonical_policy() -> internal::DeschedulerPolicy {
    internal::DeschedulerPolicy {
        profiles: Some(vec![internal::DeschedulerProfile {
            name: "default".to_string(),
            plugin_configs: Some(vec![
                internal::PluginConfig {
                    name: "myPlugin".to_string(),
                    args: Some(ArgsObject::new(my_plugin_args())),
                },
                internal::PluginConfig {
                    name: "noArgs".to_string(),
                    args: None,
                },
            ]),
            plugins: internal::Plugins {
                deschedule: internal::PluginSet {
                    enabled: Some(vec!["A".to_string(), "B".to_string(), "C".to_string()]),
                    disabled: Some(Vec::new()),
                },
                balance: internal::PluginSet {
                    enabled: Some(vec!["myPlugin".to_string()]),
                    disabled: None,
                },
                ..internal::Plugins::default()
            },
        }]),
        node_selector: Some("node-role=worker".to_string()),
        max_no_of_pods_to_evict_per_node: Some(5),
        max_no_of_pods_to_evict_per_namespace: Some(2),
        max_no_of_pods_to_evict_total: None,
        eviction_failure_event_notification: Some(false),
        metrics_collector: Some(internal::MetricsCollector {
            enabled: true,
        }),
        metrics_providers: Some(vec![
            internal::MetricsProvider {
                source: internal::MetricsSource::KubernetesMetrics,
                prometheus: None,
            },
            internal::MetricsProvider {
                source: internal::MetricsSource::Prometheus,
                prometheus: Some(internal::Prometheus {
                    url: "https://prometheus.example:9090".to_string(),
                    auth_token: Some(internal::AuthToken {
                        secret_reference: Some(secret_reference()),
                    }),
                }),
            },
        ]),
        grace_period_seconds: Some(30),
    }
}

// ============================================================================
// SECTION: Registration
// ============================================================================

#[test]
fn root_and_plugin_config_use_manual_converters() -> TestResult {
    let conversions = conversions();
    ensure(
        conversions.effective_origin::<v1alpha2::DeschedulerPolicy, internal::DeschedulerPolicy>()
            == Some(ConversionOrigin::Manual),
        "root to internal is manual",
    )?;
    ensure(
        conversions.effective_origin::<internal::DeschedulerPolicy, v1alpha2::DeschedulerPolicy>()
            == Some(ConversionOrigin::Manual),
        "root from internal is manual",
    )?;
    ensure(
        conversions.effective_origin::<v1alpha2::PluginConfig, internal::PluginConfig>()
            == Some(ConversionOrigin::Manual),
        "plugin config decode is manual",
    )?;
    ensure(
        conversions.effective_origin::<internal::PluginConfig, v1alpha2::PluginConfig>()
            == Some(ConversionOrigin::Generated),
        "plugin config encode is generated",
    )?;
    ensure(conversions.len() == 20, "seventeen generated plus three manual converters")?;
    Ok(())
}

#[test]
fn registering_v1alpha2_twice_fails() {
    let err = registry_builder().register(v1alpha2::register_conversions).build().unwrap_err();
    assert!(matches!(err, RegistrationError::Conflict { .. }));
}

// ============================================================================
// SECTION: Round Trip
// ============================================================================

#[test]
fn canonical_round_trip_is_field_for_field() -> TestResult {
    let conversions = conversions();
    let args = args();
    let scope = conversions.scope(&args);
    let original = canonical_policy();
    let versioned: v1alpha2::DeschedulerPolicy = scope.convert(&original)?;
    let back: internal::DeschedulerPolicy = scope.convert(&versioned)?;
    ensure(back == original, "canonical document must survive the round trip")?;
    Ok(())
}

#[test]
fn header_is_stamped_on_output_and_dropped_on_input() -> TestResult {
    let conversions = conversions();
    let args = args();
    let scope = conversions.scope(&args);
    let versioned: v1alpha2::DeschedulerPolicy =
        scope.convert(&internal::DeschedulerPolicy::default())?;
    ensure(versioned.type_meta.is_policy(), "header stamped")?;

    let headerless = v1alpha2::DeschedulerPolicy::default();
    let canonical: internal::DeschedulerPolicy = scope.convert(&headerless)?;
    ensure(canonical == internal::DeschedulerPolicy::default(), "header has no counterpart")?;
    Ok(())
}

// ============================================================================
// SECTION: Optionality
// ============================================================================

#[test]
fn absent_and_empty_profiles_stay_distinct() -> TestResult {
    let conversions = conversions();
    let args = args();
    let scope = conversions.scope(&args);

    let absent: internal::DeschedulerPolicy = scope.convert(&v1alpha2::DeschedulerPolicy {
        profiles: None,
        ..v1alpha2::DeschedulerPolicy::default()
    })?;
    ensure(absent.profiles.is_none(), "absent profiles stay absent")?;

    let empty: internal::DeschedulerPolicy = scope.convert(&v1alpha2::DeschedulerPolicy {
        profiles: Some(Vec::new()),
        ..v1alpha2::DeschedulerPolicy::default()
    })?;
    ensure(empty.profiles == Some(Vec::new()), "empty profiles stay empty")?;

    let back: v1alpha2::DeschedulerPolicy = scope.convert(&empty)?;
    ensure(back.profiles == Some(Vec::new()), "empty profiles stay empty on the way back")?;
    Ok(())
}

#[test]
fn prometheus_auth_token_presence_is_preserved() -> TestResult {
    let conversions = conversions();
    let args = args();
    let scope = conversions.scope(&args);

    let without = v1alpha2::Prometheus {
        url: "http://prom".to_string(),
        auth_token: None,
    };
    let converted: internal::Prometheus = scope.convert(&without)?;
    ensure(converted.auth_token.is_none(), "absent token stays absent")?;

    let with = v1alpha2::Prometheus {
        url: "http://prom".to_string(),
        auth_token: Some(v1alpha2::AuthToken {
            secret_reference: Some(v1alpha2::SecretReference {
                namespace: "ns1".to_string(),
                name: "tok".to_string(),
            }),
        }),
    };
    let converted: internal::Prometheus = scope.convert(&with)?;
    ensure(
        converted.auth_token.and_then(|token| token.secret_reference) == Some(secret_reference()),
        "secret reference preserved exactly",
    )?;

    let tokenless = v1alpha2::AuthToken {
        secret_reference: None,
    };
    let converted: internal::AuthToken = scope.convert(&tokenless)?;
    ensure(converted.secret_reference.is_none(), "absent secret reference stays absent")?;
    Ok(())
}

#[test]
fn plugin_order_and_empty_disabled_are_preserved() -> TestResult {
    let conversions = conversions();
    let args = args();
    let scope = conversions.scope(&args);
    let set = v1alpha2::PluginSet {
        enabled: Some(vec!["A".to_string(), "B".to_string(), "C".to_string()]),
        disabled: Some(Vec::new()),
    };
    let converted: internal::PluginSet = scope.convert(&set)?;
    ensure(
        converted.enabled == Some(vec!["A".to_string(), "B".to_string(), "C".to_string()]),
        "enabled order preserved",
    )?;
    ensure(converted.disabled == Some(Vec::new()), "empty disabled is not absent")?;
    Ok(())
}

#[test]
fn every_extension_point_is_converted() -> TestResult {
    let conversions = conversions();
    let args = args();
    let scope = conversions.scope(&args);
    let named = |name: &str| v1alpha2::PluginSet {
        enabled: Some(vec![name.to_string()]),
        disabled: None,
    };
    let plugins = v1alpha2::Plugins {
        pre_sort: named("preSort"),
        sort: named("sort"),
        deschedule: named("deschedule"),
        balance: named("balance"),
        filter: named("filter"),
        pre_eviction_filter: named("preEvictionFilter"),
    };
    let converted: internal::Plugins = scope.convert(&plugins)?;
    for point in descheduler_policy_api::ExtensionPoint::ALL {
        ensure(
            converted.plugin_set(point).enabled == Some(vec![point.as_str().to_string()]),
            format!("extension point {point} mapped to its own field"),
        )?;
    }
    Ok(())
}

// ============================================================================
// SECTION: Enum Tags
// ============================================================================

#[test]
fn known_metrics_sources_map_by_tag() -> TestResult {
    let conversions = conversions();
    let args = args();
    let scope = conversions.scope(&args);
    for (tag, expected) in [
        (v1alpha2::MetricsSource::KUBERNETES_METRICS, internal::MetricsSource::KubernetesMetrics),
        (v1alpha2::MetricsSource::PROMETHEUS, internal::MetricsSource::Prometheus),
    ] {
        let provider = v1alpha2::MetricsProvider {
            source: v1alpha2::MetricsSource::new(tag),
            prometheus: None,
        };
        let converted: internal::MetricsProvider = scope.convert(&provider)?;
        ensure(converted.source == expected, format!("tag {tag} maps to its case"))?;
        let back: v1alpha2::MetricsProvider = scope.convert(&converted)?;
        ensure(back.source.as_str() == tag, format!("case maps back to {tag}"))?;
    }
    Ok(())
}

#[test]
fn unknown_metrics_source_is_an_error_not_a_default() {
    let conversions = conversions();
    let args = args();
    let scope = conversions.scope(&args);
    let policy = v1alpha2::DeschedulerPolicy {
        metrics_providers: Some(vec![v1alpha2::MetricsProvider {
            source: v1alpha2::MetricsSource::new("Graphite"),
            prometheus: None,
        }]),
        ..v1alpha2::DeschedulerPolicy::default()
    };
    let err = scope
        .convert::<v1alpha2::DeschedulerPolicy, internal::DeschedulerPolicy>(&policy)
        .unwrap_err();
    assert_eq!(
        err,
        ConversionError::UnrecognizedTag {
            enum_name: "MetricsSource",
            tag: "Graphite".to_string(),
        }
    );
}

// ============================================================================
// SECTION: Plugin Payloads
// ============================================================================

#[test]
fn plugin_payload_encodes_with_kind_and_decodes_equal() -> TestResult {
    let conversions = conversions();
    let args = args();
    let scope = conversions.scope(&args);
    let config = internal::PluginConfig {
        name: "myPlugin".to_string(),
        args: Some(ArgsObject::new(my_plugin_args())),
    };
    let encoded: v1alpha2::PluginConfig = scope.convert(&config)?;
    let payload = encoded.args.as_ref().ok_or("payload must be present")?;
    ensure(payload.kind.as_deref() == Some(MyPluginArgs::KIND), "tagged with myPlugin's kind")?;
    let decoded: internal::PluginConfig = scope.convert(&encoded)?;
    ensure(decoded == config, "decoded object equals the original")?;
    Ok(())
}

#[test]
fn payload_of_another_kind_under_bound_name_fails_to_encode() {
    let conversions = conversions();
    let args = args();
    let scope = conversions.scope(&args);
    let config = internal::PluginConfig {
        name: "myPlugin".to_string(),
        args: Some(ArgsObject::new(OtherPluginArgs {
            enabled: true,
        })),
    };
    let err = scope.convert::<internal::PluginConfig, v1alpha2::PluginConfig>(&config).unwrap_err();
    assert_eq!(
        err,
        ConversionError::Args(ArgsError::KindMismatch {
            plugin: "myPlugin".to_string(),
            declared: OtherPluginArgs::KIND.to_string(),
            expected: MyPluginArgs::KIND.to_string(),
        })
    );
}

#[test]
fn unregistered_payload_kind_fails_whole_document() {
    let conversions = conversions();
    let args = args();
    let scope = conversions.scope(&args);
    let policy = v1alpha2::DeschedulerPolicy {
        profiles: Some(vec![v1alpha2::DeschedulerProfile {
            name: "default".to_string(),
            plugin_configs: Some(vec![v1alpha2::PluginConfig {
                name: "myPlugin".to_string(),
                args: Some(RawArgs::tagged("UnheardOfArgs", b"{}".to_vec())),
            }]),
            plugins: v1alpha2::Plugins::default(),
        }]),
        ..v1alpha2::DeschedulerPolicy::default()
    };
    let args_without_binding = ArgsRegistry::new();
    let unbound_scope = Scope::new(&conversions, &args_without_binding);
    let err = unbound_scope
        .convert::<v1alpha2::DeschedulerPolicy, internal::DeschedulerPolicy>(&policy)
        .unwrap_err();
    assert_eq!(
        err,
        ConversionError::Args(ArgsError::UnknownType {
            kind: "UnheardOfArgs".to_string(),
        })
    );
    assert!(err.to_string().contains("UnheardOfArgs"));

    let bound_err = scope
        .convert::<v1alpha2::DeschedulerPolicy, internal::DeschedulerPolicy>(&policy)
        .unwrap_err();
    assert!(matches!(bound_err, ConversionError::Args(ArgsError::KindMismatch { .. })));
}

#[test]
fn untagged_payload_resolves_through_plugin_name() -> TestResult {
    let conversions = conversions();
    let args = args();
    let scope = conversions.scope(&args);
    let config = v1alpha2::PluginConfig {
        name: "myPlugin".to_string(),
        args: Some(RawArgs::untagged(
            br#"{"threshold":3,"namespaces":["kube-system","default"]}"#.to_vec(),
        )),
    };
    let decoded: internal::PluginConfig = scope.convert(&config)?;
    let typed = decoded.args.as_ref().and_then(ArgsObject::downcast_ref::<MyPluginArgs>);
    ensure(typed == Some(&my_plugin_args()), "payload decoded by plugin binding")?;
    Ok(())
}

#[test]
fn absent_payload_stays_absent() -> TestResult {
    let conversions = conversions();
    let args = args();
    let scope = conversions.scope(&args);
    let config = v1alpha2::PluginConfig {
        name: "unknownPlugin".to_string(),
        args: None,
    };
    let decoded: internal::PluginConfig = scope.convert(&config)?;
    ensure(decoded.args.is_none(), "no payload decodes to no args")?;
    let encoded: v1alpha2::PluginConfig = scope.convert(&decoded)?;
    ensure(encoded.args.is_none(), "no args encode to no payload")?;
    Ok(())
}

// ============================================================================
// SECTION: Overrides
// ============================================================================

fn loud_secret_reference(
    input: &v1alpha2::SecretReference,
    _scope: &Scope<'_>,
) -> Result<internal::SecretReference, ConversionError> {
    Ok(internal::SecretReference {
        namespace: input.namespace.to_uppercase(),
        name: input.name.to_uppercase(),
    })
}

fn register_loud(registry: &mut ConversionRegistry) -> Result<(), RegistrationError> {
    registry.add_conversion(loud_secret_reference)
}

#[test]
fn manual_override_applies_deep_inside_the_document() -> TestResult {
    let conversions = registry_builder().register(register_loud).build()?;
    let args = args();
    let scope = conversions.scope(&args);
    let versioned = versioned_policy()?;
    let converted: internal::DeschedulerPolicy = scope.convert(&versioned)?;
    let reference = converted
        .metrics_providers
        .unwrap_or_default()
        .into_iter()
        .find_map(|provider| provider.prometheus)
        .and_then(|prometheus| prometheus.auth_token)
        .and_then(|token| token.secret_reference);
    ensure(
        reference
            == Some(internal::SecretReference {
                namespace: "NS1".to_string(),
                name: "TOK".to_string(),
            }),
        "override reached the nested secret reference",
    )?;
    ensure(
        converted.profiles.map(|profiles| profiles.len()) == Some(1),
        "other pairs unaffected",
    )?;
    Ok(())
}

fn versioned_policy() -> TestResult<v1alpha2::DeschedulerPolicy> {
    let conversions = conversions();
    let args = args();
    let scope = conversions.scope(&args);
    Ok(scope.convert(&canonical_policy())?)
}
