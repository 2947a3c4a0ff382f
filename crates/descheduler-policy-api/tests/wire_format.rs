// crates/descheduler-policy-api/tests/wire_format.rs
// ============================================================================
// Module: v1alpha2 Wire Format Tests
// Description: YAML and JSON shape of the versioned policy document.
// ============================================================================

//! ## Overview
//! Pins field names, omission of absent fields, and the inline args object.

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

use descheduler_policy_api::v1alpha2;
use serde_json::json;
use support::TestResult;
use support::ensure;

const POLICY_YAML: &str = r#"
apiVersion: descheduler/v1alpha2
kind: DeschedulerPolicy
nodeSelector: "node-role=worker"
maxNoOfPodsToEvictPerNode: 5
maxNoOfPodsToEvictPerNamespace: 2
maxNoOfPodsToEvictTotal: 10
evictionFailureEventNotification: true
gracePeriodSeconds: 30
metricsCollector:
  enabled: true
metricsProviders:
  - source: Prometheus
    prometheus:
      url: https://prometheus.example:9090
      authToken:
        secretReference:
          namespace: ns1
          name: tok
profiles:
  - name: default
    pluginConfig:
      - name: DefaultEvictor
        args:
          kind: DefaultEvictorArgs
          evictLocalStoragePods: true
      - name: RemoveDuplicates
    plugins:
      deschedule:
        enabled: ["A", "B", "C"]
        disabled: []
      preEvictionFilter:
        enabled: ["DefaultEvictor"]
"#;

#[test]
fn yaml_document_parses_every_field() -> TestResult {
    let policy: v1alpha2::DeschedulerPolicy = serde_yaml::from_str(POLICY_YAML)?;
    ensure(policy.type_meta.is_policy(), "header parsed")?;
    ensure(policy.node_selector.as_deref() == Some("node-role=worker"), "node selector")?;
    ensure(policy.max_no_of_pods_to_evict_per_node == Some(5), "per node cap")?;
    ensure(policy.max_no_of_pods_to_evict_per_namespace == Some(2), "per namespace cap")?;
    ensure(policy.max_no_of_pods_to_evict_total == Some(10), "total cap")?;
    ensure(policy.eviction_failure_event_notification == Some(true), "notification flag")?;
    ensure(policy.grace_period_seconds == Some(30), "grace period")?;

    let providers = policy.metrics_providers.as_deref().unwrap_or_default();
    ensure(providers.len() == 1, "one provider")?;
    ensure(providers[0].source.as_str() == "Prometheus", "source tag")?;
    let reference = providers[0]
        .prometheus
        .as_ref()
        .and_then(|prometheus| prometheus.auth_token.as_ref())
        .and_then(|token| token.secret_reference.as_ref());
    ensure(
        reference
            == Some(&v1alpha2::SecretReference {
                namespace: "ns1".to_string(),
                name: "tok".to_string(),
            }),
        "secret reference",
    )?;

    let profile = &policy.profiles.as_deref().unwrap_or_default()[0];
    let configs = profile.plugin_configs.as_deref().unwrap_or_default();
    ensure(configs.len() == 2, "two plugin configs")?;
    ensure(
        configs[0].args.as_ref().and_then(|args| args.kind.as_deref())
            == Some("DefaultEvictorArgs"),
        "args kind lifted",
    )?;
    ensure(configs[1].args.is_none(), "missing args stay absent")?;
    ensure(profile.plugins.deschedule.disabled == Some(Vec::new()), "explicit empty list")?;
    ensure(profile.plugins.balance.enabled.is_none(), "unlisted extension point defaults")?;
    Ok(())
}

#[test]
fn json_output_omits_absent_fields_and_keeps_empty_lists() -> TestResult {
    let policy = v1alpha2::DeschedulerPolicy {
        type_meta: v1alpha2::TypeMeta::policy(),
        profiles: Some(vec![v1alpha2::DeschedulerProfile {
            name: "p".to_string(),
            plugin_configs: None,
            plugins: v1alpha2::Plugins {
                filter: v1alpha2::PluginSet {
                    enabled: None,
                    disabled: Some(Vec::new()),
                },
                ..v1alpha2::Plugins::default()
            },
        }]),
        ..v1alpha2::DeschedulerPolicy::default()
    };
    let value = serde_json::to_value(&policy)?;
    ensure(
        value
            == json!({
                "apiVersion": "descheduler/v1alpha2",
                "kind": "DeschedulerPolicy",
                "profiles": [{
                    "name": "p",
                    "plugins": {
                        "preSort": {},
                        "sort": {},
                        "deschedule": {},
                        "balance": {},
                        "filter": { "disabled": [] },
                        "preEvictionFilter": {}
                    }
                }]
            }),
        "unexpected JSON shape",
    )?;
    Ok(())
}

#[test]
fn yaml_reserialization_is_stable() -> TestResult {
    let policy: v1alpha2::DeschedulerPolicy = serde_yaml::from_str(POLICY_YAML)?;
    let text = serde_yaml::to_string(&policy)?;
    let reparsed: v1alpha2::DeschedulerPolicy = serde_yaml::from_str(&text)?;
    ensure(reparsed == policy, "YAML output parses back to the same document")?;
    Ok(())
}

#[test]
fn unknown_metrics_source_parses_as_open_string() -> TestResult {
    let provider: v1alpha2::MetricsProvider = serde_json::from_str(r#"{"source":"Graphite"}"#)?;
    ensure(provider.source.as_str() == "Graphite", "open string kept verbatim")?;
    Ok(())
}
