// crates/descheduler-policy-api/src/v1alpha2/mod.rs
// ============================================================================
// Module: Policy API v1alpha2
// Description: External-facing descheduler policy schema, version v1alpha2.
// Purpose: Define the stable wire format and register its converters.
// Dependencies: serde, descheduler-policy-runtime
// ============================================================================

//! ## Overview
//! Versioned schema that users author as YAML or JSON. Field names follow the
//! camelCase wire surface. Plugin arguments stay encoded as [`RawArgs`] so any
//! plugin schema can be embedded without this module knowing its shape.
//! Invariants:
//! - Absent optionals and absent sequences are omitted on output; present
//!   empty sequences serialize as `[]`.
//! - [`MetricsSource`] is an open string; only known tags convert.

pub mod conversion;
pub mod manual;

use descheduler_policy_runtime::ConversionRegistry;
use descheduler_policy_runtime::RawArgs;
use descheduler_policy_runtime::RegistrationError;
use serde::Deserialize;
use serde::Serialize;

use crate::extension::ExtensionPoint;

// ============================================================================
// SECTION: Type Header
// ============================================================================

/// API group and version of this schema.
pub const API_VERSION: &str = "descheduler/v1alpha2";

/// Kind of the root document.
pub const POLICY_KIND: &str = "DeschedulerPolicy";

/// Document type header.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMeta {
    /// Versioned schema identifier.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    /// Document kind.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

impl TypeMeta {
    /// Returns the header stamped on every v1alpha2 policy document.
    #[must_use]
    pub fn policy() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: POLICY_KIND.to_string(),
        }
    }

    /// Returns true when the header names this schema's policy document.
    #[must_use]
    pub fn is_policy(&self) -> bool {
        self.api_version == API_VERSION && self.kind == POLICY_KIND
    }
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Root policy document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeschedulerPolicy {
    /// Type header.
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    /// Execution profiles in declaration order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiles: Option<Vec<DeschedulerProfile>>,
    /// Label selector restricting the nodes considered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<String>,
    /// Eviction cap per node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_no_of_pods_to_evict_per_node: Option<u32>,
    /// Eviction cap per namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_no_of_pods_to_evict_per_namespace: Option<u32>,
    /// Eviction cap per descheduling cycle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_no_of_pods_to_evict_total: Option<u32>,
    /// Emits an event when an eviction fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eviction_failure_event_notification: Option<bool>,
    /// Metrics collection toggle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_collector: Option<MetricsCollector>,
    /// Metrics sources consulted by plugins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_providers: Option<Vec<MetricsProvider>>,
    /// Grace period applied to evictions, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grace_period_seconds: Option<i64>,
}

/// Named grouping of plugin configuration and plugin sets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeschedulerProfile {
    /// Profile name.
    pub name: String,
    /// Per-plugin encoded arguments.
    #[serde(rename = "pluginConfig", default, skip_serializing_if = "Option::is_none")]
    pub plugin_configs: Option<Vec<PluginConfig>>,
    /// Plugin sets per extension point.
    #[serde(default)]
    pub plugins: Plugins,
}

// ============================================================================
// SECTION: Plugins
// ============================================================================

/// Plugin sets for each extension point.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Plugins {
    /// Pre-sort plugins.
    pub pre_sort: PluginSet,
    /// Sort plugins.
    pub sort: PluginSet,
    /// Deschedule plugins.
    pub deschedule: PluginSet,
    /// Balance plugins.
    pub balance: PluginSet,
    /// Filter plugins.
    pub filter: PluginSet,
    /// Pre-eviction filter plugins.
    pub pre_eviction_filter: PluginSet,
}

impl Plugins {
    /// Returns the plugin set of one extension point.
    #[must_use]
    pub const fn plugin_set(&self, point: ExtensionPoint) -> &PluginSet {
        match point {
            ExtensionPoint::PreSort => &self.pre_sort,
            ExtensionPoint::Sort => &self.sort,
            ExtensionPoint::Deschedule => &self.deschedule,
            ExtensionPoint::Balance => &self.balance,
            ExtensionPoint::Filter => &self.filter,
            ExtensionPoint::PreEvictionFilter => &self.pre_eviction_filter,
        }
    }
}

/// Enabled and disabled plugin names for one extension point.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PluginSet {
    /// Enabled plugins in invocation order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<Vec<String>>,
    /// Disabled plugins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<Vec<String>>,
}

/// Encoded arguments for one plugin.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Plugin name; selects the argument type.
    pub name: String,
    /// Inline argument object, when configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<RawArgs>,
}

// ============================================================================
// SECTION: Metrics
// ============================================================================

/// Metrics collection toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetricsCollector {
    /// Collect node utilization through the metrics API.
    #[serde(default)]
    pub enabled: bool,
}

/// Source of metrics used by utilization-aware plugins.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetricsProvider {
    /// Provider kind.
    #[serde(default)]
    pub source: MetricsSource,
    /// Prometheus settings, meaningful when `source` is Prometheus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prometheus: Option<Prometheus>,
}

/// Metrics provider tag as written on the wire.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricsSource(pub String);

impl MetricsSource {
    /// Kubernetes metrics server tag.
    pub const KUBERNETES_METRICS: &'static str = "KubernetesMetrics";
    /// Prometheus endpoint tag.
    pub const PROMETHEUS: &'static str = "Prometheus";

    /// Creates a tag from any string.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Returns the tag text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Prometheus connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prometheus {
    /// Endpoint URL.
    #[serde(default)]
    pub url: String,
    /// Bearer token source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<AuthToken>,
}

/// Bearer token source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthToken {
    /// Secret holding the token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_reference: Option<SecretReference>,
}

/// Reference to a namespaced secret.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SecretReference {
    /// Secret namespace.
    #[serde(default)]
    pub namespace: String,
    /// Secret name.
    #[serde(default)]
    pub name: String,
}

// ============================================================================
// SECTION: Registration
// ============================================================================

/// Registers every v1alpha2 converter: generated pairs first, then the
/// hand-written ones.
///
/// # Errors
///
/// Returns [`RegistrationError::Conflict`] when any pair is already present.
pub fn register_conversions(registry: &mut ConversionRegistry) -> Result<(), RegistrationError> {
    conversion::register_generated(registry)?;
    manual::register_manual(registry)
}
