// crates/descheduler-policy-api/src/internal.rs
// ============================================================================
// Module: Canonical Policy Model
// Description: Version-independent descheduler policy document.
// Purpose: The document shape the descheduling engine operates on.
// Dependencies: descheduler-policy-runtime
// ============================================================================

//! ## Overview
//! The canonical model is never serialized directly; documents reach it by
//! conversion from a versioned schema. Plugin arguments are already decoded
//! into typed [`ArgsObject`] values so the engine can dispatch on type.
//! Invariants:
//! - Every sequence is `Option<Vec<_>>`: `None` is unset, `Some(vec![])` is
//!   an explicitly empty list.
//! - [`Plugins`] always holds all six extension points.

use descheduler_policy_runtime::ArgsObject;

use crate::extension::ExtensionPoint;

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Root policy document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeschedulerPolicy {
    /// Execution profiles in declaration order.
    pub profiles: Option<Vec<DeschedulerProfile>>,
    /// Label selector restricting the nodes considered.
    pub node_selector: Option<String>,
    /// Eviction cap per node.
    pub max_no_of_pods_to_evict_per_node: Option<u32>,
    /// Eviction cap per namespace.
    pub max_no_of_pods_to_evict_per_namespace: Option<u32>,
    /// Eviction cap per descheduling cycle.
    pub max_no_of_pods_to_evict_total: Option<u32>,
    /// Emits an event when an eviction fails.
    pub eviction_failure_event_notification: Option<bool>,
    /// Metrics collection toggle.
    pub metrics_collector: Option<MetricsCollector>,
    /// Metrics sources consulted by plugins.
    pub metrics_providers: Option<Vec<MetricsProvider>>,
    /// Grace period applied to evictions, in seconds.
    pub grace_period_seconds: Option<i64>,
}

/// Named grouping of plugin configuration and plugin sets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeschedulerProfile {
    /// Profile name.
    pub name: String,
    /// Per-plugin argument objects.
    pub plugin_configs: Option<Vec<PluginConfig>>,
    /// Plugin sets per extension point.
    pub plugins: Plugins,
}

// ============================================================================
// SECTION: Plugins
// ============================================================================

/// Plugin sets for each extension point.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
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
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PluginSet {
    /// Enabled plugins in invocation order.
    pub enabled: Option<Vec<String>>,
    /// Disabled plugins.
    pub disabled: Option<Vec<String>>,
}

/// Decoded arguments for one plugin.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginConfig {
    /// Plugin name; selects the argument type.
    pub name: String,
    /// Decoded argument object, when configured.
    pub args: Option<ArgsObject>,
}

// ============================================================================
// SECTION: Metrics
// ============================================================================

/// Metrics collection toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsCollector {
    /// Collect node utilization through the metrics API.
    pub enabled: bool,
}

/// Source of metrics used by utilization-aware plugins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsProvider {
    /// Provider kind.
    pub source: MetricsSource,
    /// Prometheus settings, meaningful when `source` is Prometheus.
    pub prometheus: Option<Prometheus>,
}

/// Known metrics provider kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetricsSource {
    /// Kubernetes metrics server.
    KubernetesMetrics,
    /// Prometheus endpoint.
    Prometheus,
}

/// Prometheus connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Prometheus {
    /// Endpoint URL.
    pub url: String,
    /// Bearer token source.
    pub auth_token: Option<AuthToken>,
}

/// Bearer token source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthToken {
    /// Secret holding the token.
    pub secret_reference: Option<SecretReference>,
}

/// Reference to a namespaced secret.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SecretReference {
    /// Secret namespace.
    pub namespace: String,
    /// Secret name.
    pub name: String,
}
