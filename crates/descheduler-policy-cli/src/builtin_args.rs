// crates/descheduler-policy-cli/src/builtin_args.rs
// ============================================================================
// Module: Built-In Plugin Args
// Description: Typed argument schemas for the plugins this CLI understands.
// Purpose: Populate the args registry used to decode plugin payloads.
// Dependencies: serde, descheduler-policy-runtime
// ============================================================================

//! ## Overview
//! Each plugin this CLI decodes has a serde type with a fixed args kind.
//! [`builtin_args_registry`] registers them under their plugin names and then
//! applies configured aliases.

use descheduler_policy_runtime::ArgsRegistry;
use descheduler_policy_runtime::RegistrationError;
use descheduler_policy_runtime::TypedArgs;
use serde::Deserialize;
use serde::Serialize;

use crate::config::PluginArgsAlias;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Plugin name of the default evictor.
pub const DEFAULT_EVICTOR: &str = "DefaultEvictor";
/// Plugin name of the restart-count strategy.
pub const REMOVE_PODS_HAVING_TOO_MANY_RESTARTS: &str = "RemovePodsHavingTooManyRestarts";
/// Plugin name of the duplicate-pod strategy.
pub const REMOVE_DUPLICATES: &str = "RemoveDuplicates";

/// Every args kind registered by [`builtin_args_registry`].
pub const BUILTIN_KINDS: [&str; 3] = [
    DefaultEvictorArgs::KIND,
    RemovePodsHavingTooManyRestartsArgs::KIND,
    RemoveDuplicatesArgs::KIND,
];

// ============================================================================
// SECTION: Shared Types
// ============================================================================

/// Namespace include/exclude filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Namespaces {
    /// Only these namespaces are considered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
    /// These namespaces are skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
}

/// Pod priority threshold, by value or by priority class name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PriorityThreshold {
    /// Numeric priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,
    /// Priority class name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// ============================================================================
// SECTION: Args Types
// ============================================================================

/// Arguments of the `DefaultEvictor` filter plugin.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DefaultEvictorArgs {
    /// Only evict pods on nodes matching this selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_selector: Option<String>,
    /// Allow evicting pods with local storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evict_local_storage_pods: Option<bool>,
    /// Allow evicting daemon set pods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evict_daemon_set_pods: Option<bool>,
    /// Allow evicting system critical pods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evict_system_critical_pods: Option<bool>,
    /// Skip pods that mount persistent volume claims.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_pvc_pods: Option<bool>,
    /// Allow evicting failed pods without an owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evict_failed_bare_pods: Option<bool>,
    /// Only evict pods below this priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_threshold: Option<PriorityThreshold>,
    /// Only evict pods that fit on another node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_fit: Option<bool>,
    /// Skip owners with fewer replicas than this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_replicas: Option<u32>,
    /// Skip pods younger than this duration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_pod_age: Option<String>,
}

impl TypedArgs for DefaultEvictorArgs {
    const KIND: &'static str = "DefaultEvictorArgs";
}

/// Arguments of the `RemovePodsHavingTooManyRestarts` deschedule plugin.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RemovePodsHavingTooManyRestartsArgs {
    /// Namespace filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespaces: Option<Namespaces>,
    /// Restart count at which a pod is evicted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_restart_threshold: Option<i32>,
    /// Count init container restarts too.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub including_init_containers: Option<bool>,
    /// Container states that qualify a pod.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub states: Option<Vec<String>>,
}

impl TypedArgs for RemovePodsHavingTooManyRestartsArgs {
    const KIND: &'static str = "RemovePodsHavingTooManyRestartsArgs";
}

/// Arguments of the `RemoveDuplicates` balance plugin.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RemoveDuplicatesArgs {
    /// Namespace filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespaces: Option<Namespaces>,
    /// Owner kinds whose pods are never treated as duplicates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_owner_kinds: Option<Vec<String>>,
}

impl TypedArgs for RemoveDuplicatesArgs {
    const KIND: &'static str = "RemoveDuplicatesArgs";
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Builds the args registry with every built-in plugin and the given aliases.
///
/// # Errors
///
/// Returns [`RegistrationError`] when an alias rebinds a plugin or names an
/// unknown kind.
pub fn builtin_args_registry(
    aliases: &[PluginArgsAlias],
) -> Result<ArgsRegistry, RegistrationError> {
    let mut registry = ArgsRegistry::new();
    registry.register_plugin::<DefaultEvictorArgs>(DEFAULT_EVICTOR)?;
    registry.register_plugin::<RemovePodsHavingTooManyRestartsArgs>(
        REMOVE_PODS_HAVING_TOO_MANY_RESTARTS,
    )?;
    registry.register_plugin::<RemoveDuplicatesArgs>(REMOVE_DUPLICATES)?;
    for alias in aliases {
        registry.bind_plugin(alias.plugin.clone(), &alias.kind)?;
    }
    Ok(registry)
}
