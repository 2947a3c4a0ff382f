// crates/descheduler-policy-api/src/v1alpha2/conversion.rs
// ============================================================================
// Module: v1alpha2 Field Converters
// Description: Field-mirroring converters between v1alpha2 and internal.
// Purpose: Map every entity field by field in both directions.
// Dependencies: descheduler-policy-runtime
// ============================================================================

//! ## Overview
//! One `auto_convert_*` function per entity and direction copies fields one
//! to one, recursing through [`Scope`] for nested entities so manual
//! overrides apply at any depth. Pairs without a hand-written counterpart are
//! registered into the generated table by [`register_generated`]; the
//! `auto_convert_*` functions for overridden pairs stay callable so the
//! manual converters can delegate to them.

use descheduler_policy_runtime::ConversionError;
use descheduler_policy_runtime::ConversionRegistry;
use descheduler_policy_runtime::RegistrationError;
use descheduler_policy_runtime::Scope;
use descheduler_policy_runtime::convert_optional_slice;
use descheduler_policy_runtime::copy_optional_slice;

use super::AuthToken;
use super::DeschedulerPolicy;
use super::DeschedulerProfile;
use super::MetricsCollector;
use super::MetricsProvider;
use super::MetricsSource;
use super::PluginConfig;
use super::PluginSet;
use super::Plugins;
use super::Prometheus;
use super::SecretReference;
use super::TypeMeta;
use crate::internal as api;

// ============================================================================
// SECTION: Registration
// ============================================================================

/// Registers the field-mirroring converters.
///
/// # Errors
///
/// Returns [`RegistrationError::Conflict`] when a pair is already present.
pub fn register_generated(registry: &mut ConversionRegistry) -> Result<(), RegistrationError> {
    registry.add_generated_conversion::<AuthToken, api::AuthToken>(
        auto_convert_auth_token_to_internal,
    )?;
    registry.add_generated_conversion::<api::AuthToken, AuthToken>(
        auto_convert_auth_token_from_internal,
    )?;
    registry.add_generated_conversion::<DeschedulerProfile, api::DeschedulerProfile>(
        auto_convert_profile_to_internal,
    )?;
    registry.add_generated_conversion::<api::DeschedulerProfile, DeschedulerProfile>(
        auto_convert_profile_from_internal,
    )?;
    registry.add_generated_conversion::<MetricsCollector, api::MetricsCollector>(
        auto_convert_metrics_collector_to_internal,
    )?;
    registry.add_generated_conversion::<api::MetricsCollector, MetricsCollector>(
        auto_convert_metrics_collector_from_internal,
    )?;
    registry.add_generated_conversion::<MetricsProvider, api::MetricsProvider>(
        auto_convert_metrics_provider_to_internal,
    )?;
    registry.add_generated_conversion::<api::MetricsProvider, MetricsProvider>(
        auto_convert_metrics_provider_from_internal,
    )?;
    registry.add_generated_conversion::<api::PluginConfig, PluginConfig>(
        auto_convert_plugin_config_from_internal,
    )?;
    registry.add_generated_conversion::<PluginSet, api::PluginSet>(
        auto_convert_plugin_set_to_internal,
    )?;
    registry.add_generated_conversion::<api::PluginSet, PluginSet>(
        auto_convert_plugin_set_from_internal,
    )?;
    registry.add_generated_conversion::<Plugins, api::Plugins>(auto_convert_plugins_to_internal)?;
    registry.add_generated_conversion::<api::Plugins, Plugins>(auto_convert_plugins_from_internal)?;
    registry.add_generated_conversion::<Prometheus, api::Prometheus>(
        auto_convert_prometheus_to_internal,
    )?;
    registry.add_generated_conversion::<api::Prometheus, Prometheus>(
        auto_convert_prometheus_from_internal,
    )?;
    registry.add_generated_conversion::<SecretReference, api::SecretReference>(
        auto_convert_secret_reference_to_internal,
    )?;
    registry.add_generated_conversion::<api::SecretReference, SecretReference>(
        auto_convert_secret_reference_from_internal,
    )?;
    Ok(())
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Mirrors the shared policy fields into the canonical model.
///
/// # Errors
///
/// Returns the first nested [`ConversionError`].
pub fn auto_convert_policy_to_internal(
    input: &DeschedulerPolicy,
    scope: &Scope<'_>,
) -> Result<api::DeschedulerPolicy, ConversionError> {
    Ok(api::DeschedulerPolicy {
        profiles: convert_optional_slice(input.profiles.as_deref(), scope)?,
        node_selector: input.node_selector.clone(),
        max_no_of_pods_to_evict_per_node: input.max_no_of_pods_to_evict_per_node,
        max_no_of_pods_to_evict_per_namespace: input.max_no_of_pods_to_evict_per_namespace,
        max_no_of_pods_to_evict_total: input.max_no_of_pods_to_evict_total,
        eviction_failure_event_notification: input.eviction_failure_event_notification,
        metrics_collector: scope.convert_optional(input.metrics_collector.as_ref())?,
        metrics_providers: convert_optional_slice(input.metrics_providers.as_deref(), scope)?,
        grace_period_seconds: input.grace_period_seconds,
    })
}

/// Mirrors the canonical policy fields into v1alpha2, leaving the header empty.
///
/// # Errors
///
/// Returns the first nested [`ConversionError`].
pub fn auto_convert_policy_from_internal(
    input: &api::DeschedulerPolicy,
    scope: &Scope<'_>,
) -> Result<DeschedulerPolicy, ConversionError> {
    Ok(DeschedulerPolicy {
        type_meta: TypeMeta::default(),
        profiles: convert_optional_slice(input.profiles.as_deref(), scope)?,
        node_selector: input.node_selector.clone(),
        max_no_of_pods_to_evict_per_node: input.max_no_of_pods_to_evict_per_node,
        max_no_of_pods_to_evict_per_namespace: input.max_no_of_pods_to_evict_per_namespace,
        max_no_of_pods_to_evict_total: input.max_no_of_pods_to_evict_total,
        eviction_failure_event_notification: input.eviction_failure_event_notification,
        metrics_collector: scope.convert_optional(input.metrics_collector.as_ref())?,
        metrics_providers: convert_optional_slice(input.metrics_providers.as_deref(), scope)?,
        grace_period_seconds: input.grace_period_seconds,
    })
}

/// Converts a profile into the canonical model.
///
/// # Errors
///
/// Returns the first nested [`ConversionError`].
pub fn auto_convert_profile_to_internal(
    input: &DeschedulerProfile,
    scope: &Scope<'_>,
) -> Result<api::DeschedulerProfile, ConversionError> {
    Ok(api::DeschedulerProfile {
        name: input.name.clone(),
        plugin_configs: convert_optional_slice(input.plugin_configs.as_deref(), scope)?,
        plugins: scope.convert(&input.plugins)?,
    })
}

/// Converts a canonical profile into v1alpha2.
///
/// # Errors
///
/// Returns the first nested [`ConversionError`].
pub fn auto_convert_profile_from_internal(
    input: &api::DeschedulerProfile,
    scope: &Scope<'_>,
) -> Result<DeschedulerProfile, ConversionError> {
    Ok(DeschedulerProfile {
        name: input.name.clone(),
        plugin_configs: convert_optional_slice(input.plugin_configs.as_deref(), scope)?,
        plugins: scope.convert(&input.plugins)?,
    })
}

// ============================================================================
// SECTION: Plugins
// ============================================================================

/// Converts all six plugin sets into the canonical model.
///
/// # Errors
///
/// Returns the first nested [`ConversionError`].
pub fn auto_convert_plugins_to_internal(
    input: &Plugins,
    scope: &Scope<'_>,
) -> Result<api::Plugins, ConversionError> {
    Ok(api::Plugins {
        pre_sort: scope.convert(&input.pre_sort)?,
        sort: scope.convert(&input.sort)?,
        deschedule: scope.convert(&input.deschedule)?,
        balance: scope.convert(&input.balance)?,
        filter: scope.convert(&input.filter)?,
        pre_eviction_filter: scope.convert(&input.pre_eviction_filter)?,
    })
}

/// Converts all six canonical plugin sets into v1alpha2.
///
/// # Errors
///
/// Returns the first nested [`ConversionError`].
pub fn auto_convert_plugins_from_internal(
    input: &api::Plugins,
    scope: &Scope<'_>,
) -> Result<Plugins, ConversionError> {
    Ok(Plugins {
        pre_sort: scope.convert(&input.pre_sort)?,
        sort: scope.convert(&input.sort)?,
        deschedule: scope.convert(&input.deschedule)?,
        balance: scope.convert(&input.balance)?,
        filter: scope.convert(&input.filter)?,
        pre_eviction_filter: scope.convert(&input.pre_eviction_filter)?,
    })
}

/// Copies enabled and disabled plugin names.
///
/// # Errors
///
/// Never fails; the signature matches the registry.
pub fn auto_convert_plugin_set_to_internal(
    input: &PluginSet,
    _scope: &Scope<'_>,
) -> Result<api::PluginSet, ConversionError> {
    Ok(api::PluginSet {
        enabled: copy_optional_slice(input.enabled.as_deref()),
        disabled: copy_optional_slice(input.disabled.as_deref()),
    })
}

/// Copies enabled and disabled plugin names.
///
/// # Errors
///
/// Never fails; the signature matches the registry.
pub fn auto_convert_plugin_set_from_internal(
    input: &api::PluginSet,
    _scope: &Scope<'_>,
) -> Result<PluginSet, ConversionError> {
    Ok(PluginSet {
        enabled: copy_optional_slice(input.enabled.as_deref()),
        disabled: copy_optional_slice(input.disabled.as_deref()),
    })
}

/// Encodes a canonical plugin config's typed arguments into a tagged payload.
///
/// A plugin name bound to a kind only accepts objects of that kind, so every
/// payload written here decodes again under the same name.
///
/// # Errors
///
/// Returns [`ConversionError::Args`] when the object's kind disagrees with the
/// plugin binding or the arguments fail to encode.
pub fn auto_convert_plugin_config_from_internal(
    input: &api::PluginConfig,
    scope: &Scope<'_>,
) -> Result<PluginConfig, ConversionError> {
    let args = match &input.args {
        Some(args) => Some(scope.args().encode_for_plugin(&input.name, args)?),
        None => None,
    };
    Ok(PluginConfig {
        name: input.name.clone(),
        args,
    })
}

// ============================================================================
// SECTION: Metrics
// ============================================================================

/// Copies the metrics collector toggle.
///
/// # Errors
///
/// Never fails; the signature matches the registry.
pub fn auto_convert_metrics_collector_to_internal(
    input: &MetricsCollector,
    _scope: &Scope<'_>,
) -> Result<api::MetricsCollector, ConversionError> {
    Ok(api::MetricsCollector {
        enabled: input.enabled,
    })
}

/// Copies the metrics collector toggle.
///
/// # Errors
///
/// Never fails; the signature matches the registry.
pub fn auto_convert_metrics_collector_from_internal(
    input: &api::MetricsCollector,
    _scope: &Scope<'_>,
) -> Result<MetricsCollector, ConversionError> {
    Ok(MetricsCollector {
        enabled: input.enabled,
    })
}

/// Converts a metrics provider, mapping the source tag by name.
///
/// # Errors
///
/// Returns [`ConversionError::UnrecognizedTag`] for an unknown source tag.
pub fn auto_convert_metrics_provider_to_internal(
    input: &MetricsProvider,
    scope: &Scope<'_>,
) -> Result<api::MetricsProvider, ConversionError> {
    Ok(api::MetricsProvider {
        source: metrics_source_to_internal(&input.source)?,
        prometheus: scope.convert_optional(input.prometheus.as_ref())?,
    })
}

/// Converts a canonical metrics provider.
///
/// # Errors
///
/// Returns the nested Prometheus [`ConversionError`].
pub fn auto_convert_metrics_provider_from_internal(
    input: &api::MetricsProvider,
    scope: &Scope<'_>,
) -> Result<MetricsProvider, ConversionError> {
    Ok(MetricsProvider {
        source: metrics_source_from_internal(input.source),
        prometheus: scope.convert_optional(input.prometheus.as_ref())?,
    })
}

/// Maps a wire tag onto the closed canonical enum.
///
/// # Errors
///
/// Returns [`ConversionError::UnrecognizedTag`] naming the tag.
pub fn metrics_source_to_internal(
    input: &MetricsSource,
) -> Result<api::MetricsSource, ConversionError> {
    match input.as_str() {
        MetricsSource::KUBERNETES_METRICS => Ok(api::MetricsSource::KubernetesMetrics),
        MetricsSource::PROMETHEUS => Ok(api::MetricsSource::Prometheus),
        other => Err(ConversionError::UnrecognizedTag {
            enum_name: "MetricsSource",
            tag: other.to_string(),
        }),
    }
}

/// Maps a canonical source onto its wire tag.
#[must_use]
pub fn metrics_source_from_internal(input: api::MetricsSource) -> MetricsSource {
    match input {
        api::MetricsSource::KubernetesMetrics => {
            MetricsSource::new(MetricsSource::KUBERNETES_METRICS)
        }
        api::MetricsSource::Prometheus => MetricsSource::new(MetricsSource::PROMETHEUS),
    }
}

/// Converts Prometheus settings.
///
/// # Errors
///
/// Returns the nested auth token [`ConversionError`].
pub fn auto_convert_prometheus_to_internal(
    input: &Prometheus,
    scope: &Scope<'_>,
) -> Result<api::Prometheus, ConversionError> {
    Ok(api::Prometheus {
        url: input.url.clone(),
        auth_token: scope.convert_optional(input.auth_token.as_ref())?,
    })
}

/// Converts canonical Prometheus settings.
///
/// # Errors
///
/// Returns the nested auth token [`ConversionError`].
pub fn auto_convert_prometheus_from_internal(
    input: &api::Prometheus,
    scope: &Scope<'_>,
) -> Result<Prometheus, ConversionError> {
    Ok(Prometheus {
        url: input.url.clone(),
        auth_token: scope.convert_optional(input.auth_token.as_ref())?,
    })
}

/// Converts an auth token source.
///
/// # Errors
///
/// Returns the nested secret reference [`ConversionError`].
pub fn auto_convert_auth_token_to_internal(
    input: &AuthToken,
    scope: &Scope<'_>,
) -> Result<api::AuthToken, ConversionError> {
    Ok(api::AuthToken {
        secret_reference: scope.convert_optional(input.secret_reference.as_ref())?,
    })
}

/// Converts a canonical auth token source.
///
/// # Errors
///
/// Returns the nested secret reference [`ConversionError`].
pub fn auto_convert_auth_token_from_internal(
    input: &api::AuthToken,
    scope: &Scope<'_>,
) -> Result<AuthToken, ConversionError> {
    Ok(AuthToken {
        secret_reference: scope.convert_optional(input.secret_reference.as_ref())?,
    })
}

/// Copies a secret reference.
///
/// # Errors
///
/// Never fails; the signature matches the registry.
pub fn auto_convert_secret_reference_to_internal(
    input: &SecretReference,
    _scope: &Scope<'_>,
) -> Result<api::SecretReference, ConversionError> {
    Ok(api::SecretReference {
        namespace: input.namespace.clone(),
        name: input.name.clone(),
    })
}

/// Copies a secret reference.
///
/// # Errors
///
/// Never fails; the signature matches the registry.
pub fn auto_convert_secret_reference_from_internal(
    input: &api::SecretReference,
    _scope: &Scope<'_>,
) -> Result<SecretReference, ConversionError> {
    Ok(SecretReference {
        namespace: input.namespace.clone(),
        name: input.name.clone(),
    })
}
