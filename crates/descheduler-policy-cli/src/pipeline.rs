// crates/descheduler-policy-cli/src/pipeline.rs
// ============================================================================
// Module: Conversion Pipeline
// Description: Owned registries plus document conversion and summaries.
// Purpose: Run versioned documents through the canonical model.
// Dependencies: serde, descheduler-policy-api, descheduler-policy-runtime
// ============================================================================

//! ## Overview
//! [`PolicyConverter`] owns the conversion registry and the args registry,
//! built once at startup. It converts v1alpha2 documents to the canonical
//! model and back, and summarizes canonical documents for inspection.

use std::collections::BTreeMap;

use descheduler_policy_api::ExtensionPoint;
use descheduler_policy_api::internal;
use descheduler_policy_api::registry_builder;
use descheduler_policy_api::v1alpha2;
use descheduler_policy_runtime::ArgsRegistry;
use descheduler_policy_runtime::ConversionError;
use descheduler_policy_runtime::ConversionPair;
use descheduler_policy_runtime::ConversionRegistry;
use descheduler_policy_runtime::RegistrationError;
use descheduler_policy_runtime::Scope;
use serde::Serialize;

use crate::builtin_args::builtin_args_registry;
use crate::config::PluginArgsAlias;

// ============================================================================
// SECTION: Converter
// ============================================================================

/// Startup-built registries and the conversions that use them.
#[derive(Debug)]
pub struct PolicyConverter {
    /// Converter table for every registered schema version.
    conversions: ConversionRegistry,
    /// Plugin args codec.
    args: ArgsRegistry,
}

impl PolicyConverter {
    /// Builds the registries with built-in args and configured aliases.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError`] when any registration conflicts.
    pub fn new(aliases: &[PluginArgsAlias]) -> Result<Self, RegistrationError> {
        Ok(Self {
            conversions: registry_builder().build()?,
            args: builtin_args_registry(aliases)?,
        })
    }

    /// Returns the args registry.
    #[must_use]
    pub const fn args(&self) -> &ArgsRegistry {
        &self.args
    }

    /// Returns every registered conversion pair.
    #[must_use]
    pub fn pairs(&self) -> Vec<ConversionPair> {
        self.conversions.pairs()
    }

    /// Returns a scope over both registries.
    #[must_use]
    pub const fn scope(&self) -> Scope<'_> {
        self.conversions.scope(&self.args)
    }

    /// Converts a versioned document to the canonical model.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConversionError`] raised anywhere in the document.
    pub fn to_internal(
        &self,
        policy: &v1alpha2::DeschedulerPolicy,
    ) -> Result<internal::DeschedulerPolicy, ConversionError> {
        self.scope().convert(policy)
    }

    /// Converts a canonical document to v1alpha2.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConversionError`] raised anywhere in the document.
    pub fn from_internal(
        &self,
        policy: &internal::DeschedulerPolicy,
    ) -> Result<v1alpha2::DeschedulerPolicy, ConversionError> {
        self.scope().convert(policy)
    }

    /// Converts to canonical and back, yielding the normalized versioned form
    /// with every plugin payload re-encoded from its typed object.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConversionError`] in either direction.
    pub fn normalize(
        &self,
        policy: &v1alpha2::DeschedulerPolicy,
    ) -> Result<(internal::DeschedulerPolicy, v1alpha2::DeschedulerPolicy), ConversionError> {
        let canonical = self.to_internal(policy)?;
        let versioned = self.from_internal(&canonical)?;
        Ok((canonical, versioned))
    }
}

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Inspection view of a canonical document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicySummary {
    /// Profiles in declaration order.
    pub profiles: Vec<ProfileSummary>,
    /// Metrics provider sources in declaration order.
    pub metrics_providers: Vec<&'static str>,
    /// Eviction caps that are set.
    pub eviction_limits: BTreeMap<&'static str, u32>,
}

/// Inspection view of one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    /// Profile name.
    pub name: String,
    /// Enabled plugins per extension point, omitting empty points.
    pub enabled: BTreeMap<ExtensionPoint, Vec<String>>,
    /// Decoded args kind per configured plugin.
    pub plugin_args: Vec<PluginArgsSummary>,
}

/// Args kind decoded for one plugin config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginArgsSummary {
    /// Plugin name.
    pub plugin: String,
    /// Kind of the decoded object, absent when no args were given.
    pub kind: Option<&'static str>,
}

/// Summarizes a canonical document.
#[must_use]
pub fn summarize(policy: &internal::DeschedulerPolicy) -> PolicySummary {
    let profiles =
        policy.profiles.as_deref().unwrap_or_default().iter().map(summarize_profile).collect();
    let metrics_providers = policy
        .metrics_providers
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|provider| source_tag(provider.source))
        .collect();
    let eviction_limits = [
        ("maxNoOfPodsToEvictPerNode", policy.max_no_of_pods_to_evict_per_node),
        ("maxNoOfPodsToEvictPerNamespace", policy.max_no_of_pods_to_evict_per_namespace),
        ("maxNoOfPodsToEvictTotal", policy.max_no_of_pods_to_evict_total),
    ]
    .into_iter()
    .filter_map(|(name, value)| value.map(|value| (name, value)))
    .collect();
    PolicySummary {
        profiles,
        metrics_providers,
        eviction_limits,
    }
}

/// Wire tag of a canonical metrics source.
const fn source_tag(source: internal::MetricsSource) -> &'static str {
    match source {
        internal::MetricsSource::KubernetesMetrics => v1alpha2::MetricsSource::KUBERNETES_METRICS,
        internal::MetricsSource::Prometheus => v1alpha2::MetricsSource::PROMETHEUS,
    }
}

/// Summarizes one profile.
fn summarize_profile(profile: &internal::DeschedulerProfile) -> ProfileSummary {
    let enabled = ExtensionPoint::ALL
        .into_iter()
        .filter_map(|point| {
            let names = profile.plugins.plugin_set(point).enabled.as_deref().unwrap_or_default();
            (!names.is_empty()).then(|| (point, names.to_vec()))
        })
        .collect();
    let plugin_args = profile
        .plugin_configs
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|config| PluginArgsSummary {
            plugin: config.name.clone(),
            kind: config.args.as_ref().map(descheduler_policy_runtime::ArgsObject::kind),
        })
        .collect();
    ProfileSummary {
        name: profile.name.clone(),
        enabled,
        plugin_args,
    }
}
