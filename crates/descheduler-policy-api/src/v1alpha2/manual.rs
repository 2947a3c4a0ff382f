// crates/descheduler-policy-api/src/v1alpha2/manual.rs
// ============================================================================
// Module: v1alpha2 Hand-Written Converters
// Description: Converters for pairs that are not a pure structural mirror.
// Purpose: Reconcile the root document header and decode plugin payloads.
// Dependencies: descheduler-policy-runtime
// ============================================================================

//! ## Overview
//! Three pairs are registered into the manual table and so take precedence
//! over any field-mirroring converter:
//! - `v1alpha2::DeschedulerPolicy -> internal::DeschedulerPolicy` drops the
//!   type header, which has no canonical counterpart.
//! - `internal::DeschedulerPolicy -> v1alpha2::DeschedulerPolicy` stamps the
//!   header.
//! - `v1alpha2::PluginConfig -> internal::PluginConfig` resolves the payload
//!   type from the plugin name and decodes it.
//!
//! Eviction caps and metrics providers are copied, not merged: both schemas
//! carry the same field set for this version pair.

use descheduler_policy_runtime::ConversionError;
use descheduler_policy_runtime::ConversionRegistry;
use descheduler_policy_runtime::RegistrationError;
use descheduler_policy_runtime::Scope;

use super::DeschedulerPolicy;
use super::PluginConfig;
use super::TypeMeta;
use super::conversion::auto_convert_policy_from_internal;
use super::conversion::auto_convert_policy_to_internal;
use crate::internal as api;

/// Registers the hand-written converters.
///
/// # Errors
///
/// Returns [`RegistrationError::Conflict`] when a pair is already present in
/// the manual table.
pub fn register_manual(registry: &mut ConversionRegistry) -> Result<(), RegistrationError> {
    registry.add_conversion::<api::DeschedulerPolicy, DeschedulerPolicy>(
        convert_policy_from_internal,
    )?;
    registry.add_conversion::<DeschedulerPolicy, api::DeschedulerPolicy>(
        convert_policy_to_internal,
    )?;
    registry.add_conversion::<PluginConfig, api::PluginConfig>(convert_plugin_config_to_internal)?;
    Ok(())
}

/// Converts a v1alpha2 document into the canonical model, dropping the header.
///
/// # Errors
///
/// Returns the first nested [`ConversionError`].
pub fn convert_policy_to_internal(
    input: &DeschedulerPolicy,
    scope: &Scope<'_>,
) -> Result<api::DeschedulerPolicy, ConversionError> {
    auto_convert_policy_to_internal(input, scope)
}

/// Converts a canonical document into v1alpha2 and stamps the type header.
///
/// # Errors
///
/// Returns the first nested [`ConversionError`].
pub fn convert_policy_from_internal(
    input: &api::DeschedulerPolicy,
    scope: &Scope<'_>,
) -> Result<DeschedulerPolicy, ConversionError> {
    let mut output = auto_convert_policy_from_internal(input, scope)?;
    output.type_meta = TypeMeta::policy();
    Ok(output)
}

/// Decodes a plugin payload into its typed argument object.
///
/// An absent payload stays absent; a present one is resolved by its embedded
/// kind or by the plugin name's binding.
///
/// # Errors
///
/// Returns [`ConversionError::Args`] when the kind is unknown, unresolvable,
/// disagrees with the plugin binding, or the bytes fail to decode.
pub fn convert_plugin_config_to_internal(
    input: &PluginConfig,
    scope: &Scope<'_>,
) -> Result<api::PluginConfig, ConversionError> {
    let args = match &input.args {
        Some(payload) => Some(scope.args().decode_for_plugin(&input.name, payload)?),
        None => None,
    };
    Ok(api::PluginConfig {
        name: input.name.clone(),
        args,
    })
}
