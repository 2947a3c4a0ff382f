// crates/descheduler-policy-api/src/lib.rs
// ============================================================================
// Module: Descheduler Policy API
// Description: Canonical and versioned descheduler policy document models.
// Purpose: Define both schemas and the converters registered between them.
// Dependencies: descheduler-policy-runtime, serde
// ============================================================================

//! ## Overview
//! [`internal`] holds the canonical document the engine consumes.
//! [`v1alpha2`] holds the user-facing schema and its converters. A registry
//! that knows every converter in this crate comes from [`registry_builder`].
//!
//! ```
//! use descheduler_policy_api::internal;
//! use descheduler_policy_api::registry_builder;
//! use descheduler_policy_api::v1alpha2;
//! use descheduler_policy_runtime::ArgsRegistry;
//!
//! let conversions = registry_builder().build()?;
//! let args = ArgsRegistry::new();
//! let scope = conversions.scope(&args);
//! let versioned = v1alpha2::DeschedulerPolicy {
//!     profiles: Some(Vec::new()),
//!     ..v1alpha2::DeschedulerPolicy::default()
//! };
//! let canonical: internal::DeschedulerPolicy = scope.convert(&versioned)?;
//! assert_eq!(canonical.profiles, Some(Vec::new()));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod extension;
pub mod internal;
pub mod v1alpha2;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use extension::ExtensionPoint;

// ============================================================================
// SECTION: Registry
// ============================================================================

use descheduler_policy_runtime::RegistryBuilder;

/// Returns a builder that registers every schema version in this crate.
#[must_use]
pub fn registry_builder() -> RegistryBuilder {
    RegistryBuilder::new().register(v1alpha2::register_conversions)
}
