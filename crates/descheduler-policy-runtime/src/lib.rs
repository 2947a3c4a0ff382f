// crates/descheduler-policy-runtime/src/lib.rs
// ============================================================================
// Module: Descheduler Policy Runtime
// Description: Conversion registry, scope, collections, and payload codec.
// Purpose: Schema-agnostic machinery shared by every policy API version.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This crate knows nothing about policy documents. It provides the
//! [`ConversionRegistry`] keyed by ordered type pair, the [`Scope`] passed to
//! every converter for nested lookups, sequence helpers that keep unset and
//! empty apart, and the [`ArgsRegistry`] that decodes plugin argument
//! payloads by type identifier.
//! Invariants:
//! - Registries are built once at startup and are read-only afterwards.
//! - Conversions are synchronous and pure; errors propagate unchanged.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod args;
pub mod collections;
pub mod error;
pub mod registry;
pub mod scope;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use args::ArgsObject;
pub use args::ArgsRegistry;
pub use args::PluginArgs;
pub use args::RawArgs;
pub use args::TypedArgs;
pub use collections::convert_optional_slice;
pub use collections::convert_slice;
pub use collections::copy_optional_slice;
pub use error::ArgsError;
pub use error::ConversionError;
pub use error::RegistrationError;
pub use registry::ConversionOrigin;
pub use registry::ConversionPair;
pub use registry::ConversionRegistry;
pub use registry::ConvertFn;
pub use registry::RegisterFn;
pub use registry::RegistryBuilder;
pub use scope::Scope;
