// crates/descheduler-policy-runtime/src/error.rs
// ============================================================================
// Module: Conversion Errors
// Description: Error taxonomy for registration, conversion, and payload codecs.
// Purpose: Give every failure path a structured, non-swallowed error value.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Three error families exist. [`RegistrationError`] is raised while the
//! registries are being built and is fatal for startup. [`ConversionError`]
//! is returned by conversion calls and is propagated verbatim to the caller.
//! [`ArgsError`] covers the plugin argument payload codec and is carried
//! transparently inside [`ConversionError`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::registry::ConversionOrigin;

// ============================================================================
// SECTION: Registration Errors
// ============================================================================

/// Errors raised while populating a registry at startup.
///
/// # Invariants
/// - Any of these aborts initialization; no registry is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A converter for the same ordered type pair already exists in the table.
    #[error("{origin} conversion already registered: {source_type} -> {destination_type}")]
    Conflict {
        /// Source type name.
        source_type: &'static str,
        /// Destination type name.
        destination_type: &'static str,
        /// Table the duplicate was registered into.
        origin: ConversionOrigin,
    },
    /// An args kind was registered twice.
    #[error("args kind already registered: {kind}")]
    DuplicateArgsKind {
        /// Offending type identifier.
        kind: String,
    },
    /// A plugin name was bound to an args kind twice.
    #[error("plugin already bound to args kind: {plugin}")]
    DuplicatePluginBinding {
        /// Offending plugin name.
        plugin: String,
    },
    /// A plugin name was bound to an args kind that has no decoder.
    #[error("cannot bind plugin {plugin}: args kind not registered: {kind}")]
    UnknownArgsKind {
        /// Plugin name being bound.
        plugin: String,
        /// Missing type identifier.
        kind: String,
    },
}

// ============================================================================
// SECTION: Args Errors
// ============================================================================

/// Errors raised by the plugin argument payload codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    /// No decoder is registered for the type identifier.
    #[error("unknown args type: {kind}")]
    UnknownType {
        /// Unregistered type identifier.
        kind: String,
    },
    /// The payload carries no type identifier and the plugin has no binding.
    #[error("cannot resolve args type for plugin {plugin}: untagged payload, no binding")]
    UnresolvedPlugin {
        /// Plugin name from the enclosing plugin config.
        plugin: String,
    },
    /// The payload type identifier disagrees with the plugin binding.
    #[error("args kind mismatch for plugin {plugin}: payload {declared}, bound {expected}")]
    KindMismatch {
        /// Plugin name from the enclosing plugin config.
        plugin: String,
        /// Type identifier embedded in the payload.
        declared: String,
        /// Type identifier bound to the plugin.
        expected: String,
    },
    /// Payload bytes could not be decoded into the registered type.
    #[error("failed to decode {kind} args: {message}")]
    Decode {
        /// Type identifier being decoded.
        kind: String,
        /// Decoder error message.
        message: String,
    },
    /// A typed object could not be serialized.
    #[error("failed to encode {kind} args: {message}")]
    Encode {
        /// Type identifier being encoded.
        kind: String,
        /// Serializer error message.
        message: String,
    },
}

// ============================================================================
// SECTION: Conversion Errors
// ============================================================================

/// Errors returned by conversion calls.
///
/// # Invariants
/// - Nested failures are returned unchanged; no partial output is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// No converter is registered for the requested ordered type pair.
    #[error("no conversion registered: {source_type} -> {destination_type}")]
    NotRegistered {
        /// Source type name.
        source_type: &'static str,
        /// Destination type name.
        destination_type: &'static str,
    },
    /// A registered converter produced or received a value of the wrong type.
    #[error("conversion type mismatch: {source_type} -> {destination_type}")]
    TypeMismatch {
        /// Source type name.
        source_type: &'static str,
        /// Destination type name.
        destination_type: &'static str,
    },
    /// An enum tag has no counterpart in the destination schema.
    #[error("unrecognized {enum_name} tag: {tag}")]
    UnrecognizedTag {
        /// Enum being converted.
        enum_name: &'static str,
        /// Offending tag value.
        tag: String,
    },
    /// Plugin argument payload codec failure.
    #[error(transparent)]
    Args(#[from] ArgsError),
}
