// crates/descheduler-policy-runtime/src/args.rs
// ============================================================================
// Module: Plugin Argument Payloads
// Description: Encoded and decoded forms of plugin-defined configuration.
// Purpose: Bridge raw tagged payloads and typed argument objects by kind.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A plugin argument payload travels in two shapes. The versioned document
//! carries [`RawArgs`]: an optional type identifier (the *kind*) plus JSON
//! bytes. The canonical document carries an [`ArgsObject`]: a decoded value
//! behind the [`PluginArgs`] trait. The [`ArgsRegistry`] maps kinds to decode
//! functions and binds plugin names to kinds.
//! Invariants:
//! - A kind has exactly one decoder; a plugin name has at most one kind.
//! - Decode resolves the kind from the payload first, then from the plugin
//!   binding, and rejects payloads whose kind disagrees with the binding.
//!   Plugin encode applies the same binding check.
//! - Encoded payloads are always JSON objects; empty bytes mean `{}`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::any::type_name;
use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::DeserializeOwned;
use serde::de::Error as _;
use serde::ser::Error as _;
use serde_json::Map;
use serde_json::Value;

use crate::error::ArgsError;
use crate::error::RegistrationError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Member of the inline args object that carries the type identifier.
pub const KIND_FIELD: &str = "kind";
/// Payload bytes standing in for an empty payload.
const EMPTY_OBJECT: &[u8] = b"{}";

// ============================================================================
// SECTION: Typed Args
// ============================================================================

/// Decoded plugin argument object.
pub trait PluginArgs: Any + Send + Sync + fmt::Debug {
    /// Returns the type identifier of this object.
    fn kind(&self) -> &'static str;

    /// Serializes this object into payload bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ArgsError::Encode`] when serialization fails.
    fn encode(&self) -> Result<Vec<u8>, ArgsError>;

    /// Returns this object as [`Any`] for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Clones this object behind a new box.
    fn clone_args(&self) -> Box<dyn PluginArgs>;

    /// Compares with another object of any kind.
    fn eq_args(&self, other: &dyn PluginArgs) -> bool;
}

/// Serde-backed argument type with a fixed type identifier.
///
/// Implementing this trait is enough to obtain [`PluginArgs`].
pub trait TypedArgs:
    Serialize + DeserializeOwned + Clone + PartialEq + fmt::Debug + Send + Sync + 'static
{
    /// Type identifier written into encoded payloads.
    const KIND: &'static str;
}

impl<T: TypedArgs> PluginArgs for T {
    fn kind(&self) -> &'static str {
        T::KIND
    }

    fn encode(&self) -> Result<Vec<u8>, ArgsError> {
        serde_json::to_vec(self).map_err(|err| ArgsError::Encode {
            kind: T::KIND.to_string(),
            message: err.to_string(),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_args(&self) -> Box<dyn PluginArgs> {
        Box::new(self.clone())
    }

    fn eq_args(&self, other: &dyn PluginArgs) -> bool {
        other.as_any().downcast_ref::<T>().is_some_and(|other| self == other)
    }
}

/// Owned decoded argument object stored in the canonical document.
pub struct ArgsObject(Box<dyn PluginArgs>);

impl ArgsObject {
    /// Wraps a typed argument value.
    #[must_use]
    pub fn new<T: PluginArgs>(args: T) -> Self {
        Self(Box::new(args))
    }

    /// Returns the type identifier of the wrapped object.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.0.kind()
    }

    /// Borrows the wrapped object as a concrete type.
    #[must_use]
    pub fn downcast_ref<T: PluginArgs>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Borrows the wrapped trait object.
    #[must_use]
    pub fn as_plugin_args(&self) -> &dyn PluginArgs {
        self.0.as_ref()
    }
}

impl Clone for ArgsObject {
    fn clone(&self) -> Self {
        Self(self.0.clone_args())
    }
}

impl PartialEq for ArgsObject {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_args(other.0.as_ref())
    }
}

impl fmt::Debug for ArgsObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

// ============================================================================
// SECTION: Raw Args
// ============================================================================

/// Encoded plugin argument payload: type identifier plus JSON bytes.
///
/// On the wire it is one inline object; the `kind` member is lifted into
/// [`RawArgs::kind`] and every other member stays in [`RawArgs::raw`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawArgs {
    /// Type identifier, when the payload is tagged.
    pub kind: Option<String>,
    /// JSON object bytes without the `kind` member.
    pub raw: Vec<u8>,
}

impl RawArgs {
    /// Creates a tagged payload.
    #[must_use]
    pub fn tagged(kind: impl Into<String>, raw: Vec<u8>) -> Self {
        Self {
            kind: Some(kind.into()),
            raw,
        }
    }

    /// Creates an untagged payload resolved later by plugin name.
    #[must_use]
    pub const fn untagged(raw: Vec<u8>) -> Self {
        Self {
            kind: None,
            raw,
        }
    }
}

impl Serialize for RawArgs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut object: Map<String, Value> = if self.raw.is_empty() {
            Map::new()
        } else {
            serde_json::from_slice(&self.raw)
                .map_err(|err| S::Error::custom(format!("args payload is not an object: {err}")))?
        };
        if let Some(kind) = &self.kind {
            object.insert(KIND_FIELD.to_string(), Value::String(kind.clone()));
        }
        object.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RawArgs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let Value::Object(mut object) = Value::deserialize(deserializer)? else {
            return Err(D::Error::custom("args must be an object"));
        };
        let kind = match object.remove(KIND_FIELD) {
            None => None,
            Some(Value::String(kind)) => Some(kind),
            Some(_) => return Err(D::Error::custom("args kind must be a string")),
        };
        let raw = serde_json::to_vec(&object).map_err(D::Error::custom)?;
        Ok(Self {
            kind,
            raw,
        })
    }
}

// ============================================================================
// SECTION: Args Registry
// ============================================================================

/// Decoder signature for one args kind.
type DecodeFn = fn(&[u8]) -> Result<ArgsObject, ArgsError>;

/// Registered decoder for one kind.
#[derive(Clone, Copy)]
struct ArgsEntry {
    /// Rust type name, for diagnostics.
    type_name: &'static str,
    /// Decoder.
    decode: DecodeFn,
}

/// Plugin argument codec registry.
///
/// # Invariants
/// - Kinds are unique; plugin bindings are unique and point at known kinds.
/// - Immutable after startup; shared by reference across conversions.
#[derive(Clone, Default)]
pub struct ArgsRegistry {
    /// Decoders keyed by type identifier.
    kinds: BTreeMap<String, ArgsEntry>,
    /// Plugin name to type identifier bindings.
    plugins: BTreeMap<String, String>,
}

impl ArgsRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a decoder for `T::KIND`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::DuplicateArgsKind`] when the kind exists.
    pub fn register_kind<T: TypedArgs>(&mut self) -> Result<(), RegistrationError> {
        if self.kinds.contains_key(T::KIND) {
            return Err(RegistrationError::DuplicateArgsKind {
                kind: T::KIND.to_string(),
            });
        }
        self.kinds.insert(
            T::KIND.to_string(),
            ArgsEntry {
                type_name: type_name::<T>(),
                decode: decode_typed::<T>,
            },
        );
        Ok(())
    }

    /// Binds a plugin name to an already registered kind.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError`] when the plugin is already bound or the
    /// kind is unknown.
    pub fn bind_plugin(
        &mut self,
        plugin: impl Into<String>,
        kind: &str,
    ) -> Result<(), RegistrationError> {
        let plugin = plugin.into();
        if !self.kinds.contains_key(kind) {
            return Err(RegistrationError::UnknownArgsKind {
                plugin,
                kind: kind.to_string(),
            });
        }
        if self.plugins.contains_key(&plugin) {
            return Err(RegistrationError::DuplicatePluginBinding {
                plugin,
            });
        }
        self.plugins.insert(plugin, kind.to_string());
        Ok(())
    }

    /// Registers `T::KIND` when missing and binds the plugin name to it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::DuplicatePluginBinding`] when the plugin
    /// is already bound.
    pub fn register_plugin<T: TypedArgs>(
        &mut self,
        plugin: impl Into<String>,
    ) -> Result<(), RegistrationError> {
        if !self.kinds.contains_key(T::KIND) {
            self.register_kind::<T>()?;
        }
        self.bind_plugin(plugin, T::KIND)
    }

    /// Returns the kind bound to a plugin name.
    #[must_use]
    pub fn kind_for_plugin(&self, plugin: &str) -> Option<&str> {
        self.plugins.get(plugin).map(String::as_str)
    }

    /// Returns true when a decoder exists for the kind.
    #[must_use]
    pub fn is_registered(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }

    /// Iterates registered kinds with their Rust type names, sorted by kind.
    pub fn kinds(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.kinds.iter().map(|(kind, entry)| (kind.as_str(), entry.type_name))
    }

    /// Iterates plugin bindings, sorted by plugin name.
    pub fn plugin_bindings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.plugins.iter().map(|(plugin, kind)| (plugin.as_str(), kind.as_str()))
    }

    /// Decodes payload bytes as the given kind.
    ///
    /// # Errors
    ///
    /// Empty bytes decode as the empty object, matching their wire form.
    ///
    /// # Errors
    ///
    /// Returns [`ArgsError::UnknownType`] when no decoder is registered, or
    /// [`ArgsError::Decode`] when the bytes do not match the type.
    pub fn decode(&self, kind: &str, raw: &[u8]) -> Result<ArgsObject, ArgsError> {
        let Some(entry) = self.kinds.get(kind) else {
            return Err(ArgsError::UnknownType {
                kind: kind.to_string(),
            });
        };
        let raw = if raw.is_empty() { EMPTY_OBJECT } else { raw };
        (entry.decode)(raw)
    }

    /// Encodes a typed object into a tagged payload.
    ///
    /// # Errors
    ///
    /// Returns [`ArgsError::Encode`] when serialization fails or the object
    /// does not serialize to a JSON object.
    pub fn encode(&self, args: &ArgsObject) -> Result<RawArgs, ArgsError> {
        let plugin_args = args.as_plugin_args();
        let raw = plugin_args.encode()?;
        if serde_json::from_slice::<Map<String, Value>>(&raw).is_err() {
            return Err(ArgsError::Encode {
                kind: plugin_args.kind().to_string(),
                message: "args must encode to a JSON object".to_string(),
            });
        }
        Ok(RawArgs::tagged(plugin_args.kind(), raw))
    }

    /// Encodes a plugin's typed object, rejecting a kind that disagrees with
    /// the plugin name's binding.
    ///
    /// # Errors
    ///
    /// Returns [`ArgsError::KindMismatch`] when the plugin is bound to another
    /// kind, or [`ArgsError::Encode`] when encoding fails.
    pub fn encode_for_plugin(&self, plugin: &str, args: &ArgsObject) -> Result<RawArgs, ArgsError> {
        if let Some(expected) = self.kind_for_plugin(plugin)
            && expected != args.kind()
        {
            return Err(ArgsError::KindMismatch {
                plugin: plugin.to_string(),
                declared: args.kind().to_string(),
                expected: expected.to_string(),
            });
        }
        self.encode(args)
    }

    /// Resolves the kind for a plugin payload and decodes it.
    ///
    /// # Errors
    ///
    /// Returns [`ArgsError`] when the kind cannot be resolved, disagrees with
    /// the plugin binding, is unknown, or the bytes fail to decode.
    pub fn decode_for_plugin(
        &self,
        plugin: &str,
        payload: &RawArgs,
    ) -> Result<ArgsObject, ArgsError> {
        let bound = self.kind_for_plugin(plugin);
        let kind = match (payload.kind.as_deref(), bound) {
            (Some(declared), Some(expected)) if declared != expected => {
                return Err(ArgsError::KindMismatch {
                    plugin: plugin.to_string(),
                    declared: declared.to_string(),
                    expected: expected.to_string(),
                });
            }
            (Some(declared), _) => declared,
            (None, Some(expected)) => expected,
            (None, None) => {
                return Err(ArgsError::UnresolvedPlugin {
                    plugin: plugin.to_string(),
                });
            }
        };
        self.decode(kind, &payload.raw)
    }
}

impl fmt::Debug for ArgsRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgsRegistry")
            .field("kinds", &self.kinds.keys().collect::<Vec<_>>())
            .field("plugins", &self.plugins)
            .finish()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Decodes bytes into `T` and boxes the result.
fn decode_typed<T: TypedArgs>(raw: &[u8]) -> Result<ArgsObject, ArgsError> {
    serde_json::from_slice::<T>(raw).map(ArgsObject::new).map_err(|err| ArgsError::Decode {
        kind: T::KIND.to_string(),
        message: err.to_string(),
    })
}
