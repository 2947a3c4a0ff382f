// crates/descheduler-policy-runtime/src/registry.rs
// ============================================================================
// Module: Conversion Registry
// Description: Startup-time table of converters keyed by ordered type pair.
// Purpose: Dispatch conversions by type identity with explicit manual overrides.
// Dependencies: serde, std::any
// ============================================================================

//! ## Overview
//! The registry maps an ordered pair `(source type, destination type)` to a
//! converter function. It holds two tables: converters that mirror fields one
//! to one (`Generated`) and hand-written converters (`Manual`). Lookups prefer
//! the manual table, so a single pair can be overridden without touching any
//! other pair.
//! Invariants:
//! - A pair appears at most once per table; duplicates fail registration.
//! - The registry is immutable once built and is `Send + Sync`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::any::TypeId;
use std::any::type_name;
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::args::ArgsRegistry;
use crate::error::ConversionError;
use crate::error::RegistrationError;
use crate::scope::Scope;

// ============================================================================
// SECTION: Converter Types
// ============================================================================

/// Typed converter signature: borrow the input, allocate a fresh output.
pub type ConvertFn<A, B> = fn(&A, &Scope<'_>) -> Result<B, ConversionError>;

/// Type-erased converter stored in the tables.
type ErasedConvertFn =
    Box<dyn Fn(&dyn Any, &Scope<'_>) -> Result<Box<dyn Any>, ConversionError> + Send + Sync>;

/// Registration hook applied by [`RegistryBuilder`].
pub type RegisterFn = fn(&mut ConversionRegistry) -> Result<(), RegistrationError>;

/// Table a converter was registered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionOrigin {
    /// Field-mirroring converter.
    Generated,
    /// Hand-written converter that overrides the generated one.
    Manual,
}

impl fmt::Display for ConversionOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generated => f.write_str("generated"),
            Self::Manual => f.write_str("manual"),
        }
    }
}

/// Public description of one registered pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionPair {
    /// Source type name.
    pub source_type: &'static str,
    /// Destination type name.
    pub destination_type: &'static str,
    /// Table holding the converter.
    pub origin: ConversionOrigin,
}

/// Ordered type pair used as the table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct ConversionKey {
    /// Source type identity.
    source: TypeId,
    /// Destination type identity.
    destination: TypeId,
}

impl ConversionKey {
    /// Builds the key for `A -> B`.
    fn of<A: 'static, B: 'static>() -> Self {
        Self {
            source: TypeId::of::<A>(),
            destination: TypeId::of::<B>(),
        }
    }
}

/// Registered converter with its diagnostic description.
struct ConversionEntry {
    /// Pair description.
    pair: ConversionPair,
    /// Erased converter.
    convert: ErasedConvertFn,
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Conversion registry keyed by ordered type pair.
///
/// # Invariants
/// - Each table holds at most one converter per pair.
/// - Manual converters take precedence over generated ones.
#[derive(Default)]
pub struct ConversionRegistry {
    /// Field-mirroring converters.
    generated: BTreeMap<ConversionKey, ConversionEntry>,
    /// Hand-written converters.
    manual: BTreeMap<ConversionKey, ConversionEntry>,
}

impl ConversionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a field-mirroring converter for `A -> B`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::Conflict`] when the pair is already in the
    /// generated table.
    pub fn add_generated_conversion<A: 'static, B: 'static>(
        &mut self,
        convert: ConvertFn<A, B>,
    ) -> Result<(), RegistrationError> {
        insert_entry(&mut self.generated, ConversionOrigin::Generated, convert)
    }

    /// Registers a hand-written converter for `A -> B`, overriding any
    /// generated converter for the same pair.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::Conflict`] when the pair is already in the
    /// manual table.
    pub fn add_conversion<A: 'static, B: 'static>(
        &mut self,
        convert: ConvertFn<A, B>,
    ) -> Result<(), RegistrationError> {
        insert_entry(&mut self.manual, ConversionOrigin::Manual, convert)
    }

    /// Returns true when any converter is registered for `A -> B`.
    #[must_use]
    pub fn has_conversion<A: 'static, B: 'static>(&self) -> bool {
        let key = ConversionKey::of::<A, B>();
        self.manual.contains_key(&key) || self.generated.contains_key(&key)
    }

    /// Returns the origin of the converter that [`Self::convert`] would use.
    #[must_use]
    pub fn effective_origin<A: 'static, B: 'static>(&self) -> Option<ConversionOrigin> {
        self.lookup(ConversionKey::of::<A, B>()).map(|entry| entry.pair.origin)
    }

    /// Lists every registered pair, generated table first, each sorted by
    /// source then destination type name.
    #[must_use]
    pub fn pairs(&self) -> Vec<ConversionPair> {
        let mut pairs: Vec<ConversionPair> = self
            .generated
            .values()
            .chain(self.manual.values())
            .map(|entry| entry.pair.clone())
            .collect();
        pairs.sort_by(|left, right| {
            (left.origin, left.source_type, left.destination_type).cmp(&(
                right.origin,
                right.source_type,
                right.destination_type,
            ))
        });
        pairs
    }

    /// Returns the number of registered converters across both tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.generated.len() + self.manual.len()
    }

    /// Returns true when no converters are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generated.is_empty() && self.manual.is_empty()
    }

    /// Creates a conversion scope over this registry and an args registry.
    #[must_use]
    pub const fn scope<'a>(&'a self, args: &'a ArgsRegistry) -> Scope<'a> {
        Scope::new(self, args)
    }

    /// Converts `input` into a freshly allocated `B`.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::NotRegistered`] when no converter exists for
    /// the pair, or the converter's own error unchanged.
    pub fn convert<A: 'static, B: 'static>(
        &self,
        input: &A,
        scope: &Scope<'_>,
    ) -> Result<B, ConversionError> {
        let Some(entry) = self.lookup(ConversionKey::of::<A, B>()) else {
            return Err(ConversionError::NotRegistered {
                source_type: type_name::<A>(),
                destination_type: type_name::<B>(),
            });
        };
        let input: &dyn Any = input;
        let output = (entry.convert)(input, scope)?;
        output.downcast::<B>().map(|output| *output).map_err(|_| ConversionError::TypeMismatch {
            source_type: type_name::<A>(),
            destination_type: type_name::<B>(),
        })
    }

    /// Resolves the effective converter for a key.
    fn lookup(&self, key: ConversionKey) -> Option<&ConversionEntry> {
        self.manual.get(&key).or_else(|| self.generated.get(&key))
    }
}

impl fmt::Debug for ConversionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionRegistry")
            .field("generated", &self.generated.len())
            .field("manual", &self.manual.len())
            .finish()
    }
}

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Collects registration hooks from several schema modules and applies them
/// in order to a fresh registry.
#[derive(Default, Clone)]
pub struct RegistryBuilder {
    /// Hooks applied by [`Self::build`].
    registrations: Vec<RegisterFn>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            registrations: Vec::new(),
        }
    }

    /// Appends a registration hook.
    #[must_use]
    pub fn register(mut self, hook: RegisterFn) -> Self {
        self.registrations.push(hook);
        self
    }

    /// Applies every hook to a new registry.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegistrationError`] raised by any hook.
    pub fn build(&self) -> Result<ConversionRegistry, RegistrationError> {
        let mut registry = ConversionRegistry::new();
        for hook in &self.registrations {
            hook(&mut registry)?;
        }
        Ok(registry)
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder").field("hooks", &self.registrations.len()).finish()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Inserts a typed converter into one table, rejecting duplicates.
fn insert_entry<A: 'static, B: 'static>(
    table: &mut BTreeMap<ConversionKey, ConversionEntry>,
    origin: ConversionOrigin,
    convert: ConvertFn<A, B>,
) -> Result<(), RegistrationError> {
    let key = ConversionKey::of::<A, B>();
    if table.contains_key(&key) {
        return Err(RegistrationError::Conflict {
            source_type: type_name::<A>(),
            destination_type: type_name::<B>(),
            origin,
        });
    }
    table.insert(
        key,
        ConversionEntry {
            pair: ConversionPair {
                source_type: type_name::<A>(),
                destination_type: type_name::<B>(),
                origin,
            },
            convert: erase(convert),
        },
    );
    Ok(())
}

/// Wraps a typed converter so it can be stored behind `dyn Any`.
fn erase<A: 'static, B: 'static>(convert: ConvertFn<A, B>) -> ErasedConvertFn {
    Box::new(move |input: &dyn Any, scope: &Scope<'_>| {
        let Some(input) = input.downcast_ref::<A>() else {
            return Err(ConversionError::TypeMismatch {
                source_type: type_name::<A>(),
                destination_type: type_name::<B>(),
            });
        };
        convert(input, scope).map(|output| Box::new(output) as Box<dyn Any>)
    })
}
