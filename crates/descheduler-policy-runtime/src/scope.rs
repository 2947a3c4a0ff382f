// crates/descheduler-policy-runtime/src/scope.rs
// ============================================================================
// Module: Conversion Scope
// Description: Recursion context handed to every converter.
// Purpose: Route nested conversions back through the registry.
// Dependencies: crate::{args, registry}
// ============================================================================

//! ## Overview
//! A [`Scope`] borrows the conversion registry and the args registry for the
//! duration of one call tree. Converters never call each other directly for
//! nested entities; they ask the scope, which looks the pair up again so a
//! manual override applies wherever the pair occurs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::args::ArgsRegistry;
use crate::error::ConversionError;
use crate::registry::ConversionRegistry;

// ============================================================================
// SECTION: Scope
// ============================================================================

/// Borrowed conversion context.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    /// Converter table.
    conversions: &'a ConversionRegistry,
    /// Plugin argument payload codec.
    args: &'a ArgsRegistry,
}

impl<'a> Scope<'a> {
    /// Creates a scope over the given registries.
    #[must_use]
    pub const fn new(conversions: &'a ConversionRegistry, args: &'a ArgsRegistry) -> Self {
        Self {
            conversions,
            args,
        }
    }

    /// Returns the conversion registry.
    #[must_use]
    pub const fn conversions(&self) -> &'a ConversionRegistry {
        self.conversions
    }

    /// Returns the args registry.
    #[must_use]
    pub const fn args(&self) -> &'a ArgsRegistry {
        self.args
    }

    /// Converts one value through the registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError`] from the lookup or the converter.
    pub fn convert<A: 'static, B: 'static>(&self, input: &A) -> Result<B, ConversionError> {
        self.conversions.convert(input, self)
    }

    /// Converts an optional value, keeping absence as absence.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError`] when the present value fails to convert.
    pub fn convert_optional<A: 'static, B: 'static>(
        &self,
        input: Option<&A>,
    ) -> Result<Option<B>, ConversionError> {
        input.map(|value| self.convert(value)).transpose()
    }
}
