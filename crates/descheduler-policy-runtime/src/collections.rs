// crates/descheduler-policy-runtime/src/collections.rs
// ============================================================================
// Module: Collection Converter
// Description: Element-wise conversion of ordered sequences.
// Purpose: Preserve absence, emptiness, order, and count across schemas.
// Dependencies: crate::scope
// ============================================================================

//! ## Overview
//! Sequences in both document models are `Option<Vec<T>>`: `None` is an unset
//! field and `Some(vec![])` is an explicitly empty one. The helpers here keep
//! that distinction and stop at the first element that fails.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::error::ConversionError;
use crate::scope::Scope;

// ============================================================================
// SECTION: Sequence Conversion
// ============================================================================

/// Converts every element in order, failing fast.
///
/// # Errors
///
/// Returns the first element's [`ConversionError`]; no partial output is kept.
pub fn convert_slice<A: 'static, B: 'static>(
    input: &[A],
    scope: &Scope<'_>,
) -> Result<Vec<B>, ConversionError> {
    let mut output = Vec::with_capacity(input.len());
    for item in input {
        output.push(scope.convert(item)?);
    }
    Ok(output)
}

/// Converts an optional sequence: unset stays unset, empty stays empty.
///
/// # Errors
///
/// Returns the first element's [`ConversionError`].
pub fn convert_optional_slice<A: 'static, B: 'static>(
    input: Option<&[A]>,
    scope: &Scope<'_>,
) -> Result<Option<Vec<B>>, ConversionError> {
    input.map(|items| convert_slice(items, scope)).transpose()
}

/// Copies an optional sequence of plain values.
#[must_use]
pub fn copy_optional_slice<T: Clone>(input: Option<&[T]>) -> Option<Vec<T>> {
    input.map(<[T]>::to_vec)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
