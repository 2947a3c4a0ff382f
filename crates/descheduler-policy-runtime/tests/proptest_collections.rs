// crates/descheduler-policy-runtime/tests/proptest_collections.rs
// ============================================================================
// Module: Collection Property-Based Tests
// Description: Property tests for sequence conversion.
// Purpose: Check order, count, and absence preservation across inputs.
// ============================================================================

//! Property-based tests for collection conversion invariants.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    clippy::unnecessary_wraps,
    clippy::ptr_arg,
    reason = "Test-only assertions and helpers are permitted."
)]

use descheduler_policy_runtime::ArgsRegistry;
use descheduler_policy_runtime::ConversionError;
use descheduler_policy_runtime::ConversionRegistry;
use descheduler_policy_runtime::Scope;
use descheduler_policy_runtime::convert_optional_slice;
use proptest::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Wrapped(String);

fn wrap(input: &String, _scope: &Scope<'_>) -> Result<Wrapped, ConversionError> {
    Ok(Wrapped(input.clone()))
}

fn unwrap(input: &Wrapped, _scope: &Scope<'_>) -> Result<String, ConversionError> {
    Ok(input.0.clone())
}

fn registry() -> ConversionRegistry {
    let mut registry = ConversionRegistry::new();
    registry.add_generated_conversion(wrap).unwrap();
    registry.add_generated_conversion(unwrap).unwrap();
    registry
}

proptest! {
    #[test]
    fn optional_sequences_round_trip(
        input in proptest::option::of(proptest::collection::vec(".{0,8}", 0..16))
    ) {
        let conversions = registry();
        let args = ArgsRegistry::new();
        let scope = conversions.scope(&args);
        let wrapped: Option<Vec<Wrapped>> =
            convert_optional_slice(input.as_deref(), &scope).unwrap();
        prop_assert_eq!(wrapped.as_ref().map(Vec::len), input.as_ref().map(Vec::len));
        let back: Option<Vec<String>> = convert_optional_slice(wrapped.as_deref(), &scope).unwrap();
        prop_assert_eq!(back, input);
    }
}
