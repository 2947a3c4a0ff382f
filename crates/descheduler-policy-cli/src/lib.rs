// crates/descheduler-policy-cli/src/lib.rs
// ============================================================================
// Module: Descheduler Policy CLI Library
// Description: Shared building blocks for the descheduler-policy binary.
// Purpose: Expose config, document I/O, and conversion helpers for tests.
// Dependencies: descheduler-policy-api, descheduler-policy-runtime
// ============================================================================

//! ## Overview
//! The binary wires these modules together: [`config`] resolves the CLI
//! configuration, [`document`] loads and renders policy files,
//! [`pipeline`] runs them through the conversion layer, and [`audit`]
//! records what happened. [`builtin_args`] holds the plugin args types
//! decoded out of the box.

pub mod audit;
pub mod builtin_args;
pub mod config;
pub mod document;
pub mod pipeline;
