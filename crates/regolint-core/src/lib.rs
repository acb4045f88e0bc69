//! Core types, errors, config, and tracing for the regolint policy linter.
//!
//! The fact model in [`types`] is the contract between the Go transformer and
//! Rego policies: its JSON shape is what policies address as `input`.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;
