//! Tracing setup for regolint.

pub mod setup;

pub use setup::init_tracing;
