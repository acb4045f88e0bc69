//! Go fact extraction and sandboxed Rego policy evaluation.
//!
//! [`parsers::GoParser`] produces syntax trees, [`transformer::Transformer`]
//! turns them into fact bags, [`policy::PolicyEngine`] evaluates those
//! against Rego policies, and [`suppression`] removes violations silenced
//! by `nolint` comments. [`pipeline::Linter`] wires the steps together.

pub mod loader;
pub mod parsers;
pub mod pipeline;
pub mod policy;
pub mod remote;
pub mod suppression;
pub mod transformer;

pub use loader::{LoadedPolicies, PolicyLoader};
pub use pipeline::{EngineState, Linter};
pub use policy::PolicyEngine;
