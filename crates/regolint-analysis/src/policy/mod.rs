//! Sandboxed Rego policy evaluation.

pub mod capabilities;
pub mod decode;
pub mod engine;
pub mod predicates;
pub mod regex_cache;

pub use capabilities::Capabilities;
pub use engine::PolicyEngine;
pub use predicates::{Predicate, PREDICATES};
pub use regex_cache::RegexCache;
