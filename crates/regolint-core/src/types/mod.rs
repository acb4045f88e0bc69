//! The fact model handed to policies and the violation model they return.

pub mod facts;
pub mod package;
pub mod violation;

pub use facts::*;
pub use package::PackageFactBag;
pub use violation::{Fix, FixEdit, Violation};
