//! Inline `nolint` suppression.
//!
//! Supports:
//! - `// nolint` suppresses every rule on its own line and the next
//! - `// nolint:R1,R2` suppresses only the listed rules
//! - `// nolint:R1 // reason` records a free-text reason
//!
//! A directive on the line directly above a struct type extends over the
//! whole struct body.

pub mod directive;
pub mod filter;

pub use directive::{extract_directives, parse_comment, SuppressionDirective};
pub use filter::{filter_violations, is_suppressed};
