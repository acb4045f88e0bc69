//! Error handling for regolint.
//! One error enum per subsystem, `thiserror` only.

pub mod compile_error;
pub mod config_error;
pub mod error_code;
pub mod eval_error;
pub mod fetch_error;
pub mod lint_error;
pub mod load_error;
pub mod parse_error;

pub use compile_error::{CompileError, PolicyDiagnostic};
pub use config_error::ConfigError;
pub use error_code::RegolintErrorCode;
pub use eval_error::EvalError;
pub use fetch_error::FetchError;
pub use lint_error::LintError;
pub use load_error::LoadError;
pub use parse_error::ParseError;
