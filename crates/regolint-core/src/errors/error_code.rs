//! RegolintErrorCode trait for stable, machine-readable error codes.

/// Every error enum implements this to provide a structured error code
/// string for callers that render or serialize failures.
pub trait RegolintErrorCode {
    /// Returns the error code string (e.g., "COMPILE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const COMPILE_ERROR: &str = "COMPILE_ERROR";
pub const EVAL_ERROR: &str = "EVAL_ERROR";
pub const TRANSPORT_REJECTED: &str = "TRANSPORT_REJECTED";
pub const INTEGRITY_ERROR: &str = "INTEGRITY_ERROR";
pub const SIZE_LIMIT_EXCEEDED: &str = "SIZE_LIMIT_EXCEEDED";
pub const FETCH_ERROR: &str = "FETCH_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const LOAD_ERROR: &str = "LOAD_ERROR";
pub const ENGINE_UNAVAILABLE: &str = "ENGINE_UNAVAILABLE";
