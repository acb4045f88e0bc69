//! Runtime evaluation errors. Scoped to one fact bag; the engine stays usable.

use super::error_code::{self, RegolintErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("Serializing input for {target}: {message}")]
    Input { target: String, message: String },

    #[error("Evaluating policies for {target}: {message}")]
    Runtime { target: String, message: String },

    #[error("Decoding policy results for {target}: {message}")]
    Decode { target: String, message: String },
}

impl RegolintErrorCode for EvalError {
    fn error_code(&self) -> &'static str {
        error_code::EVAL_ERROR
    }
}
