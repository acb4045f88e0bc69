//! Remote policy fetch errors.

use super::error_code::{self, RegolintErrorCode};

/// Errors raised by the secure remote fetcher. Every variant aborts the whole
/// policy-loading step.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Insecure URL scheme {scheme:?} for {url}: only https allowed")]
    InsecureScheme { url: String, scheme: String },

    #[error("Blocked host {host:?}: {reason}")]
    BlockedHost { host: String, reason: String },

    #[error("DNS lookup for {host}: {message}")]
    Resolve { host: String, message: String },

    #[error("Fetching {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Fetching {url}: status {status}")]
    Status { url: String, status: u16 },

    #[error("Policy {url} exceeds maximum size of {max} bytes")]
    SizeLimit { url: String, max: u64 },

    #[error("Verifying {url}: checksum mismatch: expected {expected}, got {actual}")]
    Integrity {
        url: String,
        expected: String,
        actual: String,
    },

    #[error("Reading {url}: {message}")]
    Read { url: String, message: String },
}

impl FetchError {
    /// True when the fetch was refused before any connection was attempted.
    pub fn is_transport_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidUrl { .. } | Self::InsecureScheme { .. } | Self::BlockedHost { .. }
        )
    }
}

impl RegolintErrorCode for FetchError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } | Self::InsecureScheme { .. } | Self::BlockedHost { .. } => {
                error_code::TRANSPORT_REJECTED
            }
            Self::Integrity { .. } => error_code::INTEGRITY_ERROR,
            Self::SizeLimit { .. } => error_code::SIZE_LIMIT_EXCEEDED,
            _ => error_code::FETCH_ERROR,
        }
    }
}
