//! Error types for transaction lookups

use thiserror::Error;

/// Why a transaction lookup produced no summary.
///
/// The `Display` text is what the browser page shows in the `error` field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("No transaction ID provided")]
    MissingTxid,

    #[error("API request timed out. Try again later.")]
    UpstreamTimeout,

    #[error("HTTP Error: {0}")]
    UpstreamHttp(u16),

    #[error("Failed to connect to API. Check your internet or API status.")]
    UpstreamUnreachable,

    #[error("Invalid Transaction ID or API issue: {0}")]
    Processing(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        // Timeout first: a body read that times out is also a decode/body error.
        if err.is_timeout() {
            LookupError::UpstreamTimeout
        } else if let Some(status) = err.status() {
            LookupError::UpstreamHttp(status.as_u16())
        } else if err.is_decode() || err.is_builder() {
            LookupError::Processing(err.to_string())
        } else {
            LookupError::UpstreamUnreachable
        }
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Processing(err.to_string())
    }
}

pub type LookupResult<T> = Result<T, LookupError>;
