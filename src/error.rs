//! Error types
//!
//! Fetch errors fail a whole tier. Decode errors only ever fail a single
//! embedded blob and are swallowed at the extractor boundary.

use std::time::Duration;
use thiserror::Error;

/// Failure to turn a URL into HTML.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid header {name}: {value:?}")]
    Header { name: &'static str, value: String },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("browser {context} failed: {message}")]
    Browser {
        context: &'static str,
        message: String,
    },
}

impl FetchError {
    pub(crate) fn browser(context: &'static str, err: impl std::fmt::Display) -> Self {
        FetchError::Browser {
            context,
            message: err.to_string(),
        }
    }
}

/// Failure to decode one embedded data blob.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Neither strict JSON nor a convertible JS literal
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
