//! Error types for FMP API operations.
//!
//! This module defines [`FmpError`] which covers transport, decoding, and
//! caller-contract failures. Data-quality conditions in the reconciliation
//! pipeline (incomplete statements, continuity gaps, excluded symbols) are
//! deliberately *not* errors; they are modeled as explicit outcomes so
//! callers can distinguish "no usable data" from "something went wrong".

use thiserror::Error;

/// Errors that can occur when talking to the FMP API.
#[derive(Error, Debug)]
pub enum FmpError {
    /// The API key was rejected (HTTP 401).
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The requested symbol or resource does not exist (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// The vendor throttled the request (HTTP 429).
    #[error("Rate limited: retry after {retry_after:?}")]
    RateLimited {
        /// Suggested time to wait before retrying, when the vendor sent one.
        retry_after: Option<std::time::Duration>,
    },

    /// Connection-level failure (DNS, refused connection, timeout).
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// The response body could not be decoded into the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Any other non-2xx response from the vendor.
    #[error("FMP API error (HTTP {status}): {body}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Response body, as returned by the vendor.
        body: String,
    },

    /// A caller-supplied parameter violated the API contract.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

/// Result type alias using [`FmpError`].
pub type Result<T> = std::result::Result<T, FmpError>;
