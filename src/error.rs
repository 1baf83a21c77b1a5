//! Error types for the Belvo API client.
//!
//! Only login and delete normalize HTTP failure into outcome enums; every
//! other operation either returns the decoded response body as-is or lets
//! the underlying transport error propagate through this type unmodified.

use thiserror::Error;

/// A specialized `Result` type for Belvo operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all Belvo API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed at the transport level
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Authentication failed while constructing a client
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid input provided to a function
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Returns `true` if this is an authentication-related error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Authentication(_))
    }

    /// Returns `true` if this error originated in the HTTP transport
    /// (connection failure, timeout, non-JSON body where JSON was expected).
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Json(_))
    }
}
