//! Error types for the pet service client.
//!
//! # Design
//! HTTP error statuses are not errors here: every status the service returns
//! is surfaced as an `ApiResponse`. `ApiError` only covers faults that happen
//! on our side of the wire, such as unreadable photo files, transport failures
//! and asking for a typed view of a body that does not have that shape.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connect failure, timeout, TLS).
    #[error("transport failed: {0}")]
    Transport(#[from] ureq::Error),

    /// A photo file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A typed view was requested but the body was not JSON.
    #[error("expected a JSON body, got text (HTTP {status}): {body}")]
    UnexpectedBody { status: u16, body: String },

    /// The JSON body did not match the requested type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// A multipart request body could not be built.
    #[error("failed to encode request: {0}")]
    Encoding(String),

    /// A required setting is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}
