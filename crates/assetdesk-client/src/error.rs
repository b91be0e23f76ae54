//! Error types for the client.

use thiserror::Error;

/// Errors that can occur when using the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The chat connection closed or failed before an exchange finished.
    #[error("assistant connection lost: {0}")]
    Connection(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{context}: HTTP {status}")]
    Status {
        status: reqwest::StatusCode,
        context: String,
    },

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Base URL cannot be turned into a chat endpoint.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Chat message sent while the connection is not open.
    #[error("chat connection is not open")]
    NotConnected,

    /// Chat message was empty after trimming.
    #[error("message is empty")]
    EmptyMessage,
}
