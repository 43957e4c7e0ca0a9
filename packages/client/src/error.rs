//! Error types for the chat client.

use std::io;

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected the requested display name
    #[error("Username '{0}' is not available")]
    NameTaken(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
