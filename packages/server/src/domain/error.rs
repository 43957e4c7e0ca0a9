//! Domain errors.

use thiserror::Error;

use super::ConnectionId;

/// Why a requested display name was not admitted.
///
/// The client never sees the reason; it only receives `taken`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    #[error("display name is empty")]
    Empty,

    #[error("display name '{0}' is reserved for the server")]
    Reserved(String),

    #[error("display name contains illegal character '{0}'")]
    IllegalChar(char),

    #[error("display name '{0}' is already taken")]
    Taken(String),

    #[error("display name '{0}' is banned")]
    Banned(String),
}

impl AdmissionError {
    /// Short machine-readable reason, used in logs.
    pub fn reason(&self) -> &'static str {
        match self {
            AdmissionError::Empty => "empty",
            AdmissionError::Reserved(_) => "reserved",
            AdmissionError::IllegalChar(_) => "illegal-char",
            AdmissionError::Taken(_) => "taken",
            AdmissionError::Banned(_) => "banned",
        }
    }
}

/// Operator-facing moderation failures. The messages are printed verbatim
/// on the server console.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModerationError {
    #[error("User: {0} does not exist!")]
    NotFound(String),

    #[error("User: {0} is already banned!")]
    AlreadyBanned(String),
}

/// Failures while pushing bytes towards a connection's writer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Connection {0} is not registered")]
    ClientNotFound(ConnectionId),

    #[error("Failed to push message: {0}")]
    PushFailed(String),
}
