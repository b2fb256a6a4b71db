//! Client-side errors.

use thiserror::Error;

/// Errors surfaced by the sync client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never reached the server.
    #[error("cannot reach server: {0}")]
    Transport(String),

    /// The server answered with a non-success status and a message.
    #[error("server error: {status} - {message}")]
    Server { status: u16, message: String },

    /// The server rejected the token; the local session has been cleared.
    #[error("session expired, please log in again")]
    SessionExpired,

    #[error("parse error: {0}")]
    Parse(String),

    /// The session file could not be read or written.
    #[error("session storage error: {0}")]
    Storage(String),
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
