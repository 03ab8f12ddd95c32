//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Registration was rejected by the server (invalid username etc.)
    #[error("Registration rejected: {0}")]
    RegistrationRejected(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
