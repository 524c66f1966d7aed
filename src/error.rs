//! Error types for skr-client

use thiserror::Error;

/// Errors produced while preparing or submitting a job
#[derive(Debug, Error)]
pub enum Error {
    /// Credential or ticket acquisition failed
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The job request failed a precondition (e.g. missing email address)
    #[error("invalid job request: {0}")]
    Validation(String),

    /// Connection failure or malformed response stream
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Reading a file-backed form field failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded or is inconsistent
    #[error("configuration error: {0}")]
    Config(String),

    /// Bad command-line argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
