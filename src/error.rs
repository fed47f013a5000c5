//! Error types for solkit

use thiserror::Error;

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found error
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON-RPC error object returned by a node
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Response body could not be interpreted
    #[error("Parse error: {0}")]
    Parse(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    /// The request URL is dropped; it may carry an API key in its query
    fn from(e: reqwest::Error) -> Self {
        let e = e.without_url();
        if e.is_decode() {
            AppError::Parse(e.to_string())
        } else {
            AppError::Http(e.to_string())
        }
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Faults reported by the submission and confirmation collaborators of a
/// [`TransactionTracker`](crate::transaction::TransactionTracker).
///
/// The display form of `Submission` and `Confirmation` is the collaborator's
/// message as-is, because that text is surfaced verbatim to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    /// The submission service could not accept or initiate the operation
    #[error("{0}")]
    Submission(String),

    /// The confirmation service failed after the operation was accepted
    #[error("{0}")]
    Confirmation(String),

    /// The confirmation service affirmatively reported the operation as failed
    #[error("Transaction failed to confirm: {0}")]
    NotFinalized(String),
}

impl TransactionError {
    /// Whether the fault carries any usable text
    pub fn has_message(&self) -> bool {
        match self {
            Self::Submission(msg) | Self::Confirmation(msg) => !msg.trim().is_empty(),
            Self::NotFinalized(_) => true,
        }
    }
}
