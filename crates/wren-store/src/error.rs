//! Store error types.

use thiserror::Error;

/// Errors surfaced by the session store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Session not found: {id}")]
    SessionNotFound { id: String },

    #[error("Session already completed: {id}")]
    SessionCompleted { id: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {message}")]
    Other { message: String },
}

impl StoreError {
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
