use thiserror::Error;

/// Unified error type for language-model and speech calls.
///
/// Transient failures are reported, never retried here; the orchestrator
/// decides whether a missed completion, gesture or audio clip is acceptable.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("network error: {0}")]
    Network(String),

    #[error("api error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("empty completion")]
    EmptyCompletion,
}

pub type Result<T> = std::result::Result<T, LlmError>;
