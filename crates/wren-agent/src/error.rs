//! Agent error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("language model error: {0}")]
    Model(#[from] wren_llm::LlmError),
}

pub type AgentResult<T> = std::result::Result<T, AgentError>;
