//! Runtime error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("store error: {0}")]
    Store(#[from] wren_store::StoreError),

    #[error("agent error: {0}")]
    Agent(#[from] wren_agent::AgentError),

    #[error("no active session")]
    NoActiveSession,

    #[error("event channel closed")]
    ChannelClosed,
}

pub type RuntimeResult<T> = std::result::Result<T, RuntimeError>;
