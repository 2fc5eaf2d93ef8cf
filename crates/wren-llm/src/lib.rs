//! # Wren LLM
//!
//! HTTP clients for the external language-model and speech services, plus
//! the [`LanguageModel`] trait the turn manager is generic over.

pub mod chat;
pub mod error;
pub mod provider;
pub mod speech;

pub use chat::{ChatMessage, ChatRequest, ChatResponse, ChatRole};
pub use error::{LlmError, Result};
pub use provider::{LanguageModel, OpenAiChat};
pub use speech::{SpeechClient, COMMON_PHRASES};
