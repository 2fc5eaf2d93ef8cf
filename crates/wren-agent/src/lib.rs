//! # Wren Agent
//!
//! The conversation turn manager: command interception, child emotion
//! detection, display emotion selection, picture scheduling, question
//! variety tracking, and structured action extraction, orchestrated by
//! [`ScreeningAgent`].

pub mod agent;
pub mod commands;
pub mod detect;
pub mod display;
pub mod error;
pub mod parser;
pub mod pictures;
pub mod prompt;
pub mod questions;

pub use agent::ScreeningAgent;
pub use display::DisplayContext;
pub use error::{AgentError, AgentResult};
pub use pictures::PictureScheduler;
pub use questions::QuestionTracker;
