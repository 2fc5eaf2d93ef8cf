//! # Wren Core
//!
//! Shared domain types for the Wren screening orchestrator: sessions,
//! messages, the closed robot-action vocabulary, emotion vocabularies and
//! the turn-result contract produced by the conversation agent.

pub mod action;
pub mod emotion;
pub mod types;

pub use action::{ActionCategory, ActionPayload, RobotAction, UnknownActionError, ACTION_MARKER};
pub use emotion::{ChildEmotion, DisplayEmotion, SensorReading};
pub use types::message::{Message, MessageMetadata, Role};
pub use types::session::{
    Session, SessionStatus, META_AUDIO_PLAYING, META_CHILD_AGE, META_CHILD_READY,
};
pub use types::turn::{PictureInfo, TurnResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    // Downstream crates import these from the root; keep them there.
    #[test]
    fn root_surface_stays_reachable() {
        assert_eq!(crate::RobotAction::Twist.category(), crate::ActionCategory::Excited);
        assert_eq!(crate::META_CHILD_READY, "child_ready");
        assert_eq!(crate::META_AUDIO_PLAYING, "audio_playing");
        assert_eq!(crate::META_CHILD_AGE, "child_age");
    }
}
