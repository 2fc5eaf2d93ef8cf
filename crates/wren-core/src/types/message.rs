//! Message log entries.
//!
//! Messages are immutable once written and read back in ascending timestamp
//! order. Timestamps serialize as RFC 3339 so the string order matches the
//! chronological order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::action::ActionPayload;
use crate::emotion::{ChildEmotion, DisplayEmotion};

/// Message role in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Turn-level annotations carried by assistant messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<DisplayEmotion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_emotion: Option<ChildEmotion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub robot_action: Option<ActionPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture_complexity: Option<String>,
}

impl MessageMetadata {
    pub fn is_empty(&self) -> bool {
        self == &MessageMetadata::default()
    }
}

/// One turn unit in a session's append-only log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: String,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

impl Message {
    /// Create a child (user) message.
    pub fn user(session_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            session_id: session_id.into(),
            timestamp: Utc::now(),
            role: Role::User,
            content: content.into(),
            metadata: None,
        }
    }

    /// Create an assistant message.
    pub fn assistant(session_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            session_id: session_id.into(),
            timestamp: Utc::now(),
            role: Role::Assistant,
            content: content.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: MessageMetadata) -> Self {
        if !metadata.is_empty() {
            self.metadata = Some(metadata);
        }
        self
    }

    /// Event identity used for duplicate suppression across polling windows.
    ///
    /// Two messages are the same event only if both role and content match;
    /// consumers must never rely on count deltas alone.
    pub fn same_event(&self, other: &Message) -> bool {
        self.role == other.role && self.content == other.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::RobotAction;

    #[test]
    fn nested_action_payload_round_trips() {
        let meta = MessageMetadata {
            robot_action: Some(ActionPayload::new(RobotAction::JumpForward, "r")),
            ..Default::default()
        };
        let msg = Message::assistant("s1", "hello").with_metadata(meta.clone());
        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back.metadata, Some(meta));
        let action = back.metadata.unwrap().robot_action.unwrap();
        assert_eq!(action.action, RobotAction::JumpForward);
        assert_eq!(action.reason, "r");
    }

    #[test]
    fn empty_metadata_is_dropped() {
        let msg = Message::assistant("s1", "hi").with_metadata(MessageMetadata::default());
        assert!(msg.metadata.is_none());
    }

    #[test]
    fn same_event_matches_on_role_and_content() {
        let a = Message::user("s1", "hello");
        let b = Message::user("s1", "hello");
        let c = Message::assistant("s1", "hello");
        assert!(a.same_event(&b));
        assert!(!a.same_event(&c));
    }
}
