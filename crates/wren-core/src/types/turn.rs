//! Turn manager output contract.

use serde::{Deserialize, Serialize};

use crate::action::ActionPayload;
use crate::emotion::{ChildEmotion, DisplayEmotion};
use crate::types::message::MessageMetadata;

/// A picture stimulus chosen for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PictureInfo {
    pub filename: String,
    pub path: String,
    pub complexity: String,
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub themes: Vec<String>,
}

/// What the turn manager produced for one assistant turn.
///
/// `robot_action` is always present: when the model omits the structured
/// payload the manager substitutes a fallback before returning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    pub response_text: String,
    pub robot_action: ActionPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_emotion: Option<ChildEmotion>,
    pub display_emotion: DisplayEmotion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<PictureInfo>,
    /// True when the turn was a deterministic echo of a direct child command
    /// and no model call was made.
    pub is_command_echo: bool,
}

impl TurnResult {
    /// Message annotations to persist alongside the assistant turn.
    pub fn to_metadata(&self) -> MessageMetadata {
        MessageMetadata {
            emotion: Some(self.display_emotion),
            detected_emotion: self.detected_emotion,
            robot_action: Some(self.robot_action.clone()),
            picture_path: self.picture.as_ref().map(|p| p.path.clone()),
            picture_filename: self.picture.as_ref().map(|p| p.filename.clone()),
            picture_complexity: self.picture.as_ref().map(|p| p.complexity.clone()),
        }
    }
}
