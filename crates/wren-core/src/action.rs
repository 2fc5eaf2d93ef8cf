//! Closed robot-action vocabulary.
//!
//! Every gesture the robot can perform maps to exactly one actuation code on
//! the hardware endpoint. Model output and child speech are parsed against
//! this vocabulary at the boundary; anything outside it becomes a typed
//! [`UnknownActionError`] and is never executed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marker token the language model embeds before the structured payload.
pub const ACTION_MARKER: &str = "ROBOT_ACTION:";

/// Physical actions supported by the actuation endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotAction {
    Steady,
    StayLow,
    Handshake,
    Jump,
    Bow,
    Twist,
    Wave,
    Sit,
    PushUp,
    JumpForward,
    JumpBackward,
    Dig,
    Sleep,
    Scared,
}

/// Parse failure for action names outside the closed vocabulary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown robot action: {name}")]
pub struct UnknownActionError {
    pub name: String,
}

/// Broad emotional category an action falls into, used by the display
/// emotion engine's action rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCategory {
    Excited,
    Scared,
    Neutral,
}

impl RobotAction {
    /// All actions, in actuation-code order.
    pub const ALL: [RobotAction; 14] = [
        RobotAction::Steady,
        RobotAction::StayLow,
        RobotAction::Handshake,
        RobotAction::Jump,
        RobotAction::Bow,
        RobotAction::Twist,
        RobotAction::Wave,
        RobotAction::Sit,
        RobotAction::PushUp,
        RobotAction::JumpForward,
        RobotAction::JumpBackward,
        RobotAction::Dig,
        RobotAction::Sleep,
        RobotAction::Scared,
    ];

    /// `funcMode` value understood by the actuation endpoint.
    pub fn actuation_code(&self) -> u8 {
        match self {
            RobotAction::Steady => 1,
            RobotAction::StayLow => 2,
            RobotAction::Handshake => 3,
            RobotAction::Jump => 4,
            RobotAction::Bow => 5,
            RobotAction::Twist => 6,
            RobotAction::Wave => 7,
            RobotAction::Sit => 8,
            RobotAction::PushUp => 9,
            RobotAction::JumpForward => 10,
            RobotAction::JumpBackward => 11,
            RobotAction::Dig => 12,
            RobotAction::Sleep => 13,
            RobotAction::Scared => 14,
        }
    }

    /// Wire name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            RobotAction::Steady => "steady",
            RobotAction::StayLow => "stay_low",
            RobotAction::Handshake => "handshake",
            RobotAction::Jump => "jump",
            RobotAction::Bow => "bow",
            RobotAction::Twist => "twist",
            RobotAction::Wave => "wave",
            RobotAction::Sit => "sit",
            RobotAction::PushUp => "push_up",
            RobotAction::JumpForward => "jump_forward",
            RobotAction::JumpBackward => "jump_backward",
            RobotAction::Dig => "dig",
            RobotAction::Sleep => "sleep",
            RobotAction::Scared => "scared",
        }
    }

    /// Parse a loosely formatted action name.
    ///
    /// Normalizes case and whitespace ("Jump Forward" -> `jump_forward`) and
    /// maps the known alias "digging" -> `dig`.
    pub fn parse(name: &str) -> Result<Self, UnknownActionError> {
        let normalized = name.trim().to_lowercase().replace([' ', '-'], "_");
        let normalized = match normalized.as_str() {
            "digging" => "dig",
            other => other,
        };

        RobotAction::ALL
            .iter()
            .find(|a| a.as_str() == normalized)
            .copied()
            .ok_or_else(|| UnknownActionError {
                name: name.to_string(),
            })
    }

    /// Emotional category of the gesture.
    pub fn category(&self) -> ActionCategory {
        match self {
            RobotAction::Jump
            | RobotAction::JumpForward
            | RobotAction::Twist
            | RobotAction::Handshake
            | RobotAction::Wave
            | RobotAction::Bow
            | RobotAction::PushUp
            | RobotAction::Dig => ActionCategory::Excited,
            RobotAction::Scared | RobotAction::JumpBackward => ActionCategory::Scared,
            RobotAction::Steady | RobotAction::StayLow | RobotAction::Sit | RobotAction::Sleep => {
                ActionCategory::Neutral
            }
        }
    }

    /// Comma-separated whitelist for prompt constraints.
    pub fn whitelist() -> String {
        let names: Vec<&str> = RobotAction::ALL.iter().map(|a| a.as_str()).collect();
        names.join(", ")
    }
}

impl std::fmt::Display for RobotAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured action payload carried alongside the model's free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPayload {
    pub action: RobotAction,
    pub reason: String,
}

impl ActionPayload {
    pub fn new(action: RobotAction, reason: impl Into<String>) -> Self {
        Self {
            action,
            reason: reason.into(),
        }
    }

    /// Default substitute when the model omits the payload entirely.
    pub fn fallback(action: RobotAction) -> Self {
        Self::new(action, "fallback")
    }
}
