//! Direct child command interception.
//!
//! When the child tells the robot to do something ("jump!", "give me five"),
//! the turn is handled deterministically without a model round-trip. The
//! table is ordered longest-phrase-first so "jump forward" resolves before
//! the bare "jump" substring can claim it.

use rand::seq::SliceRandom;
use rand::Rng;

use wren_core::RobotAction;

/// Substring patterns checked against the lowercased utterance, in order.
/// Multi-word phrases come before any single word they contain.
const COMMAND_PATTERNS: &[(&str, RobotAction)] = &[
    ("jump forward", RobotAction::JumpForward),
    ("hop forward", RobotAction::JumpForward),
    ("jump backward", RobotAction::JumpBackward),
    ("jump back", RobotAction::JumpBackward),
    ("hop back", RobotAction::JumpBackward),
    ("jump up", RobotAction::Jump),
    ("give me five", RobotAction::Handshake),
    ("high five", RobotAction::Handshake),
    ("shake hands", RobotAction::Handshake),
    ("shake hand", RobotAction::Handshake),
    ("take a bow", RobotAction::Bow),
    ("wave hello", RobotAction::Wave),
    ("say hello", RobotAction::Wave),
    ("say hi", RobotAction::Wave),
    ("sit down", RobotAction::Sit),
    ("stay low", RobotAction::StayLow),
    ("get low", RobotAction::StayLow),
    ("go down", RobotAction::StayLow),
    ("do pushups", RobotAction::PushUp),
    ("push up", RobotAction::PushUp),
    ("pushup", RobotAction::PushUp),
    ("be scared", RobotAction::Scared),
    ("act scared", RobotAction::Scared),
    ("go to sleep", RobotAction::Sleep),
    ("take a nap", RobotAction::Sleep),
    ("stand up", RobotAction::Steady),
    ("handshake", RobotAction::Handshake),
    ("bow", RobotAction::Bow),
    ("wave", RobotAction::Wave),
    ("jump", RobotAction::Jump),
    ("twist", RobotAction::Twist),
    ("dance", RobotAction::Twist),
    ("wiggle", RobotAction::Twist),
    ("sit", RobotAction::Sit),
    ("crouch", RobotAction::StayLow),
    ("exercise", RobotAction::PushUp),
    ("dig", RobotAction::Dig),
    ("scratch", RobotAction::Dig),
    ("shiver", RobotAction::Scared),
    ("sleep", RobotAction::Sleep),
    ("steady", RobotAction::Steady),
    ("balance", RobotAction::Steady),
];

/// Affirming replies sent back when a child command is intercepted.
const AFFIRMING_REPLIES: &[&str] = &[
    "Okay! Watch this!",
    "Sure! Here we go!",
    "Alright! Let me do that!",
    "You got it! Look!",
    "Of course! Ready?",
];

/// Check whether the utterance is a direct robot command.
pub fn detect_command(utterance: &str) -> Option<RobotAction> {
    let lower = utterance.to_lowercase();
    let lower = lower.trim();
    COMMAND_PATTERNS
        .iter()
        .find(|(pattern, _)| lower.contains(pattern))
        .map(|(_, action)| *action)
}

/// Pick one of the canned affirming replies.
pub fn affirming_reply<R: Rng>(rng: &mut R) -> &'static str {
    AFFIRMING_REPLIES
        .choose(rng)
        .copied()
        .unwrap_or(AFFIRMING_REPLIES[0])
}
