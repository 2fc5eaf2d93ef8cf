//! Structured action extraction from model output.
//!
//! The model is asked to embed one `ROBOT_ACTION: {"action": ..., "reason":
//! ...}` token in its free text. Both absence and malformation are expected
//! in practice; extraction is lenient, and the caller substitutes a fallback
//! payload when nothing valid comes out.

use serde::Deserialize;
use tracing::warn;

use wren_core::{ActionPayload, RobotAction, ACTION_MARKER};

#[derive(Deserialize)]
struct RawPayload {
    action: String,
    #[serde(default)]
    reason: Option<String>,
}

/// Pull the structured action payload out of the response text, if a valid
/// one is present. Unknown action names are logged and treated as absent.
pub fn extract_action(text: &str) -> Option<ActionPayload> {
    let marker = text.find(ACTION_MARKER)?;
    let after = text[marker + ACTION_MARKER.len()..].trim_start();
    if !after.starts_with('{') {
        return None;
    }
    let end = after.find('}')?;
    let json = &after[..=end];

    let raw: RawPayload = match serde_json::from_str(json) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "malformed action payload");
            return None;
        }
    };

    match RobotAction::parse(&raw.action) {
        Ok(action) => Some(ActionPayload::new(
            action,
            raw.reason.unwrap_or_default(),
        )),
        Err(e) => {
            warn!(name = %e.name, "model produced an action outside the vocabulary");
            None
        }
    }
}

/// Remove the action token from the response, keeping the conversational
/// text. Prefers text after the payload, then text before it; if stripping
/// leaves nothing, the raw text minus marker and braces is cleaned up
/// instead so the child never sees an empty reply.
pub fn strip_action(text: &str) -> String {
    let Some(marker) = text.find(ACTION_MARKER) else {
        return text.trim().to_string();
    };

    if let Some(json_start_rel) = text[marker..].find('{') {
        let json_start = marker + json_start_rel;
        if let Some(json_end_rel) = text[json_start..].find('}') {
            let json_end = json_start + json_end_rel;
            let before = text[..marker].trim();
            let after = text[json_end + 1..].trim();

            if !after.is_empty() {
                return after.to_string();
            }
            if !before.is_empty() {
                return before.to_string();
            }
            return String::new();
        }
    }

    // No JSON object after the marker; drop the marker line entirely.
    text.lines()
        .filter(|line| !line.contains(ACTION_MARKER))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_well_formed_payload() {
        let text = "Hello there!\n\nROBOT_ACTION: {\"action\": \"wave\", \"reason\": \"greeting\"}";
        let payload = extract_action(text).unwrap();
        assert_eq!(payload.action, RobotAction::Wave);
        assert_eq!(payload.reason, "greeting");
        assert_eq!(strip_action(text), "Hello there!");
    }

    #[test]
    fn unknown_action_name_is_treated_as_absent() {
        let text = "Hi! ROBOT_ACTION: {\"action\": \"smile\", \"reason\": \"x\"}";
        assert_eq!(extract_action(text), None);
    }

    #[test]
    fn missing_marker_yields_nothing_and_text_is_untouched() {
        let text = "Just a plain reply.";
        assert_eq!(extract_action(text), None);
        assert_eq!(strip_action(text), "Just a plain reply.");
    }

    #[test]
    fn malformed_json_is_absent_but_text_survives() {
        let text = "Okay!\nROBOT_ACTION: {action: wave oops}";
        assert_eq!(extract_action(text), None);
        assert_eq!(strip_action(text), "Okay!");
    }

    #[test]
    fn text_after_payload_is_preferred() {
        let text = "ROBOT_ACTION: {\"action\": \"bow\", \"reason\": \"r\"} Nice to meet you!";
        let payload = extract_action(text).unwrap();
        assert_eq!(payload.action, RobotAction::Bow);
        assert_eq!(strip_action(text), "Nice to meet you!");
    }

    #[test]
    fn marker_line_without_json_is_dropped() {
        let text = "Hello!\nROBOT_ACTION: wave";
        assert_eq!(extract_action(text), None);
        assert_eq!(strip_action(text), "Hello!");
    }

    #[test]
    fn loose_action_spelling_still_parses() {
        let text = "Watch! ROBOT_ACTION: {\"action\": \"Jump Forward\", \"reason\": \"fun\"}";
        let payload = extract_action(text).unwrap();
        assert_eq!(payload.action, RobotAction::JumpForward);
    }
}
