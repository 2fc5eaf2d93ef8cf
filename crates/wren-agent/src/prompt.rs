//! Prompt assembly.
//!
//! Everything the turn manager injects around the conversation history:
//! the system persona, the mandatory-action constraints, picture and
//! follow-up instructions, and the advisory emotion context.

use wren_core::{ChildEmotion, PictureInfo, RobotAction, SensorReading};

/// Default system persona for the screening conversation.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a friendly robot companion helping a speech-language clinician \
screen a young child's language development through natural conversation.

Guidelines:
- Use short, simple sentences suited to a 3-7 year old.
- Ask one question at a time and wait for the child's answer.
- Be warm, encouraging, and playful. Praise effort, not just correctness.
- Vary your questions: open-ended, yes/no, choices, and descriptions.
- Never mention the screening, testing, or assessment to the child.

Every response must end with exactly one robot action line in this format:
ROBOT_ACTION: {\"action\": \"wave\", \"reason\": \"short explanation\"}";

/// Instruction for the opening turn: greet, ask the name, and gesture.
pub fn greeting_instruction() -> String {
    format!(
        "Start the screening conversation. Greet the child warmly and ask their name.\n\n\
         CRITICAL: You MUST include a robot action using ONLY these valid actions:\n{}\n\n\
         For the greeting, use 'wave' or 'bow'.\n\n\
         DO NOT use: smile, nod, laugh, clap - these actions DO NOT EXIST in the robot.\n\n\
         Format:\n\
         Your greeting text.\n\n\
         ROBOT_ACTION: {{\"action\": \"wave\", \"reason\": \"greeting the child\"}}\n\n\
         This is MANDATORY.",
        RobotAction::whitelist()
    )
}

/// Constraint used when no previous action exists yet.
pub fn mandatory_action_instruction() -> String {
    format!(
        "CRITICAL: Include a robot action from this list ONLY:\n{}\n\n\
         DO NOT invent actions like \"smile\" or \"nod\" - they don't exist!\n\n\
         Format: ROBOT_ACTION: {{\"action\": \"valid_action\", \"reason\": \"reason\"}}",
        RobotAction::whitelist()
    )
}

/// Constraint forbidding a repeat of the previous turn's action.
pub fn repetition_constraint(last_action: RobotAction) -> String {
    format!(
        "CRITICAL REQUIREMENT:\n\n\
         You just used '{}'. Choose a DIFFERENT action from this list:\n{}\n\n\
         DO NOT use: smile, nod, laugh, clap, turn, look - THESE DO NOT EXIST!\n\n\
         Format:\n\
         Your response text.\n\n\
         ROBOT_ACTION: {{\"action\": \"different_valid_action\", \"reason\": \"explanation\"}}",
        last_action,
        RobotAction::whitelist()
    )
}

/// Instruction injected when a new picture goes up.
pub fn picture_instruction(picture: &PictureInfo, suggested_opening: &str) -> String {
    format!(
        "IMPORTANT: A picture is now being shown to the child!\n\n\
         Picture: {}\n\
         Complexity: {}\n\
         Targets: {}\n\n\
         Introduce the picture naturally and ask the child to describe what they see. \
         Use a 'jump_forward' robot action to show excitement about the picture!\n\n\
         Your response should be something like: \"{}\"",
        picture.filename,
        picture.complexity,
        picture.targets.join(", "),
        suggested_opening
    )
}

/// Follow-up instruction while a picture stays up.
pub fn followup_instruction(followup_number: u32, suggestions: &[&str]) -> String {
    format!(
        "The picture is still being shown. Ask a follow-up question to elicit more description.\n\
         Some suggestions: {}\n\n\
         This is follow-up #{}. After 2-3 exchanges, transition to a new topic.",
        suggestions.iter().take(3).copied().collect::<Vec<_>>().join(", "),
        followup_number
    )
}

/// Instruction closing out the picture task.
pub fn transition_instruction() -> &'static str {
    "The child has described the picture well. Praise them and smoothly transition \
     to a new conversational topic. The picture will be removed."
}

/// Hint about the emotion detected in the child's latest utterance.
pub fn emotion_hint(emotion: ChildEmotion) -> String {
    format!("Note: The child seems {}. Adjust your response accordingly.", emotion)
}

/// Advisory context from the real-time emotion sensor feed.
pub fn sensor_context(reading: &SensorReading) -> String {
    format!(
        "\n[REAL-TIME EMOTION DETECTED FROM SENSOR]\n\
         Current Emotion: {}\n\
         Timestamp: {}\n\
         Guidance: {}\n\n\
         IMPORTANT: Adapt your response based on the child's emotional state. \
         Be empathetic and responsive to their feelings.",
        reading.emotion,
        reading.timestamp.to_rfc3339(),
        reading.guidance()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraints_carry_the_whole_whitelist() {
        let text = mandatory_action_instruction();
        for action in RobotAction::ALL {
            assert!(text.contains(action.as_str()), "missing {action}");
        }
    }

    #[test]
    fn repetition_constraint_names_the_last_action() {
        let text = repetition_constraint(RobotAction::Wave);
        assert!(text.contains("You just used 'wave'"));
    }

    #[test]
    fn sensor_context_embeds_label_and_guidance() {
        let reading = SensorReading::new("sad");
        let text = sensor_context(&reading);
        assert!(text.contains("Current Emotion: sad"));
        assert!(text.contains("extra encouragement"));
    }
}
