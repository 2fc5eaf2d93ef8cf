//! Display emotion selection.
//!
//! Maps the assistant's response text plus turn context to one of the four
//! faces. Strict priority order, first applicable rule wins: empathy first,
//! safety second, action third, text last. Reordering the rules changes
//! clinical behavior, so each rule is numbered and evaluated in sequence.

use once_cell::sync::Lazy;
use regex::Regex;

use wren_core::{ActionCategory, DisplayEmotion, RobotAction};

/// Context the engine consults besides the response text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayContext<'a> {
    /// Child's detected emotion, free-form label (enum labels and raw
    /// sensor labels both pass through here).
    pub detected_emotion: Option<&'a str>,
    pub robot_action: Option<RobotAction>,
}

const MAD_KEYWORDS: &[&str] = &[
    "no no",
    "stop that",
    "don't do that",
    "that's not right",
    "you must",
    "frustrated",
    "be careful",
    "wait",
    "hold on",
    "that's wrong",
    "incorrect",
    "not allowed",
    "dangerous",
];

const SAD_KEYWORDS: &[&str] = &[
    "sorry",
    "sad",
    "unfortunate",
    "that's tough",
    "difficult",
    "hard time",
    "struggle",
    "miss",
    "lost",
    "hurt",
    "don't worry",
    "it's okay",
    "understandable",
    "i understand",
    "that must be",
    "feel bad",
    "upset",
    "crying",
    "tears",
    "lonely",
    "scared",
];

const SURPRISE_KEYWORDS: &[&str] = &[
    "great",
    "awesome",
    "wonderful",
    "amazing",
    "wow",
    "love",
    "yay",
    "hooray",
    "excellent",
    "fantastic",
    "good job",
    "well done",
    "perfect",
    "brilliant",
    "nice",
    "cool",
    "really",
    "whoa",
    "oh my",
    "incredible",
    "super",
    "terrific",
    "exciting",
    "fun",
    "happy",
    "joy",
    "beautiful",
    "lovely",
    "impressive",
    "outstanding",
    "marvelous",
    "splendid",
];

static MAD_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\bno\s+no\b",
        r"\bstop\b.*\bthat\b",
        r"\bdon't\b",
        r"\bcan't\b.*\bthat\b",
    ])
});

static SAD_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\bso\s+sorry\b",
        r"\bfeel\s+(?:sad|bad|upset)\b",
        r"\bmust\s+be\s+(?:hard|tough|difficult)\b",
        r"\bthat's\s+(?:tough|hard|sad)\b",
    ])
});

static SURPRISE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(?:great|awesome|amazing|wonderful)\b.*!",
        r"\bgood\s+job\b",
        r"\bwell\s+done\b",
        r"\bthat's\s+(?:great|amazing|awesome)\b",
    ])
});

fn compile(sources: &[&str]) -> Vec<Regex> {
    sources
        .iter()
        .filter_map(|s| Regex::new(s).ok())
        .collect()
}

fn matches_set(text: &str, keywords: &[&str], patterns: &[Regex]) -> bool {
    keywords.iter().any(|k| text.contains(k)) || patterns.iter().any(|p| p.is_match(text))
}

/// Select the display emotion for one assistant turn.
pub fn select(text: &str, ctx: &DisplayContext) -> DisplayEmotion {
    let lower = text.to_lowercase();

    // 1/2. Child emotion takes precedence over everything else.
    if let Some(label) = ctx.detected_emotion {
        match label.to_lowercase().trim() {
            "sad" | "crying" | "upset" | "frustrated" => return DisplayEmotion::Sad,
            "angry" | "mad" => return DisplayEmotion::Mad,
            "happy" | "excited" | "joyful" => return DisplayEmotion::Surprise,
            _ => {}
        }
    }

    // 3. Corrective/safety language in the response.
    if matches_set(&lower, MAD_KEYWORDS, &MAD_PATTERNS) {
        return DisplayEmotion::Mad;
    }

    // 4. Physical action, unless it is a neutral gesture.
    if let Some(action) = ctx.robot_action {
        match action.category() {
            ActionCategory::Excited => return DisplayEmotion::Surprise,
            ActionCategory::Scared => return DisplayEmotion::Sad,
            ActionCategory::Neutral => {}
        }
    }

    // 5/6. Emotional content of the text itself.
    if matches_set(&lower, SAD_KEYWORDS, &SAD_PATTERNS) {
        return DisplayEmotion::Sad;
    }
    if matches_set(&lower, SURPRISE_KEYWORDS, &SURPRISE_PATTERNS) {
        return DisplayEmotion::Surprise;
    }

    // 7. Punctuation enthusiasm.
    let exclamations = text.matches('!').count();
    if exclamations >= 2 {
        return DisplayEmotion::Surprise;
    }
    if exclamations == 1 && text.split_whitespace().count() < 10 {
        return DisplayEmotion::Surprise;
    }

    DisplayEmotion::Neutral
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_emotion_dominates_every_other_rule() {
        // Text and action both point at surprise; empathy still wins.
        let ctx = DisplayContext {
            detected_emotion: Some("sad"),
            robot_action: Some(RobotAction::Jump),
        };
        assert_eq!(select("Great job!! That was awesome!", &ctx), DisplayEmotion::Sad);

        let ctx = DisplayContext {
            detected_emotion: Some("angry"),
            robot_action: Some(RobotAction::Wave),
        };
        assert_eq!(select("Wonderful!", &ctx), DisplayEmotion::Mad);
    }

    #[test]
    fn positive_child_emotion_maps_to_surprise() {
        let ctx = DisplayContext {
            detected_emotion: Some("excited"),
            robot_action: None,
        };
        assert_eq!(select("Let's continue.", &ctx), DisplayEmotion::Surprise);
    }

    #[test]
    fn corrective_language_beats_action() {
        let ctx = DisplayContext {
            detected_emotion: None,
            robot_action: Some(RobotAction::Jump),
        };
        assert_eq!(select("No no, be careful with that.", &ctx), DisplayEmotion::Mad);
    }

    #[test]
    fn neutral_actions_fall_through_to_text() {
        let ctx = DisplayContext {
            detected_emotion: None,
            robot_action: Some(RobotAction::Sit),
        };
        assert_eq!(select("I'm so sorry to hear that.", &ctx), DisplayEmotion::Sad);
    }

    #[test]
    fn excited_action_maps_to_surprise() {
        let ctx = DisplayContext {
            detected_emotion: None,
            robot_action: Some(RobotAction::Twist),
        };
        assert_eq!(select("Let me show you.", &ctx), DisplayEmotion::Surprise);
    }

    #[test]
    fn scared_action_maps_to_sad() {
        let ctx = DisplayContext {
            detected_emotion: None,
            robot_action: Some(RobotAction::JumpBackward),
        };
        assert_eq!(select("Let me show you.", &ctx), DisplayEmotion::Sad);
    }

    #[test]
    fn punctuation_rules_apply_when_nothing_else_does() {
        let ctx = DisplayContext::default();
        assert_eq!(select("Look at that!! Look!", &ctx), DisplayEmotion::Surprise);
        assert_eq!(select("Let's go!", &ctx), DisplayEmotion::Surprise);
        assert_eq!(
            select(
                "This is a much longer calm sentence with one mark at the end of it all!",
                &ctx
            ),
            DisplayEmotion::Neutral
        );
    }

    #[test]
    fn select_is_deterministic() {
        let ctx = DisplayContext {
            detected_emotion: Some("shy"),
            robot_action: Some(RobotAction::Steady),
        };
        let first = select("Tell me about your day.", &ctx);
        for _ in 0..5 {
            assert_eq!(select("Tell me about your day.", &ctx), first);
        }
        assert_eq!(first, DisplayEmotion::Neutral);
    }
}
