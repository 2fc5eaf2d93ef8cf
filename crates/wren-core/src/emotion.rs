//! Emotion vocabularies.
//!
//! Two disjoint sets exist on purpose: [`ChildEmotion`] is what the agent
//! infers from the child's utterance, [`DisplayEmotion`] is one of the four
//! faces the robot can actually show. The sensor feed stays free-form
//! (`SensorReading`) because its label set is owned by external hardware.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Emotion inferred from the child's utterance text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildEmotion {
    Happy,
    Excited,
    Sad,
    Shy,
    Engaged,
    Disengaged,
    Neutral,
}

impl ChildEmotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChildEmotion::Happy => "happy",
            ChildEmotion::Excited => "excited",
            ChildEmotion::Sad => "sad",
            ChildEmotion::Shy => "shy",
            ChildEmotion::Engaged => "engaged",
            ChildEmotion::Disengaged => "disengaged",
            ChildEmotion::Neutral => "neutral",
        }
    }

    /// Strong negative states that trigger the empathy rule.
    pub fn is_strong_negative(&self) -> bool {
        matches!(self, ChildEmotion::Sad)
    }

    /// Strong positive states that trigger the enthusiasm rule.
    pub fn is_strong_positive(&self) -> bool {
        matches!(self, ChildEmotion::Happy | ChildEmotion::Excited)
    }
}

impl std::fmt::Display for ChildEmotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the four faces the child-facing surface can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayEmotion {
    Surprise,
    Sad,
    Mad,
    Neutral,
}

impl DisplayEmotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayEmotion::Surprise => "surprise",
            DisplayEmotion::Sad => "sad",
            DisplayEmotion::Mad => "mad",
            DisplayEmotion::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for DisplayEmotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One best-effort reading from the real-time emotion sensor feed.
///
/// Purely advisory context for the turn manager, never a control signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorReading {
    pub emotion: String,
    pub timestamp: DateTime<Utc>,
}

impl SensorReading {
    pub fn new(emotion: impl Into<String>) -> Self {
        Self {
            emotion: emotion.into(),
            timestamp: Utc::now(),
        }
    }

    /// Prompt guidance for the known sensor labels.
    pub fn guidance(&self) -> &'static str {
        match self.emotion.to_lowercase().as_str() {
            "happy" => "Child is currently feeling happy and engaged. Continue with positive reinforcement.",
            "sad" => "Child appears sad. Use extra encouragement and gentleness. Consider simpler questions.",
            "angry" => "Child may be frustrated. Be patient, use calming language, offer breaks if needed.",
            "surprised" => "Child is surprised or curious. Good opportunity for engagement.",
            "neutral" => "Child is calm and neutral. Proceed normally with the screening.",
            "fear" => "Child appears anxious or fearful. Use very gentle, reassuring language. Slow down.",
            "disgust" => "Child may be uncomfortable. Check if they need a break or change of topic.",
            _ => "Child's emotional state detected.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_emotion_classification() {
        assert!(ChildEmotion::Sad.is_strong_negative());
        assert!(ChildEmotion::Happy.is_strong_positive());
        assert!(ChildEmotion::Excited.is_strong_positive());
        assert!(!ChildEmotion::Shy.is_strong_negative());
        assert!(!ChildEmotion::Neutral.is_strong_positive());
    }

    #[test]
    fn sensor_guidance_handles_unknown_labels() {
        let reading = SensorReading::new("confused");
        assert_eq!(reading.guidance(), "Child's emotional state detected.");
    }
}
