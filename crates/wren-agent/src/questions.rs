//! Question-type variety tracking.
//!
//! Counts which question styles the model has been producing and, after a
//! few turns, nudges it toward the least-used style so the screening keeps
//! probing different language skills.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuestionType {
    Open,
    Closed,
    Choice,
    Descriptive,
}

/// Per-session counters over observed assistant responses.
#[derive(Debug, Default)]
pub struct QuestionTracker {
    open: u32,
    closed: u32,
    choice: u32,
    descriptive: u32,
    picture: u32,
}

impl QuestionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one assistant response and bump the matching counter.
    /// Heuristic, first match wins.
    pub fn track(&mut self, response: &str) {
        let lower = response.to_lowercase();

        if ["what", "how", "why", "tell me"].iter().any(|w| lower.contains(w)) {
            self.open += 1;
        } else if lower.contains(" or ") && response.contains('?') {
            self.choice += 1;
        } else if ["describe", "explain", "what does", "look like"]
            .iter()
            .any(|w| lower.contains(w))
        {
            self.descriptive += 1;
        } else if response.contains('?') {
            self.closed += 1;
        }
    }

    /// Note that a picture prompt consumed this turn's question slot.
    pub fn track_picture(&mut self) {
        self.picture += 1;
    }

    fn total(&self) -> u32 {
        self.open + self.closed + self.choice + self.descriptive + self.picture
    }

    /// Prompt nudge toward the least-used question style, once enough turns
    /// have passed to make the counts meaningful.
    pub fn next_instruction(&self) -> Option<&'static str> {
        if self.total() < 3 {
            return None;
        }

        let counts = [
            (QuestionType::Open, self.open),
            (QuestionType::Closed, self.closed),
            (QuestionType::Choice, self.choice),
            (QuestionType::Descriptive, self.descriptive),
        ];
        let least = counts.iter().min_by_key(|(_, n)| *n).map(|(t, _)| *t)?;

        Some(match least {
            QuestionType::Open => {
                "Ask an open-ended 'what' or 'how' question that requires elaboration."
            }
            QuestionType::Closed => "Ask a yes/no question to check comprehension.",
            QuestionType::Choice => "Give the child 2-3 choices to help them respond.",
            QuestionType::Descriptive => "Ask them to describe or explain something in detail.",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_nudge_before_three_questions() {
        let mut tracker = QuestionTracker::new();
        tracker.track("What is your favorite animal?");
        tracker.track("Do you like dogs?");
        assert_eq!(tracker.next_instruction(), None);
    }

    #[test]
    fn nudges_toward_least_used_type() {
        let mut tracker = QuestionTracker::new();
        tracker.track("What did you do today?");
        tracker.track("How was the park?");
        tracker.track("Why do you like it?");
        // Open has 3, everything else 0; the tie among the rest resolves to
        // the first zero-count entry, closed.
        assert_eq!(
            tracker.next_instruction(),
            Some("Ask a yes/no question to check comprehension.")
        );
    }

    #[test]
    fn classification_first_match_wins() {
        let mut tracker = QuestionTracker::new();
        // Contains "what", so it counts as open even though it offers a choice.
        tracker.track("What do you want, the ball or the car?");
        assert_eq!(tracker.open, 1);
        assert_eq!(tracker.choice, 0);

        tracker.track("Red or blue?");
        assert_eq!(tracker.choice, 1);

        tracker.track("Do you have a pet?");
        assert_eq!(tracker.closed, 1);
    }

    #[test]
    fn picture_turns_count_toward_the_threshold() {
        let mut tracker = QuestionTracker::new();
        tracker.track_picture();
        tracker.track_picture();
        tracker.track("Do you like it?");
        assert!(tracker.next_instruction().is_some());
    }
}
