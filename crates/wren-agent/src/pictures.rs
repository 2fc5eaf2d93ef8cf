//! Picture stimulus scheduling.
//!
//! Decides when a picture prompt should appear and which remaining stimulus
//! to show. Scheduling is turn-based with jittered spacing, plus an override
//! when the child's recent responses suggest they are struggling to produce
//! language. State is per-session; a fresh scheduler is built for each one.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use wren_core::PictureInfo;

const FIRST_PICTURE_TURN: u32 = 4;
const PICTURE_SPACING: u32 = 7;
const STRUGGLING_WINDOW: usize = 3;
const STRUGGLING_AVG_WORDS: f32 = 3.0;

/// One catalogue entry.
#[derive(Debug, Clone)]
pub struct Stimulus {
    pub filename: &'static str,
    pub complexity: &'static str,
    pub targets: &'static [&'static str],
    pub themes: &'static [&'static str],
}

/// Built-in stimulus catalogue with clinical targeting metadata.
pub const CATALOGUE: &[Stimulus] = &[
    Stimulus {
        filename: "boy_with_dog.jpg",
        complexity: "medium",
        targets: &["subject-verb agreement", "prepositions", "descriptive adjectives"],
        themes: &["animals", "relationships", "actions"],
    },
    Stimulus {
        filename: "toys_on_floor.jpg",
        complexity: "low",
        targets: &["basic nouns", "colors", "counting", "spatial terms"],
        themes: &["toys", "play", "objects"],
    },
    Stimulus {
        filename: "playground_scene.jpg",
        complexity: "medium",
        targets: &["action verbs", "social language", "emotions"],
        themes: &["play", "friends", "movement"],
    },
];

const INTRO_PROMPTS: &[&str] = &[
    "Look at this picture! What do you see?",
    "I have something fun to show you! Can you tell me what's in this picture?",
    "Let's look at this picture together. What do you see happening?",
    "Check this out! What can you tell me about this picture?",
    "I want to show you something! What's going on in this picture?",
];

const FOLLOWUP_PROMPTS: &[&str] = &[
    "What else do you see?",
    "Can you tell me more about that?",
    "What is the [person/animal] doing?",
    "What colors do you see?",
    "How do you think they feel?",
    "What might happen next?",
    "Can you describe the [object]?",
];

/// Per-session scheduler over the stimulus catalogue.
pub struct PictureScheduler {
    dir: String,
    shown: Vec<&'static str>,
}

impl PictureScheduler {
    pub fn new(dir: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            shown: Vec::new(),
        }
    }

    pub fn shown_count(&self) -> usize {
        self.shown.len()
    }

    /// Whether it is a good moment to show a picture.
    ///
    /// True exactly once at the forced first-picture turn, then again once
    /// the turn counter passes the last scheduled slot plus a jitter drawn
    /// uniformly from 6..=8 at decision time. Independently, three short
    /// child responses in a row trigger the struggling override.
    pub fn should_show_now<R: Rng>(
        &self,
        turn: u32,
        recent_utterances: &[String],
        rng: &mut R,
    ) -> bool {
        if self.shown.len() >= CATALOGUE.len() {
            debug!("all stimuli already shown");
            return false;
        }

        if turn == FIRST_PICTURE_TURN && self.shown.is_empty() {
            info!(turn, "first picture slot reached");
            return true;
        }

        if !self.shown.is_empty() {
            let last_slot = FIRST_PICTURE_TURN + (self.shown.len() as u32 - 1) * PICTURE_SPACING;
            let jitter = rng.gen_range(6..=8);
            if turn >= last_slot + jitter {
                info!(turn, slot = last_slot + jitter, "scheduled picture slot reached");
                return true;
            }
        }

        if recent_utterances.len() >= STRUGGLING_WINDOW {
            let recent = &recent_utterances[recent_utterances.len() - STRUGGLING_WINDOW..];
            let avg = recent
                .iter()
                .map(|u| u.split_whitespace().count() as f32)
                .sum::<f32>()
                / recent.len() as f32;
            if avg < STRUGGLING_AVG_WORDS {
                info!(avg_words = avg, "struggling override: showing picture early");
                return true;
            }
        }

        false
    }

    /// Pick an unshown stimulus, preferring the complexity band for the
    /// child's age, and mark it shown. Returns `None` once exhausted.
    pub fn select<R: Rng>(&mut self, child_age: Option<u8>, rng: &mut R) -> Option<PictureInfo> {
        let remaining: Vec<&Stimulus> = CATALOGUE
            .iter()
            .filter(|s| !self.shown.contains(&s.filename))
            .collect();
        if remaining.is_empty() {
            return None;
        }

        let preferred = child_age.map(|age| match age {
            0..=4 => "low",
            5 => "medium",
            _ => "high",
        });

        let candidates: Vec<&&Stimulus> = match preferred {
            Some(level) => {
                let matching: Vec<&&Stimulus> =
                    remaining.iter().filter(|s| s.complexity == level).collect();
                if matching.is_empty() {
                    remaining.iter().collect()
                } else {
                    matching
                }
            }
            None => remaining.iter().collect(),
        };

        let stimulus = **candidates.choose(rng)?;
        self.shown.push(stimulus.filename);
        info!(filename = stimulus.filename, complexity = stimulus.complexity, "selected picture");

        Some(PictureInfo {
            filename: stimulus.filename.to_string(),
            path: format!("{}/{}", self.dir.trim_end_matches('/'), stimulus.filename),
            complexity: stimulus.complexity.to_string(),
            targets: stimulus.targets.iter().map(|s| s.to_string()).collect(),
            themes: stimulus.themes.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Intro phrasing suggestion for a freshly shown picture.
    pub fn intro_prompt<R: Rng>(&self, rng: &mut R) -> &'static str {
        INTRO_PROMPTS.choose(rng).copied().unwrap_or(INTRO_PROMPTS[0])
    }

    /// Follow-up phrasing suggestions while a picture stays up.
    pub fn followup_prompts(&self) -> &'static [&'static str] {
        FOLLOWUP_PROMPTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn first_picture_exactly_at_turn_four() {
        let scheduler = PictureScheduler::new("pics");
        let mut rng = rand::thread_rng();
        let talkative = strings(&[
            "i went to the park yesterday with my mom",
            "we saw lots of dogs and some birds too",
            "then we had ice cream on the way home",
        ]);
        assert!(!scheduler.should_show_now(3, &talkative, &mut rng));
        assert!(scheduler.should_show_now(4, &talkative, &mut rng));
        assert!(!scheduler.should_show_now(5, &talkative, &mut rng));
    }

    #[test]
    fn second_picture_respects_jitter_bounds() {
        let mut scheduler = PictureScheduler::new("pics");
        let mut rng = rand::thread_rng();
        scheduler.select(None, &mut rng).unwrap();

        let talkative = strings(&[
            "i went to the park yesterday with my mom",
            "we saw lots of dogs and some birds too",
            "then we had ice cream on the way home",
        ]);
        // Slot is 4, jitter in 6..=8: turn 9 never fires, turn 12 always does.
        for _ in 0..20 {
            assert!(!scheduler.should_show_now(9, &talkative, &mut rng));
            assert!(scheduler.should_show_now(12, &talkative, &mut rng));
        }
    }

    #[test]
    fn short_responses_trigger_struggling_override() {
        let scheduler = PictureScheduler::new("pics");
        let mut rng = rand::thread_rng();
        let short = strings(&["yes", "a dog", "no"]);
        assert!(scheduler.should_show_now(2, &short, &mut rng));
    }

    #[test]
    fn no_stimulus_selected_twice() {
        let mut scheduler = PictureScheduler::new("pics");
        let mut rng = rand::thread_rng();
        let mut seen = Vec::new();
        while let Some(info) = scheduler.select(None, &mut rng) {
            assert!(!seen.contains(&info.filename));
            seen.push(info.filename);
        }
        assert_eq!(seen.len(), CATALOGUE.len());

        // Exhaustion makes the schedule permanently false.
        let short = strings(&["yes", "a dog", "no"]);
        assert!(!scheduler.should_show_now(4, &short, &mut rng));
        assert!(!scheduler.should_show_now(40, &short, &mut rng));
    }

    #[test]
    fn young_child_gets_low_complexity_first() {
        let mut scheduler = PictureScheduler::new("pics");
        let mut rng = rand::thread_rng();
        let info = scheduler.select(Some(4), &mut rng).unwrap();
        assert_eq!(info.complexity, "low");
        assert_eq!(info.filename, "toys_on_floor.jpg");
    }

    #[test]
    fn unmatched_complexity_falls_back_to_any_remaining() {
        let mut scheduler = PictureScheduler::new("pics");
        let mut rng = rand::thread_rng();
        // No "high" stimuli exist; an older child still gets a picture.
        let info = scheduler.select(Some(7), &mut rng).unwrap();
        assert!(!info.filename.is_empty());
    }
}
