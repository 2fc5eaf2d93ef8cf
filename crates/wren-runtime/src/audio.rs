//! Cooperative playback pacing.
//!
//! There is no true playback-finished signal from the audio device, so the
//! child-side loop estimates spoken duration from word count and a fixed
//! speaking-rate constant, and suppresses new input capture until the
//! estimate elapses. This is an approximation: real playback may run a
//! little shorter or longer, which is acceptable for pacing purposes.

use std::time::{Duration, Instant};

/// Estimate spoken duration for a piece of text.
pub fn estimate_duration(text: &str, rate_wps: f32, buffer_secs: f32) -> Duration {
    let words = text.split_whitespace().count() as f32;
    let secs = words / rate_wps.max(0.1) + buffer_secs.max(0.0);
    Duration::from_secs_f32(secs)
}

/// Input-capture gate driven by estimated playback duration.
#[derive(Debug)]
pub struct PlaybackGate {
    rate_wps: f32,
    buffer_secs: f32,
    blocked_until: Option<Instant>,
}

impl PlaybackGate {
    pub fn new(rate_wps: f32, buffer_secs: f32) -> Self {
        Self {
            rate_wps,
            buffer_secs,
            blocked_until: None,
        }
    }

    /// Start suppressing input capture for the estimated duration of `text`.
    pub fn begin(&mut self, text: &str) -> Duration {
        let duration = estimate_duration(text, self.rate_wps, self.buffer_secs);
        self.blocked_until = Some(Instant::now() + duration);
        duration
    }

    /// True while the current estimate has not elapsed.
    pub fn is_blocked(&self) -> bool {
        self.blocked_until
            .map(|until| Instant::now() < until)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_grows_with_word_count() {
        let short = estimate_duration("hello there", 2.25, 1.0);
        let long = estimate_duration("hello there my little friend how are you today", 2.25, 1.0);
        assert!(long > short);
    }

    #[test]
    fn empty_text_still_carries_the_buffer() {
        let d = estimate_duration("", 2.25, 1.0);
        assert_eq!(d, Duration::from_secs_f32(1.0));
    }

    #[test]
    fn gate_blocks_after_begin() {
        let mut gate = PlaybackGate::new(2.25, 1.0);
        assert!(!gate.is_blocked());
        let d = gate.begin("one two three four five six seven eight nine");
        assert!(d > Duration::from_secs(4));
        assert!(gate.is_blocked());
    }
}
