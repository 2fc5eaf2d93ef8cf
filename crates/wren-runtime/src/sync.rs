//! Cross-process synchronization primitives.
//!
//! The two front-end processes coordinate only through the session store,
//! each on its own polling cadence. The phase of the shared state machine is
//! re-derived on every poll from store contents alone, and message
//! reconciliation treats the store as an at-least-once channel: consumers
//! deduplicate by (role, content), never by count deltas, because two
//! pollers can observe skewed windows of the same log.

use std::collections::HashMap;

use wren_core::{Message, Role, Session};

/// Observable phase of the shared session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// No session exists (or none is active).
    NoSession,
    /// Session created, readiness latch still unset.
    Created,
    /// Latch set by the child side, no turns exchanged yet.
    Ready,
    /// Turns are flowing.
    Active,
    /// Session completed.
    Ended,
}

impl SyncPhase {
    /// Derive the phase from one polled snapshot.
    pub fn observe(session: Option<&Session>, message_count: usize) -> Self {
        match session {
            None => SyncPhase::NoSession,
            Some(s) if !s.is_active() => SyncPhase::Ended,
            Some(s) if !s.child_ready() => SyncPhase::Created,
            Some(_) if message_count == 0 => SyncPhase::Ready,
            Some(_) => SyncPhase::Active,
        }
    }
}

/// Duplicate-suppressing view over repeated polls of a message log.
///
/// Identity is (role, content); repeated identical events are admitted only
/// as many times as they genuinely appear in the log, so a poll that
/// re-observes an old window emits nothing new.
#[derive(Debug, Default)]
pub struct Reconciler {
    seen: HashMap<(Role, String), usize>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the messages in `observed` not yet emitted, in log order.
    pub fn reconcile(&mut self, observed: &[Message]) -> Vec<Message> {
        let mut counts: HashMap<(Role, String), usize> = HashMap::new();
        let mut fresh = Vec::new();

        for message in observed {
            let key = (message.role, message.content.clone());
            let position = counts.entry(key.clone()).or_insert(0);
            *position += 1;
            let emitted = self.seen.get(&key).copied().unwrap_or(0);
            if *position > emitted {
                fresh.push(message.clone());
            }
        }

        for (key, count) in counts {
            let entry = self.seen.entry(key).or_insert(0);
            if count > *entry {
                *entry = count;
            }
        }

        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap as Map;

    use chrono::Utc;
    use serde_json::Value;
    use wren_core::{SessionStatus, META_CHILD_READY};

    fn session(ready: bool, active: bool) -> Session {
        let mut metadata: Map<String, Value> = Map::new();
        metadata.insert(META_CHILD_READY.to_string(), Value::Bool(ready));
        Session {
            session_id: "s1".to_string(),
            child_id: "c1".to_string(),
            child_name: "Mina".to_string(),
            clinician_id: "clin".to_string(),
            session_number: 1,
            status: if active {
                SessionStatus::Active
            } else {
                SessionStatus::Completed
            },
            metadata,
            created_at: Utc::now(),
            ended_at: None,
        }
    }

    #[test]
    fn phase_follows_the_latch_and_the_log() {
        assert_eq!(SyncPhase::observe(None, 0), SyncPhase::NoSession);
        assert_eq!(
            SyncPhase::observe(Some(&session(false, true)), 0),
            SyncPhase::Created
        );
        assert_eq!(
            SyncPhase::observe(Some(&session(true, true)), 0),
            SyncPhase::Ready
        );
        assert_eq!(
            SyncPhase::observe(Some(&session(true, true)), 3),
            SyncPhase::Active
        );
        assert_eq!(
            SyncPhase::observe(Some(&session(true, false)), 3),
            SyncPhase::Ended
        );
    }

    #[test]
    fn reconciler_emits_each_event_once_across_skewed_windows() {
        let mut reconciler = Reconciler::new();
        let a = Message::user("s1", "hello");
        let b = Message::assistant("s1", "hi there");
        let c = Message::user("s1", "a dog");

        let first = reconciler.reconcile(&[a.clone(), b.clone()]);
        assert_eq!(first.len(), 2);

        // Second poll re-observes the old window plus one new message.
        let second = reconciler.reconcile(&[a.clone(), b.clone(), c.clone()]);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].content, "a dog");

        // A stale window emits nothing.
        let third = reconciler.reconcile(&[a.clone(), b.clone()]);
        assert!(third.is_empty());
    }

    #[test]
    fn repeated_identical_utterances_are_distinct_events() {
        let mut reconciler = Reconciler::new();
        let first = Message::user("s1", "yes");
        let second = Message::user("s1", "yes");

        let fresh = reconciler.reconcile(&[first.clone()]);
        assert_eq!(fresh.len(), 1);

        // The same text said again is a new event, not a duplicate.
        let fresh = reconciler.reconcile(&[first, second]);
        assert_eq!(fresh.len(), 1);
    }
}
