//! Screening session records.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata key for the child-side readiness latch.
pub const META_CHILD_READY: &str = "child_ready";
/// Metadata key for the advisory audio-playback signal.
pub const META_AUDIO_PLAYING: &str = "audio_playing";
/// Metadata key for the child's age, used by the picture scheduler.
pub const META_CHILD_AGE: &str = "child_age";

/// Lifecycle status of a session. Created `Active`, transitions once to
/// `Completed`, never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Completed,
}

/// One screening encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub child_id: String,
    pub child_name: String,
    pub clinician_id: String,
    /// Monotonically assigned per child: `max(existing) + 1`, starting at 1.
    pub session_number: u32,
    pub status: SessionStatus,
    /// Open key/value bag; merged on update, never overwritten wholesale.
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    /// Readiness latch state; absent means not yet ready.
    pub fn child_ready(&self) -> bool {
        self.metadata
            .get(META_CHILD_READY)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn audio_playing(&self) -> bool {
        self.metadata
            .get(META_AUDIO_PLAYING)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn child_age(&self) -> Option<u32> {
        self.metadata
            .get(META_CHILD_AGE)
            .and_then(Value::as_u64)
            .map(|age| age as u32)
    }

    /// Generate a new session identifier (`session_` + 12 hex chars).
    pub fn generate_id() -> String {
        let hex = uuid::Uuid::new_v4().simple().to_string();
        format!("session_{}", &hex[..12])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Session {
        Session {
            session_id: Session::generate_id(),
            child_id: "child-1".to_string(),
            child_name: "Mina".to_string(),
            clinician_id: "clin-1".to_string(),
            session_number: 1,
            status: SessionStatus::Active,
            metadata: HashMap::new(),
            created_at: Utc::now(),
            ended_at: None,
        }
    }

    #[test]
    fn generated_ids_have_expected_shape() {
        let id = Session::generate_id();
        assert!(id.starts_with("session_"));
        assert_eq!(id.len(), "session_".len() + 12);
    }

    #[test]
    fn child_ready_defaults_to_false() {
        let mut session = sample();
        assert!(!session.child_ready());
        session
            .metadata
            .insert(META_CHILD_READY.to_string(), Value::Bool(true));
        assert!(session.child_ready());
    }

    #[test]
    fn child_age_reads_from_metadata() {
        let mut session = sample();
        assert_eq!(session.child_age(), None);
        session
            .metadata
            .insert(META_CHILD_AGE.to_string(), Value::from(5u32));
        assert_eq!(session.child_age(), Some(5));
    }
}
