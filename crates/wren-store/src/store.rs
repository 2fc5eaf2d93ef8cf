//! Store traits.
//!
//! The two front-end processes never talk to each other; everything they
//! coordinate on passes through a [`SessionStore`]. The trait is the seam
//! for the real keyed-store service; [`crate::MemoryStore`] is the in-tree
//! implementation.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use wren_core::{Message, SensorReading, Session};

use crate::error::StoreResult;

/// Parameters for creating a new screening session.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub session_id: String,
    pub child_id: String,
    pub child_name: String,
    pub clinician_id: String,
    /// Initial metadata; the store adds `child_ready: false` when absent.
    pub metadata: HashMap<String, Value>,
}

/// Persistent, keyed store for sessions and their append-only message logs.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a session with status `active` and a per-child session number
    /// assigned as `1 + max(existing numbers for the child)`.
    async fn create_session(&self, new: NewSession) -> StoreResult<Session>;

    async fn get_session(&self, session_id: &str) -> StoreResult<Option<Session>>;

    /// All sessions, newest first.
    async fn list_sessions(&self) -> StoreResult<Vec<Session>>;

    /// Most recently created session with status `active`, if any.
    async fn find_active_session(&self) -> StoreResult<Option<Session>> {
        let sessions = self.list_sessions().await?;
        Ok(sessions.into_iter().find(|s| s.is_active()))
    }

    /// Merge the given keys into the session's metadata bag. Existing keys
    /// not named here are preserved.
    async fn update_metadata(
        &self,
        session_id: &str,
        updates: HashMap<String, Value>,
    ) -> StoreResult<()>;

    /// Mark the session completed and stamp `ended_at`. Idempotent: ending a
    /// completed session is a no-op.
    async fn end_session(&self, session_id: &str) -> StoreResult<()>;

    /// Append one message to the session's log. Completed sessions reject
    /// further writes.
    async fn append_message(&self, message: Message) -> StoreResult<()>;

    /// All messages for a session, ascending by timestamp.
    async fn session_messages(&self, session_id: &str) -> StoreResult<Vec<Message>>;
}

/// Advisory real-time emotion feed, written by external sensor hardware.
#[async_trait]
pub trait EmotionFeed: Send + Sync {
    /// Most recent reading for the session within the recency window.
    async fn current_emotion(
        &self,
        session_id: &str,
        window: Duration,
    ) -> StoreResult<Option<SensorReading>>;

    /// Record a reading (used by the sensor bridge and by tests).
    async fn record_emotion(&self, session_id: &str, reading: SensorReading) -> StoreResult<()>;
}
