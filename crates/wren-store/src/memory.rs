//! In-memory store implementation.
//!
//! Backs tests and single-host deployments. Sessions and message logs live
//! in `DashMap`s; message logs are kept sorted by timestamp on read so the
//! ordering contract holds even if appends race.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use serde_json::Value;
use tracing::{debug, info, warn};

use wren_core::types::session::META_CHILD_READY;
use wren_core::{Message, SensorReading, Session, SessionStatus};

use crate::error::{StoreError, StoreResult};
use crate::store::{EmotionFeed, NewSession, SessionStore};

/// DashMap-backed [`SessionStore`] + [`EmotionFeed`].
#[derive(Default)]
pub struct MemoryStore {
    sessions: DashMap<String, Session>,
    messages: DashMap<String, Vec<Message>>,
    emotions: DashMap<String, Vec<SensorReading>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_session_number(&self, child_id: &str) -> u32 {
        let max = self
            .sessions
            .iter()
            .filter(|entry| entry.value().child_id == child_id)
            .map(|entry| entry.value().session_number)
            .max()
            .unwrap_or(0);
        max + 1
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create_session(&self, new: NewSession) -> StoreResult<Session> {
        let mut metadata = new.metadata;
        metadata
            .entry(META_CHILD_READY.to_string())
            .or_insert(Value::Bool(false));

        let session = Session {
            session_id: new.session_id.clone(),
            child_id: new.child_id.clone(),
            child_name: new.child_name,
            clinician_id: new.clinician_id,
            session_number: self.next_session_number(&new.child_id),
            status: SessionStatus::Active,
            metadata,
            created_at: Utc::now(),
            ended_at: None,
        };

        info!(
            session_id = %session.session_id,
            child_id = %session.child_id,
            session_number = session.session_number,
            "created session"
        );
        self.sessions.insert(new.session_id, session.clone());
        Ok(session)
    }

    async fn get_session(&self, session_id: &str) -> StoreResult<Option<Session>> {
        Ok(self.sessions.get(session_id).map(|s| s.value().clone()))
    }

    async fn list_sessions(&self) -> StoreResult<Vec<Session>> {
        let mut sessions: Vec<Session> = self
            .sessions
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    async fn update_metadata(
        &self,
        session_id: &str,
        updates: HashMap<String, Value>,
    ) -> StoreResult<()> {
        let mut entry =
            self.sessions
                .get_mut(session_id)
                .ok_or_else(|| StoreError::SessionNotFound {
                    id: session_id.to_string(),
                })?;
        for (key, value) in updates {
            debug!(session_id, key = %key, "metadata merge");
            entry.metadata.insert(key, value);
        }
        Ok(())
    }

    async fn end_session(&self, session_id: &str) -> StoreResult<()> {
        let mut entry =
            self.sessions
                .get_mut(session_id)
                .ok_or_else(|| StoreError::SessionNotFound {
                    id: session_id.to_string(),
                })?;
        if entry.status == SessionStatus::Completed {
            debug!(session_id, "end_session on completed session, no-op");
            return Ok(());
        }
        entry.status = SessionStatus::Completed;
        entry.ended_at = Some(Utc::now());
        info!(session_id, "session completed");
        Ok(())
    }

    async fn append_message(&self, message: Message) -> StoreResult<()> {
        let session = self.sessions.get(&message.session_id).ok_or_else(|| {
            StoreError::SessionNotFound {
                id: message.session_id.clone(),
            }
        })?;
        if session.status == SessionStatus::Completed {
            warn!(session_id = %message.session_id, "rejected write to completed session");
            return Err(StoreError::SessionCompleted {
                id: message.session_id.clone(),
            });
        }
        drop(session);

        self.messages
            .entry(message.session_id.clone())
            .or_default()
            .push(message);
        Ok(())
    }

    async fn session_messages(&self, session_id: &str) -> StoreResult<Vec<Message>> {
        let mut messages = self
            .messages
            .get(session_id)
            .map(|m| m.value().clone())
            .unwrap_or_default();
        messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(messages)
    }
}

#[async_trait]
impl EmotionFeed for MemoryStore {
    async fn current_emotion(
        &self,
        session_id: &str,
        window: Duration,
    ) -> StoreResult<Option<SensorReading>> {
        let threshold = Utc::now()
            - chrono::Duration::from_std(window).map_err(|e| StoreError::other(e.to_string()))?;
        let reading = self.emotions.get(session_id).and_then(|readings| {
            readings
                .iter()
                .filter(|r| r.timestamp >= threshold)
                .max_by_key(|r| r.timestamp)
                .cloned()
        });
        Ok(reading)
    }

    async fn record_emotion(&self, session_id: &str, reading: SensorReading) -> StoreResult<()> {
        self.emotions
            .entry(session_id.to_string())
            .or_default()
            .push(reading);
        Ok(())
    }
}
