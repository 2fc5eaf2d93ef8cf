//! Clinician-side polling loop.
//!
//! The producer side of the protocol: it creates sessions and watches the
//! transcript grow, but is strictly read-only on messages and never touches
//! the readiness latch. At most one active session may exist, enforced by
//! scanning and ending stale ones before each create rather than by a
//! store-level lock; a race between near-simultaneous creates is treated as
//! recoverable skew, not a fatal error.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{info, warn};

use wren_core::{Message, Session, META_CHILD_AGE};
use wren_store::{NewSession, SessionStore};

use crate::error::{RuntimeError, RuntimeResult};
use crate::sync::{Reconciler, SyncPhase};

/// Events the clinician loop surfaces to its front-end.
#[derive(Debug)]
pub enum SessionEvent {
    PhaseChanged(SyncPhase),
    NewMessages(Vec<Message>),
    Ended,
}

/// Session lifecycle driver for the clinician process.
pub struct ClinicianLoop {
    store: Arc<dyn SessionStore>,
    clinician_id: String,
    poll_interval: Duration,
}

impl ClinicianLoop {
    pub fn new(
        store: Arc<dyn SessionStore>,
        clinician_id: impl Into<String>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            store,
            clinician_id: clinician_id.into(),
            poll_interval,
        }
    }

    /// Create a fresh session for the child, ending any stale active one
    /// first. The readiness latch starts unset; only the child side may
    /// flip it.
    pub async fn start_session(
        &self,
        child_id: &str,
        child_name: &str,
        child_age: Option<u32>,
    ) -> RuntimeResult<Session> {
        while let Some(stale) = self.store.find_active_session().await? {
            warn!(session_id = %stale.session_id, "ending stale active session");
            self.store.end_session(&stale.session_id).await?;
        }

        let mut metadata: HashMap<String, Value> = HashMap::new();
        if let Some(age) = child_age {
            metadata.insert(META_CHILD_AGE.to_string(), Value::from(age));
        }

        let session = self
            .store
            .create_session(NewSession {
                session_id: Session::generate_id(),
                child_id: child_id.to_string(),
                child_name: child_name.to_string(),
                clinician_id: self.clinician_id.clone(),
                metadata,
            })
            .await?;
        info!(
            session_id = %session.session_id,
            session_number = session.session_number,
            "session created"
        );
        Ok(session)
    }

    /// Poll the store until the session ends, emitting phase changes and
    /// newly observed messages. Transient store failures are reported and
    /// absorbed; the next poll retries from scratch.
    pub async fn run(
        &self,
        session_id: &str,
        events: mpsc::Sender<SessionEvent>,
    ) -> RuntimeResult<()> {
        let mut reconciler = Reconciler::new();
        let mut phase = SyncPhase::NoSession;

        loop {
            sleep(self.poll_interval).await;

            let session = match self.store.get_session(session_id).await {
                Ok(session) => session,
                Err(e) => {
                    warn!(error = %e, "session poll failed, retrying next cycle");
                    continue;
                }
            };
            let messages = match self.store.session_messages(session_id).await {
                Ok(messages) => messages,
                Err(e) => {
                    warn!(error = %e, "message poll failed, retrying next cycle");
                    continue;
                }
            };

            let observed = SyncPhase::observe(session.as_ref(), messages.len());
            if observed != phase {
                phase = observed;
                events
                    .send(SessionEvent::PhaseChanged(phase))
                    .await
                    .map_err(|_| RuntimeError::ChannelClosed)?;
            }

            let fresh = reconciler.reconcile(&messages);
            if !fresh.is_empty() {
                events
                    .send(SessionEvent::NewMessages(fresh))
                    .await
                    .map_err(|_| RuntimeError::ChannelClosed)?;
            }

            if phase == SyncPhase::Ended {
                events
                    .send(SessionEvent::Ended)
                    .await
                    .map_err(|_| RuntimeError::ChannelClosed)?;
                return Ok(());
            }
        }
    }

    /// End the session from the clinician side.
    pub async fn end_session(&self, session_id: &str) -> RuntimeResult<()> {
        self.store.end_session(session_id).await?;
        info!(session_id, "session ended by clinician");
        Ok(())
    }
}
