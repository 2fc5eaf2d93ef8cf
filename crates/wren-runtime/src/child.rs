//! Child-side loop.
//!
//! The consumer side of the protocol and the execution site for every
//! conversation turn: it polls for an active session, opens the
//! conversation, flips the readiness latch (only after the greeting is
//! safely persisted), and from then on turns captured utterances into
//! persisted message pairs, best-effort gestures, and paced audio.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{info, warn};

use wren_agent::ScreeningAgent;
use wren_core::{Message, Session, TurnResult, META_AUDIO_PLAYING, META_CHILD_READY};
use wren_llm::SpeechClient;
use wren_robot::RobotClient;
use wren_store::SessionStore;

use crate::audio::PlaybackGate;
use crate::error::RuntimeResult;

/// Poll until an active session appears.
pub async fn wait_for_session(
    store: &dyn SessionStore,
    poll_interval: Duration,
) -> RuntimeResult<Session> {
    loop {
        match store.find_active_session().await {
            Ok(Some(session)) => return Ok(session),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "session poll failed, retrying next cycle"),
        }
        sleep(poll_interval).await;
    }
}

/// Everything produced by one executed turn.
#[derive(Debug)]
pub struct TurnOutcome {
    pub turn: TurnResult,
    /// Background synthesis task; `None` when speech is disabled or the
    /// turn produced no text. Join it when audio is actually needed.
    pub audio: Option<JoinHandle<Option<Vec<u8>>>>,
    /// Estimated playback duration; input capture should stay suppressed
    /// this long.
    pub playback: Duration,
}

/// Turn execution driver for the child process.
pub struct ChildLoop {
    store: Arc<dyn SessionStore>,
    agent: ScreeningAgent,
    session_id: String,
    robot: Option<Arc<RobotClient>>,
    speech: Option<Arc<SpeechClient>>,
    gate: PlaybackGate,
}

impl ChildLoop {
    pub fn new(
        store: Arc<dyn SessionStore>,
        agent: ScreeningAgent,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            agent,
            session_id: session_id.into(),
            robot: None,
            speech: None,
            gate: PlaybackGate::new(2.25, 1.0),
        }
    }

    pub fn with_robot(mut self, robot: Arc<RobotClient>) -> Self {
        self.robot = Some(robot);
        self
    }

    pub fn with_speech(mut self, speech: Arc<SpeechClient>) -> Self {
        self.speech = Some(speech);
        self
    }

    pub fn with_gate(mut self, rate_wps: f32, buffer_secs: f32) -> Self {
        self.gate = PlaybackGate::new(rate_wps, buffer_secs);
        self
    }

    pub fn is_playback_blocked(&self) -> bool {
        self.gate.is_blocked()
    }

    /// Open the conversation and set the readiness latch.
    ///
    /// The latch flips only after the greeting message is persisted, so a
    /// clinician observing `child_ready=true` can rely on the transcript
    /// already containing the opening turn.
    pub async fn begin(&mut self) -> RuntimeResult<TurnOutcome> {
        let turn = self.agent.start_conversation().await?;
        self.persist_assistant_turn(&turn).await?;

        let outcome = self.actuate_and_speak(turn);

        let updates = std::iter::once((
            META_CHILD_READY.to_string(),
            serde_json::Value::Bool(true),
        ))
        .collect();
        self.store.update_metadata(&self.session_id, updates).await?;
        info!(session_id = %self.session_id, "readiness latch set");

        self.set_audio_playing(true).await;
        Ok(outcome)
    }

    /// Execute one turn from a captured child utterance.
    pub async fn handle_utterance(&mut self, utterance: &str) -> RuntimeResult<TurnOutcome> {
        self.store
            .append_message(Message::user(&self.session_id, utterance))
            .await?;

        let turn = self.agent.chat(utterance).await?;
        self.persist_assistant_turn(&turn).await?;

        let outcome = self.actuate_and_speak(turn);
        self.set_audio_playing(true).await;
        Ok(outcome)
    }

    /// Clear the advisory playback flag once the caller has finished
    /// playing (or discarding) the turn's audio.
    pub async fn mark_playback_complete(&self) {
        self.set_audio_playing(false).await;
    }

    /// Execute one turn from captured audio. Transcription failures are
    /// reported and skipped; the turn simply does not happen.
    pub async fn handle_audio(&mut self, audio: Vec<u8>) -> RuntimeResult<Option<TurnOutcome>> {
        let Some(speech) = self.speech.as_ref() else {
            warn!("audio captured but speech is disabled");
            return Ok(None);
        };

        let utterance = match speech.transcribe(audio).await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => return Ok(None),
            Err(e) => {
                warn!(error = %e, "transcription failed, skipping turn");
                return Ok(None);
            }
        };

        self.handle_utterance(&utterance).await.map(Some)
    }

    /// End the session from the child side.
    pub async fn end(&self) -> RuntimeResult<()> {
        self.store.end_session(&self.session_id).await?;
        info!(session_id = %self.session_id, "session ended by child side");
        Ok(())
    }

    /// Advisory flag for the clinician UI; failures never fail the turn.
    async fn set_audio_playing(&self, playing: bool) {
        let updates = std::iter::once((
            META_AUDIO_PLAYING.to_string(),
            serde_json::Value::Bool(playing),
        ))
        .collect();
        if let Err(e) = self.store.update_metadata(&self.session_id, updates).await {
            warn!(error = %e, playing, "could not update the playback flag");
        }
    }

    async fn persist_assistant_turn(&self, turn: &TurnResult) -> RuntimeResult<()> {
        let message = Message::assistant(&self.session_id, &turn.response_text)
            .with_metadata(turn.to_metadata());
        self.store.append_message(message).await?;
        Ok(())
    }

    /// Kick off synthesis in the background, dispatch the gesture, and arm
    /// the playback gate. Neither external call can fail the turn.
    fn actuate_and_speak(&mut self, turn: TurnResult) -> TurnOutcome {
        let audio = match (&self.speech, turn.response_text.is_empty()) {
            (Some(speech), false) => {
                let speech = speech.clone();
                let text = turn.response_text.clone();
                Some(tokio::spawn(async move {
                    match speech.synthesize(&text).await {
                        Ok(bytes) => Some(bytes),
                        Err(e) => {
                            warn!(error = %e, "synthesis failed, turn continues without audio");
                            None
                        }
                    }
                }))
            }
            _ => None,
        };

        if let Some(robot) = &self.robot {
            let robot = robot.clone();
            let action = turn.robot_action.action;
            tokio::spawn(async move {
                if let Err(e) = robot.perform(action).await {
                    warn!(error = %e, %action, "gesture dispatch failed");
                }
            });
        }

        let playback = self.gate.begin(&turn.response_text);

        TurnOutcome {
            turn,
            audio,
            playback,
        }
    }
}
