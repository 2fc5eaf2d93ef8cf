//! Conversation turn manager.
//!
//! Owns all per-session conversation state: history, turn counter, picture
//! scheduler, question tracker, and the previous robot action. One agent is
//! built per session and driven by the child-side loop; every turn yields a
//! complete [`TurnResult`] with a guaranteed action payload.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use wren_core::{
    ActionPayload, ChildEmotion, DisplayEmotion, PictureInfo, RobotAction, SensorReading,
    TurnResult,
};
use wren_llm::{ChatMessage, ChatRequest, LanguageModel};
use wren_store::EmotionFeed;

use crate::commands;
use crate::detect::detect_child_emotion;
use crate::display::{self, DisplayContext};
use crate::error::AgentResult;
use crate::parser;
use crate::pictures::PictureScheduler;
use crate::prompt;
use crate::questions::QuestionTracker;

const HISTORY_WINDOW: usize = 20;
const MAX_PICTURE_FOLLOWUPS: u32 = 3;
const DEFAULT_EMOTION_WINDOW: Duration = Duration::from_secs(30);

/// LLM-driven screening conversation agent, one per session.
pub struct ScreeningAgent {
    model: Arc<dyn LanguageModel>,
    feed: Option<Arc<dyn EmotionFeed>>,
    session_id: String,
    system_prompt: String,
    emotion_window: Duration,
    pictures: PictureScheduler,
    questions: QuestionTracker,
    rng: StdRng,

    history: Vec<ChatMessage>,
    child_utterances: Vec<String>,
    turn: u32,
    last_action: Option<RobotAction>,
    child_age: Option<u8>,
    picture_active: bool,
    picture_followups: u32,
}

impl ScreeningAgent {
    pub fn new(model: Arc<dyn LanguageModel>, session_id: impl Into<String>) -> Self {
        Self {
            model,
            feed: None,
            session_id: session_id.into(),
            system_prompt: prompt::DEFAULT_SYSTEM_PROMPT.to_string(),
            emotion_window: DEFAULT_EMOTION_WINDOW,
            pictures: PictureScheduler::new("picture_prompts"),
            questions: QuestionTracker::new(),
            rng: StdRng::from_entropy(),
            history: Vec::new(),
            child_utterances: Vec::new(),
            turn: 0,
            last_action: None,
            child_age: None,
            picture_active: false,
            picture_followups: 0,
        }
    }

    pub fn with_emotion_feed(mut self, feed: Arc<dyn EmotionFeed>) -> Self {
        self.feed = Some(feed);
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_child_age(mut self, age: u8) -> Self {
        self.child_age = Some(age);
        self
    }

    pub fn with_picture_dir(mut self, dir: impl Into<String>) -> Self {
        self.pictures = PictureScheduler::new(dir);
        self
    }

    pub fn with_emotion_window(mut self, window: Duration) -> Self {
        self.emotion_window = window;
        self
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Open the conversation: greet the child and gesture.
    ///
    /// The greeting action falls back to `wave` when the model omits or
    /// garbles the payload.
    pub async fn start_conversation(&mut self) -> AgentResult<TurnResult> {
        let mut instruction = prompt::greeting_instruction();
        if let Some(reading) = self.sensor_reading().await {
            instruction.push_str(&prompt::sensor_context(&reading));
        }

        let request = ChatRequest::new()
            .with_message(ChatMessage::system(&self.system_prompt))
            .with_message(ChatMessage::user(instruction));

        let response = self.model.complete(request).await?;
        debug!(chars = response.content.len(), "greeting completion received");

        let robot_action = match parser::extract_action(&response.content) {
            Some(payload) => payload,
            None => {
                warn!("greeting had no valid action payload, falling back to wave");
                ActionPayload::fallback(RobotAction::Wave)
            }
        };
        let clean_text = parser::strip_action(&response.content);

        let display_emotion = display::select(
            &clean_text,
            &DisplayContext {
                detected_emotion: None,
                robot_action: Some(robot_action.action),
            },
        );

        self.history.push(ChatMessage::assistant(&clean_text));
        self.turn = 1;
        info!(session_id = %self.session_id, action = %robot_action.action, "conversation started");

        Ok(TurnResult {
            response_text: clean_text,
            robot_action,
            detected_emotion: None,
            display_emotion,
            picture: None,
            is_command_echo: false,
        })
    }

    /// Process one child utterance and produce the assistant turn.
    pub async fn chat(&mut self, utterance: &str) -> AgentResult<TurnResult> {
        // Direct robot commands short-circuit the model entirely.
        if let Some(action) = commands::detect_command(utterance) {
            info!(%action, utterance, "child command intercepted");
            let reply = commands::affirming_reply(&mut self.rng).to_string();
            let robot_action = ActionPayload::new(action, format!("child commanded: {utterance}"));

            self.history.push(ChatMessage::user(utterance));
            self.history.push(ChatMessage::assistant(&reply));

            return Ok(TurnResult {
                response_text: reply,
                robot_action,
                detected_emotion: Some(ChildEmotion::Engaged),
                display_emotion: DisplayEmotion::Surprise,
                picture: None,
                is_command_echo: true,
            });
        }

        let detected_emotion = detect_child_emotion(utterance);
        self.history.push(ChatMessage::user(utterance));
        self.child_utterances.push(utterance.to_string());

        let picture_to_show = self.maybe_show_picture();

        let request = self
            .build_request(picture_to_show.as_ref(), detected_emotion)
            .await;
        let response = self.model.complete(request).await?;

        self.questions.track(&response.content);

        let robot_action = match parser::extract_action(&response.content) {
            Some(payload) => payload,
            None => {
                warn!("turn had no valid action payload, falling back to steady");
                ActionPayload::fallback(RobotAction::Steady)
            }
        };
        // Back-to-back identical gestures read as stuck to the child; the
        // prompt already forbids them, and a model that repeats anyway gets
        // a substitute.
        let robot_action = if self.last_action == Some(robot_action.action) {
            let substitute = if robot_action.action == RobotAction::Steady {
                RobotAction::Wave
            } else {
                RobotAction::Steady
            };
            warn!(repeated = %robot_action.action, %substitute, "model repeated the previous action");
            ActionPayload::fallback(substitute)
        } else {
            robot_action
        };
        let clean_text = parser::strip_action(&response.content);

        let display_emotion = display::select(
            &clean_text,
            &DisplayContext {
                detected_emotion: Some(detected_emotion.as_str()),
                robot_action: Some(robot_action.action),
            },
        );

        self.last_action = Some(robot_action.action);
        self.history.push(ChatMessage::assistant(&clean_text));
        self.turn += 1;

        Ok(TurnResult {
            response_text: clean_text,
            robot_action,
            detected_emotion: Some(detected_emotion),
            display_emotion,
            picture: picture_to_show,
            is_command_echo: false,
        })
    }

    fn maybe_show_picture(&mut self) -> Option<PictureInfo> {
        if self.picture_active {
            return None;
        }
        if !self
            .pictures
            .should_show_now(self.turn, &self.child_utterances, &mut self.rng)
        {
            return None;
        }

        let picture = self.pictures.select(self.child_age, &mut self.rng)?;
        self.picture_active = true;
        self.picture_followups = 0;
        self.questions.track_picture();
        Some(picture)
    }

    async fn build_request(
        &mut self,
        picture: Option<&PictureInfo>,
        detected_emotion: ChildEmotion,
    ) -> ChatRequest {
        let mut messages = vec![ChatMessage::system(&self.system_prompt)];

        let tail_start = self.history.len().saturating_sub(HISTORY_WINDOW);
        messages.extend(self.history[tail_start..].iter().cloned());

        if let Some(picture) = picture {
            let opening = self.pictures.intro_prompt(&mut self.rng);
            messages.push(ChatMessage::user(prompt::picture_instruction(
                picture, opening,
            )));
        } else if self.picture_active {
            self.picture_followups += 1;
            if self.picture_followups < MAX_PICTURE_FOLLOWUPS {
                messages.push(ChatMessage::user(prompt::followup_instruction(
                    self.picture_followups,
                    self.pictures.followup_prompts(),
                )));
            } else {
                self.picture_active = false;
                messages.push(ChatMessage::user(prompt::transition_instruction()));
            }
        } else if let Some(instruction) = self.questions.next_instruction() {
            messages.push(ChatMessage::user(instruction));
        }

        if detected_emotion != ChildEmotion::Neutral {
            messages.push(ChatMessage::user(prompt::emotion_hint(detected_emotion)));
        }

        if let Some(reading) = self.sensor_reading().await {
            messages.push(ChatMessage::user(prompt::sensor_context(&reading)));
        }

        match self.last_action {
            Some(last) => messages.push(ChatMessage::user(prompt::repetition_constraint(last))),
            None => messages.push(ChatMessage::user(prompt::mandatory_action_instruction())),
        }

        ChatRequest::new().with_messages(messages)
    }

    /// Best-effort read of the advisory sensor feed. Failures degrade to
    /// "no reading" rather than failing the turn.
    async fn sensor_reading(&self) -> Option<SensorReading> {
        let feed = self.feed.as_ref()?;
        match feed.current_emotion(&self.session_id, self.emotion_window).await {
            Ok(reading) => reading,
            Err(e) => {
                warn!(error = %e, "emotion feed read failed, continuing without it");
                None
            }
        }
    }
}
