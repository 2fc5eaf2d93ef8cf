//! Language-model provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::{json, Value};
use tracing::debug;

use crate::chat::{ChatRequest, ChatResponse};
use crate::error::{LlmError, Result};

/// Seam for the external language-model service.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send the ordered history and return the complete response text.
    ///
    /// One call, one bounded timeout, no automatic retry: a failure here is
    /// a turn failure and the caller surfaces it.
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse>;
}

/// OpenAI-compatible chat completion client.
pub struct OpenAiChat {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    default_temperature: f32,
}

impl OpenAiChat {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Config(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            default_temperature: 0.7,
        })
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.default_temperature = temperature;
        self
    }

    fn build_body(&self, request: &ChatRequest) -> Value {
        json!({
            "model": self.model,
            "temperature": request.temperature.unwrap_or(self.default_temperature),
            "messages": request.messages,
        })
    }
}

#[async_trait]
impl LanguageModel for OpenAiChat {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model, messages = request.messages.len(), "chat completion request");

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&self.build_body(&request))
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => LlmError::Auth(message),
                _ => LlmError::Api {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .filter(|s| !s.is_empty())
            .ok_or(LlmError::EmptyCompletion)?;

        Ok(ChatResponse { content })
    }
}
