//! Speech-to-text and text-to-speech clients.
//!
//! Synthesis results are cached by (text, voice, speed) so repeated
//! affirmations play instantly; the cache is bounded and common phrases can
//! be preloaded at startup.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use reqwest::{header, multipart, Client};
use tracing::{debug, warn};

use crate::error::{LlmError, Result};

/// Short phrases worth pre-synthesizing at startup.
pub const COMMON_PHRASES: [&str; 7] = [
    "Great job!",
    "That's correct!",
    "Good try!",
    "Can you tell me more?",
    "What do you think?",
    "Excellent!",
    "Nice work!",
];

/// STT + TTS over an OpenAI-compatible audio API.
pub struct SpeechClient {
    client: Client,
    base_url: String,
    api_key: String,
    voice: String,
    speed: f32,
    cache: Mutex<HashMap<String, Vec<u8>>>,
    cache_capacity: usize,
}

impl SpeechClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        voice: impl Into<String>,
        speed: f32,
        timeout: Duration,
        cache_capacity: usize,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Config(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            voice: voice.into(),
            speed,
            cache: Mutex::new(HashMap::new()),
            cache_capacity,
        })
    }

    fn cache_key(&self, text: &str) -> String {
        format!("{}_{}_{}", text, self.voice, self.speed)
    }

    /// Transcribe raw audio bytes to text.
    pub async fn transcribe(&self, audio: Vec<u8>) -> Result<String> {
        let part = multipart::Part::bytes(audio)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| LlmError::Config(e.to_string()))?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("model", "whisper-1")
            .text("language", "en")
            .text("response_format", "text");

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let transcript = response
            .text()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;
        Ok(transcript.trim().to_string())
    }

    /// Synthesize mp3 audio for the given text, consulting the cache first.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let key = self.cache_key(text);
        if let Some(audio) = self.cache.lock().get(&key).cloned() {
            debug!(chars = text.len(), "tts cache hit");
            return Ok(audio);
        }

        let response = self
            .client
            .post(format!("{}/audio/speech", self.base_url))
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&serde_json::json!({
                "model": "tts-1",
                "voice": self.voice,
                "input": text,
                "speed": self.speed,
                "response_format": "mp3",
            }))
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?
            .to_vec();

        let mut cache = self.cache.lock();
        if cache.len() < self.cache_capacity {
            cache.insert(key, audio.clone());
        }
        Ok(audio)
    }

    /// Pre-synthesize common phrases to hide first-use latency. Failures are
    /// logged and skipped; warming the cache is never required.
    pub async fn preload_common_phrases(&self) {
        for phrase in COMMON_PHRASES {
            if let Err(e) = self.synthesize(phrase).await {
                warn!(phrase, error = %e, "phrase preload failed");
            }
        }
    }

    /// Seed the cache directly (used by tests and offline fixtures).
    pub fn seed_cache(&self, text: &str, audio: Vec<u8>) {
        let key = self.cache_key(text);
        self.cache.lock().insert(key, audio);
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SpeechClient {
        SpeechClient::new(
            "http://127.0.0.1:9",
            "test-key",
            "nova",
            0.95,
            Duration::from_millis(100),
            4,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn cache_hit_bypasses_http() {
        // The base URL points at a dead port; a hit must not touch it.
        let speech = client();
        speech.seed_cache("Great job!", vec![1, 2, 3]);
        let audio = speech.synthesize("Great job!").await.unwrap();
        assert_eq!(audio, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn cache_keys_include_voice_and_speed() {
        let speech = client();
        speech.seed_cache("hi", vec![1]);
        assert_eq!(speech.cache_key("hi"), "hi_nova_0.95");
        assert_eq!(speech.cached_len(), 1);
    }

    #[tokio::test]
    async fn network_failure_is_reported_not_retried() {
        let speech = client();
        let err = speech.synthesize("uncached").await.unwrap_err();
        assert!(matches!(err, LlmError::Network(_)));
    }
}
