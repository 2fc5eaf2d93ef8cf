use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub version: String,
    pub llm: LlmConfig,
    pub speech: SpeechConfig,
    pub robot: RobotConfig,
    pub pictures: PictureConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            llm: LlmConfig::default(),
            speech: SpeechConfig::default(),
            robot: RobotConfig::default(),
            pictures: PictureConfig::default(),
            sync: SyncConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Dotted-path getter for the CLI `config get` command.
    pub fn get_value(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();
        match parts.as_slice() {
            ["version"] => Some(self.version.clone()),
            ["llm", "base_url"] => Some(self.llm.base_url.clone()),
            ["llm", "model"] => Some(self.llm.model.clone()),
            ["llm", "temperature"] => Some(self.llm.temperature.to_string()),
            ["llm", "timeout_secs"] => Some(self.llm.timeout_secs.to_string()),
            ["speech", "voice"] => Some(self.speech.voice.clone()),
            ["speech", "speed"] => Some(self.speech.speed.to_string()),
            ["speech", "enable_tts"] => Some(self.speech.enable_tts.to_string()),
            ["speech", "enable_stt"] => Some(self.speech.enable_stt.to_string()),
            ["speech", "cache_size"] => Some(self.speech.cache_size.to_string()),
            ["robot", "enabled"] => Some(self.robot.enabled.to_string()),
            ["robot", "host"] => Some(self.robot.host.clone()),
            ["robot", "port"] => Some(self.robot.port.to_string()),
            ["robot", "timeout_ms"] => Some(self.robot.timeout_ms.to_string()),
            ["pictures", "dir"] => Some(self.pictures.dir.clone()),
            ["sync", "clinician_poll_ms"] => Some(self.sync.clinician_poll_ms.to_string()),
            ["sync", "child_poll_ms"] => Some(self.sync.child_poll_ms.to_string()),
            ["sync", "speaking_rate_wps"] => Some(self.sync.speaking_rate_wps.to_string()),
            ["sync", "audio_buffer_secs"] => Some(self.sync.audio_buffer_secs.to_string()),
            ["sync", "emotion_window_secs"] => Some(self.sync.emotion_window_secs.to_string()),
            ["logging", "level"] => Some(format!("{:?}", self.logging.level)),
            ["logging", "file"] => self.logging.file.clone(),
            _ => None,
        }
    }

    /// Dotted-path setter for the CLI `config set` command.
    pub fn set_value(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        let parts: Vec<&str> = key.split('.').collect();
        match parts.as_slice() {
            ["llm", "base_url"] => self.llm.base_url = value.to_string(),
            ["llm", "model"] => self.llm.model = value.to_string(),
            ["llm", "temperature"] => {
                self.llm.temperature = parse_num(key, value)?;
            }
            ["llm", "timeout_secs"] => {
                self.llm.timeout_secs = parse_num(key, value)?;
            }
            ["speech", "voice"] => self.speech.voice = value.to_string(),
            ["speech", "speed"] => {
                self.speech.speed = parse_num(key, value)?;
            }
            ["speech", "enable_tts"] => {
                self.speech.enable_tts = parse_num(key, value)?;
            }
            ["speech", "enable_stt"] => {
                self.speech.enable_stt = parse_num(key, value)?;
            }
            ["robot", "enabled"] => {
                self.robot.enabled = parse_num(key, value)?;
            }
            ["robot", "host"] => self.robot.host = value.to_string(),
            ["robot", "port"] => {
                self.robot.port = parse_num(key, value)?;
            }
            ["robot", "timeout_ms"] => {
                self.robot.timeout_ms = parse_num(key, value)?;
            }
            ["pictures", "dir"] => self.pictures.dir = value.to_string(),
            ["sync", "clinician_poll_ms"] => {
                self.sync.clinician_poll_ms = parse_num(key, value)?;
            }
            ["sync", "child_poll_ms"] => {
                self.sync.child_poll_ms = parse_num(key, value)?;
            }
            ["sync", "speaking_rate_wps"] => {
                self.sync.speaking_rate_wps = parse_num(key, value)?;
            }
            ["sync", "audio_buffer_secs"] => {
                self.sync.audio_buffer_secs = parse_num(key, value)?;
            }
            ["sync", "emotion_window_secs"] => {
                self.sync.emotion_window_secs = parse_num(key, value)?;
            }
            ["logging", "level"] => self.logging.level = value.parse()?,
            ["logging", "file"] => self.logging.file = Some(value.to_string()),
            _ => return Err(ConfigError::KeyNotFound(key.to_string())),
        }
        Ok(())
    }
}

fn parse_num<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value
        .parse()
        .map_err(|_| ConfigError::Validation(format!("Invalid value for {}: {}", key, value)))
}

/// Language-model service settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    /// Upper bound on one completion call; failures propagate as turn
    /// failures, they are never retried inside the core.
    pub timeout_secs: u64,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            timeout_secs: 30,
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

/// Speech synthesis / transcription settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpeechConfig {
    pub enable_tts: bool,
    pub enable_stt: bool,
    /// Child-friendly voice name.
    pub voice: String,
    /// Playback speed; slightly below 1.0 for clarity with children.
    pub speed: f32,
    pub timeout_secs: u64,
    /// Max entries in the (text, voice, speed) synthesis cache.
    pub cache_size: usize,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enable_tts: true,
            enable_stt: true,
            voice: "nova".to_string(),
            speed: 0.95,
            timeout_secs: 10,
            cache_size: 50,
        }
    }
}

/// Actuation endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RobotConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    /// Gestures are best-effort; a short timeout keeps the turn loop moving.
    pub timeout_ms: u64,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "192.168.4.1".to_string(),
            port: 80,
            timeout_ms: 2000,
        }
    }
}

impl RobotConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Picture stimulus settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PictureConfig {
    /// Directory holding the stimulus images.
    pub dir: String,
}

impl Default for PictureConfig {
    fn default() -> Self {
        Self {
            dir: "picture_prompts".to_string(),
        }
    }
}

/// Cross-process polling and pacing settings.
///
/// All empirically tuned; tests override them with tiny values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncConfig {
    /// Clinician-side poll cadence.
    pub clinician_poll_ms: u64,
    /// Child-side poll cadence while idle.
    pub child_poll_ms: u64,
    /// Approximate speaking rate used to estimate audio duration.
    pub speaking_rate_wps: f64,
    /// Fixed buffer added to every duration estimate.
    pub audio_buffer_secs: f64,
    /// Recency window for the advisory emotion sensor feed.
    pub emotion_window_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            clinician_poll_ms: 2000,
            child_poll_ms: 300,
            speaking_rate_wps: 2.25,
            audio_buffer_secs: 1.0,
            emotion_window_secs: 30,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Info
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::Validation(format!("Invalid log level: {}", s))),
        }
    }
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file: None,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_json() {
        let config = Config::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn get_and_set_by_dotted_path() {
        let mut config = Config::default();
        config.set_value("sync.clinician_poll_ms", "50").unwrap();
        assert_eq!(
            config.get_value("sync.clinician_poll_ms").as_deref(),
            Some("50")
        );
        assert!(config.set_value("sync.bogus", "1").is_err());
        assert!(config.get_value("nope").is_none());
    }

    #[test]
    fn robot_base_url_formatting() {
        let robot = RobotConfig {
            host: "10.0.0.2".to_string(),
            port: 8080,
            ..Default::default()
        };
        assert_eq!(robot.base_url(), "http://10.0.0.2:8080");
    }
}
