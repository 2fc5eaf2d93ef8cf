//! # Wren Configuration
//!
//! Configuration tree for the screening orchestrator plus a JSON file
//! loader. Poll intervals, the speaking-rate constant and the sensor
//! recency window are all tunable here; none of the literal defaults are
//! load-bearing for correctness.

pub mod config;
pub mod manager;

pub use config::{
    Config, ConfigError, ConfigResult, LlmConfig, LogLevel, LoggingConfig, PictureConfig,
    RobotConfig, SpeechConfig, SyncConfig,
};
pub use manager::ConfigManager;
