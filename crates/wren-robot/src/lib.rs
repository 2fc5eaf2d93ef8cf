//! # Wren Robot
//!
//! Dispatcher for the hardware actuation endpoint. Gestures are best-effort:
//! one short-timeout request per action, failures reported to the caller and
//! never retried — a missed gesture does not invalidate a conversation turn.

use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use wren_core::{RobotAction, UnknownActionError};

#[derive(Error, Debug)]
pub enum RobotError {
    #[error("actuation request failed: {0}")]
    Request(String),

    #[error("actuation endpoint returned status {status}")]
    Status { status: u16 },

    #[error(transparent)]
    UnknownAction(#[from] UnknownActionError),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RobotError>;

/// Client for the robot's HTTP control endpoint.
pub struct RobotClient {
    client: reqwest::Client,
    base_url: String,
}

impl RobotClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RobotError::Config(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Issue one control command (`variable=value`). Idempotent on the
    /// hardware side; no acknowledgment payload beyond success/failure.
    pub async fn send_command(&self, var: &str, val: u8, cmd: u8) -> Result<()> {
        let url = format!(
            "{}/control?var={}&val={}&cmd={}",
            self.base_url, var, val, cmd
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RobotError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RobotError::Status {
                status: status.as_u16(),
            });
        }
        info!(var, val, "robot command sent");
        Ok(())
    }

    /// Perform a vocabulary action.
    pub async fn perform(&self, action: RobotAction) -> Result<()> {
        self.send_command("funcMode", action.actuation_code(), 0)
            .await
    }

    /// Parse a loose action name and perform it. Unknown names are logged
    /// and reported as a typed error, never executed.
    pub async fn perform_named(&self, name: &str) -> Result<()> {
        let action = RobotAction::parse(name).map_err(|e| {
            warn!(name, "ignoring unknown robot action");
            e
        })?;
        self.perform(action).await
    }

    /// Probe whether the endpoint is reachable.
    pub async fn is_available(&self) -> bool {
        match self.client.get(&self.base_url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dead_client() -> RobotClient {
        // Port 9 (discard) refuses connections; every request fails fast.
        RobotClient::new("http://127.0.0.1:9", Duration::from_millis(100)).unwrap()
    }

    #[tokio::test]
    async fn unknown_action_is_rejected_without_a_request() {
        let robot = dead_client();
        let err = robot.perform_named("smile").await.unwrap_err();
        assert!(matches!(err, RobotError::UnknownAction(_)));
    }

    #[tokio::test]
    async fn alias_parses_before_dispatch() {
        let robot = dead_client();
        // "digging" resolves to dig, so the failure is transport, not parse.
        let err = robot.perform_named("digging").await.unwrap_err();
        assert!(matches!(err, RobotError::Request(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_reports_not_available() {
        let robot = dead_client();
        assert!(!robot.is_available().await);
    }
}
