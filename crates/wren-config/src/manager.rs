use std::path::{Path, PathBuf};
use std::sync::Arc;

use regex::Regex;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::{Config, ConfigError, ConfigResult};

/// Loads, holds and persists the configuration file.
#[derive(Clone)]
pub struct ConfigManager {
    path: PathBuf,
    config: Arc<RwLock<Config>>,
}

impl ConfigManager {
    /// Load a config file, creating it with defaults when absent.
    pub async fn load(path: &Path) -> ConfigResult<Self> {
        let config = if path.exists() {
            info!("Loading config from {:?}", path);
            let content = tokio::fs::read_to_string(path).await?;
            let content = Self::expand_env_vars(&content)?;
            serde_json::from_str(&content)?
        } else {
            info!("Config file not found, creating default config at {:?}", path);
            let default_config = Config::default();
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let content = serde_json::to_string_pretty(&default_config)?;
            tokio::fs::write(path, &content).await?;
            default_config
        };

        Ok(Self {
            path: path.to_path_buf(),
            config: Arc::new(RwLock::new(config)),
        })
    }

    /// Load from the default location (~/.wren/config.json).
    pub async fn load_default() -> ConfigResult<Self> {
        let config_path = Self::default_config_path()?;
        Self::load(&config_path).await
    }

    pub fn default_config_path() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ConfigError::InvalidPath("Could not find home directory".to_string()))?;
        Ok(home.join(".wren").join("config.json"))
    }

    /// Wrap an in-memory config (used by tests).
    pub fn new(config: Config, path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(config)),
        }
    }

    pub fn get(&self) -> Arc<RwLock<Config>> {
        Arc::clone(&self.config)
    }

    /// Snapshot the current configuration.
    pub async fn snapshot(&self) -> Config {
        self.config.read().await.clone()
    }

    pub async fn save(&self) -> ConfigResult<()> {
        let config = self.config.read().await;
        let content = serde_json::to_string_pretty(&*config)?;
        drop(config);

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, content).await?;
        info!("Config saved to {:?}", self.path);
        Ok(())
    }

    /// Expand `${VAR}` references against the process environment.
    fn expand_env_vars(content: &str) -> ConfigResult<String> {
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static regex");
        let mut missing = None;
        let expanded = re.replace_all(content, |caps: &regex::Captures<'_>| {
            let name = &caps[1];
            match std::env::var(name) {
                Ok(value) => value,
                Err(_) => {
                    missing.get_or_insert_with(|| name.to_string());
                    String::new()
                }
            }
        });
        if let Some(name) = missing {
            return Err(ConfigError::EnvVarNotFound(name));
        }
        Ok(expanded.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let manager = ConfigManager::load(&path).await.unwrap();
        assert!(path.exists());
        assert_eq!(manager.snapshot().await, Config::default());
    }

    #[tokio::test]
    async fn save_then_reload_preserves_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let manager = ConfigManager::load(&path).await.unwrap();
        {
            let config = manager.get();
            let mut config = config.write().await;
            config.sync.child_poll_ms = 10;
        }
        manager.save().await.unwrap();

        let reloaded = ConfigManager::load(&path).await.unwrap();
        assert_eq!(reloaded.snapshot().await.sync.child_poll_ms, 10);
    }

    #[test]
    fn env_expansion_reports_missing_vars() {
        let err = ConfigManager::expand_env_vars("{\"k\": \"${WREN_DEFINITELY_UNSET}\"}")
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarNotFound(_)));
    }
}
