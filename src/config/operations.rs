//! Config loading, discovery, and validation.

use super::model::Config;
use crate::error::{Result, SwarmError};
use std::path::Path;

/// File name looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "swarmctl.yaml";

impl Config {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(SwarmError::Io)` - The file could not be read
    /// * `Err(SwarmError::ValidationError)` - Parse error or invalid values
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            SwarmError::Io(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Resolve the effective config.
    ///
    /// An explicit path must exist. Without one, `./swarmctl.yaml` is used
    /// when present, and built-in defaults otherwise.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let local = Path::new(CONFIG_FILE_NAME);
        if local.is_file() {
            tracing::debug!(path = %local.display(), "loading config from working directory");
            return Self::load(local);
        }

        Ok(Self::default())
    }

    /// Parse config from a YAML string.
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| {
                SwarmError::ValidationError(format!("failed to parse config YAML: {}", e))
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| SwarmError::UserError(format!("failed to serialize config: {}", e)))
    }

    /// Validate config values.
    ///
    /// - `swarm.max_agents` must be positive
    /// - `fallback_agent_count` must be positive
    /// - `wait.max_polls` must be positive
    pub fn validate(&self) -> Result<()> {
        if self.swarm.max_agents == 0 {
            return Err(SwarmError::ValidationError(
                "swarm.max_agents must be greater than 0".to_string(),
            ));
        }

        if self.fallback_agent_count == 0 {
            return Err(SwarmError::ValidationError(
                "fallback_agent_count must be greater than 0".to_string(),
            ));
        }

        if self.wait.max_polls == 0 {
            return Err(SwarmError::ValidationError(
                "wait.max_polls must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
