//! Configuration management
//!
//! `AgentConfig` carries the per-agent knobs (identity, sampling,
//! iteration budget). `Settings` is the optional `reagent.toml` file the
//! CLI reads; the library itself never touches the environment.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ReagentError;

/// Per-agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Agent name, rendered into the default instructions
    #[serde(default = "default_name")]
    pub name: String,
    /// One-line agent description
    #[serde(default = "default_description")]
    pub description: String,
    /// Custom instructions; when absent the default preamble is generated
    #[serde(default)]
    pub instructions: Option<String>,
    /// Sampling temperature passed to the provider on every iteration
    #[serde(default)]
    pub temperature: f32,
    /// Maximum number of think/act/observe iterations per run
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

fn default_name() -> String {
    "ReactAgent".to_string()
}

fn default_description() -> String {
    "An intelligent ReAct agent".to_string()
}

fn default_max_iterations() -> usize {
    10
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            name: default_name(),
            description: default_description(),
            instructions: None,
            temperature: 0.0,
            max_iterations: default_max_iterations(),
        }
    }
}

impl AgentConfig {
    /// Set the agent name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the agent description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set custom instructions, replacing the generated preamble
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    /// Set the iteration budget
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Contents of the optional `reagent.toml` settings file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Provider spec, e.g. "gpt-4o-mini" or "anthropic://claude-3-5-sonnet-20241022"
    #[serde(default = "default_provider")]
    pub provider: String,
    /// API key for the provider; flag and env var take precedence in the CLI
    #[serde(default)]
    pub api_key: Option<String>,
    /// Agent defaults applied when flags are not given
    #[serde(default)]
    pub agent: AgentConfig,
}

fn default_provider() -> String {
    "gpt-4o-mini".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            provider: default_provider(),
            api_key: None,
            agent: AgentConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from the first `reagent.toml` found, or defaults when
    /// no file exists.
    pub fn load() -> Result<Self> {
        match find_config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Settings::default()),
        }
    }

    /// Load settings from an explicit path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let settings: Settings = toml::from_str(&content)
            .map_err(|e| ReagentError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(settings)
    }
}

/// Find the configuration file in standard locations
pub fn find_config_file() -> Option<PathBuf> {
    if let Ok(cwd) = std::env::current_dir() {
        let path = cwd.join("reagent.toml");
        if path.exists() {
            return Some(path);
        }
    }

    if let Some(dir) = get_config_dir() {
        let path = dir.join("reagent.toml");
        if path.exists() {
            return Some(path);
        }
    }

    None
}

/// Get the configuration directory path
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("reagent"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_config_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.name, "ReactAgent");
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.max_iterations, 10);
        assert!(config.instructions.is_none());
    }

    #[test]
    fn test_agent_config_builder() {
        let config = AgentConfig::default()
            .with_name("Researcher")
            .with_description("Finds things out")
            .with_temperature(0.5)
            .with_max_iterations(3);

        assert_eq!(config.name, "Researcher");
        assert_eq!(config.description, "Finds things out");
        assert_eq!(config.temperature, 0.5);
        assert_eq!(config.max_iterations, 3);
    }

    #[test]
    fn test_temperature_clamping() {
        let config = AgentConfig::default().with_temperature(5.0);
        assert_eq!(config.temperature, 2.0);
    }

    #[test]
    fn test_settings_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reagent.toml");
        std::fs::write(
            &path,
            r#"
provider = "anthropic://claude-3-5-sonnet-20241022"

[agent]
name = "Claude"
max_iterations = 5
"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.provider, "anthropic://claude-3-5-sonnet-20241022");
        assert!(settings.api_key.is_none());
        assert_eq!(settings.agent.name, "Claude");
        assert_eq!(settings.agent.max_iterations, 5);
        // Unspecified fields fall back to defaults
        assert_eq!(settings.agent.temperature, 0.0);
    }

    #[test]
    fn test_settings_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reagent.toml");
        std::fs::write(&path, "provider = [not valid").unwrap();
        assert!(Settings::load_from(&path).is_err());
    }
}
