//! Configuration management.
//!
//! Configuration is read from a YAML file, `config.yaml` by default or the
//! path in `TOOLWIRE_CONFIG`. Every section has defaults so a minimal file
//! only needs an API key. The key can also come from the environment:
//! - `TOOLWIRE_API_KEY` - API key for the model backend (overrides the file).
//!
//! Example:
//!
//! ```yaml
//! api_key: sk-...
//! model:
//!   base_url: https://api.deepseek.com
//!   name: deepseek-chat
//! context:
//!   max_history: 20
//! agent:
//!   max_rounds: 4
//! tools:
//!   enabled: true
//!   mode: stdio
//!   worker_command: target/debug/toolwire-worker
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("missing API key: set `api_key` in the config file or the TOOLWIRE_API_KEY environment variable")]
    MissingApiKey,

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// API key for the model backend.
    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub context: ContextConfig,

    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Base URL of an OpenAI-compatible chat-completions API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier.
    #[serde(default = "default_model_name")]
    pub name: String,

    #[serde(default)]
    pub temperature: Option<f32>,

    #[serde(default)]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContextConfig {
    /// Maximum non-system messages retained in history.
    #[serde(default = "default_max_history")]
    pub max_history: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Maximum model-query-plus-tool-execution rounds per user turn.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolsConfig {
    /// Whether the agent offers tools to the model at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Where tools run: in-process or in a worker subprocess.
    #[serde(default)]
    pub mode: ToolMode,

    /// Worker binary to spawn in `stdio` mode.
    #[serde(default = "default_worker_command")]
    pub worker_command: String,

    /// Extra arguments for the worker binary.
    #[serde(default)]
    pub worker_args: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    #[default]
    Local,
    Stdio,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            name: default_model_name(),
            temperature: None,
            max_tokens: None,
        }
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_history: default_max_history(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: ToolMode::default(),
            worker_command: default_worker_command(),
            worker_args: Vec::new(),
        }
    }
}

impl Config {
    /// Load from `TOOLWIRE_CONFIG` or `config.yaml`.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("TOOLWIRE_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());
        Self::from_path(Path::new(&path))
    }

    /// Load from an explicit path, applying environment overrides.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut config: Config =
            serde_yaml::from_str(&data).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        if let Ok(key) = std::env::var("TOOLWIRE_API_KEY") {
            if !key.is_empty() {
                config.api_key = key;
            }
        }

        if config.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        if config.tools.enabled
            && config.tools.mode == ToolMode::Stdio
            && config.tools.worker_command.trim().is_empty()
        {
            return Err(ConfigError::InvalidValue {
                field: "tools.worker_command".to_string(),
                reason: "must not be empty in stdio mode".to_string(),
            });
        }

        Ok(config)
    }
}

fn default_base_url() -> String {
    "https://api.deepseek.com".to_string()
}

fn default_model_name() -> String {
    "deepseek-chat".to_string()
}

fn default_max_history() -> usize {
    20
}

fn default_max_rounds() -> usize {
    4
}

fn default_worker_command() -> String {
    "toolwire-worker".to_string()
}

fn default_true() -> bool {
    true
}
