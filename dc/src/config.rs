//! Decide configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::llm::LlmError;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Decision request settings
    pub decision: DecisionConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Network providers need their API key environment variable set. The
    /// offline `local` provider needs nothing.
    pub fn validate(&self) -> Result<()> {
        match self.llm.provider.as_str() {
            "local" => Ok(()),
            "anthropic" => {
                if std::env::var(&self.llm.api_key_env).is_err() {
                    return Err(eyre::eyre!(
                        "LLM API key not found. Set the {} environment variable.",
                        self.llm.api_key_env
                    ));
                }
                Ok(())
            }
            other => Err(eyre::eyre!(
                "Unknown LLM provider: '{}'. Supported: anthropic, local",
                other
            )),
        }
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Project-local: .decide.yml
        let local_config = PathBuf::from(".decide.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // User: ~/.config/decide/decide.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("decide").join("decide.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name: "anthropic" or the offline "local" picker
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Upper bound on tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String, LlmError> {
        std::env::var(&self.api_key_env).map_err(|_| LlmError::MissingApiKey(self.api_key_env.clone()))
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 4096,
            timeout_ms: 60_000,
        }
    }
}

/// Decision request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Tokens requested per decision
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Optional Handlebars template replacing the built-in request prompt
    #[serde(rename = "prompt-template")]
    pub prompt_template: Option<PathBuf>,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            prompt_template: None,
        }
    }
}

impl DecisionConfig {
    /// Template path with a leading `~/` expanded
    pub fn expanded_template_path(&self) -> Option<PathBuf> {
        self.prompt_template.as_ref().map(|p| {
            let s = p.to_string_lossy();
            match s.strip_prefix("~/") {
                Some(rest) => dirs::home_dir().map(|home| home.join(rest)).unwrap_or_else(|| p.clone()),
                None => p.clone(),
            }
        })
    }
}
