//! Configuration loading, validation, and management for HevyChat.
//!
//! Loads configuration from `~/.hevychat/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.hevychat/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Anthropic API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anthropic_api_key: Option<String>,

    /// Model used for every completion
    #[serde(default = "default_model")]
    pub model: String,

    /// Max output tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Replaces the built-in coaching prompt when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_override: Option<String>,

    #[serde(default)]
    pub anthropic: AnthropicConfig,

    #[serde(default)]
    pub hevy: HevyConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_model() -> String {
    "claude-sonnet-4-5-20250929".into()
}
fn default_max_tokens() -> u32 {
    4096
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("anthropic_api_key", &redact(&self.anthropic_api_key))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field(
                "system_prompt_override",
                &self.system_prompt_override.as_ref().map(|p| p.len()),
            )
            .field("anthropic", &self.anthropic)
            .field("hevy", &self.hevy)
            .field("gateway", &self.gateway)
            .field("logging", &self.logging)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    #[serde(default = "default_anthropic_url")]
    pub base_url: String,
}

fn default_anthropic_url() -> String {
    "https://api.anthropic.com".into()
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            base_url: default_anthropic_url(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct HevyConfig {
    /// Fallback Hevy key for callers without a stored key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_hevy_url")]
    pub base_url: String,
}

fn default_hevy_url() -> String {
    "https://api.hevyapp.com".into()
}

impl Default for HevyConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_hevy_url(),
        }
    }
}

impl std::fmt::Debug for HevyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HevyConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    3000
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log full model responses and tool payloads at debug level
    #[serde(default)]
    pub log_payloads: bool,
}

impl AppConfig {
    /// Load configuration from the default path (~/.hevychat/config.toml).
    ///
    /// Environment variables override the file:
    /// - `ANTHROPIC_API_KEY`
    /// - `HEVY_API_KEY`, `HEVY_API_BASE_URL`
    /// - `HEVYCHAT_MODEL`, `HEVYCHAT_PORT`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in `load`).
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("ANTHROPIC_API_KEY") {
            self.anthropic_api_key = Some(key);
        }
        if let Some(key) = non_empty("HEVY_API_KEY") {
            self.hevy.api_key = Some(key);
        }
        if let Some(url) = non_empty("HEVY_API_BASE_URL") {
            self.hevy.base_url = url;
        }
        if let Some(model) = non_empty("HEVYCHAT_MODEL") {
            self.model = model;
        }
        if let Some(port) = non_empty("HEVYCHAT_PORT") {
            match port.parse() {
                Ok(port) => self.gateway.port = port,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid HEVYCHAT_PORT"),
            }
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".hevychat")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationError("max_tokens must be > 0".into()));
        }

        for (name, url) in [
            ("anthropic.base_url", &self.anthropic.base_url),
            ("hevy.base_url", &self.hevy.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must start with http:// or https://"
                )));
            }
        }

        Ok(())
    }

    /// Whether an Anthropic API key is available (from config or environment).
    pub fn has_anthropic_key(&self) -> bool {
        self.anthropic_api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }

    /// Whether a fallback Hevy API key is configured.
    pub fn has_hevy_key(&self) -> bool {
        self.hevy
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            system_prompt_override: None,
            anthropic: AnthropicConfig::default(),
            hevy: HevyConfig::default(),
            gateway: GatewayConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
