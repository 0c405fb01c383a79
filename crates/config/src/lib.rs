//! Configuration loading, validation, and management for Vocalis.
//!
//! Loads configuration from `~/.vocalis/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.vocalis/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Reasoning service connection (optional)
    #[serde(default)]
    pub reasoning: ReasoningConfig,

    /// Speech synthesis service connection (optional)
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Retrieval and context window tuning
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Allow any origin, so the widget can be embedded on third-party pages
    #[serde(default = "default_true")]
    pub permissive_cors: bool,
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
            permissive_cors: true,
        }
    }
}

/// Connection details for the reasoning service.
///
/// The service counts as configured only when `api_url` is set.
#[derive(Clone, Serialize, Deserialize)]
pub struct ReasoningConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            model: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ReasoningConfig {
    pub fn is_configured(&self) -> bool {
        self.api_url.as_deref().is_some_and(|u| !u.trim().is_empty())
    }
}

impl std::fmt::Debug for ReasoningConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReasoningConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Connection details for the text-to-speech service.
#[derive(Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Voice used when an agent has none of its own
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_voice_id: Option<String>,

    #[serde(default = "default_speech_model")]
    pub model_id: String,

    #[serde(default = "default_speech_base_url")]
    pub base_url: String,

    /// Sent as `voice_settings` on every synthesis request when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_settings: Option<VoiceSettings>,
}

/// ElevenLabs voice tuning, each value in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    #[serde(default = "default_stability")]
    pub stability: f32,

    #[serde(default = "default_similarity_boost")]
    pub similarity_boost: f32,
}

fn default_stability() -> f32 {
    0.5
}
fn default_similarity_boost() -> f32 {
    0.75
}

fn default_speech_model() -> String {
    "eleven_monolingual_v1".into()
}
fn default_speech_base_url() -> String {
    "https://api.elevenlabs.io/v1".into()
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_voice_id: None,
            model_id: default_speech_model(),
            base_url: default_speech_base_url(),
            voice_settings: None,
        }
    }
}

impl SpeechConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

impl std::fmt::Debug for SpeechConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_voice_id", &self.default_voice_id)
            .field("model_id", &self.model_id)
            .field("base_url", &self.base_url)
            .field("voice_settings", &self.voice_settings)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Maximum chunks retrieved per chat turn
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Turns shown in the fallback "Recent conversation" block
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

fn default_top_k() -> usize {
    3
}
fn default_history_window() -> usize {
    5
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            history_window: default_history_window(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.vocalis/config.toml),
    /// then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
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

        let mut config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.clear_blank_values();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup` (highest priority).
    ///
    /// - `LLM_API_URL`, `LLM_API_KEY`, `LLM_MODEL_ID`
    /// - `ELEVENLABS_API_KEY`, `ELEVENLABS_DEFAULT_VOICE_ID`, `ELEVENLABS_MODEL_ID`
    /// - `VOCALIS_PORT`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty variables count as unset.
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup("LLM_API_URL") {
            self.reasoning.api_url = Some(url);
        }
        if let Some(key) = lookup("LLM_API_KEY") {
            self.reasoning.api_key = Some(key);
        }
        if let Some(model) = lookup("LLM_MODEL_ID") {
            self.reasoning.model = Some(model);
        }
        if let Some(key) = lookup("ELEVENLABS_API_KEY") {
            self.speech.api_key = Some(key);
        }
        if let Some(voice) = lookup("ELEVENLABS_DEFAULT_VOICE_ID") {
            self.speech.default_voice_id = Some(voice);
        }
        if let Some(model) = lookup("ELEVENLABS_MODEL_ID") {
            self.speech.model_id = model;
        }
        if let Some(port) = lookup("VOCALIS_PORT").and_then(|p| p.parse().ok()) {
            self.gateway.port = port;
        }
    }

    /// Treat `key = ""` in the file the same as a missing key.
    fn clear_blank_values(&mut self) {
        for value in [
            &mut self.reasoning.api_url,
            &mut self.reasoning.api_key,
            &mut self.reasoning.model,
            &mut self.speech.api_key,
            &mut self.speech.default_voice_id,
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *value = None;
            }
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".vocalis")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.retrieval.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "retrieval.top_k must be at least 1".into(),
            ));
        }

        if self.retrieval.history_window == 0 {
            return Err(ConfigError::ValidationError(
                "retrieval.history_window must be at least 1".into(),
            ));
        }

        if let Some(url) = &self.reasoning.api_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(ConfigError::ValidationError(format!(
                "reasoning.api_url must be an http(s) URL, got '{url}'"
            )));
        }

        if let Some(settings) = &self.speech.voice_settings {
            for (field, value) in [
                ("stability", settings.stability),
                ("similarity_boost", settings.similarity_boost),
            ] {
                if !(0.0..=1.0).contains(&value) {
                    return Err(ConfigError::ValidationError(format!(
                        "speech.voice_settings.{field} must be between 0 and 1, got {value}"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Generate a default config TOML string (for the `config` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
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
