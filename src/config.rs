//! Configuration management for cruisesim
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{CruiseSimError, Result};
use crate::prompts::DEFAULT_GREETING;
use crate::providers::{DEFAULT_ASPECT_RATIO, SUPPORTED_PROVIDERS};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variables searched for the API key, in order
pub const API_KEY_ENV_VARS: &[&str] = &["CRUISESIM_API_KEY", "GEMINI_API_KEY", "API_KEY"];

/// Main configuration structure for cruisesim
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Conversation session configuration
    #[serde(default)]
    pub session: SessionConfig,
}

/// Provider configuration
///
/// Specifies which AI provider to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Gemini configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
}

fn default_provider_type() -> String {
    "gemini".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            gemini: GeminiConfig::default(),
        }
    }
}

/// Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API base URL (useful for tests and local mocks)
    #[serde(default = "default_gemini_api_base")]
    pub api_base: String,

    /// Model used for the captain's replies
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Model used for ship renders
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// HTTP client timeout (seconds)
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u64,

    /// API key, taken from the environment only
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_gemini_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_chat_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_http_timeout() -> u64 {
    120
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: default_gemini_api_base(),
            chat_model: default_chat_model(),
            image_model: default_image_model(),
            timeout_seconds: default_http_timeout(),
            api_key: None,
        }
    }
}

/// Conversation session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Captain's opening message; `null` disables it
    #[serde(default = "default_greeting")]
    pub greeting: Option<String>,

    /// Aspect ratio requested for ship renders
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,

    /// Upper bound on each provider call (seconds); unbounded when unset
    #[serde(default)]
    pub call_timeout_seconds: Option<u64>,

    /// Directory used by `/save` and `ask --save` when none is given
    #[serde(default)]
    pub gallery_dir: Option<PathBuf>,
}

fn default_greeting() -> Option<String> {
    Some(DEFAULT_GREETING.to_string())
}

fn default_aspect_ratio() -> String {
    DEFAULT_ASPECT_RATIO.to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            aspect_ratio: default_aspect_ratio(),
            call_timeout_seconds: None,
            gallery_dir: None,
        }
    }
}

impl SessionConfig {
    /// Per-call timeout as a duration
    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_seconds.map(Duration::from_secs)
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CruiseSimError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| CruiseSimError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        self.provider.gemini.api_key = None;
        for name in API_KEY_ENV_VARS {
            if let Ok(value) = std::env::var(name) {
                if !value.trim().is_empty() {
                    tracing::debug!("Using API key from {}", name);
                    self.provider.gemini.api_key = Some(value);
                    break;
                }
            }
        }

        if let Ok(provider_type) = std::env::var("CRUISESIM_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(api_base) = std::env::var("CRUISESIM_API_BASE") {
            self.provider.gemini.api_base = api_base;
        }

        if let Ok(chat_model) = std::env::var("CRUISESIM_CHAT_MODEL") {
            self.provider.gemini.chat_model = chat_model;
        }

        if let Ok(image_model) = std::env::var("CRUISESIM_IMAGE_MODEL") {
            self.provider.gemini.image_model = image_model;
        }

        if let Ok(timeout) = std::env::var("CRUISESIM_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.provider.gemini.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid CRUISESIM_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(timeout) = std::env::var("CRUISESIM_CALL_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.session.call_timeout_seconds = Some(value);
            } else {
                tracing::warn!("Invalid CRUISESIM_CALL_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(dir) = std::env::var("CRUISESIM_GALLERY_DIR") {
            self.session.gallery_dir = Some(PathBuf::from(dir));
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        use crate::cli::Commands;
        match &cli.command {
            Commands::Chat {
                provider,
                no_greeting,
            } => {
                if let Some(provider) = provider {
                    self.provider.provider_type = provider.clone();
                }
                if *no_greeting {
                    self.session.greeting = None;
                }
            }
            Commands::Ask { provider, .. } => {
                if let Some(provider) = provider {
                    self.provider.provider_type = provider.clone();
                }
            }
            Commands::Name { .. } => {}
        }
    }

    /// Validate the configuration
    ///
    /// Ensures all configuration values are within acceptable ranges
    /// and that required fields are properly set. The API key is not
    /// checked here; a missing key surfaces on the first provider call.
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type.is_empty() {
            return Err(CruiseSimError::Config("Provider type cannot be empty".to_string()).into());
        }

        if !SUPPORTED_PROVIDERS.contains(&self.provider.provider_type.as_str()) {
            return Err(CruiseSimError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                SUPPORTED_PROVIDERS.join(", ")
            ))
            .into());
        }

        let gemini = &self.provider.gemini;
        if gemini.chat_model.trim().is_empty() {
            return Err(
                CruiseSimError::Config("gemini.chat_model cannot be empty".to_string()).into(),
            );
        }

        if gemini.image_model.trim().is_empty() {
            return Err(
                CruiseSimError::Config("gemini.image_model cannot be empty".to_string()).into(),
            );
        }

        let api_base = url::Url::parse(&gemini.api_base).map_err(|e| {
            CruiseSimError::Config(format!("Invalid gemini.api_base '{}': {}", gemini.api_base, e))
        })?;
        if !matches!(api_base.scheme(), "http" | "https") {
            return Err(CruiseSimError::Config(format!(
                "gemini.api_base must use http or https, got {}",
                api_base.scheme()
            ))
            .into());
        }

        if gemini.timeout_seconds == 0 {
            return Err(CruiseSimError::Config(
                "gemini.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.session.call_timeout_seconds == Some(0) {
            return Err(CruiseSimError::Config(
                "session.call_timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if !is_valid_aspect_ratio(&self.session.aspect_ratio) {
            return Err(CruiseSimError::Config(format!(
                "session.aspect_ratio must look like W:H, got '{}'",
                self.session.aspect_ratio
            ))
            .into());
        }

        Ok(())
    }

    /// Directory where saved ship images go
    ///
    /// Uses `session.gallery_dir` when set, otherwise the platform data
    /// directory for cruisesim plus `gallery/`.
    ///
    /// # Errors
    ///
    /// Returns error if no home directory can be determined
    pub fn gallery_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.session.gallery_dir {
            return Ok(dir.clone());
        }

        ProjectDirs::from("", "", "cruisesim")
            .map(|dirs| dirs.data_dir().join("gallery"))
            .ok_or_else(|| {
                CruiseSimError::Config("Unable to determine a data directory".to_string()).into()
            })
    }
}

fn is_valid_aspect_ratio(value: &str) -> bool {
    match value.split_once(':') {
        Some((w, h)) => matches!(
            (w.parse::<u32>(), h.parse::<u32>()),
            (Ok(w), Ok(h)) if w > 0 && h > 0
        ),
        None => false,
    }
}
