use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Language of the text to translate (ISO 639-1)
    #[serde(default = "default_language")]
    pub language: String,

    /// Translation service settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Playback settings
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation service settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranslationConfig {
    /// Base URL of the translation service
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Timeout for a single request in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl TranslationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Playback settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlaybackConfig {
    /// URL or directory clip locators are resolved against
    /// Falls back to the translation endpoint when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_base: Option<String>,

    /// How long one clip plays, in milliseconds
    #[serde(default = "default_clip_duration_ms")]
    pub clip_duration_ms: u64,

    /// How long opening a clip may take, in seconds
    #[serde(default = "default_open_timeout_secs")]
    pub open_timeout_secs: u64,

    /// Start playing as soon as a translation arrives
    #[serde(default = "default_true")]
    pub autoplay: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            media_base: None,
            clip_duration_ms: default_clip_duration_ms(),
            open_timeout_secs: default_open_timeout_secs(),
            autoplay: true,
        }
    }
}

impl PlaybackConfig {
    pub fn clip_duration(&self) -> Duration {
        Duration::from_millis(self.clip_duration_ms)
    }

    pub fn open_timeout(&self) -> Duration {
        Duration::from_secs(self.open_timeout_secs)
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_endpoint() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_clip_duration_ms() -> u64 {
    2500
}

fn default_open_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load the configuration at `path`, writing the defaults there first if
    /// the file does not exist
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path).context(format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .context(format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .context(format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Base clip locators resolve against
    pub fn media_base(&self) -> &str {
        self.playback
            .media_base
            .as_deref()
            .filter(|base| !base.trim().is_empty())
            .unwrap_or(&self.translation.endpoint)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate language
        let _language_name = crate::language_utils::get_language_name(&self.language)?;
        if !crate::language_utils::is_supported_language(&self.language) {
            warn!(
                "Language '{}' is not one of the service's known languages ({})",
                self.language,
                crate::language_utils::SUPPORTED_LANGUAGES.join(", ")
            );
        }

        // Validate endpoint
        let endpoint = Url::parse(&self.translation.endpoint)
            .map_err(|e| anyhow!("Invalid translation endpoint '{}': {}", self.translation.endpoint, e))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(anyhow!(
                "Translation endpoint must use http or https: {}",
                self.translation.endpoint
            ));
        }

        if self.translation.timeout_secs == 0 {
            return Err(anyhow!("translation.timeout_secs must be greater than zero"));
        }
        if self.playback.clip_duration_ms == 0 {
            return Err(anyhow!("playback.clip_duration_ms must be greater than zero"));
        }
        if self.playback.open_timeout_secs == 0 {
            return Err(anyhow!("playback.open_timeout_secs must be greater than zero"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            language: default_language(),
            translation: TranslationConfig::default(),
            playback: PlaybackConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
