use config::{Config as ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::poller::StaleSessionPolicy;

/// Stream watched when no `youtube.video_id` is configured
pub const DEFAULT_VIDEO_ID: &str = "5H0CKe-FVD8";

/// Environment prefix for configuration overrides (`LIVEWATCH_SERVER__PORT`, ...)
pub const ENV_PREFIX: &str = "LIVEWATCH";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub youtube: YoutubeConfig,
    pub polling: PollingConfig,
    pub hub: HubConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeConfig {
    pub api_key: String,
    pub base_url: String,
    pub video_id: String,
    /// Per-request timeout; unset means no timeout beyond the connect timeout
    pub request_timeout_seconds: Option<u64>,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: livewatch_providers::youtube::DEFAULT_BASE_URL.to_string(),
            video_id: DEFAULT_VIDEO_ID.to_string(),
            request_timeout_seconds: None,
        }
    }
}

impl std::fmt::Debug for YoutubeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoutubeConfig")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("base_url", &self.base_url)
            .field("video_id", &self.video_id)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub viewer_interval_seconds: u64,
    pub idle_delay_seconds: u64,
    pub default_chat_delay_seconds: u64,
    pub stale_session_policy: StaleSessionPolicy,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            viewer_interval_seconds: 60,
            idle_delay_seconds: 5,
            default_chat_delay_seconds: 10,
            stale_session_policy: StaleSessionPolicy::Retain,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Events a client may fall behind before it starts losing the oldest
    pub capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            capacity: crate::hub::DEFAULT_HUB_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

impl Config {
    /// Load configuration from multiple sources with priority:
    /// 1. Legacy variables `YOUTUBE_API_KEY` and `PORT` (highest priority)
    /// 2. Environment variables `LIVEWATCH_*`
    /// 3. Config file (if provided)
    /// 4. Defaults (lowest priority)
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        // Load config file if provided
        if let Some(path) = config_file {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
            }
        }

        builder = builder.add_source(env_source());

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.apply_legacy_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from environment variables only (for Docker/K8s)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Load from file path
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::load(Some(path))
    }

    /// Parse an inline YAML document over the defaults (no environment)
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        ConfigBuilder::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?
            .try_deserialize()
    }

    /// Apply the variable names the service has always honoured.
    ///
    /// `lookup` resolves an environment variable; empty values are ignored.
    pub fn apply_legacy_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("YOUTUBE_API_KEY").filter(|v| !v.trim().is_empty()) {
            self.youtube.api_key = key;
        }
        if let Some(port) = lookup("PORT").and_then(|v| v.trim().parse::<u16>().ok()) {
            self.server.port = port;
        }
    }

    /// Check for misconfigurations; returns every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.youtube.api_key.trim().is_empty() {
            errors.push("youtube.api_key must be set (or YOUTUBE_API_KEY)".to_string());
        }
        if self.youtube.video_id.trim().is_empty() {
            errors.push("youtube.video_id must not be empty".to_string());
        }
        if url::Url::parse(&self.youtube.base_url).is_err() {
            errors.push(format!("youtube.base_url is not a valid URL: {}", self.youtube.base_url));
        }
        if self.youtube.request_timeout_seconds == Some(0) {
            errors.push("youtube.request_timeout_seconds must be greater than 0".to_string());
        }
        if self.polling.viewer_interval_seconds == 0 {
            errors.push("polling.viewer_interval_seconds must be greater than 0".to_string());
        }
        if self.polling.idle_delay_seconds == 0 {
            errors.push("polling.idle_delay_seconds must be greater than 0".to_string());
        }
        if self.polling.default_chat_delay_seconds == 0 {
            errors.push("polling.default_chat_delay_seconds must be greater than 0".to_string());
        }
        if self.hub.capacity == 0 {
            errors.push("hub.capacity must be greater than 0".to_string());
        }
        if crate::logging::parse_log_level(&self.logging.level).is_err() {
            errors.push(format!("logging.level is invalid: {}", self.logging.level));
        }
        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            errors.push(format!("logging.format must be json or pretty: {}", self.logging.format));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Get HTTP address
    #[must_use]
    pub fn http_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
