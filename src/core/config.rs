//! Configuration management for vidscout
//!
//! Supports environment variables, config files, and runtime overrides.
//! `PORT` and `HOST` from the environment always win over the config file so
//! container deployments can pick the listen address.
//!
//! Config file location: ~/.config/vidscout/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::core::error::{Result, VidscoutError};

/// Default listen port
pub const DEFAULT_PORT: u16 = 8000;

/// Main configuration for vidscout
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Web search configuration
    #[serde(default)]
    pub search: SearchConfig,
    /// yt-dlp extractor configuration
    #[serde(default)]
    pub ytdlp: YtDlpConfig,
    /// Browser fallback configuration
    #[serde(default)]
    pub browser: BrowserConfig,
    /// HuggingFace inference configuration
    #[serde(default)]
    pub inference: InferenceConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (default: 0.0.0.0)
    pub host: String,
    /// Listen port (default: 8000)
    pub port: u16,
}

/// SerpAPI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// API key; search is disabled without one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL of the SerpAPI service
    pub base_url: String,
    /// Interface language passed as `hl`
    pub language: String,
    /// Maximum number of organic results to keep
    pub max_results: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// yt-dlp configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YtDlpConfig {
    /// Path or name of the yt-dlp binary
    pub binary: String,
    /// Maximum run time per page in seconds
    pub timeout_secs: u64,
}

/// Browser automation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Whether the browser fallback is enabled
    pub enabled: bool,
    /// Path or name of the agent-browser binary
    pub binary: String,
    /// Session name prefix for agent-browser
    pub session_prefix: String,
    /// Whether to run in headed mode (visible browser)
    pub headed: bool,
    /// Page navigation timeout in ms
    pub timeout_ms: u64,
    /// Timeout for a single click in ms
    pub click_timeout_ms: u64,
    /// Pause after each click in ms
    pub click_pause_ms: u64,
    /// Seconds to let network traffic settle after clicking
    pub wait_secs: u64,
    /// Maximum concurrent browser sessions
    pub max_sessions: usize,
    /// Texts of elements to click before collecting media requests
    pub click_texts: Vec<String>,
}

/// HuggingFace inference configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// API token; inference is disabled without one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Model identifier
    pub model: String,
    /// Base URL of the inference API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether to show debug output
    pub debug: bool,
}

fn env_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(default)
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse a port value, falling back to [`DEFAULT_PORT`]
pub fn parse_port(value: Option<&str>) -> u16 {
    value
        .and_then(|p| p.trim().parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: env_non_empty("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_port(env::var("PORT").ok().as_deref()),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: env_non_empty("SERP_API_KEY"),
            base_url: env_non_empty("SERP_API_URL")
                .unwrap_or_else(|| "https://serpapi.com".to_string()),
            language: env_non_empty("SERP_LANGUAGE").unwrap_or_else(|| "pt".to_string()),
            max_results: 5,
            timeout_secs: 8,
        }
    }
}

impl Default for YtDlpConfig {
    fn default() -> Self {
        Self {
            binary: env_non_empty("VIDSCOUT_YTDLP").unwrap_or_else(|| "yt-dlp".to_string()),
            timeout_secs: 30,
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            enabled: env_flag("VIDSCOUT_BROWSER_ENABLED", true),
            binary: env_non_empty("VIDSCOUT_AGENT_BROWSER")
                .unwrap_or_else(|| "agent-browser".to_string()),
            session_prefix: env_non_empty("VIDSCOUT_BROWSER_SESSION")
                .unwrap_or_else(|| "vidscout".to_string()),
            headed: env_flag("VIDSCOUT_BROWSER_HEADED", false),
            timeout_ms: 25_000,
            click_timeout_ms: 3_000,
            click_pause_ms: 500,
            wait_secs: 8,
            max_sessions: 2,
            click_texts: default_click_texts(),
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            token: env_non_empty("HF_TOKEN"),
            model: env_non_empty("HF_MODEL").unwrap_or_else(|| "gpt2".to_string()),
            base_url: env_non_empty("HF_API_URL")
                .unwrap_or_else(|| "https://api-inference.huggingface.co".to_string()),
            timeout_secs: 15,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            debug: env_flag("VIDSCOUT_DEBUG", false),
        }
    }
}

/// Labels of download buttons commonly found on video pages
pub fn default_click_texts() -> Vec<String> {
    [
        "baixar",
        "download",
        "downloadar",
        "baixar agora",
        "download video",
        "baixar vídeo",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vidscout")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > PORT/HOST env > config file > other env vars > defaults
    ///
    /// A missing config file falls back to defaults; an unreadable or
    /// malformed one is an error.
    pub fn load() -> Result<Self> {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        let config_path = Self::config_file();
        let mut config = if config_path.exists() {
            Self::from_file(&config_path)?
        } else {
            Self::default()
        };
        config.apply_listen_env();
        Ok(config)
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(VidscoutError::config("Config file not found"));
        }

        Self::from_file(&config_path)
    }

    /// Read and parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            VidscoutError::config(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|e| {
            VidscoutError::config(format!("Failed to parse config {}: {}", path.display(), e))
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| VidscoutError::config(format!("Failed to parse config: {}", e)))
    }

    /// Re-apply `PORT` and `HOST` from the environment
    pub fn apply_listen_env(&mut self) {
        if let Some(port) = env_non_empty("PORT") {
            self.server.port = parse_port(Some(&port));
        }
        if let Some(host) = env_non_empty("HOST") {
            self.server.host = host;
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<PathBuf> {
        let config_dir = Self::config_dir();
        let config_path = Self::config_file();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).map_err(|e| {
                VidscoutError::config(format!("Failed to create config dir: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| VidscoutError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, content)
            .map_err(|e| VidscoutError::config(format!("Failed to write config: {}", e)))?;

        Ok(config_path)
    }

    /// Socket address the server binds to
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| {
                VidscoutError::config(format!(
                    "Invalid listen address {}:{}: {}",
                    self.server.host, self.server.port, e
                ))
            })
    }

    /// Generate a default config file content for display
    pub fn default_config_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config)
            .unwrap_or_else(|_| String::from("# Error generating config"))
    }
}
