//! Custom error types for vidscout
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for vidscout operations
#[derive(Error, Debug)]
pub enum VidscoutError {
    /// Search provider errors
    #[error("Search error: {0}")]
    Search(String),

    /// yt-dlp extraction errors
    #[error("yt-dlp error: {0}")]
    YtDlp(String),

    /// Browser automation errors
    #[error("Browser error: {0}")]
    Browser(String),

    /// Inference API errors
    #[error("Inference error: {0}")]
    Inference(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed client input
    #[error("{0}")]
    BadRequest(String),

    /// A subprocess or request ran past its deadline
    #[error("{what} timed out after {secs}s")]
    Timeout { what: String, secs: u64 },

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// yt-dlp not installed
    #[error("yt-dlp not found. Install with: pip install yt-dlp")]
    YtDlpNotFound,

    /// agent-browser not installed
    #[error("agent-browser not found. Install with: npm install -g agent-browser && agent-browser install")]
    BrowserNotFound,

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Generic error for other cases
    #[error("{0}")]
    Other(String),
}

/// Convenience Result type for vidscout operations
pub type Result<T> = std::result::Result<T, VidscoutError>;

impl VidscoutError {
    /// Create a search error
    pub fn search(msg: impl Into<String>) -> Self {
        Self::Search(msg.into())
    }

    /// Create a yt-dlp error
    pub fn ytdlp(msg: impl Into<String>) -> Self {
        Self::YtDlp(msg.into())
    }

    /// Create a browser error
    pub fn browser(msg: impl Into<String>) -> Self {
        Self::Browser(msg.into())
    }

    /// Create an inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a bad request error
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(what: impl Into<String>, secs: u64) -> Self {
        Self::Timeout {
            what: what.into(),
            secs,
        }
    }

    /// Wrap an error with additional context
    pub fn with_context<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Whether the error was caused by the caller rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::BadRequest(_) | Self::Json(_))
    }
}
