//! yt-dlp extractor - wraps the yt-dlp CLI
//!
//! Asks yt-dlp for the page's metadata (`-j`) and keeps the format URLs that
//! are plain MP4 files or HLS playlists.

use async_trait::async_trait;
use serde::Deserialize;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::core::config::YtDlpConfig;
use crate::core::{Result, VidscoutError};
use crate::extract::media::{dedup_preserving_order, is_format_media};
use crate::extract::traits::MediaExtractor;

/// Metadata document printed by `yt-dlp -j`
#[derive(Debug, Deserialize)]
struct InfoDocument {
    #[serde(default)]
    formats: Option<Vec<Format>>,
}

#[derive(Debug, Deserialize)]
struct Format {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    ext: Option<String>,
}

/// Extractor backed by the yt-dlp binary
pub struct YtDlpExtractor {
    binary: String,
    timeout: Duration,
}

impl YtDlpExtractor {
    /// Create an extractor for a binary name or path
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    /// Create an extractor from configuration
    pub fn from_config(config: &YtDlpConfig) -> Self {
        Self::new(&config.binary, Duration::from_secs(config.timeout_secs))
    }

    /// Check if yt-dlp is installed
    pub async fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    async fn dump_json(&self, page_url: &str) -> Result<String> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["-j", "--no-warnings", page_url])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| VidscoutError::timeout("yt-dlp", self.timeout.as_secs()))?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    VidscoutError::YtDlpNotFound
                } else {
                    VidscoutError::ytdlp(format!("Failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            return Err(VidscoutError::ytdlp(format!(
                "yt-dlp exited with {}",
                output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Collect media format URLs from `yt-dlp -j` output.
///
/// Playlists print one document per line, so every line is parsed.
pub fn parse_formats(output: &str) -> Result<Vec<String>> {
    let mut urls = Vec::new();

    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let info: InfoDocument = serde_json::from_str(line)?;
        for format in info.formats.unwrap_or_default() {
            if let Some(url) = format.url {
                if is_format_media(&url, format.ext.as_deref()) {
                    urls.push(url);
                }
            }
        }
    }

    Ok(dedup_preserving_order(urls))
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    async fn extract(&self, url: &str) -> Result<Vec<String>> {
        let output = self.dump_json(url).await?;
        let urls = parse_formats(&output)?;
        tracing::debug!(url, found = urls.len(), "yt-dlp finished");
        Ok(urls)
    }

    fn name(&self) -> &str {
        "yt-dlp"
    }
}

impl Default for YtDlpExtractor {
    fn default() -> Self {
        Self::new("yt-dlp", Duration::from_secs(30))
    }
}
