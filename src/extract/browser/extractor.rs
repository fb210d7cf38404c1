//! Browser fallback extractor
//!
//! Opens the page in a headless browser, clicks anything labelled like a
//! download button, lets the page load its player and then reads back the
//! media URLs the page requested.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::core::config::BrowserConfig;
use crate::core::{Result, VidscoutError};
use crate::extract::browser::executor::BrowserExecutor;
use crate::extract::media::{dedup_preserving_order, is_request_media};
use crate::extract::traits::MediaExtractor;

/// Script listing every resource the page fetched plus current video sources
pub const COLLECT_MEDIA_SCRIPT: &str = "JSON.stringify(Array.from(new Set(\
performance.getEntriesByType('resource').map(e => e.name)\
.concat(Array.from(document.querySelectorAll('video, video source, audio source'))\
.map(v => v.currentSrc || v.src).filter(Boolean)))))";

/// Extractor driving agent-browser sessions
pub struct BrowserExtractor {
    config: BrowserConfig,
    sessions: Arc<Semaphore>,
    next_session: AtomicU64,
}

impl BrowserExtractor {
    /// Create an extractor from configuration
    pub fn from_config(config: &BrowserConfig) -> Self {
        Self {
            config: config.clone(),
            sessions: Arc::new(Semaphore::new(config.max_sessions.max(1))),
            next_session: AtomicU64::new(1),
        }
    }

    fn new_executor(&self) -> BrowserExecutor {
        let id = self.next_session.fetch_add(1, Ordering::Relaxed);
        let mut executor = BrowserExecutor::new(format!("{}-{}", self.config.session_prefix, id));
        executor.set_program(self.config.binary.clone());
        executor.set_headed(self.config.headed);
        executor.set_timeout(Duration::from_millis(self.config.timeout_ms));
        executor
    }

    async fn click_download_controls(&self, executor: &BrowserExecutor) {
        let snapshot = match executor.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::debug!(session = executor.session_name(), error = %e, "snapshot failed");
                return;
            }
        };

        tracing::debug!(
            session = executor.session_name(),
            elements = snapshot.count_elements(),
            "page snapshot taken"
        );

        let click_timeout = Duration::from_millis(self.config.click_timeout_ms);
        let pause = Duration::from_millis(self.config.click_pause_ms);

        for text in &self.config.click_texts {
            for ref_id in snapshot.find_by_text(text) {
                match executor.click(&ref_id, click_timeout).await {
                    Ok(()) => tokio::time::sleep(pause).await,
                    Err(e) => {
                        tracing::debug!(ref_id = %ref_id, error = %e, "click failed, continuing")
                    }
                }
            }
        }
    }

    async fn collect(&self, executor: &BrowserExecutor, url: &str) -> Result<Vec<String>> {
        executor.open(url).await?;
        self.click_download_controls(executor).await;

        tokio::time::sleep(Duration::from_secs(self.config.wait_secs)).await;

        let output = executor.eval(COLLECT_MEDIA_SCRIPT).await?;
        Ok(dedup_preserving_order(
            parse_eval_urls(&output)
                .into_iter()
                .filter(|u| is_request_media(u)),
        ))
    }
}

/// Closes the session if the extraction is dropped before it finishes
struct SessionGuard<'a> {
    executor: &'a BrowserExecutor,
    closed: bool,
}

impl<'a> SessionGuard<'a> {
    fn new(executor: &'a BrowserExecutor) -> Self {
        Self {
            executor,
            closed: false,
        }
    }

    async fn close(mut self) {
        if let Err(e) = self.executor.close().await {
            tracing::debug!(session = self.executor.session_name(), error = %e, "close failed");
        }
        self.closed = true;
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        if !self.closed {
            tracing::debug!(session = self.executor.session_name(), "extraction cancelled");
            self.executor.close_detached();
        }
    }
}

/// Read the URL list printed by `agent-browser eval`.
///
/// The result may come back as a JSON array, as a JSON string holding the
/// array, or as plain text; plain text falls back to whitespace-separated
/// http(s) tokens.
pub fn parse_eval_urls(output: &str) -> Vec<String> {
    let trimmed = output.trim();

    if let Ok(urls) = serde_json::from_str::<Vec<String>>(trimmed) {
        return urls;
    }
    if let Ok(inner) = serde_json::from_str::<String>(trimmed) {
        if let Ok(urls) = serde_json::from_str::<Vec<String>>(&inner) {
            return urls;
        }
    }

    trimmed
        .split(|c: char| c.is_whitespace() || c == ',' || c == '"' || c == '[' || c == ']')
        .filter(|t| t.starts_with("http://") || t.starts_with("https://"))
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl MediaExtractor for BrowserExtractor {
    async fn extract(&self, url: &str) -> Result<Vec<String>> {
        if !self.config.enabled {
            return Err(VidscoutError::browser("browser fallback is disabled"));
        }

        let _permit = self
            .sessions
            .acquire()
            .await
            .map_err(|e| VidscoutError::browser(format!("session pool closed: {}", e)))?;

        let executor = self.new_executor();
        tracing::debug!(session = executor.session_name(), url, "browser session started");

        let guard = SessionGuard::new(&executor);
        let result = self.collect(&executor, url).await;
        guard.close().await;

        result
    }

    fn name(&self) -> &str {
        "browser"
    }
}
