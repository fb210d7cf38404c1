//! Media extractor trait
//!
//! Enables swapping between yt-dlp, a browser, or test doubles.

use async_trait::async_trait;

use crate::core::Result;

/// Trait for anything that can turn a page URL into direct media links
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Extract media links from a page
    async fn extract(&self, url: &str) -> Result<Vec<String>>;

    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Display name used in progress messages
    fn label(&self) -> &str {
        self.name()
    }
}
