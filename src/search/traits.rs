//! Search provider trait for abstracting different backends

use async_trait::async_trait;

use crate::core::Result;

/// Trait for web search providers
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Search for a query and return up to `max_results` page URLs
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>>;

    /// Whether the provider has the credentials it needs
    fn is_configured(&self) -> bool;

    /// Get the provider name
    fn name(&self) -> &str;
}
