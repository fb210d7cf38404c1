//! SerpAPI client
//!
//! Google organic results through https://serpapi.com/search.json.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::core::config::SearchConfig;
use crate::core::{Result, VidscoutError};
use crate::search::traits::SearchProvider;

/// SerpAPI search client
#[derive(Clone)]
pub struct SerpApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    language: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    link: Option<serde_json::Value>,
    #[serde(default)]
    url: Option<serde_json::Value>,
}

impl OrganicResult {
    fn target(&self) -> Option<&str> {
        [&self.link, &self.url]
            .into_iter()
            .flatten()
            .filter_map(|v| v.as_str())
            .find(|s| !s.is_empty())
    }
}

impl SerpApiClient {
    /// Create a client from configuration
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VidscoutError::with_context("building SerpAPI client", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
        })
    }

    fn endpoint(&self, query: &str, api_key: &str) -> Result<Url> {
        Url::parse_with_params(
            &format!("{}/search.json", self.base_url),
            &[("q", query), ("hl", self.language.as_str()), ("api_key", api_key)],
        )
        .map_err(|e| VidscoutError::search(format!("Invalid SerpAPI URL: {}", e)))
    }

    fn links(response: SearchResponse, max_results: usize) -> Vec<String> {
        response
            .organic_results
            .iter()
            .take(max_results)
            .filter_map(OrganicResult::target)
            .map(str::to_string)
            .collect()
    }
}

#[async_trait]
impl SearchProvider for SerpApiClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!("SERP_API_KEY not set, skipping search");
            return Ok(Vec::new());
        };

        let url = self.endpoint(query, api_key)?;
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VidscoutError::search(format!(
                "SerpAPI error ({}): {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: SearchResponse = response.json().await?;
        let links = Self::links(parsed, max_results);
        tracing::debug!(query, count = links.len(), "search finished");
        Ok(links)
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn name(&self) -> &str {
        "serpapi"
    }
}
