//! HuggingFace Inference API client
//!
//! Text generation through `POST {base}/models/{model}`. Failures are turned
//! into answer text rather than errors, so callers always get something to
//! show.

use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::core::config::InferenceConfig;
use crate::core::{Result, VidscoutError};

/// Longest slice of an error body echoed back to the caller
const ERROR_BODY_LIMIT: usize = 200;

/// HuggingFace Inference API client
#[derive(Clone)]
pub struct HuggingFaceClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    model: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    inputs: &'a str,
}

impl HuggingFaceClient {
    /// Create a client from configuration
    pub fn from_config(config: &InferenceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VidscoutError::with_context("building HuggingFace client", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            model: config.model.clone(),
        })
    }

    /// Model used for generation
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Whether a token is configured
    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    /// Prompt layout sent to the model
    pub fn build_prompt(question: &str, context: &str) -> String {
        format!("Q: {}\nC: {}\nA:", question, context)
    }

    /// Generate an answer; never fails, errors come back as text
    pub async fn generate(&self, question: &str, context: &str) -> String {
        let Some(token) = self.token.as_deref() else {
            return "HF_TOKEN not configured.".to_string();
        };

        match self.request(token, question, context).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(model = %self.model, error = %e, "HuggingFace call failed");
                format!("Error calling HuggingFace: {}", e)
            }
        }
    }

    async fn request(&self, token: &str, question: &str, context: &str) -> Result<String> {
        let prompt = Self::build_prompt(question, context);
        let response = self
            .client
            .post(format!("{}/models/{}", self.base_url, self.model))
            .bearer_auth(token)
            .json(&GenerateRequest { inputs: &prompt })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != reqwest::StatusCode::OK {
            return Ok(format!(
                "HuggingFace error {}: {}",
                status.as_u16(),
                body.chars().take(ERROR_BODY_LIMIT).collect::<String>()
            ));
        }

        let value: serde_json::Value = serde_json::from_str(&body)?;
        Ok(generated_text(&value))
    }
}

/// Pull `generated_text` out of a successful response body
pub fn generated_text(value: &serde_json::Value) -> String {
    match value.as_array().and_then(|items| items.first()) {
        Some(first) => first
            .get("generated_text")
            .and_then(|t| t.as_str())
            .unwrap_or_default()
            .to_string(),
        None => value.to_string(),
    }
}
