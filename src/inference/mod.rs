//! Inference module - question answering over search context
//!
//! Combines search results with a HuggingFace text-generation model.

pub mod huggingface;

use std::sync::Arc;

use crate::core::AskResponse;
use crate::search::SearchProvider;

pub use huggingface::HuggingFaceClient;

/// Number of search links joined into the prompt context
const CONTEXT_LINKS: usize = 3;

/// Answers questions using search links as context
pub struct AskService {
    search: Arc<dyn SearchProvider>,
    model: HuggingFaceClient,
    max_results: usize,
}

impl AskService {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        model: HuggingFaceClient,
        max_results: usize,
    ) -> Self {
        Self {
            search,
            model,
            max_results,
        }
    }

    /// Model name reported by `/server-info`
    pub fn model_name(&self) -> &str {
        self.model.model()
    }

    async fn context_for(&self, question: &str) -> String {
        if !self.search.is_configured() {
            return String::new();
        }

        match self.search.search(question, self.max_results).await {
            Ok(links) => links
                .into_iter()
                .take(CONTEXT_LINKS)
                .collect::<Vec<_>>()
                .join(" "),
            Err(e) => {
                tracing::warn!(provider = self.search.name(), error = %e, "context search failed");
                String::new()
            }
        }
    }

    /// Answer a question; an empty question gets an empty answer
    pub async fn ask(&self, question: &str) -> AskResponse {
        if question.is_empty() {
            return AskResponse::default();
        }

        let context = self.context_for(question).await;
        let answer = self.model.generate(question, &context).await;

        AskResponse { answer, context }
    }
}
