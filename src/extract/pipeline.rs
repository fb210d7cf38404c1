//! Extraction pipeline - runs search and extractors in order
//!
//! For each candidate page the extractors are tried in the order they were
//! registered; the first one that returns links ends the run.

use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

use crate::core::{Config, ExtractResponse, ExtractTarget, Result};
use crate::extract::browser::BrowserExtractor;
use crate::extract::media::dedup_preserving_order;
use crate::extract::progress::ProgressEvent;
use crate::extract::traits::MediaExtractor;
use crate::extract::ytdlp::YtDlpExtractor;
use crate::search::{SearchProvider, SerpApiClient};

/// Ordered search + extraction strategy
pub struct ExtractionPipeline {
    search: Arc<dyn SearchProvider>,
    extractors: Vec<Arc<dyn MediaExtractor>>,
    max_results: usize,
}

/// Collects event lines and forwards them to an optional listener
struct Recorder<'a> {
    logs: Vec<String>,
    progress: Option<&'a UnboundedSender<ProgressEvent>>,
}

impl Recorder<'_> {
    fn emit(&mut self, event: ProgressEvent) {
        if event.is_notable() {
            tracing::info!("{}", event);
        } else {
            tracing::debug!("{}", event);
        }
        self.logs.push(event.to_string());
        if let Some(tx) = self.progress {
            let _ = tx.send(event);
        }
    }

    fn listener_gone(&self) -> bool {
        self.progress.map(|tx| tx.is_closed()).unwrap_or(false)
    }
}

impl ExtractionPipeline {
    /// Create a pipeline from its parts
    pub fn new(
        search: Arc<dyn SearchProvider>,
        extractors: Vec<Arc<dyn MediaExtractor>>,
        max_results: usize,
    ) -> Self {
        Self {
            search,
            extractors,
            max_results,
        }
    }

    /// SerpAPI search, then yt-dlp, then the browser fallback
    pub fn from_config(config: &Config) -> Result<Self> {
        let search = Arc::new(SerpApiClient::from_config(&config.search)?);
        let extractors: Vec<Arc<dyn MediaExtractor>> = vec![
            Arc::new(YtDlpExtractor::from_config(&config.ytdlp)),
            Arc::new(BrowserExtractor::from_config(&config.browser)),
        ];
        Ok(Self::new(search, extractors, config.search.max_results))
    }

    /// Names of the registered extractors, in order
    pub fn extractor_names(&self) -> Vec<&str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }

    async fn candidate_pages(&self, target: &ExtractTarget, rec: &mut Recorder<'_>) -> Vec<String> {
        match target {
            ExtractTarget::Url(url) => {
                rec.emit(ProgressEvent::ReceivedUrl(url.clone()));
                vec![url.clone()]
            }
            ExtractTarget::Query(query) => {
                rec.emit(ProgressEvent::Searching(query.clone()));
                let pages = match self.search.search(query, self.max_results).await {
                    Ok(pages) => pages,
                    Err(e) => {
                        tracing::warn!(provider = self.search.name(), error = %e, "search failed");
                        Vec::new()
                    }
                };
                rec.emit(ProgressEvent::SearchResults(pages.clone()));
                pages
            }
        }
    }

    /// Run a full extraction, optionally streaming progress to `progress`
    pub async fn run(
        &self,
        target: &ExtractTarget,
        progress: Option<&UnboundedSender<ProgressEvent>>,
    ) -> ExtractResponse {
        let mut rec = Recorder {
            logs: Vec::new(),
            progress,
        };
        let mut candidates = Vec::new();

        rec.emit(ProgressEvent::Started);
        let pages = self.candidate_pages(target, &mut rec).await;

        'pages: for (idx, page) in pages.iter().enumerate() {
            if rec.listener_gone() {
                tracing::debug!("progress listener dropped, stopping extraction");
                break;
            }

            rec.emit(ProgressEvent::TryingCandidate {
                index: idx + 1,
                url: page.clone(),
            });

            for extractor in &self.extractors {
                rec.emit(ProgressEvent::TryingExtractor(extractor.label().to_string()));

                match extractor.extract(page).await {
                    Ok(urls) if !urls.is_empty() => {
                        rec.emit(ProgressEvent::Found {
                            extractor: extractor.label().to_string(),
                            urls: urls.clone(),
                        });
                        candidates.extend(urls);
                        break 'pages;
                    }
                    Ok(_) => rec.emit(ProgressEvent::NotFound(extractor.label().to_string())),
                    Err(e) => rec.emit(ProgressEvent::ExtractorFailed {
                        extractor: extractor.label().to_string(),
                        error: e.to_string(),
                    }),
                }
            }
        }

        ExtractResponse {
            candidates: dedup_preserving_order(candidates),
            logs: rec.logs,
        }
    }
}
