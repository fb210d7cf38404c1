//! Progress events emitted during an extraction run
//!
//! Each event renders as one line. The same line is sent as an SSE `data:`
//! payload and recorded in the response logs.

use std::fmt;

/// One step of an extraction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Started,
    ReceivedUrl(String),
    Searching(String),
    SearchResults(Vec<String>),
    TryingCandidate { index: usize, url: String },
    TryingExtractor(String),
    Found { extractor: String, urls: Vec<String> },
    NotFound(String),
    ExtractorFailed { extractor: String, error: String },
}

impl ProgressEvent {
    /// Whether the event should be logged above debug level
    pub fn is_notable(&self) -> bool {
        matches!(self, Self::Found { .. } | Self::ExtractorFailed { .. })
    }
}

fn json_list(urls: &[String]) -> String {
    serde_json::to_string(urls).unwrap_or_else(|_| format!("{:?}", urls))
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => write!(f, "Starting extraction..."),
            Self::ReceivedUrl(url) => write!(f, "Received URL: {}", url),
            Self::Searching(query) => write!(f, "Searching for: {}", query),
            Self::SearchResults(urls) => write!(f, "Candidates found: {}", json_list(urls)),
            Self::TryingCandidate { index, url } => {
                write!(f, "Trying candidate {}: {}", index, url)
            }
            Self::TryingExtractor(name) => write!(f, "Trying extraction with {}...", name),
            Self::Found { extractor, urls } => {
                write!(f, "Found via {}: {}", extractor, json_list(urls))
            }
            Self::NotFound(name) => write!(f, "{} found nothing for this candidate.", name),
            Self::ExtractorFailed { extractor, error } => {
                write!(f, "{} error: {}", extractor, error)
            }
        }
    }
}
