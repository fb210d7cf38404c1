//! Shared types used across vidscout modules
//!
//! Request and response bodies of the HTTP API plus the extraction target.

use serde::{Deserialize, Serialize};

/// What an extraction run starts from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractTarget {
    /// A page URL to inspect directly
    Url(String),
    /// A search query whose results are inspected in order
    Query(String),
}

impl ExtractTarget {
    /// Build a target from optional parts. A non-empty url wins over a query;
    /// blank strings count as absent.
    pub fn from_parts(url: Option<&str>, query: Option<&str>) -> Option<Self> {
        fn present(s: Option<&str>) -> Option<&str> {
            s.map(str::trim).filter(|s| !s.is_empty())
        }

        if let Some(url) = present(url) {
            return Some(Self::Url(url.to_string()));
        }
        present(query).map(|q| Self::Query(q.to_string()))
    }
}

/// Body of `POST /extract`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
}

impl ExtractRequest {
    /// Resolve the request into a target, if it names one
    pub fn target(&self) -> Option<ExtractTarget> {
        ExtractTarget::from_parts(self.url.as_deref(), self.query.as_deref())
    }
}

/// Result of an extraction run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractResponse {
    /// Direct media links, first occurrence order
    pub candidates: Vec<String>,
    /// Human-readable progress lines
    pub logs: Vec<String>,
}

/// Body of `POST /ask`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: String,
}

/// Response of `POST /ask`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub context: String,
}

/// Response of `GET /server-info`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub status: String,
    pub msg: String,
    pub hf_model: String,
}

impl ServerInfo {
    pub fn ready(model: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            msg: "Server ready".to_string(),
            hf_model: model.into(),
        }
    }
}

/// Plain acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
