//! HTTP API integration tests
//!
//! Runs the router on an ephemeral port with scripted extractors and mocked
//! SerpAPI / HuggingFace backends.

use async_trait::async_trait;
use httpmock::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

use vidscout::core::config::{InferenceConfig, SearchConfig};
use vidscout::core::{AskResponse, ExtractResponse, Result};
use vidscout::extract::{ExtractionPipeline, MediaExtractor};
use vidscout::inference::{AskService, HuggingFaceClient};
use vidscout::search::{SearchProvider, SerpApiClient};
use vidscout::server::{self, AppState};
use vidscout::VidscoutError;

/// Finds an HLS playlist only on pages whose URL contains "video"
struct PlaylistExtractor;

#[async_trait]
impl MediaExtractor for PlaylistExtractor {
    async fn extract(&self, url: &str) -> Result<Vec<String>> {
        if url.contains("video") {
            Ok(vec![format!("{}/index.m3u8", url), format!("{}/index.m3u8", url)])
        } else {
            Ok(Vec::new())
        }
    }

    fn name(&self) -> &str {
        "playlist"
    }
}

/// Always fails, like a missing binary
struct BrokenExtractor;

#[async_trait]
impl MediaExtractor for BrokenExtractor {
    async fn extract(&self, _url: &str) -> Result<Vec<String>> {
        Err(VidscoutError::YtDlpNotFound)
    }

    fn name(&self) -> &str {
        "broken"
    }
}

fn search_config(base_url: &str, api_key: Option<&str>) -> SearchConfig {
    SearchConfig {
        api_key: api_key.map(str::to_string),
        base_url: base_url.to_string(),
        language: "pt".to_string(),
        max_results: 5,
        timeout_secs: 5,
    }
}

fn inference_config(base_url: &str, token: Option<&str>) -> InferenceConfig {
    InferenceConfig {
        token: token.map(str::to_string),
        model: "gpt2".to_string(),
        base_url: base_url.to_string(),
        timeout_secs: 5,
    }
}

/// Start a server and return its base URL
async fn start(search: SearchConfig, inference: InferenceConfig) -> String {
    let search: Arc<dyn SearchProvider> = Arc::new(SerpApiClient::from_config(&search).unwrap());
    let extractors: Vec<Arc<dyn MediaExtractor>> =
        vec![Arc::new(BrokenExtractor), Arc::new(PlaylistExtractor)];
    let pipeline = ExtractionPipeline::new(search.clone(), extractors, 5);
    let model = HuggingFaceClient::from_config(&inference).unwrap();
    let state = AppState::new(
        Arc::new(pipeline),
        Arc::new(AskService::new(search, model, 5)),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::serve_on(listener, state, std::future::pending()));

    format!("http://{}", addr)
}

async fn start_offline() -> String {
    start(
        search_config("http://127.0.0.1:9", None),
        inference_config("http://127.0.0.1:9", None),
    )
    .await
}

#[tokio::test]
async fn test_server_info() {
    let base = start_offline().await;

    let body: Value = reqwest::get(format!("{}/server-info", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        body,
        json!({"status": "ok", "msg": "Server ready", "hf_model": "gpt2"})
    );
}

#[tokio::test]
async fn test_extract_requires_url_or_query() {
    let base = start_offline().await;

    let response = reqwest::Client::new()
        .post(format!("{}/extract", base))
        .json(&json!({"url": ""}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Send `url` or `query`.");
}

#[tokio::test]
async fn test_extract_url_falls_through_broken_extractor() {
    let base = start_offline().await;

    let body: ExtractResponse = reqwest::Client::new()
        .post(format!("{}/extract", base))
        .json(&json!({"url": "https://site.test/video/1"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body.candidates, vec!["https://site.test/video/1/index.m3u8"]);
    assert!(body
        .logs
        .iter()
        .any(|l| l.starts_with("broken error: yt-dlp not found")));
    assert!(body.logs.iter().any(|l| l.starts_with("Found via playlist")));
}

#[tokio::test]
async fn test_extract_query_uses_search_results() {
    let serp = MockServer::start_async().await;
    let search_mock = serp
        .mock_async(|when, then| {
            when.method(GET)
                .path("/search.json")
                .query_param("q", "cat trailer")
                .query_param("hl", "pt")
                .query_param("api_key", "test-key");
            then.status(200).json_body(json!({
                "organic_results": [
                    {"link": "https://blog.test/post"},
                    {"link": "https://site.test/video/9"},
                    {"link": "https://site.test/video/10"}
                ]
            }));
        })
        .await;

    let base = start(
        search_config(&serp.base_url(), Some("test-key")),
        inference_config("http://127.0.0.1:9", None),
    )
    .await;

    let body: ExtractResponse = reqwest::Client::new()
        .post(format!("{}/extract", base))
        .json(&json!({"query": "cat trailer"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    search_mock.assert_async().await;
    assert_eq!(body.candidates, vec!["https://site.test/video/9/index.m3u8"]);
    assert!(body
        .logs
        .contains(&"Trying candidate 2: https://site.test/video/9".to_string()));
    assert!(!body
        .logs
        .iter()
        .any(|l| l.contains("https://site.test/video/10")
            && l.starts_with("Trying candidate")));
}

#[tokio::test]
async fn test_extract_query_with_failing_search() {
    let serp = MockServer::start_async().await;
    let search_mock = serp
        .mock_async(|when, then| {
            when.method(GET).path("/search.json");
            then.status(401).json_body(json!({"error": "Invalid API key."}));
        })
        .await;

    let base = start(
        search_config(&serp.base_url(), Some("bad-key")),
        inference_config("http://127.0.0.1:9", None),
    )
    .await;

    let body: ExtractResponse = reqwest::Client::new()
        .post(format!("{}/extract", base))
        .json(&json!({"query": "cat trailer"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    search_mock.assert_async().await;
    assert!(body.candidates.is_empty());
    assert!(body.logs.contains(&"Candidates found: []".to_string()));
    assert!(!body.logs.iter().any(|l| l.starts_with("Trying candidate")));
}

#[tokio::test]
async fn test_malformed_json_body_uses_detail_shape() {
    let base = start_offline().await;
    let client = reqwest::Client::new();

    let missing_content_type = client
        .post(format!("{}/extract", base))
        .body(r#"{"url": "https://site.test/video/1"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(missing_content_type.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = missing_content_type.json().await.unwrap();
    assert!(body["detail"].as_str().is_some_and(|d| !d.is_empty()));

    let wrong_type = client
        .post(format!("{}/ask", base))
        .json(&json!({"question": 42}))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong_type.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = wrong_type.json().await.unwrap();
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_extract_stream_acknowledges() {
    let base = start_offline().await;

    let body: Value = reqwest::Client::new()
        .post(format!("{}/extract_stream", base))
        .json(&json!({"anything": true}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_sse_stream_reports_result() {
    let base = start_offline().await;

    let response = reqwest::Client::new()
        .get(format!("{}/extract_stream_sse", base))
        .query(&[("url", "https://site.test/video/3")])
        .send()
        .await
        .unwrap();

    let content_type = response.headers()[reqwest::header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/event-stream"));

    let text = response.text().await.unwrap();
    let data: Vec<&str> = text
        .lines()
        .filter_map(|l| l.strip_prefix("data: "))
        .collect();

    assert_eq!(data.first(), Some(&"Starting extraction..."));
    assert_eq!(data.last(), Some(&"[DONE]"));

    let result = data[data.len() - 2]
        .strip_prefix(server::RESULT_PREFIX)
        .unwrap();
    let parsed: ExtractResponse = serde_json::from_str(result).unwrap();
    assert_eq!(parsed.candidates, vec!["https://site.test/video/3/index.m3u8"]);
}

#[tokio::test]
async fn test_sse_stream_without_target() {
    let base = start_offline().await;

    let text = reqwest::get(format!("{}/extract_stream_sse", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    let data: Vec<&str> = text
        .lines()
        .filter_map(|l| l.strip_prefix("data: "))
        .collect();
    assert_eq!(
        data,
        vec![
            "Starting extraction...",
            "Error: provide url or query",
            "[DONE]"
        ]
    );
}

#[tokio::test]
async fn test_ask_with_empty_question() {
    let base = start_offline().await;

    let body: AskResponse = reqwest::Client::new()
        .post(format!("{}/ask", base))
        .json(&json!({}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body, AskResponse::default());
}

#[tokio::test]
async fn test_ask_without_token() {
    let base = start_offline().await;

    let body: AskResponse = reqwest::Client::new()
        .post(format!("{}/ask", base))
        .json(&json!({"question": "what is HLS?"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body.answer, "HF_TOKEN not configured.");
    assert_eq!(body.context, "");
}

#[tokio::test]
async fn test_ask_uses_search_context_and_model() {
    let serp = MockServer::start_async().await;
    serp.mock_async(|when, then| {
        when.method(GET).path("/search.json");
        then.status(200).json_body(json!({
            "organic_results": [
                {"link": "https://a.test"},
                {"link": "https://b.test"},
                {"link": "https://c.test"},
                {"link": "https://d.test"}
            ]
        }));
    })
    .await;

    let hf = MockServer::start_async().await;
    let model_mock = hf
        .mock_async(|when, then| {
            when.method(POST).path("/models/gpt2").json_body(json!({
                "inputs": "Q: what is HLS?\nC: https://a.test https://b.test https://c.test\nA:"
            }));
            then.status(200)
                .json_body(json!([{"generated_text": "A streaming protocol."}]));
        })
        .await;

    let base = start(
        search_config(&serp.base_url(), Some("k")),
        inference_config(&hf.base_url(), Some("hf-token")),
    )
    .await;

    let body: AskResponse = reqwest::Client::new()
        .post(format!("{}/ask", base))
        .json(&json!({"question": "what is HLS?"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    model_mock.assert_async().await;
    assert_eq!(body.answer, "A streaming protocol.");
    assert_eq!(body.context, "https://a.test https://b.test https://c.test");
}

#[tokio::test]
async fn test_ask_reports_model_errors() {
    let hf = MockServer::start_async().await;
    hf.mock_async(|when, then| {
        when.method(POST).path("/models/gpt2");
        then.status(503).body("Model gpt2 is currently loading");
    })
    .await;

    let base = start(
        search_config("http://127.0.0.1:9", None),
        inference_config(&hf.base_url(), Some("hf-token")),
    )
    .await;

    let body: AskResponse = reqwest::Client::new()
        .post(format!("{}/ask", base))
        .json(&json!({"question": "status?"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        body.answer,
        "HuggingFace error 503: Model gpt2 is currently loading"
    );
}
