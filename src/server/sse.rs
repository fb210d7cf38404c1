//! Server-Sent Events streaming of extraction progress
//!
//! Every progress line becomes one `data:` event. A run always ends with
//! `data: [DONE]`; successful runs send `data: RESULT: {json}` right before it.

use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;

use crate::core::{ExtractResponse, ExtractTarget};
use crate::extract::{ExtractionPipeline, ProgressEvent};
use crate::server::AppState;

/// Final line of every stream
pub const DONE_MARKER: &str = "[DONE]";

/// Prefix of the line carrying the JSON result
pub const RESULT_PREFIX: &str = "RESULT: ";

/// Query string of `GET /extract_stream_sse`
#[derive(Debug, Default, Deserialize)]
pub struct StreamParams {
    pub url: Option<String>,
    pub query: Option<String>,
}

fn result_line(response: &ExtractResponse) -> String {
    let json = serde_json::to_string(response).unwrap_or_else(|_| "{}".to_string());
    format!("{}{}", RESULT_PREFIX, json)
}

async fn stream_run(
    pipeline: &ExtractionPipeline,
    target: Option<ExtractTarget>,
    lines: UnboundedSender<String>,
) {
    let Some(target) = target else {
        let _ = lines.send(ProgressEvent::Started.to_string());
        let _ = lines.send("Error: provide url or query".to_string());
        let _ = lines.send(DONE_MARKER.to_string());
        return;
    };

    let (events_tx, mut events_rx) = mpsc::unbounded_channel::<ProgressEvent>();

    let forward_lines = lines.clone();
    // Dropping `events_rx` as soon as the client leaves lets the pipeline see
    // the closed listener at its next candidate boundary.
    let forward = async move {
        loop {
            tokio::select! {
                event = events_rx.recv() => match event {
                    Some(event) => {
                        if forward_lines.send(event.to_string()).is_err() {
                            break;
                        }
                    }
                    None => break,
                },
                _ = forward_lines.closed() => break,
            }
        }
    };
    let run = async move {
        let response = pipeline.run(&target, Some(&events_tx)).await;
        drop(events_tx);
        response
    };

    let (response, ()) = tokio::join!(run, forward);

    let _ = lines.send(result_line(&response));
    let _ = lines.send(DONE_MARKER.to_string());
}

/// `GET /extract_stream_sse?url=...` or `?query=...`
pub async fn extract_stream_sse(
    State(state): State<AppState>,
    Query(params): Query<StreamParams>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let target = ExtractTarget::from_parts(params.url.as_deref(), params.query.as_deref());
    tracing::info!(?target, "extract stream opened");

    let (tx, rx) = mpsc::unbounded_channel::<String>();
    let pipeline = state.pipeline.clone();
    tokio::spawn(async move {
        stream_run(&pipeline, target, tx).await;
    });

    let stream = UnboundedReceiverStream::new(rx)
        .map(|line| Ok::<_, Infallible>(Event::default().data(line)));
    Sse::new(stream).keep_alive(KeepAlive::default())
}
