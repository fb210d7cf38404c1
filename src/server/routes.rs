//! JSON request handlers

use axum::extract::State;
use axum::Json;

use crate::core::{
    AskRequest, AskResponse, ExtractRequest, ExtractResponse, Result, ServerInfo, StatusResponse,
    VidscoutError,
};
use crate::server::error::ApiJson;
use crate::server::AppState;

/// `GET /server-info`
pub async fn server_info(State(state): State<AppState>) -> Json<ServerInfo> {
    Json(ServerInfo::ready(state.ask.model_name()))
}

/// `POST /extract` - run the whole pipeline and answer once
pub async fn extract(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ExtractRequest>,
) -> Result<Json<ExtractResponse>> {
    let target = request
        .target()
        .ok_or_else(|| VidscoutError::bad_request("Send `url` or `query`."))?;

    tracing::info!(?target, "extract request");
    Ok(Json(state.pipeline.run(&target, None).await))
}

/// `POST /extract_stream` - acknowledgement before the client opens the SSE stream
pub async fn extract_stream_start(
    ApiJson(_body): ApiJson<serde_json::Value>,
) -> Json<StatusResponse> {
    Json(StatusResponse::ok())
}

/// `POST /ask`
pub async fn ask(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AskRequest>,
) -> Json<AskResponse> {
    Json(state.ask.ask(&request.question).await)
}
