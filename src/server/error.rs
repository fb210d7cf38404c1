//! HTTP mapping of domain errors

use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::VidscoutError;

/// JSON body returned for failed requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl VidscoutError {
    fn status_code(&self) -> StatusCode {
        match self {
            _ if self.is_client_error() => StatusCode::BAD_REQUEST,
            VidscoutError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for VidscoutError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (
            status,
            Json(ErrorBody {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// `Json` body extractor whose rejections use the `{"detail": ...}` shape
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = VidscoutError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(VidscoutError::bad_request(rejection.body_text())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            VidscoutError::bad_request("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            VidscoutError::timeout("yt-dlp", 1).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            VidscoutError::BrowserNotFound.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
