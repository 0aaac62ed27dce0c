use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use folioapp::error::{ErrorKind, FolioError};
use serde_json::json;

/// A library error on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub FolioError);

impl From<FolioError> for ApiError {
    fn from(err: FolioError) -> Self {
        Self(err)
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::ValidationFailure => StatusCode::BAD_REQUEST,
        ErrorKind::BackendUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `{"error": code, "message": text}` with the given status.
pub fn error_body(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    let body = json!({ "error": code, "message": message.into() });
    (status, Json(body)).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = status_for(kind);
        if kind == ErrorKind::BackendUnavailable {
            tracing::error!(error = %self.0, "request failed");
        }
        error_body(status, kind.as_str(), self.0.to_string())
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
