use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;

pub mod download;
pub mod info;
pub mod upload;

/// JSON error body shared by every endpoint: `{"error": "<message>"}`.
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    let body = serde_json::json!({ "error": message });
    (status, Json(body)).into_response()
}
