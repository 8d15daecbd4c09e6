use axum::http::{Method, StatusCode, Uri};
use axum::response::Response;

use crate::http_server::api::error_response;

pub async fn not_found_handler(method: Method, uri: Uri) -> Response {
    tracing::debug!(%method, %uri, "No route matched");
    error_response(StatusCode::NOT_FOUND, "Not found")
}
