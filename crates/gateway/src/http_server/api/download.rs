use axum::body::Body;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use http::StatusCode;

use object_store::StoreError;

use super::error_response;
use crate::archive::{ArchiveId, ARCHIVE_CONTENT_TYPE};
use crate::GatewayState;

pub async fn handler(
    State(state): State<GatewayState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Response, DownloadError> {
    // Undecodable escapes (e.g. invalid UTF-8) are malformed ids too
    let Path(id) = id.map_err(|e| {
        tracing::debug!("Rejected download path: {}", e);
        DownloadError::InvalidId
    })?;

    // Reject anything that isn't a plain token before it can reach a storage key
    let id: ArchiveId = id.parse().map_err(|_| DownloadError::InvalidId)?;
    let key = id.storage_key();

    let exists = state.store().exists(&key).await.map_err(|e| {
        tracing::error!("Download error for {}: {}", id, e);
        DownloadError::Store(e)
    })?;
    if !exists {
        return Err(DownloadError::NotFound);
    }

    let data = match state.store().get(&key).await {
        Ok(data) => data,
        // Removed between the existence check and the fetch
        Err(e) if e.is_not_found() => return Err(DownloadError::NotFound),
        Err(e) => {
            tracing::error!("Download error for {}: {}", id, e);
            return Err(DownloadError::Store(e));
        }
    };

    tracing::info!(
        "✓ Downloaded mixtape: {} ({:.2} KB)",
        id,
        data.len() as f64 / 1024.0
    );

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, ARCHIVE_CONTENT_TYPE.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", id.file_name()),
            ),
            (CONTENT_LENGTH, data.len().to_string()),
        ],
        Body::from(data),
    )
        .into_response())
}

/// `GET /t/` carries an empty identifier.
pub async fn missing_id_handler() -> DownloadError {
    DownloadError::InvalidId
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("Invalid mixtape ID")]
    InvalidId,
    #[error("Mixtape not found")]
    NotFound,
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for DownloadError {
    fn into_response(self) -> Response {
        match self {
            DownloadError::InvalidId => error_response(StatusCode::BAD_REQUEST, &self.to_string()),
            DownloadError::NotFound => error_response(StatusCode::NOT_FOUND, &self.to_string()),
            DownloadError::Store(_) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to download archive",
            ),
        }
    }
}
