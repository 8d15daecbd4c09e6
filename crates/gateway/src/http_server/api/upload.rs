use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use http::StatusCode;
use serde::{Deserialize, Serialize};

use object_store::StoreError;

use super::error_response;
use crate::archive::{is_accepted_upload, ArchiveId, ARCHIVE_CONTENT_TYPE};
use crate::http_server::MAX_ARCHIVE_SIZE_BYTES;
use crate::GatewayState;

/// Multipart field carrying the archive.
pub const ARCHIVE_FIELD: &str = "archive";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub id: String,
    pub url: String,
}

pub async fn handler(
    State(state): State<GatewayState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, UploadError> {
    // A body that isn't multipart at all carries no file either
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!("Upload without a multipart body: {}", e);
        UploadError::MissingFile
    })?;

    let mut archive: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!("Multipart parsing error: {}", e);
        UploadError::from(e)
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name != ARCHIVE_FIELD {
            tracing::warn!("Ignoring unknown field: {}", field_name);
            continue;
        }
        if archive.is_some() {
            tracing::warn!("Ignoring additional archive field");
            continue;
        }

        // Without a filename the part is a plain form value, not a file
        let Some(file_name) = field.file_name().map(|s| s.to_string()) else {
            tracing::warn!("Ignoring archive field without a filename");
            continue;
        };
        let content_type = field.content_type().map(|s| s.to_string());

        if !is_accepted_upload(Some(&file_name), content_type.as_deref()) {
            tracing::warn!(
                file_name = ?file_name,
                content_type = ?content_type,
                "Rejected upload with unsupported file type"
            );
            return Err(UploadError::InvalidFileType);
        }

        let data = field.bytes().await.map_err(|e| {
            tracing::warn!("Error reading archive data: {}", e);
            UploadError::from(e)
        })?;

        if data.len() > MAX_ARCHIVE_SIZE_BYTES {
            return Err(UploadError::TooLarge);
        }

        archive = Some(data);
    }

    let data = archive.ok_or(UploadError::MissingFile)?;
    let size = data.len();

    let id = ArchiveId::generate();
    state
        .store()
        .put(&id.storage_key(), data, ARCHIVE_CONTENT_TYPE)
        .await
        .map_err(|e| {
            tracing::error!("Upload error for {}: {}", id, e);
            UploadError::Store(e)
        })?;

    let url = state.retrieval_url(&id);
    tracing::info!("✓ Uploaded mixtape: {} ({:.2} KB)", id, size as f64 / 1024.0);

    Ok((
        StatusCode::OK,
        Json(UploadResponse {
            id: id.to_string(),
            url,
        }),
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No file uploaded")]
    MissingFile,
    #[error("Invalid file type. Only .mixblues archives are allowed.")]
    InvalidFileType,
    #[error("File too large")]
    TooLarge,
    #[error("Multipart error: {message}")]
    Multipart { status: StatusCode, message: String },
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<MultipartError> for UploadError {
    fn from(err: MultipartError) -> Self {
        UploadError::Multipart {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        match self {
            UploadError::MissingFile | UploadError::InvalidFileType => {
                error_response(StatusCode::BAD_REQUEST, &self.to_string())
            }
            UploadError::TooLarge => {
                error_response(StatusCode::PAYLOAD_TOO_LARGE, &self.to_string())
            }
            UploadError::Multipart { status, message } => error_response(status, &message),
            UploadError::Store(_) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to upload archive",
            ),
        }
    }
}
