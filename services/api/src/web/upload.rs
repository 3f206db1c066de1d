//! services/api/src/web/upload.rs
//!
//! The upload endpoint: stream one multipart `file` part to disk under a
//! generated name and hand back its public URL.

use crate::error::ApiError;
use crate::web::state::AppState;
use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::{header, HeaderMap, StatusCode, Uri},
    response::Json,
};
use relay_core::{generate_name, UploadedFile};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;

/// Public path prefix under which stored uploads are served.
pub const UPLOADS_PREFIX: &str = "/uploads";

const FILE_FIELD: &str = "file";
const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// The response payload sent after a successful upload.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Public URL of the stored file.
    pub url: String,
    /// Original filename as sent by the client.
    pub name: String,
    /// MIME type as declared by the client.
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl From<UploadedFile> for UploadResponse {
    fn from(file: UploadedFile) -> Self {
        Self {
            url: file.public_url,
            name: file.original_name,
            mime_type: file.mime_type,
        }
    }
}

/// Upload a single file.
///
/// Accepts a multipart/form-data request with a part named `file`. Other parts are ignored.
#[utoipa::path(
    post,
    path = "/api/upload",
    request_body(content_type = "multipart/form-data", description = "The file to upload, in a part named `file`."),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "No file part in the request", body = crate::error::ErrorBody),
        (status = 413, description = "File exceeds the upload limit", body = crate::error::ErrorBody),
        (status = 500, description = "Failed to write the file", body = crate::error::ErrorBody)
    )
)]
pub async fn upload_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::Validation(e.body_text()))?;
    let limit = state.max_upload_bytes;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        // Only a file part counts; a plain text field named `file` is skipped.
        let original_name = match (field.name(), field.file_name()) {
            (Some(FILE_FIELD), Some(file_name)) => file_name.to_string(),
            _ => continue,
        };

        let origin = public_origin(&state, &headers, &uri);
        let stored = store_file(&state, field, original_name, &origin).await?;
        info!(
            generated_name = %stored.generated_name,
            size_bytes = stored.size_bytes,
            path = %stored.storage_path.display(),
            "Stored upload"
        );
        return Ok(Json(stored.into()));
    }

    Err(ApiError::Validation("No file uploaded".to_string()))
}

/// Streams the field to a staged file, enforcing the size ceiling per chunk.
async fn store_file(
    state: &AppState,
    mut field: Field<'_>,
    original_name: String,
    origin: &str,
) -> Result<UploadedFile, ApiError> {
    let limit = state.max_upload_bytes;
    let mime_type = field.content_type().unwrap_or(DEFAULT_MIME_TYPE).to_string();
    let generated_name = generate_name(&original_name);

    let mut staged = state.uploads.stage(&generated_name).await?;
    while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, limit))? {
        if staged.written() + chunk.len() as u64 > limit {
            warn!(limit_bytes = limit, original_name = %original_name, "Upload exceeded size limit");
            // Dropping `staged` deletes the partial file.
            return Err(ApiError::PayloadTooLarge { limit_bytes: limit });
        }
        staged.write_chunk(&chunk).await?;
    }

    let size_bytes = staged.written();
    let storage_path = staged.commit().await?;

    Ok(UploadedFile {
        public_url: format!("{origin}{UPLOADS_PREFIX}/{generated_name}"),
        generated_name,
        original_name,
        mime_type,
        size_bytes,
        storage_path,
    })
}

fn multipart_error(err: MultipartError, limit: u64) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge { limit_bytes: limit }
    } else {
        ApiError::Validation(format!("Failed to read multipart data: {}", err.body_text()))
    }
}

/// The configured origin, or else the scheme and Host observed on this request.
fn public_origin(state: &AppState, headers: &HeaderMap, uri: &Uri) -> String {
    if let Some(base) = &state.public_base_url {
        return base.clone();
    }
    let scheme = uri.scheme_str().unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .unwrap_or("localhost");
    format!("{scheme}://{host}")
}
