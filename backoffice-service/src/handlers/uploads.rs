//! Document-store upload and serving. Every file referenced anywhere else in
//! the system enters through here and is referenced by its locator.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use bson::DateTime;
use uuid::Uuid;

use service_core::error::AppError;

use crate::dtos::uploads::UploadResponse;
use crate::models::StoredFile;
use crate::startup::AppState;

/// Upload size cap, matching the frontend's limit.
const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// POST /api/uploads: single `file` field, multipart.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(anyhow::anyhow!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = sanitize_file_name(field.file_name().unwrap_or("file"));
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(anyhow::anyhow!("Failed to read upload: {e}")))?;

        if data.is_empty() {
            return Err(AppError::Validation(anyhow::anyhow!("File upload failed")));
        }
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::Validation(anyhow::anyhow!(
                "File exceeds the 5MB upload limit"
            )));
        }

        let id = Uuid::new_v4();
        let storage_key = format!("car-dealership/{id}-{file_name}");
        state.storage.upload(&storage_key, data.to_vec()).await?;

        let stored = StoredFile {
            id,
            file_name: file_name.clone(),
            content_type,
            size_bytes: data.len() as i64,
            storage_key: storage_key.clone(),
            created_at: DateTime::now(),
        };
        state.repository.insert_stored_file(&stored).await?;

        tracing::info!(file_id = %id, size = stored.size_bytes, "file uploaded");

        return Ok((
            StatusCode::OK,
            Json(UploadResponse {
                message: "File uploaded successfully".to_string(),
                url: format!("/files/{storage_key}"),
                file_name,
                size_bytes: stored.size_bytes,
            }),
        ));
    }

    Err(AppError::Validation(anyhow::anyhow!("File upload failed")))
}

/// GET /files/{key}: serve a stored file.
pub async fn serve_file(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let data = state.storage.download(&key).await?;
    let content_type = state
        .repository
        .find_stored_file_by_key(&key)
        .await?
        .map(|file| file.content_type)
        .unwrap_or_else(|| "application/octet-stream".to_string());

    Ok(([(header::CONTENT_TYPE, content_type)], data))
}
