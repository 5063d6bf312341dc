use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::resume::parser::{parse_resume, ParseError};
use crate::resume::store;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub id: Uuid,
    pub file_name: String,
    pub file_type: String,
    pub token_count: usize,
    pub sections: Value,
    pub s3_key: String,
}

/// POST /api/v1/resumes
///
/// Multipart upload with a single `file` field holding a PDF or DOCX resume.
/// The raw file is archived to S3 before parsing.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let file_name = field
                .file_name()
                .map(str::to_string)
                .ok_or_else(|| AppError::Validation("Upload is missing a file name".into()))?;
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            upload = Some((file_name, data));
        }
    }

    let (file_name, data) =
        upload.ok_or_else(|| AppError::Validation("Multipart field 'file' is required".into()))?;

    if data.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".into()));
    }

    let parsed = parse_resume(&file_name, &data).map_err(|e| match e {
        ParseError::Unsupported(_) => AppError::Validation(e.to_string()),
        ParseError::Pdf(_) | ParseError::Docx(_) => AppError::UnprocessableEntity(e.to_string()),
    })?;

    let id = Uuid::new_v4();
    let s3_key = format!("resumes/{id}/{file_name}");
    state
        .s3
        .put_object()
        .bucket(&state.config.s3_bucket)
        .key(&s3_key)
        .body(ByteStream::from(data.to_vec()))
        .content_type(parsed.file_type.content_type())
        .send()
        .await
        .map_err(|e| AppError::S3(format!("Resume upload failed: {e}")))?;

    let row = store::insert_resume(&state.db, id, &parsed, &s3_key)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(UploadResponse {
        id: row.id,
        file_name: row.file_name,
        file_type: row.file_type,
        token_count: parsed.tokens.len(),
        sections: row.sections,
        s3_key: row.s3_key,
    }))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeRow>, AppError> {
    let row = store::get_resume(&state.db, id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    Ok(Json(row))
}
