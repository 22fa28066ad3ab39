use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::Html;
use garde::Validate;

use crate::app_state::AppState;
use crate::error::AppError;
use crate::models::upload::UploadForm;
use crate::routes::pages;
use crate::services::pipeline;
use crate::services::validation::{validate_upload, ValidationError};

/// POST /upload: OCR the submitted image and index its text.
pub async fn submit_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<&'static str>, AppError> {
    let mut title: Option<String> = None;
    let mut doc: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(invalid_form)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("title") => {
                title = Some(field.text().await.map_err(invalid_form)?);
            }
            Some("doc") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(invalid_form)?;
                doc = Some((file_name, data.to_vec()));
            }
            _ => {}
        }
    }

    let form = UploadForm {
        title: title.ok_or(ValidationError::MissingField("title"))?,
    };
    form.validate()
        .map_err(|report| ValidationError::InvalidForm(report.to_string()))?;

    let (file_name, bytes) = doc.ok_or(ValidationError::MissingField("doc"))?;
    let upload = validate_upload(&file_name, bytes, state.config.max_upload_bytes)?;

    tracing::info!(
        title = %form.title,
        file = %upload.safe_name,
        format = ?upload.format,
        size = upload.bytes.len(),
        "Upload accepted"
    );

    let outcome =
        pipeline::process_upload(state.hod.as_ref(), &state.config, &form.title, upload).await?;

    tracing::info!(
        upload_id = %outcome.upload_id,
        ocr_job = %outcome.ocr_job,
        index_job = %outcome.index_job,
        text_blocks = outcome.text_blocks,
        "Upload processed"
    );

    Ok(pages::upload_complete())
}

fn invalid_form(err: axum::extract::multipart::MultipartError) -> ValidationError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ValidationError::BodyTooLarge(err.body_text())
    } else {
        ValidationError::InvalidForm(err.body_text())
    }
}
