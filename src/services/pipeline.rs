use std::time::Instant;

use tracing::{info, Instrument};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::upload::UploadOutcome;
use crate::services::hod::JobApi;
use crate::services::indexing::{self, IndexError};
use crate::services::ocr::{self, OcrError};
use crate::services::validation::ValidatedUpload;

/// OCR an uploaded image and add the recognised text to the index.
///
/// Steps run strictly in order: submit, poll, extract, index.
pub async fn process_upload(
    api: &dyn JobApi,
    config: &AppConfig,
    title: &str,
    upload: ValidatedUpload,
) -> Result<UploadOutcome, PipelineError> {
    let upload_id = Uuid::new_v4();
    let span = tracing::info_span!("upload", %upload_id, file = %upload.safe_name);

    async move {
        let started = Instant::now();
        let policy = config.poll_policy();

        let recognized = ocr::recognize(
            api,
            &policy,
            config.ocr_mode,
            &upload.safe_name,
            upload.bytes,
        )
        .await?;
        let text = recognized.text();

        info!(
            ocr_job = %recognized.job_id,
            text_blocks = recognized.blocks.len(),
            chars = text.len(),
            "OCR complete"
        );

        let index_job = indexing::index_document(
            api,
            &policy,
            &config.index_name,
            title,
            &upload.original_name,
            &text,
        )
        .await?;

        metrics::histogram!("upload_processing_seconds").record(started.elapsed().as_secs_f64());
        info!(index_job = %index_job, "Upload indexed");

        Ok::<_, PipelineError>(UploadOutcome {
            upload_id,
            ocr_job: recognized.job_id,
            index_job,
            text_blocks: recognized.blocks.len(),
            text,
        })
    }
    .instrument(span)
    .await
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Ocr(#[from] OcrError),

    #[error(transparent)]
    Index(#[from] IndexError),
}
