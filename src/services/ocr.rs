use serde::Deserialize;

use crate::config::OcrMode;
use crate::models::job::{JobDescription, JobId, JobStatus, JobStatusResponse};
use crate::services::hod::{HodError, JobApi};
use crate::services::poller::{wait_for_job, PollError, PollPolicy};

#[derive(Deserialize)]
struct OcrActionResult {
    text_block: Vec<TextBlock>,
}

#[derive(Deserialize)]
struct TextBlock {
    text: String,
}

/// Text recognised in an uploaded image.
#[derive(Debug, Clone, PartialEq)]
pub struct Recognized {
    pub job_id: JobId,
    pub blocks: Vec<String>,
}

impl Recognized {
    /// All text blocks joined by single spaces, ready for indexing.
    pub fn text(&self) -> String {
        self.blocks.join(" ")
    }
}

/// Submit an image for OCR, wait for the job and collect its text blocks.
pub async fn recognize(
    api: &dyn JobApi,
    policy: &PollPolicy,
    mode: OcrMode,
    file_name: &str,
    image: Vec<u8>,
) -> Result<Recognized, OcrError> {
    let job = JobDescription::ocr_document(mode);
    let job_id = api
        .submit_job(&job, file_name, image)
        .await
        .map_err(OcrError::Submit)?;

    tracing::info!(job_id = %job_id, file_name, mode = %mode, "OCR job submitted");
    metrics::counter!("ocr_jobs_total").increment(1);

    let response = wait_for_job(api, &job_id, policy).await?;
    let blocks = extract_text(&response).inspect_err(|e| {
        metrics::counter!("ocr_jobs_failed").increment(1);
        tracing::warn!(job_id = %job_id, error = %e, "OCR job did not produce text");
    })?;

    Ok(Recognized { job_id, blocks })
}

/// Flatten the text blocks of a terminal OCR job, in the order returned.
pub fn extract_text(response: &JobStatusResponse) -> Result<Vec<String>, OcrError> {
    match &response.status {
        JobStatus::Finished => {}
        JobStatus::Failed => {
            return Err(OcrError::Failed {
                job_id: response
                    .job_id
                    .clone()
                    .unwrap_or_else(|| JobId::from("<unknown>")),
            })
        }
        JobStatus::Pending(status) => return Err(OcrError::NotTerminal(status.clone())),
    }

    let mut texts = Vec::new();
    for action in &response.actions {
        let result = OcrActionResult::deserialize(&action.result)
            .map_err(OcrError::MalformedResult)?;
        texts.extend(result.text_block.into_iter().map(|block| block.text));
    }
    Ok(texts)
}

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("Failed to submit OCR job: {0}")]
    Submit(#[source] HodError),

    #[error(transparent)]
    Poll(#[from] PollError),

    #[error("OCR job {job_id} failed")]
    Failed { job_id: JobId },

    #[error("OCR job is still in status '{0}'")]
    NotTerminal(String),

    #[error("OCR result has an unexpected shape: {0}")]
    MalformedResult(#[source] serde_json::Error),
}
