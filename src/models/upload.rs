use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::models::document::QueryHit;
use crate::models::job::JobId;

/// Text fields of the upload form (the file part is handled separately).
#[derive(Debug, Deserialize, Validate)]
pub struct UploadForm {
    #[garde(length(chars, min = 1, max = 200))]
    pub title: String,
}

/// Query form submitted to `POST /query`.
#[derive(Debug, Deserialize, Validate)]
pub struct QueryForm {
    #[garde(length(min = 1, max = 1000))]
    pub querytext: String,
}

/// Outcome of a processed upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub upload_id: uuid::Uuid,
    pub ocr_job: JobId,
    pub index_job: JobId,
    pub text_blocks: usize,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct QueryResults {
    pub documents: Vec<QueryHit>,
}
