use tracing::info;

use crate::models::document::{AddToIndexPayload, QueryHit};
use crate::models::job::{JobId, JobStatus};
use crate::services::hod::{HodError, JobApi};
use crate::services::poller::{wait_for_job, PollError, PollPolicy};

/// Build the add-to-index payload for a single uploaded document.
pub fn build_index_payload(title: &str, file_name: &str, content: &str) -> AddToIndexPayload {
    AddToIndexPayload::single(title, file_name, content)
}

/// Add one document to `index` and wait for the indexing job to finish.
///
/// The job result itself carries nothing the caller needs; only whether the
/// job finished matters.
pub async fn index_document(
    api: &dyn JobApi,
    policy: &PollPolicy,
    index: &str,
    title: &str,
    file_name: &str,
    content: &str,
) -> Result<JobId, IndexError> {
    let payload = build_index_payload(title, file_name, content);
    let job_id = api
        .add_to_index(index, &payload)
        .await
        .map_err(IndexError::Submit)?;

    info!(job_id = %job_id, index, reference = file_name, "Index job submitted");

    let response = wait_for_job(api, &job_id, policy).await?;
    if response.status == JobStatus::Failed {
        return Err(IndexError::Failed { job_id });
    }

    Ok(job_id)
}

/// Create `index` unless a private resource of that name already exists.
/// Returns whether the index had to be created.
pub async fn ensure_index(api: &dyn JobApi, index: &str) -> Result<bool, HodError> {
    let resources = api.list_resources().await?;
    if resources.iter().any(|name| name == index) {
        info!(index, "Text index present");
        return Ok(false);
    }

    info!(index, "Creating text index");
    api.create_text_index(index).await?;
    Ok(true)
}

pub async fn query(api: &dyn JobApi, index: &str, text: &str) -> Result<Vec<QueryHit>, HodError> {
    metrics::counter!("index_queries_total").increment(1);
    let hits = api.query_index(index, text).await?;
    tracing::debug!(index, hits = hits.len(), "Query complete");
    Ok(hits)
}

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("Failed to submit index job: {0}")]
    Submit(#[source] HodError),

    #[error(transparent)]
    Poll(#[from] PollError),

    #[error("Index job {job_id} failed")]
    Failed { job_id: JobId },
}
