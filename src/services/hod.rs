//! Haven OnDemand REST client.
//!
//! Every call carries the API key as the `apikey` query parameter. Jobs are
//! created through `/1/job/` (OCR) or an `async` API endpoint (indexing) and
//! their progress is read back from `/1/job/status/{id}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use crate::models::document::{AddToIndexPayload, QueryHit, QueryResponse, ResourceList};
use crate::models::job::{JobCreated, JobDescription, JobId, JobStatusResponse};
use crate::services::credentials::ApiKey;

/// Remote operations the upload and query flows depend on.
#[async_trait]
pub trait JobApi: Send + Sync {
    /// Submit a document for processing; returns the new job id.
    async fn submit_job(
        &self,
        job: &JobDescription,
        file_name: &str,
        file: Vec<u8>,
    ) -> Result<JobId, HodError>;

    /// Fetch the current status of a job.
    async fn job_status(&self, job_id: &JobId) -> Result<JobStatusResponse, HodError>;

    /// Queue documents for addition to a text index.
    async fn add_to_index(&self, index: &str, payload: &AddToIndexPayload)
        -> Result<JobId, HodError>;

    async fn query_index(&self, index: &str, text: &str) -> Result<Vec<QueryHit>, HodError>;

    /// Names of the caller's private resources (indexes included).
    async fn list_resources(&self) -> Result<Vec<String>, HodError>;

    async fn create_text_index(&self, index: &str) -> Result<(), HodError>;
}

/// Client for the Haven OnDemand API.
pub struct HodClient {
    http: Client,
    base_url: Url,
    api_key: ApiKey,
}

impl HodClient {
    pub fn new(base_url: &str, api_key: ApiKey, timeout: Duration) -> Result<Self, HodError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("smash/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(HodError::Request)?;

        let base_url = Url::parse(base_url)
            .map_err(|e| HodError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(HodError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// `/1/job/status/{id}` with the id encoded as a single path segment.
    fn job_status_url(&self, job_id: &JobId) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["1", "job", "status", job_id.as_str()]);
        }
        url
    }

    fn key(&self) -> (&'static str, &str) {
        ("apikey", self.api_key.expose())
    }
}

#[async_trait]
impl JobApi for HodClient {
    async fn submit_job(
        &self,
        job: &JobDescription,
        file_name: &str,
        file: Vec<u8>,
    ) -> Result<JobId, HodError> {
        let job_json = serde_json::to_string(job).map_err(HodError::Decode)?;
        let form = Form::new().part("doc", Part::bytes(file).file_name(file_name.to_string()));

        let response = self
            .http
            .post(self.url("/1/job/"))
            .query(&[self.key(), ("job", job_json.as_str())])
            .multipart(form)
            .send()
            .await
            .map_err(HodError::Request)?;

        let created: JobCreated = decode(response).await?;
        created_job_id(created)
    }

    async fn job_status(&self, job_id: &JobId) -> Result<JobStatusResponse, HodError> {
        let response = self
            .http
            .get(self.job_status_url(job_id))
            .query(&[self.key()])
            .send()
            .await
            .map_err(HodError::Request)?;

        decode(response).await
    }

    async fn add_to_index(
        &self,
        index: &str,
        payload: &AddToIndexPayload,
    ) -> Result<JobId, HodError> {
        let json = serde_json::to_string(payload).map_err(HodError::Decode)?;

        let response = self
            .http
            .post(self.url("/1/api/async/addtotextindex/v1/"))
            .query(&[self.key(), ("index", index), ("json", json.as_str())])
            .send()
            .await
            .map_err(HodError::Request)?;

        let created: JobCreated = decode(response).await?;
        created_job_id(created)
    }

    async fn query_index(&self, index: &str, text: &str) -> Result<Vec<QueryHit>, HodError> {
        let response = self
            .http
            .get(self.url("/1/api/sync/querytextindex/v1"))
            .query(&[self.key(), ("text", text), ("indexes", index), ("print", "all")])
            .send()
            .await
            .map_err(HodError::Request)?;

        let results: QueryResponse = decode(response).await?;
        Ok(results.documents)
    }

    async fn list_resources(&self) -> Result<Vec<String>, HodError> {
        let response = self
            .http
            .get(self.url("/1/api/sync/listresources/v1"))
            .query(&[self.key()])
            .send()
            .await
            .map_err(HodError::Request)?;

        let resources: ResourceList = decode(response).await?;
        Ok(resources
            .private_resources
            .into_iter()
            .map(|r| r.resource)
            .collect())
    }

    async fn create_text_index(&self, index: &str) -> Result<(), HodError> {
        let response = self
            .http
            .get(self.url("/1/api/sync/createtextindex/v1"))
            .query(&[self.key(), ("index", index), ("flavor", "explorer")])
            .send()
            .await
            .map_err(HodError::Request)?;

        let _: serde_json::Value = decode(response).await?;
        Ok(())
    }
}

/// An absent or empty `jobID` both mean the job was not created.
fn created_job_id(created: JobCreated) -> Result<JobId, HodError> {
    created
        .job_id
        .filter(|id| !id.as_str().is_empty())
        .ok_or(HodError::MissingField("jobID"))
}

/// Check the status code, then decode the JSON body.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, HodError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(HodError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await.map_err(HodError::Request)?;
    serde_json::from_slice(&bytes).map_err(HodError::Decode)
}

#[derive(Debug, thiserror::Error)]
pub enum HodError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Haven OnDemand returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid Haven OnDemand base URL {0}")]
    InvalidBaseUrl(String),

    #[error("Response is missing the `{0}` field")]
    MissingField(&'static str),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl HodError {
    /// Whether retrying the same request might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::InvalidBaseUrl(_) | Self::MissingField(_) | Self::Decode(_) => false,
        }
    }
}
