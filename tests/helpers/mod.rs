//! Test helpers: a scripted Haven OnDemand fake and request builders

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::Router;
use metrics_exporter_prometheus::PrometheusBuilder;
use smash::app_state::AppState;
use smash::config::AppConfig;
use smash::models::document::{AddToIndexPayload, QueryHit};
use smash::models::job::{JobDescription, JobId, JobStatusResponse};
use smash::routes::create_router;
use smash::services::hod::{HodError, JobApi};

pub const BOUNDARY: &str = "smash-test-boundary";

#[derive(Debug, Clone)]
pub struct Submission {
    pub job: serde_json::Value,
    pub file_name: String,
    pub size: usize,
}

/// Fake remote API. Each job id replays its own list of status responses;
/// the last one repeats once the list is exhausted.
#[derive(Default)]
pub struct ScriptedHod {
    ocr_job: Option<String>,
    index_job: Option<String>,
    statuses: Mutex<HashMap<String, VecDeque<JobStatusResponse>>>,
    hits: Vec<QueryHit>,
    pub submissions: Mutex<Vec<Submission>>,
    pub status_calls: Mutex<Vec<String>>,
    pub index_calls: Mutex<Vec<(String, AddToIndexPayload)>>,
    pub queries: Mutex<Vec<(String, String)>>,
}

impl ScriptedHod {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ocr_job(mut self, job_id: &str, statuses: Vec<JobStatusResponse>) -> Self {
        self.ocr_job = Some(job_id.to_string());
        self.statuses
            .get_mut()
            .unwrap()
            .insert(job_id.to_string(), statuses.into());
        self
    }

    pub fn index_job(mut self, job_id: &str, statuses: Vec<JobStatusResponse>) -> Self {
        self.index_job = Some(job_id.to_string());
        self.statuses
            .get_mut()
            .unwrap()
            .insert(job_id.to_string(), statuses.into());
        self
    }

    pub fn query_hits(mut self, hits: Vec<QueryHit>) -> Self {
        self.hits = hits;
        self
    }

    pub fn status_calls(&self) -> Vec<String> {
        self.status_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobApi for ScriptedHod {
    async fn submit_job(
        &self,
        job: &JobDescription,
        file_name: &str,
        file: Vec<u8>,
    ) -> Result<JobId, HodError> {
        self.submissions.lock().unwrap().push(Submission {
            job: serde_json::to_value(job).unwrap(),
            file_name: file_name.to_string(),
            size: file.len(),
        });
        self.ocr_job
            .as_deref()
            .map(JobId::from)
            .ok_or(HodError::MissingField("jobID"))
    }

    async fn job_status(&self, job_id: &JobId) -> Result<JobStatusResponse, HodError> {
        self.status_calls
            .lock()
            .unwrap()
            .push(job_id.as_str().to_string());

        let mut statuses = self.statuses.lock().unwrap();
        let queue = statuses
            .get_mut(job_id.as_str())
            .ok_or_else(|| HodError::Status {
                status: 404,
                body: format!("unknown job {job_id}"),
            })?;

        let next = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        next.ok_or(HodError::MissingField("status"))
    }

    async fn add_to_index(
        &self,
        index: &str,
        payload: &AddToIndexPayload,
    ) -> Result<JobId, HodError> {
        self.index_calls
            .lock()
            .unwrap()
            .push((index.to_string(), payload.clone()));
        self.index_job
            .as_deref()
            .map(JobId::from)
            .ok_or(HodError::MissingField("jobID"))
    }

    async fn query_index(&self, index: &str, text: &str) -> Result<Vec<QueryHit>, HodError> {
        self.queries
            .lock()
            .unwrap()
            .push((index.to_string(), text.to_string()));
        Ok(self.hits.clone())
    }

    async fn list_resources(&self) -> Result<Vec<String>, HodError> {
        Ok(vec!["smash".to_string()])
    }

    async fn create_text_index(&self, _index: &str) -> Result<(), HodError> {
        Ok(())
    }
}

/// Default configuration with fast polling.
pub fn test_config() -> AppConfig {
    test_config_with(&[])
}

/// Fast-polling configuration with extra environment overrides.
pub fn test_config_with(overrides: &[(&str, &str)]) -> AppConfig {
    let mut vars = vec![
        ("POLL_INITIAL_DELAY_MS".to_string(), "10".to_string()),
        ("POLL_MAX_DELAY_MS".to_string(), "50".to_string()),
        ("POLL_MAX_WAIT_SECS".to_string(), "5".to_string()),
        ("MAX_UPLOAD_BYTES".to_string(), "4096".to_string()),
    ];
    vars.retain(|(k, _)| !overrides.iter().any(|(o, _)| o == k));
    vars.extend(
        overrides
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string())),
    );
    envy::from_iter(vars).expect("test config")
}

pub fn test_router(hod: Arc<ScriptedHod>) -> Router {
    test_router_with(hod, test_config())
}

pub fn test_router_with(hod: Arc<ScriptedHod>, config: AppConfig) -> Router {
    let state = AppState::new(config, hod);
    let handle = PrometheusBuilder::new().build_recorder().handle();
    create_router(state, Arc::new(handle))
}

/// Multipart upload request with optional title and file parts.
pub fn upload_request(title: Option<&str>, file: Option<(&str, &[u8])>) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();

    if let Some(title) = title {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\n{title}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"doc\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request")
}

pub fn query_request(text: &str) -> Request<Body> {
    let encoded: String = text
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' => (b as char).to_string(),
            b' ' => "+".to_string(),
            other => format!("%{other:02X}"),
        })
        .collect();

    Request::builder()
        .method(Method::POST)
        .uri("/query")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("querytext={encoded}")))
        .expect("request")
}

pub async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}
