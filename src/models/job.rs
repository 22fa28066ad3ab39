use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::OcrMode;

/// Opaque identifier assigned to an asynchronous job by Haven OnDemand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Status of a remote job.
///
/// Only `finished` and `failed` carry meaning here; every other value the
/// service reports is kept verbatim as a non-terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Finished,
    Failed,
    Pending(String),
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Failed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Finished => "finished",
            Self::Failed => "failed",
            Self::Pending(other) => other,
        }
    }
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "finished" => Self::Finished,
            "failed" => Self::Failed,
            _ => Self::Pending(value),
        }
    }
}

impl From<JobStatus> for String {
    fn from(value: JobStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response of the job creation and async API endpoints.
#[derive(Debug, Deserialize)]
pub struct JobCreated {
    #[serde(rename = "jobID")]
    pub job_id: Option<JobId>,
}

/// Response of the job status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusResponse {
    #[serde(rename = "jobID", default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    pub status: JobStatus,
    #[serde(default)]
    pub actions: Vec<ActionResult>,
}

/// One action of a job; `result` is action-specific.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub result: serde_json::Value,
}

/// Job description sent alongside a job submission.
#[derive(Debug, Clone, Serialize)]
pub struct JobDescription {
    pub actions: Vec<JobAction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobAction {
    pub name: String,
    pub version: String,
    pub params: serde_json::Value,
}

impl JobDescription {
    /// OCR of the file attached under the `doc` part.
    pub fn ocr_document(mode: OcrMode) -> Self {
        Self {
            actions: vec![JobAction {
                name: "ocrdocument".to_string(),
                version: "v1".to_string(),
                params: serde_json::json!({ "file": "doc", "mode": mode.to_string() }),
            }],
        }
    }
}
