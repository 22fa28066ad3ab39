use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::services::hod::HodError;
use crate::services::indexing::IndexError;
use crate::services::ocr::OcrError;
use crate::services::pipeline::PipelineError;
use crate::services::poller::PollError;
use crate::services::validation::ValidationError;

/// Error returned by route handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Haven OnDemand request failed: {0}")]
    Upstream(#[from] HodError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(
                ValidationError::TooLarge { .. } | ValidationError::BodyTooLarge(_),
            ) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Pipeline(PipelineError::Ocr(OcrError::Failed { .. })) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Pipeline(PipelineError::Ocr(OcrError::Poll(PollError::Timeout { .. })))
            | Self::Pipeline(PipelineError::Index(IndexError::Poll(PollError::Timeout { .. }))) => {
                StatusCode::GATEWAY_TIMEOUT
            }
            Self::Pipeline(_) | Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
