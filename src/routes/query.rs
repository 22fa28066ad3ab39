use axum::extract::State;
use axum::{Form, Json};
use garde::Validate;

use crate::app_state::AppState;
use crate::error::AppError;
use crate::models::upload::{QueryForm, QueryResults};
use crate::services::indexing;
use crate::services::validation::ValidationError;

/// POST /query: search the index for the submitted text.
pub async fn run_query(
    State(state): State<AppState>,
    Form(form): Form<QueryForm>,
) -> Result<Json<QueryResults>, AppError> {
    form.validate()
        .map_err(|report| ValidationError::InvalidForm(report.to_string()))?;

    let documents =
        indexing::query(state.hod.as_ref(), &state.config.index_name, &form.querytext).await?;

    Ok(Json(QueryResults { documents }))
}
