use axum::{extract::State, Json};
use drugscope_common::AnalysisRecord;

use crate::error::ApiError;
use crate::state::SharedState;

/// GET /api/history: all analyses, newest first.
pub async fn history(State(state): State<SharedState>) -> Result<Json<Vec<AnalysisRecord>>, ApiError> {
    Ok(Json(state.orchestrator.history().await?))
}
