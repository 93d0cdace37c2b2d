use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use drugscope_analysis::InvalidInput;
use drugscope_common::FormulaCheck;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct FormulaQuery {
    pub formula: Option<String>,
}

/// GET /api/check-pubchem-formula?formula=C9H8O4
pub async fn check_pubchem_formula(
    State(state): State<SharedState>,
    query: Result<Query<FormulaQuery>, QueryRejection>,
) -> Result<Json<FormulaCheck>, ApiError> {
    let Ok(Query(query)) = query else {
        return Err(ApiError::BadRequest(InvalidInput::Formula.to_string()));
    };

    let check = state
        .orchestrator
        .check_formula(query.formula.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(check))
}
