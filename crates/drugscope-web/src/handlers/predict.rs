//! Analysis endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use drugscope_analysis::{AnalysisOutcome, AnalysisReport, InvalidInput};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct PredictBody {
    #[serde(default, rename = "drugName")]
    pub drug_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UnknownBody {
    #[serde(default, rename = "chemicalFormula")]
    pub chemical_formula: Option<String>,
    #[serde(default, rename = "receptorPdbId")]
    pub receptor_pdb_id: Option<String>,
}

/// A body that can't be decoded gets the endpoint's validation message.
fn decode<T>(body: Result<Json<T>, JsonRejection>, invalid: InvalidInput) -> Result<T, ApiError> {
    body.map(|Json(body)| body).map_err(|rejection| {
        debug!(error = %rejection, "Rejected request body");
        ApiError::BadRequest(invalid.to_string())
    })
}

/// POST /api/predict: analyse a drug by name.
pub async fn predict(
    State(state): State<SharedState>,
    body: Result<Json<PredictBody>, JsonRejection>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let body = decode(body, InvalidInput::DrugName)?;
    let name = body.drug_name.unwrap_or_default();

    let report = state.orchestrator.analyze_named(&name).await?;
    Ok(Json(report))
}

/// POST /api/predict-unknown: formula + receptor straight to the backend.
pub async fn predict_unknown(
    State(state): State<SharedState>,
    body: Result<Json<UnknownBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let body = decode(body, InvalidInput::FormulaAndReceptor)?;

    let result = state
        .orchestrator
        .analyze_unknown(
            body.chemical_formula.as_deref().unwrap_or_default(),
            body.receptor_pdb_id.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(Json(result))
}

/// POST /api/analyze-formula: full report when PubChem knows the formula,
/// raw prediction otherwise.
pub async fn analyze_formula(
    State(state): State<SharedState>,
    body: Result<Json<UnknownBody>, JsonRejection>,
) -> Result<Json<AnalysisOutcome>, ApiError> {
    let body = decode(body, InvalidInput::FormulaAndReceptor)?;

    let outcome = state
        .orchestrator
        .analyze_formula(
            body.chemical_formula.as_deref().unwrap_or_default(),
            body.receptor_pdb_id.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(Json(outcome))
}
