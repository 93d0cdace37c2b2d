//! API error type and its JSON rendering.
//!
//! Every failure is returned as `{"error": "..."}`, plus `suggestions` for
//! names PubChem doesn't know. Internal detail goes to the log only.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use drugscope_analysis::AnalysisError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

pub const MSG_UNAVAILABLE: &str = "AI Service is not available. Please try again later.";
pub const MSG_NOT_FOUND: &str = "Drug not found in PubChem database. Please try:";
pub const MSG_STRUCTURE: &str = "Failed to retrieve molecular structure (SMILES) from PubChem";
pub const MSG_PREDICTION: &str = "Failed to analyze drug properties. Please try again later.";
pub const MSG_UNKNOWN_PREDICTION: &str = "Failed to analyze unknown drug. Please try again later.";
pub const MSG_FORMULA_CHECK: &str = "Failed to check formula in PubChem";
pub const MSG_HISTORY: &str = "Failed to retrieve analysis history";
pub const MSG_UNEXPECTED: &str = "An unexpected error occurred. Please try again later.";
pub const MSG_NO_ROUTE: &str = "Endpoint not found";
pub const MSG_METHOD: &str = "Method not allowed";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Prediction backend down (503)
    #[error("{}", MSG_UNAVAILABLE)]
    ServiceUnavailable,

    /// Name not in PubChem (404)
    #[error("{}", MSG_NOT_FOUND)]
    NotFound { suggestions: Vec<String> },

    /// No route for the path (404)
    #[error("{}", MSG_NO_ROUTE)]
    NoRoute,

    /// Route exists, method doesn't (405)
    #[error("{}", MSG_METHOD)]
    MethodNotAllowed,

    /// Internal server error (500); the message is caller-safe
    #[error("{0}")]
    Internal(&'static str),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestions: Option<&'a [String]>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::NotFound { .. } | ApiError::NoRoute => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let suggestions = match &self {
            ApiError::NotFound { suggestions } => Some(suggestions.as_slice()),
            _ => None,
        };
        let body = ErrorBody { error: self.to_string(), suggestions };

        (status, Json(body)).into_response()
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::InvalidInput(invalid) => ApiError::BadRequest(invalid.to_string()),
            AnalysisError::BackendUnavailable(e) => {
                warn!(error = %e, "Rejecting request, prediction backend unavailable");
                ApiError::ServiceUnavailable
            }
            AnalysisError::NotFound { query, suggestions } => {
                warn!(query = %query, "Drug not found in PubChem");
                ApiError::NotFound { suggestions }
            }
            AnalysisError::RegistryInconsistency { cid, source } => {
                error!(cid = %cid, error = %source, "SMILES fetch failed for resolved CID");
                ApiError::Internal(MSG_STRUCTURE)
            }
            AnalysisError::PredictionFailure(e) => {
                error!(error = %e, "Prediction failed");
                ApiError::Internal(MSG_PREDICTION)
            }
            AnalysisError::UnknownPredictionFailure(e) => {
                error!(error = %e, "Unknown-compound prediction failed");
                ApiError::Internal(MSG_UNKNOWN_PREDICTION)
            }
            AnalysisError::FormulaCheck(e) => {
                error!(error = %e, "PubChem formula check failed");
                ApiError::Internal(MSG_FORMULA_CHECK)
            }
            AnalysisError::History(e) => {
                error!(error = %e, "Failed to list history");
                ApiError::Internal(MSG_HISTORY)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drugscope_analysis::InvalidInput;

    #[test]
    fn test_invalid_input_keeps_field_message() {
        let err: ApiError = AnalysisError::InvalidInput(InvalidInput::FormulaAndReceptor).into();
        assert_eq!(err.to_string(), "Chemical formula and receptor PDB ID are required");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_is_404() {
        let err = ApiError::NotFound { suggestions: vec!["Check the spelling of the drug name".into()] };
        assert_eq!(err.to_string(), MSG_NOT_FOUND);
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
