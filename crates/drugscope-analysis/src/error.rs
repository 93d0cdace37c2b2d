//! Pipeline error types.

use drugscope_db::DbError;
use drugscope_predict::PredictionError;
use drugscope_registry::{RegistryError, ResolveError};
use thiserror::Error;

/// Which request field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("Invalid drug name provided")]
    DrugName,
    #[error("Chemical formula is required")]
    Formula,
    #[error("Chemical formula and receptor PDB ID are required")]
    FormulaAndReceptor,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),

    #[error("Prediction backend unavailable: {0}")]
    BackendUnavailable(#[source] PredictionError),

    #[error("'{query}' not found in registry")]
    NotFound { query: String, suggestions: Vec<String> },

    #[error("Structure unavailable for CID {cid}: {source}")]
    RegistryInconsistency {
        cid: String,
        #[source]
        source: RegistryError,
    },

    #[error("Prediction failed: {0}")]
    PredictionFailure(#[source] PredictionError),

    #[error("Unknown-compound prediction failed: {0}")]
    UnknownPredictionFailure(#[source] PredictionError),

    #[error("Formula lookup failed: {0}")]
    FormulaCheck(#[source] RegistryError),

    #[error("History unavailable: {0}")]
    History(#[source] DbError),
}

impl From<ResolveError> for AnalysisError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NotFound { query, suggestions } => Self::NotFound { query, suggestions },
            ResolveError::Inconsistent { cid, source } => Self::RegistryInconsistency { cid, source },
        }
    }
}
