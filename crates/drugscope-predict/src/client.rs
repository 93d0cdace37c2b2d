use std::sync::Arc;

use drugscope_common::{PredictionResult, PropertyValue, RetryPolicy};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::backend::{PredictRequest, PredictionBackend, UnknownPredictRequest};
use crate::PredictionError;

/// Liveness gate plus retried calls against a [`PredictionBackend`].
#[derive(Clone)]
pub struct PredictionClient {
    backend: Arc<dyn PredictionBackend>,
    retry: RetryPolicy,
}

impl PredictionClient {
    pub fn new(backend: Arc<dyn PredictionBackend>, retry: RetryPolicy) -> Self {
        Self { backend, retry }
    }

    pub fn backend_url(&self) -> &str {
        self.backend.base_url()
    }

    /// Single liveness probe, not retried.
    pub async fn ensure_available(&self) -> Result<(), PredictionError> {
        match self.backend.health().await {
            Ok(status) => {
                info!(url = self.backend.base_url(), status = %status, "Prediction backend is available");
                Ok(())
            }
            Err(e) => {
                error!(url = self.backend.base_url(), error = %e, "Prediction backend is not available");
                Err(match e {
                    PredictionError::Unavailable(_) => e,
                    other => PredictionError::Unavailable(other.to_string()),
                })
            }
        }
    }

    pub async fn is_available(&self) -> bool {
        self.ensure_available().await.is_ok()
    }

    /// Predict properties for a resolved compound.
    pub async fn predict(&self, smiles: &str, cid: &str) -> Result<PredictionResult, PredictionError> {
        let req = PredictRequest { smiles: smiles.to_string(), cid: cid.to_string() };
        let backend = &self.backend;
        let result = self.retry.run("predict", || backend.predict(&req)).await?;
        warn_if_incomplete(&result, cid);
        Ok(result)
    }

    /// Predict properties for a compound known only by formula. The
    /// backend's reply is returned as-is.
    pub async fn predict_unknown(
        &self,
        chemical_formula: &str,
        receptor_pdb_id: &str,
    ) -> Result<Value, PredictionError> {
        let req = UnknownPredictRequest {
            chemical_formula: chemical_formula.to_string(),
            receptor_pdb_id: receptor_pdb_id.to_string(),
        };
        let backend = &self.backend;
        let result = self.retry.run("predict_unknown", || backend.predict_unknown(&req)).await?;
        warn_missing(&missing_in_raw(&result), chemical_formula);
        Ok(result)
    }
}

/// Required properties absent from a raw reply, judged the same way the
/// named path decodes them.
fn missing_in_raw(raw: &Value) -> Vec<&'static str> {
    PredictionResult::REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| raw.get(*field).cloned().and_then(PropertyValue::from_json).is_none())
        .collect()
}

fn warn_if_incomplete(result: &PredictionResult, subject: &str) {
    warn_missing(&result.missing_required(), subject);
}

/// A prediction missing required properties is still used.
fn warn_missing(missing: &[&'static str], subject: &str) {
    if !missing.is_empty() {
        warn!(subject = subject, missing = ?missing, "Prediction is missing required fields");
    }
}
