//! Prediction backend trait and its HTTP implementation.
//!
//! The backend is an external service exposing three routes:
//!   GET  /                 liveness, answers `{"message": "..."}`
//!   POST /predict          `{smiles, cid}` -> property map
//!   POST /predict-unknown  `{chemical_formula, receptor_pdb_id}` -> property map
//!
//! The `/predict` reply is decoded into a [`PredictionResult`]. The
//! `/predict-unknown` reply is returned as the backend sent it.
//!
//! Error bodies follow the FastAPI convention (`{"detail": ...}`); a plain
//! `{"message": ...}` is accepted as well.

use async_trait::async_trait;
use drugscope_common::{PredictionResult, SandboxClient};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::PredictionError;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

// ── Request bodies ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub smiles: String,
    pub cid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownPredictRequest {
    pub chemical_formula: String,
    pub receptor_pdb_id: String,
}

// ── Trait ─────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait PredictionBackend: Send + Sync {
    /// Liveness probe. Returns the status message the backend reports.
    async fn health(&self) -> Result<String, PredictionError>;
    async fn predict(&self, req: &PredictRequest) -> Result<PredictionResult, PredictionError>;
    /// The reply is passed through untouched.
    async fn predict_unknown(&self, req: &UnknownPredictRequest) -> Result<Value, PredictionError>;
    fn base_url(&self) -> &str;
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Extract a human-readable message from an error body.
fn error_message(body: &Value, raw: &str) -> String {
    match &body["detail"] {
        Value::String(s) => return s.clone(),
        Value::Null => {}
        // Validation errors arrive as a list of objects
        other => return other.to_string(),
    }
    body["message"]
        .as_str()
        .map(String::from)
        .unwrap_or_else(|| if raw.trim().is_empty() { "unknown API error".to_string() } else { raw.trim().to_string() })
}

async fn check_response_status(resp: reqwest::Response) -> Result<Value, PredictionError> {
    let status = resp.status().as_u16();
    let raw = resp.text().await?;
    if status >= 400 {
        let body: Value = serde_json::from_str(&raw).unwrap_or(Value::Null);
        return Err(PredictionError::ApiError { status, message: error_message(&body, &raw) });
    }
    Ok(serde_json::from_str(&raw)?)
}

// ── HTTP backend ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct HttpPredictionBackend {
    base_url: String,
    client: SandboxClient,
}

impl HttpPredictionBackend {
    /// The backend host is added to the client's allowlist.
    pub fn new(base_url: impl Into<String>, client: SandboxClient) -> Result<Self, PredictionError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = client.with_base_url(&base_url)?;
        Ok(Self { base_url, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<Value, PredictionError> {
        let resp = self.client.post(&self.url(path))?.json(body).send().await?;
        check_response_status(resp).await
    }
}

#[async_trait]
impl PredictionBackend for HttpPredictionBackend {
    async fn health(&self) -> Result<String, PredictionError> {
        let resp = self
            .client
            .get(&self.url("/"))?
            .send()
            .await
            .map_err(|e| PredictionError::Unavailable(e.to_string()))?;
        let json = check_response_status(resp).await?;
        Ok(json["message"].as_str().unwrap_or("ok").to_string())
    }

    #[instrument(skip(self), fields(cid = %req.cid))]
    async fn predict(&self, req: &PredictRequest) -> Result<PredictionResult, PredictionError> {
        debug!(smiles = %req.smiles, "Calling prediction backend");
        let json = self.post_json("/predict", req).await?;
        Ok(serde_json::from_value(json)?)
    }

    #[instrument(skip(self), fields(formula = %req.chemical_formula, receptor = %req.receptor_pdb_id))]
    async fn predict_unknown(&self, req: &UnknownPredictRequest) -> Result<Value, PredictionError> {
        debug!("Calling prediction backend for unknown compound");
        self.post_json("/predict-unknown", req).await
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_bodies_use_backend_field_names() {
        let body = serde_json::to_value(UnknownPredictRequest {
            chemical_formula: "C9H8O4".into(),
            receptor_pdb_id: "1ABC".into(),
        })
        .unwrap();
        assert_eq!(body, json!({ "chemical_formula": "C9H8O4", "receptor_pdb_id": "1ABC" }));

        let body = serde_json::to_value(PredictRequest { smiles: "CCO".into(), cid: "702".into() }).unwrap();
        assert_eq!(body, json!({ "smiles": "CCO", "cid": "702" }));
    }

    #[test]
    fn test_error_message_prefers_detail() {
        let body = json!({ "detail": "Model not loaded", "message": "ignored" });
        assert_eq!(error_message(&body, ""), "Model not loaded");
        assert_eq!(error_message(&json!({ "message": "boom" }), ""), "boom");
        assert_eq!(error_message(&Value::Null, "Internal Server Error"), "Internal Server Error");
        assert_eq!(error_message(&Value::Null, "  "), "unknown API error");
    }

    #[test]
    fn test_error_message_from_validation_list() {
        let body = json!({ "detail": [{ "loc": ["body", "smiles"], "msg": "field required" }] });
        assert!(error_message(&body, "").contains("field required"));
    }

    #[test]
    fn test_base_url_is_allowlisted_and_trimmed() {
        let backend = HttpPredictionBackend::new(
            "http://ai-service:8000/",
            SandboxClient::new(SandboxClient::DEFAULT_TIMEOUT).unwrap(),
        )
        .unwrap();
        assert_eq!(backend.base_url(), "http://ai-service:8000");
        assert_eq!(backend.url("/predict"), "http://ai-service:8000/predict");
    }
}
