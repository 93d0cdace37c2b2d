use std::sync::Arc;
use std::time::Duration;

use drugscope_common::{PredictionResult, PropertyValue, RetryPolicy};
use drugscope_predict::{PredictionClient, PredictionError, UnknownPredictRequest};
use drugscope_test_utils::{aspirin_prediction, MockPredictionBackend, ASPIRIN_CID, ASPIRIN_SMILES};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::time::Instant;

fn client(backend: &Arc<MockPredictionBackend>) -> PredictionClient {
    PredictionClient::new(backend.clone(), RetryPolicy::default())
}

#[tokio::test]
async fn test_available_backend_passes_liveness() {
    let backend = Arc::new(MockPredictionBackend::new(aspirin_prediction()));

    assert!(client(&backend).ensure_available().await.is_ok());
    assert_eq!(backend.health_calls(), 1);
}

#[tokio::test]
async fn test_liveness_is_checked_once_without_retry() {
    let backend = Arc::new(MockPredictionBackend::unavailable());

    let err = client(&backend).ensure_available().await.unwrap_err();

    assert!(matches!(err, PredictionError::Unavailable(_)));
    assert_eq!(backend.health_calls(), 1);
    assert!(!client(&backend).is_available().await);
}

#[tokio::test]
async fn test_predict_sends_structure_and_cid() {
    let backend = Arc::new(MockPredictionBackend::new(aspirin_prediction()));

    let result = client(&backend).predict(ASPIRIN_SMILES, ASPIRIN_CID).await.unwrap();

    assert_eq!(result.effectiveness, Some(PropertyValue::from(85)));
    let sent = backend.predict_requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].smiles, ASPIRIN_SMILES);
    assert_eq!(sent[0].cid, ASPIRIN_CID);
}

#[tokio::test(start_paused = true)]
async fn test_predict_retries_with_linear_backoff() {
    let backend = Arc::new(MockPredictionBackend::new(aspirin_prediction()).with_failures(2));
    let start = Instant::now();

    let result = client(&backend).predict(ASPIRIN_SMILES, ASPIRIN_CID).await;

    assert!(result.is_ok());
    assert_eq!(backend.predict_requests().len(), 3);
    assert_eq!(start.elapsed(), Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_predict_returns_last_error_when_exhausted() {
    let backend = Arc::new(MockPredictionBackend::new(aspirin_prediction()).with_failures(10));

    let err = client(&backend).predict(ASPIRIN_SMILES, ASPIRIN_CID).await.unwrap_err();

    assert!(matches!(err, PredictionError::ApiError { status: 500, .. }));
    assert_eq!(backend.predict_requests().len(), 3);
}

#[tokio::test]
async fn test_incomplete_prediction_is_still_returned() {
    let partial: PredictionResult =
        serde_json::from_value(json!({ "binding_affinity": "-5.1", "drug_likeness": "Low" })).unwrap();
    let backend = Arc::new(MockPredictionBackend::new(partial));

    let result = client(&backend).predict("CCO", "702").await.unwrap();

    assert_eq!(result.missing_required(), vec!["toxicity", "effectiveness"]);
}

#[tokio::test]
async fn test_predict_unknown_sends_formula_and_receptor() {
    let reply = json!({ "toxicity": "Moderate", "docking_score": -8.4, "effectiveness": null });
    let backend = Arc::new(MockPredictionBackend::new(aspirin_prediction()).with_unknown_result(reply.clone()));

    let result = client(&backend).predict_unknown("C9H8O4", "1ABC").await.unwrap();

    assert_eq!(result, reply);
    assert_eq!(
        backend.unknown_requests(),
        vec![UnknownPredictRequest {
            chemical_formula: "C9H8O4".to_string(),
            receptor_pdb_id: "1ABC".to_string(),
        }]
    );
    assert!(backend.predict_requests().is_empty());
}
