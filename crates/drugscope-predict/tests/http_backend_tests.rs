//! `HttpPredictionBackend` against a local stub service.

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use drugscope_common::{PropertyValue, SandboxClient};
use drugscope_predict::{HttpPredictionBackend, PredictRequest, PredictionBackend, PredictionError, UnknownPredictRequest};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn backend(url: &str) -> HttpPredictionBackend {
    HttpPredictionBackend::new(url, SandboxClient::new(SandboxClient::DEFAULT_TIMEOUT).unwrap()).unwrap()
}

fn stub() -> Router {
    Router::new()
        .route("/", get(|| async { Json(json!({ "message": "AI Service is running" })) }))
        .route(
            "/predict",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "binding_affinity": "-7.2 kcal/mol",
                    "toxicity": "Low",
                    "drug_likeness": "High",
                    "effectiveness": 85,
                    "inchikey": "BSYNRYMUTXBXSQ-UHFFFAOYSA-N",
                    "echo_cid": body["cid"],
                }))
            }),
        )
        .route(
            "/predict-unknown",
            post(|Json(body): Json<Value>| async move {
                if body["receptor_pdb_id"] == "XXXX" {
                    return Err((StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": "Unknown receptor" }))));
                }
                if body["receptor_pdb_id"] == "0NUL" {
                    return Ok(Json(json!({
                        "binding_affinity": { "display": "N/A", "score": null },
                        "effectiveness": null,
                        "toxicity": "",
                        "xlogp": "2.45"
                    })));
                }
                Ok(Json(json!({ "toxicity": "Moderate", "formula": body["chemical_formula"] })))
            }),
        )
}

#[tokio::test]
async fn test_health_reports_backend_message() {
    let url = spawn(stub()).await;
    assert_eq!(backend(&url).health().await.unwrap(), "AI Service is running");
}

#[tokio::test]
async fn test_health_on_closed_port_is_unavailable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    assert!(matches!(backend(&url).health().await, Err(PredictionError::Unavailable(_))));
}

#[tokio::test]
async fn test_predict_decodes_properties() {
    let url = spawn(stub()).await;
    let req = PredictRequest { smiles: "CC(=O)OC1=CC=CC=C1C(=O)O".into(), cid: "2244".into() };

    let result = backend(&url).predict(&req).await.unwrap();

    assert_eq!(result.effectiveness, Some(PropertyValue::from(85)));
    assert_eq!(result.inchikey.as_deref(), Some("BSYNRYMUTXBXSQ-UHFFFAOYSA-N"));
    assert_eq!(result.extra.get("echo_cid"), Some(&json!("2244")));
}

#[tokio::test]
async fn test_predict_unknown_error_detail_is_surfaced() {
    let url = spawn(stub()).await;
    let b = backend(&url);

    let ok = b
        .predict_unknown(&UnknownPredictRequest { chemical_formula: "C9H8O4".into(), receptor_pdb_id: "1ABC".into() })
        .await
        .unwrap();
    assert_eq!(ok, json!({ "toxicity": "Moderate", "formula": "C9H8O4" }));

    let err = b
        .predict_unknown(&UnknownPredictRequest { chemical_formula: "C9H8O4".into(), receptor_pdb_id: "XXXX".into() })
        .await
        .unwrap_err();
    match err {
        PredictionError::ApiError { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "Unknown receptor");
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_predict_unknown_reply_is_not_reshaped() {
    let url = spawn(stub()).await;

    let reply = backend(&url)
        .predict_unknown(&UnknownPredictRequest { chemical_formula: "C6H6".into(), receptor_pdb_id: "0NUL".into() })
        .await
        .unwrap();

    assert_eq!(
        reply,
        json!({
            "binding_affinity": { "display": "N/A", "score": null },
            "effectiveness": null,
            "toxicity": "",
            "xlogp": "2.45"
        })
    );
}
