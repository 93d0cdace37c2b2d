//! `PubChemClient` against a local stub of PUG-REST.

use std::sync::Arc;

use axum::extract::{Path, RawQuery};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use drugscope_common::{RetryPolicy, SandboxClient};
use drugscope_registry::{NameMatch, PubChemClient, Registry, RegistryError, RegistryResolver};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

type Reply = (StatusCode, Json<Value>);

fn cids(ids: &[u64]) -> Reply {
    (StatusCode::OK, Json(json!({ "IdentifierList": { "CID": ids } })))
}

fn not_found() -> Reply {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "Fault": { "Code": "PUGREST.NotFound", "Message": "No CID found" } })),
    )
}

fn property(cid: u64, name: &str, value: &str) -> Reply {
    let mut props = serde_json::Map::new();
    props.insert("CID".to_string(), json!(cid));
    props.insert(name.to_string(), json!(value));
    (StatusCode::OK, Json(json!({ "PropertyTable": { "Properties": [props] } })))
}

async fn by_name(Path(name): Path<String>, RawQuery(query): RawQuery) -> Reply {
    match (name.as_str(), query.as_deref()) {
        ("aspirin", None) => cids(&[2244]),
        ("aspirin", Some("name_type=word")) => cids(&[2244, 517180]),
        ("busy", _) => (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "Fault": { "Code": "PUGREST.ServerBusy" } }))),
        _ => not_found(),
    }
}

async fn by_formula(Path(formula): Path<String>) -> Reply {
    match formula.as_str() {
        "C9H8O4" => cids(&[2244, 5161]),
        _ => not_found(),
    }
}

async fn by_property(Path((cid, prop)): Path<(String, String)>) -> Reply {
    match (cid.as_str(), prop.as_str()) {
        ("2244", "CanonicalSMILES") => property(2244, "ConnectivitySMILES", "CC(=O)OC1=CC=CC=C1C(=O)O"),
        ("702", "CanonicalSMILES") => property(702, "SMILES", "CCO"),
        ("1", "CanonicalSMILES") => (StatusCode::OK, Json(json!({ "PropertyTable": { "Properties": [{ "CID": 1 }] } }))),
        ("2244", "IUPACName") => property(2244, "IUPACName", "2-acetyloxybenzoic acid"),
        _ => not_found(),
    }
}

fn stub() -> Router {
    Router::new()
        .route("/compound/name/{name}/cids/JSON", get(by_name))
        .route("/compound/fastformula/{formula}/cids/JSON", get(by_formula))
        .route("/compound/cid/{cid}/property/{property}/JSON", get(by_property))
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn pubchem() -> PubChemClient {
    let url = spawn(stub()).await;
    let client = SandboxClient::new(SandboxClient::DEFAULT_TIMEOUT)
        .unwrap()
        .with_base_url(&url)
        .unwrap();
    PubChemClient::with_base_url(client, url)
}

#[tokio::test]
async fn test_name_lookup_returns_cids() {
    let client = pubchem().await;
    assert_eq!(client.find_cids_by_name("aspirin", NameMatch::Exact).await.unwrap(), vec!["2244"]);
}

#[tokio::test]
async fn test_word_search_sends_name_type_query() {
    let client = pubchem().await;
    assert_eq!(
        client.find_cids_by_name("aspirin", NameMatch::Word).await.unwrap(),
        vec!["2244", "517180"]
    );
}

#[tokio::test]
async fn test_404_means_no_match() {
    let client = pubchem().await;

    assert!(client.find_cids_by_name("notadrug", NameMatch::Exact).await.unwrap().is_empty());
    assert!(client.find_cids_by_formula("C99H1").await.unwrap().is_empty());
    assert_eq!(client.fetch_display_name("999999").await.unwrap(), None);
}

#[tokio::test]
async fn test_other_error_status_is_reported() {
    let client = pubchem().await;

    let err = client.find_cids_by_name("busy", NameMatch::Exact).await.unwrap_err();

    match err {
        RegistryError::Status { status, url } => {
            assert_eq!(status, 503);
            assert!(url.ends_with("/compound/name/busy/cids/JSON"));
        }
        other => panic!("expected Status, got {:?}", other),
    }
}

#[tokio::test]
async fn test_structure_accepts_every_smiles_property_name() {
    let client = pubchem().await;

    assert_eq!(client.fetch_structure("2244").await.unwrap(), "CC(=O)OC1=CC=CC=C1C(=O)O");
    assert_eq!(client.fetch_structure("702").await.unwrap(), "CCO");
}

#[tokio::test]
async fn test_structure_missing_is_an_error() {
    let client = pubchem().await;

    assert!(matches!(
        client.fetch_structure("1").await,
        Err(RegistryError::MissingProperty { ref cid, .. }) if cid == "1"
    ));
    assert!(matches!(
        client.fetch_structure("999999").await,
        Err(RegistryError::MissingProperty { .. })
    ));
}

#[tokio::test]
async fn test_resolver_over_http() {
    let resolver = RegistryResolver::new(
        Arc::new(pubchem().await),
        RetryPolicy::no_retry(),
    );

    // "Aspirin" misses verbatim, hits lowercase
    let found = resolver.resolve("Aspirin").await.unwrap();
    assert_eq!(found.cid, "2244");
    assert_eq!(found.smiles, "CC(=O)OC1=CC=CC=C1C(=O)O");

    let check = resolver.check_formula("C9H8O4").await.unwrap();
    assert!(check.exists);
    assert_eq!(check.cid.as_deref(), Some("2244"));
    assert_eq!(check.name.as_deref(), Some("2-acetyloxybenzoic acid"));

    assert!(!resolver.check_formula("C99H1").await.unwrap().exists);
}
