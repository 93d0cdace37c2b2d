//! Server and prediction backend health.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub prediction_backend: &'static str,
}

/// GET /api/health: always 200; reports whether the backend answers its probe.
pub async fn health(State(state): State<SharedState>) -> Json<Health> {
    let available = state.orchestrator.backend_available().await;
    Json(Health {
        status: "ok",
        prediction_backend: if available { "available" } else { "unavailable" },
    })
}
