//! Axum router: maps all URL paths to handlers.

use std::any::Any;
use std::sync::Arc;

use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::error;

use crate::error::{ApiError, MSG_UNEXPECTED};
use crate::handlers::{
    formula::check_pubchem_formula,
    history::history,
    predict::{analyze_formula, predict, predict_unknown},
    system::health,
};
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        .route("/api/predict",               post(predict))
        .route("/api/predict-unknown",       post(predict_unknown))
        .route("/api/analyze-formula",       post(analyze_formula))
        .route("/api/check-pubchem-formula", get(check_pubchem_formula))
        .route("/api/history",               get(history))
        .route("/api/health",                get(health))
        .fallback(no_route)
        .method_not_allowed_fallback(method_not_allowed)

        // Middleware
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

async fn no_route() -> ApiError {
    ApiError::NoRoute
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = detail, "Handler panicked");

    ApiError::Internal(MSG_UNEXPECTED).into_response()
}
