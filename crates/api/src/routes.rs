use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use std::sync::Arc;
use strongbuy_core::domain::snapshot::{ResultsListing, StatusSummary};
use strongbuy_core::scan::Scanner;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<Scanner>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/results", get(results))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn status(State(state): State<AppState>) -> Json<StatusSummary> {
    Json(state.scanner.snapshot().await.summary())
}

async fn results(State(state): State<AppState>) -> Json<ResultsListing> {
    Json(state.scanner.snapshot().await.listing())
}

async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
