//! API routes for the MetaClaw registry.

pub mod artifacts;

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tower_http::trace::TraceLayer;

use crate::service::Registry;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub registry: Registry,
    /// Bearer token required for writes; `None` disables the check.
    pub admin_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(registry: Registry, admin_token: Option<String>) -> Self {
        let admin_token = admin_token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .map(Arc::from);
        Self {
            registry,
            admin_token,
        }
    }
}

/// Creates the main API router with all routes mounted.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .nest("/v1/artifacts", artifacts::router(state))
        .layer(TraceLayer::new_for_http())
}

/// GET /healthz
async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
