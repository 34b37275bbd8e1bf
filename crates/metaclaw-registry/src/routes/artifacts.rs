//! Artifact registration and lookup endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::error::AppError;
use crate::models::{Artifact, ArtifactKind, ListFilter, NewArtifact};
use crate::routes::AppState;

/// Query parameters accepted by the listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub kind: Option<String>,
    pub name: Option<String>,
    /// Kept as text so a malformed value falls back to the default limit.
    pub limit: Option<String>,
}

/// Response for a catalog listing.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub items: Vec<Artifact>,
    pub count: usize,
}

/// Creates the artifacts router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_artifacts).post(create_artifact))
        .route("/{kind}/{name}/{version}", get(get_artifact))
        .with_state(state)
}

/// GET /v1/artifacts?kind=&name=&limit=
async fn list_artifacts(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, AppError> {
    let kind = match query.kind.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match raw.parse::<ArtifactKind>() {
            Ok(kind) => Some(kind),
            // No entry can have an unknown kind.
            Err(_) => return Ok(Json(ListResponse { items: Vec::new(), count: 0 })),
        },
    };

    let filter = ListFilter {
        kind,
        name: query
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty()),
        limit: parse_limit(query.limit.as_deref()),
    };

    let registry = state.registry.clone();
    let items = run_blocking(move || registry.list(&filter)).await?;
    let count = items.len();
    Ok(Json(ListResponse { items, count }))
}

/// POST /v1/artifacts
///
/// Registers (or replaces) an artifact. Requires the admin bearer token when
/// one is configured.
async fn create_artifact(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<NewArtifact>, JsonRejection>,
) -> Result<(StatusCode, Json<Artifact>), AppError> {
    authorize(&state, &headers)?;

    let Json(input) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let registry = state.registry.clone();
    let stored = run_blocking(move || registry.register(input)).await??;

    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /v1/artifacts/{kind}/{name}/{version}
async fn get_artifact(
    State(state): State<AppState>,
    Path((kind, name, version)): Path<(String, String, String)>,
) -> Result<Json<Artifact>, AppError> {
    let not_found = || AppError::NotFound("artifact not found".to_string());
    let kind: ArtifactKind = kind.parse().map_err(|_| not_found())?;

    let registry = state.registry.clone();
    run_blocking(move || registry.get(kind, &name, &version))
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

/// Checks the `Authorization: Bearer <token>` header against the configured token.
fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    let Some(expected) = state.admin_token.as_deref() else {
        return Ok(());
    };

    let presented = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .and_then(|value| value.strip_prefix("Bearer "));

    match presented {
        Some(token) if bool::from(token.as_bytes().ct_eq(expected.as_bytes())) => Ok(()),
        _ => {
            tracing::warn!("rejected write with missing or invalid bearer token");
            Err(AppError::Unauthorized(
                "missing or invalid bearer token".to_string(),
            ))
        }
    }
}

/// Parses the `limit` query value; anything but a positive integer means "use the default".
fn parse_limit(raw: Option<&str>) -> Option<usize> {
    raw.map(str::trim)
        .and_then(|value| value.parse::<i64>().ok())
        .filter(|&limit| limit > 0)
        .and_then(|limit| usize::try_from(limit).ok())
}

/// Runs catalog work off the async runtime; writes may block on a full snapshot rewrite.
async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("catalog task failed: {}", e)))
}
