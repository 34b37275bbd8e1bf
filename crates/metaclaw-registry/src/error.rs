//! Error types for the MetaClaw registry.

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use metaclaw_crypto::VerifyError;

/// A structurally invalid artifact submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid kind: {0}")]
    InvalidKind(String),

    #[error("name is required")]
    MissingName,

    #[error("version is required")]
    MissingVersion,

    #[error("ociRef is required")]
    MissingReference,

    #[error("digest must be sha256:<64 hex>")]
    InvalidDigest,
}

/// Failure to load or persist the catalog snapshot.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read catalog snapshot {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse catalog snapshot {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write catalog snapshot {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode catalog snapshot: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Error returned by the admission service.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Signature(#[from] VerifyError),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl RegistryError {
    /// True for errors caused by the submitted artifact rather than the environment.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RegistryError::Validation(_) | RegistryError::Signature(_)
        )
    }
}

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        if err.is_client_error() {
            AppError::BadRequest(err.to_string())
        } else {
            AppError::Internal(err.to_string())
        }
    }
}

fn error_body(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(msg) => error_body(StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => error_body(StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => error_body(StatusCode::UNAUTHORIZED, msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                error_body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        }
    }
}
