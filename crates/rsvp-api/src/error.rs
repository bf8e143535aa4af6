use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, error};

use rsvp_types::api::ErrorResponse;
use rsvp_types::validate::ValidationErrors;

/// The only two failures a caller can observe.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The payload broke the schema. Field detail goes back to the caller.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Anything else. Logged in full, reported generically.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(ValidationErrors::root(rejection.body_text()))
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(anyhow::anyhow!("spawn_blocking join error: {}", e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(details) => {
                debug!("Rejected payload ({} violation(s)): {}", details.len(), details);
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::with_details("Validation error", details)),
                )
                    .into_response()
            }
            ApiError::Internal(e) => {
                error!("Internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Internal server error")),
                )
                    .into_response()
            }
        }
    }
}

/// Run blocking DB work off the async runtime.
pub async fn run_blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}
