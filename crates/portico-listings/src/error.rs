use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use portico_core::envelope;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Caller-supplied parameters failed validation; all messages are
    /// reported together.
    #[error("request validation failed")]
    Invalid(Vec<String>),

    #[error("{0}")]
    Internal(String),

    #[error("storage error")]
    Storage(#[from] sqlx::Error),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match self {
            Self::Invalid(errors) => {
                (StatusCode::BAD_REQUEST, Json(envelope::fail(errors))).into_response()
            }
            Self::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(envelope::fail([msg])),
            )
                .into_response(),
            Self::Storage(e) => {
                tracing::error!(error = %e, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(envelope::fail(["storage error"])),
                )
                    .into_response()
            }
        }
    }
}
