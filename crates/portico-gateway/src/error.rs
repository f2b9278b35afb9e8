//! Gateway error types and their wire mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use portico_core::envelope;

/// Everything that can go wrong between receiving a public request and
/// relaying a backend response.
///
/// Each variant renders as a `{"result": false, "errors": [..]}`
/// envelope; there is no failure path that produces an empty body.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// One or more caller-supplied parameters failed validation.
    /// The request was rejected before any backend contact.
    #[error("request validation failed")]
    Rejected(Vec<String>),

    /// The request body could not be parsed at all.
    #[error("invalid request body: {0}")]
    BadBody(String),

    /// A logical resource with no registered backend route. With the
    /// static table this means broken configuration, not caller error.
    #[error("no backend route registered for '{0}'")]
    UnknownRoute(String),

    /// Invalid backend configuration discovered while building the
    /// route table.
    #[error("invalid gateway configuration: {0}")]
    InvalidConfig(String),

    /// The backend could not be reached, timed out, or its response
    /// could not be read. Attempted exactly once; the caller may retry.
    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Rejected(_) | Self::BadBody(_) => StatusCode::BAD_REQUEST,
            Self::UnknownRoute(_) | Self::InvalidConfig(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        };

        let errors = match self {
            Self::Rejected(errors) => errors,
            Self::BadBody(msg) => vec![msg],
            other => vec![other.to_string()],
        };

        (status, Json(envelope::fail(errors))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn rejected_maps_to_400() {
        let res = GatewayError::Rejected(vec!["invalid page_num".into()]).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_maps_to_502() {
        let res = GatewayError::Upstream("connection refused".into()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn unknown_route_maps_to_500() {
        let res = GatewayError::UnknownRoute("invoices".into()).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
