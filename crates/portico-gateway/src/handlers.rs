//! Public route handlers.
//!
//! Each handler walks the same straight line: validate the untrusted
//! input, resolve the backend route, forward, relay. A validation
//! failure short-circuits to a 400 envelope without any backend
//! contact; a transport failure surfaces as a 502 envelope.

use std::collections::HashMap;

use axum::{
    body::Body,
    extract::{Query, State, rejection::JsonRejection},
    http::header,
    response::Response,
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::error::GatewayError;
use crate::forward::Relayed;
use crate::server::AppState;
use crate::validate;

/// GET /public-api/ping
///
/// Liveness probe; bypasses the validate/forward pipeline entirely.
pub async fn ping() -> &'static str {
    "pong!"
}

/// GET /public-api/listings
pub async fn search_listings(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, GatewayError> {
    let pairs = validate::listings_query(&params).map_err(GatewayError::Rejected)?;
    let target = state.routes.resolve("listings.search")?;

    info!(url = %target.url, "Forwarding listings search");
    let relayed = state.client.forward_query(target, &pairs).await?;
    relay(relayed)
}

/// POST /public-api/listings
///
/// Public JSON in, form-encoded create against the listings backend.
pub async fn create_listing(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(body) = payload.map_err(|e| GatewayError::BadBody(e.body_text()))?;
    let pairs = validate::listing_form(&body).map_err(GatewayError::Rejected)?;
    let target = state.routes.resolve("listings.create")?;

    info!(url = %target.url, "Forwarding listing create");
    let relayed = state.client.forward_form(target, &pairs).await?;
    relay(relayed)
}

/// POST /public-api/users
///
/// Public JSON in, form-encoded create against the users backend.
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(body) = payload.map_err(|e| GatewayError::BadBody(e.body_text()))?;
    let pairs = validate::user_form(&body).map_err(GatewayError::Rejected)?;
    let target = state.routes.resolve("users.create")?;

    info!(url = %target.url, "Forwarding user create");
    let relayed = state.client.forward_form(target, &pairs).await?;
    relay(relayed)
}

/// Copies the backend status and body through unmodified. The backend
/// speaks JSON, so the content type is pinned here; application-level
/// errors in the body (`"result": false`) are relayed, not rewritten.
fn relay(relayed: Relayed) -> Result<Response, GatewayError> {
    Response::builder()
        .status(relayed.status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(relayed.body))
        .map_err(|e| GatewayError::Internal(format!("failed to build response: {e}")))
}
