//! Outbound forwarding client.
//!
//! A thin wrapper over a shared `reqwest::Client` that performs one
//! timeout-bounded attempt per call and hands back the raw status and
//! body. The body is never interpreted here; the gateway relays bytes.

use std::time::Duration;

use axum::http::StatusCode;
use tracing::debug;

use crate::error::GatewayError;
use crate::routes::RouteTarget;

/// Raw backend response: status plus opaque body bytes.
#[derive(Debug)]
pub struct Relayed {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

#[derive(Clone)]
pub struct ForwardClient {
    client: reqwest::Client,
}

impl ForwardClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Forwards with the validated pairs as a query string.
    pub async fn forward_query(
        &self,
        target: &RouteTarget,
        pairs: &[(&'static str, String)],
    ) -> Result<Relayed, GatewayError> {
        let request = self
            .client
            .request(target.method.clone(), &target.url)
            .query(&pairs);
        self.execute(target, request).await
    }

    /// Forwards with the validated pairs as a form-encoded body.
    pub async fn forward_form(
        &self,
        target: &RouteTarget,
        pairs: &[(&'static str, String)],
    ) -> Result<Relayed, GatewayError> {
        let request = self
            .client
            .request(target.method.clone(), &target.url)
            .form(&pairs);
        self.execute(target, request).await
    }

    async fn execute(
        &self,
        target: &RouteTarget,
        request: reqwest::RequestBuilder,
    ) -> Result<Relayed, GatewayError> {
        debug!(method = %target.method, url = %target.url, "Forwarding request");

        // One attempt, no automatic retry; any failure becomes a
        // 502-class error the caller may retry.
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Upstream(format!("request to {} timed out", target.url))
            } else if e.is_connect() {
                GatewayError::Upstream(format!("failed to connect to {}: {e}", target.url))
            } else {
                GatewayError::Upstream(format!("request to {} failed: {e}", target.url))
            }
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            GatewayError::Upstream(format!(
                "failed to read response body from {}: {e}",
                target.url
            ))
        })?;

        debug!(status = %status, bytes = body.len(), "Backend responded");

        Ok(Relayed {
            status,
            body: body.to_vec(),
        })
    }
}
