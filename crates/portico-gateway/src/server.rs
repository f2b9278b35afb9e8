use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::AppConfig, error::GatewayError, forward::ForwardClient, handlers,
    middleware as app_middleware, routes::RouteTable,
};

/// Per-process gateway state. Read-only after startup; requests share
/// it without synchronization.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub client: ForwardClient,
}

pub fn build_app(cfg: &AppConfig) -> Result<Router, GatewayError> {
    let state = AppState {
        routes: Arc::new(RouteTable::from_config(&cfg.backends)?),
        client: ForwardClient::new(cfg.upstream.timeout()),
    };

    Ok(Router::new()
        .route("/public-api/ping", get(handlers::ping))
        .route(
            "/public-api/listings",
            get(handlers::search_listings).post(handlers::create_listing),
        )
        .route("/public-api/users", post(handlers::create_user))
        .layer(middleware::from_fn(app_middleware::request_id))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub fn build(self) -> Result<GatewayServer, GatewayError> {
        let app = build_app(&self.config)?;
        Ok(GatewayServer {
            addr: self.addr,
            app,
        })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct GatewayServer {
    addr: SocketAddr,
    app: Router,
}

impl GatewayServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
