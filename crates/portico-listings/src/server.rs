use std::net::SocketAddr;

use axum::{Router, routing::get};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

use crate::{config::ServiceConfig, db, handlers};

pub fn build_app(pool: SqlitePool) -> Router {
    Router::new()
        .route("/listings/ping", get(handlers::ping))
        .route(
            "/listings",
            get(handlers::list_listings).post(handlers::create_listing),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(pool)
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: ServiceConfig,
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = ServiceConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    pub fn with_config(mut self, cfg: ServiceConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub async fn build(self) -> anyhow::Result<ListingsServer> {
        let pool = db::connect(&self.config.storage).await?;
        Ok(ListingsServer {
            addr: self.addr,
            app: build_app(pool),
        })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ListingsServer {
    addr: SocketAddr,
    app: Router,
}

impl ListingsServer {
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
