pub mod config;
pub mod error;
pub mod forward;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod routes;
pub mod server;
pub mod validate;

pub use config::{AppConfig, BackendsConfig, ServerConfig, UpstreamConfig};
pub use error::GatewayError;
pub use forward::{ForwardClient, Relayed};
pub use observability::{init_tracing, init_tracing_with_level};
pub use routes::{RouteTable, RouteTarget};
pub use server::{AppState, GatewayServer, ServerBuilder, build_app};
