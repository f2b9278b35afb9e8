pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod server;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use server::{ServerBuilder, UsersServer, build_app};
