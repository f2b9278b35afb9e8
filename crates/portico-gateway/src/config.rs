use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Outbound call policy (timeout per forwarded request).
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Backend base URLs, one per logical resource.
    #[serde(default)]
    pub backends: BackendsConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        if self.upstream.timeout_ms == 0 {
            return Err("upstream.timeout_ms must be > 0".into());
        }
        self.backends.validate()?;
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    6000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Per-call timeout for forwarded requests. A hung backend turns
    /// into a 502 after this long instead of stalling the caller.
    #[serde(default = "default_upstream_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_upstream_timeout_ms() -> u64 {
    10_000
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_upstream_timeout_ms(),
        }
    }
}

/// Base URLs of the resource services.
///
/// Static configuration stands in for service discovery here; the
/// route table built from this is immutable for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendsConfig {
    #[serde(default = "default_listings_url")]
    pub listings: String,
    #[serde(default = "default_users_url")]
    pub users: String,
}

fn default_listings_url() -> String {
    "http://localhost:6001".into()
}
fn default_users_url() -> String {
    "http://localhost:6002".into()
}

impl BackendsConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (name, url) in [("listings", &self.listings), ("users", &self.users)] {
            if url.is_empty() {
                return Err(format!("backends.{name} must not be empty"));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(format!("backends.{name} must be an http(s) URL"));
            }
        }
        Ok(())
    }
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            listings: default_listings_url(),
            users: default_users_url(),
        }
    }
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        match path {
            Some(p) => {
                let pathbuf = PathBuf::from(p);
                if pathbuf.exists() {
                    builder = builder.add_source(File::from(pathbuf));
                }
            }
            None => {
                let default_path = PathBuf::from("portico.toml");
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }
        // Environment variable overrides, e.g. PORTICO__SERVER__PORT=9090
        builder = builder.add_source(
            Environment::with_prefix("PORTICO")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}
