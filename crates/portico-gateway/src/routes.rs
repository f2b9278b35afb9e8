//! Static backend route table.
//!
//! Maps a logical operation name to the backend URL and method it
//! forwards to. The table is built once from configuration at startup
//! and never changes; a dynamic service-discovery resolver could
//! replace `from_config` without touching any handler.

use std::collections::HashMap;

use axum::http::Method;

use crate::config::BackendsConfig;
use crate::error::GatewayError;

/// Where one logical operation is forwarded.
#[derive(Debug, Clone)]
pub struct RouteTarget {
    pub method: Method,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: HashMap<&'static str, RouteTarget>,
}

impl RouteTable {
    /// Builds the table from static configuration. Fails on a
    /// malformed backend URL; callers treat that as fatal at startup.
    pub fn from_config(cfg: &BackendsConfig) -> Result<Self, GatewayError> {
        let listings = normalize_base(&cfg.listings, "listings")?;
        let users = normalize_base(&cfg.users, "users")?;

        let mut routes = HashMap::new();
        routes.insert(
            "listings.search",
            RouteTarget {
                method: Method::GET,
                url: format!("{listings}/listings"),
            },
        );
        routes.insert(
            "listings.create",
            RouteTarget {
                method: Method::POST,
                url: format!("{listings}/listings"),
            },
        );
        routes.insert(
            "users.create",
            RouteTarget {
                method: Method::POST,
                url: format!("{users}/users"),
            },
        );

        tracing::debug!(count = routes.len(), "Backend route table built");
        Ok(Self { routes })
    }

    /// Looks up the forwarding target for a logical operation.
    pub fn resolve(&self, name: &str) -> Result<&RouteTarget, GatewayError> {
        self.routes
            .get(name)
            .ok_or_else(|| GatewayError::UnknownRoute(name.to_string()))
    }
}

fn normalize_base(url: &str, name: &str) -> Result<String, GatewayError> {
    let trimmed = url.trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(GatewayError::InvalidConfig(format!(
            "backends.{name} must not be empty"
        )));
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(GatewayError::InvalidConfig(format!(
            "backends.{name} must be an http(s) URL, got '{url}'"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendsConfig;

    #[test]
    fn resolves_registered_routes() {
        let table = RouteTable::from_config(&BackendsConfig::default()).unwrap();
        let search = table.resolve("listings.search").unwrap();
        assert_eq!(search.method, Method::GET);
        assert_eq!(search.url, "http://localhost:6001/listings");
        let create = table.resolve("users.create").unwrap();
        assert_eq!(create.method, Method::POST);
        assert_eq!(create.url, "http://localhost:6002/users");
    }

    #[test]
    fn unknown_route_is_an_error() {
        let table = RouteTable::from_config(&BackendsConfig::default()).unwrap();
        assert!(matches!(
            table.resolve("invoices.search"),
            Err(GatewayError::UnknownRoute(_))
        ));
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let cfg = BackendsConfig {
            listings: "http://listings:8080/".into(),
            users: "http://users:8080".into(),
        };
        let table = RouteTable::from_config(&cfg).unwrap();
        assert_eq!(
            table.resolve("listings.search").unwrap().url,
            "http://listings:8080/listings"
        );
    }

    #[test]
    fn malformed_backend_url_fails_at_build() {
        let cfg = BackendsConfig {
            listings: "listings:8080".into(),
            users: "http://users:8080".into(),
        };
        assert!(matches!(
            RouteTable::from_config(&cfg),
            Err(GatewayError::InvalidConfig(_))
        ));
    }
}
