use std::{env, net::SocketAddr, path::PathBuf};

pub const DEFAULT_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_ROUTE_FILE: &str = "data/route.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid MOCK_ROUTE_ADDR {value:?}: {source}")]
    InvalidAddr {
        value: String,
        source: std::net::AddrParseError,
    },
}

/// Server settings read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// `MOCK_ROUTE_ADDR`
    pub addr: SocketAddr,
    /// `ROUTE_FILE`, where the last generated route is persisted
    pub route_file: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr_value = lookup("MOCK_ROUTE_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_value
            .parse()
            .map_err(|source| ConfigError::InvalidAddr {
                value: addr_value.clone(),
                source,
            })?;

        let route_file = lookup("ROUTE_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROUTE_FILE));

        Ok(Self { addr, route_file })
    }
}
