//! Node configuration, populated from environment variables.

use std::net::SocketAddr;

/// Errors raised while reading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a valid socket address (e.g. 0.0.0.0:3000), got {value:?}")]
    InvalidBind { var: &'static str, value: String },
}

/// Runtime configuration for a SocialGraph node.
///
/// All fields are populated from environment variables with sensible
/// defaults, so a node can be started with zero configuration.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `SOCIALGRAPH_BIND` | `0.0.0.0:3000` | TCP socket address to listen on |
/// | `SOCIALGRAPH_DB` | (absent = in-memory) | Path to the SQLite database file |
/// | `SOCIALGRAPH_NAME` | (absent) | Service name reported by `/health` |
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Socket address the server binds to.
    pub bind_addr: SocketAddr,

    /// Path to the SQLite database file.
    /// `None` means use an in-memory store (data is lost on restart).
    pub db_path: Option<String>,

    /// Human-readable name, shown in the health document.
    pub name: Option<String>,
}

pub const BIND_VAR: &str = "SOCIALGRAPH_BIND";
pub const DB_VAR: &str = "SOCIALGRAPH_DB";
pub const NAME_VAR: &str = "SOCIALGRAPH_NAME";

const DEFAULT_BIND: &str = "0.0.0.0:3000";

impl NodeConfig {
    /// Populate config from environment variables, applying defaults where absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Populate config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_bind = lookup(BIND_VAR).unwrap_or_else(|| DEFAULT_BIND.into());
        let bind_addr: SocketAddr = raw_bind.parse().map_err(|_| ConfigError::InvalidBind {
            var: BIND_VAR,
            value: raw_bind.clone(),
        })?;

        Ok(Self {
            bind_addr,
            db_path: lookup(DB_VAR).filter(|p| !p.is_empty()),
            name: lookup(NAME_VAR).filter(|n| !n.is_empty()),
        })
    }

    /// In-memory config bound to an ephemeral loopback port.
    pub fn ephemeral() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            db_path: None,
            name: None,
        }
    }
}
