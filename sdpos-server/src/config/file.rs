//! TOML file configuration structures.
//!
//! These structs directly map to the `sdpos-config.toml` file format. Every
//! section is optional; the partner credentials are usually supplied through
//! the environment instead.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub partner: PartnerConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

/// Partner API section. Environment variables take precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartnerConfig {
    pub api_base_url: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
}
