//! Static server configuration.
//!
//! Loaded via the `config` crate from environment variables.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Configuration of the static file server.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on.
    /// Default: 127.0.0.1:3000
    #[serde(default = "default_site_addr")]
    pub site_addr: SocketAddr,

    /// Directory holding the built bundle and its `index.html`.
    /// Default: "dist"
    #[serde(default = "default_site_root")]
    pub site_root: PathBuf,
}

fn default_site_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

fn default_site_root() -> PathBuf {
    PathBuf::from("dist")
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
