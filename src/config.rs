//! Server startup configuration.

use std::fs::File;
use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WeblogError};

/// The server configuration, decoded once at startup from a json object file of the
/// form `{"port": "50051"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// the TCP port the server listens on
    pub port: String,
}

impl ServerConfig {
    /// loads the configuration from the json file at `path`
    ///
    /// # Errors
    /// returns [`WeblogError::Config`] if the file is missing or could not be
    /// decoded; this is a fatal startup condition
    ///
    /// [`WeblogError::Config`]: ./enum.WeblogError.html#variant.Config
    pub fn load(path: &Path) -> Result<ServerConfig> {
        let file = File::open(path).map_err(|e| {
            WeblogError::Config(format!("could not open config file {:?}: {}", path, e))
        })?;
        let config = serde_json::from_reader(file).map_err(|e| {
            WeblogError::Config(format!("could not decode config file {:?}: {}", path, e))
        })?;
        Ok(config)
    }

    /// the socket address the server should listen on: `0.0.0.0:<port>`
    ///
    /// # Errors
    /// returns [`WeblogError::Parsing`] if the configured port does not form a valid
    /// socket address
    ///
    /// [`WeblogError::Parsing`]: ./enum.WeblogError.html#variant.Parsing
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let addr = format!("0.0.0.0:{}", self.port);
        addr.parse().map_err(|_| {
            WeblogError::Parsing(format!("could not parse {} into an IP addess and port", &addr))
        })
    }
}
