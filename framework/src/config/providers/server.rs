use crate::config::env::{env_or, EnvSource};
use crate::error::ConfigError;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Maximum request body size in bytes (default: 10MB)
    pub max_body_size: usize,
}

impl ServerConfig {
    /// Build config from environment variables
    pub fn from_env(source: &dyn EnvSource) -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_or(source, "SERVER_HOST", DEFAULT_HOST.to_string())?,
            port: env_or(source, "SERVER_PORT", DEFAULT_PORT)?,
            max_body_size: env_or(source, "SERVER_MAX_BODY_SIZE", DEFAULT_MAX_BODY_SIZE)?,
        })
    }

    /// Create a builder for customizing config
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for ServerConfig
#[derive(Default)]
pub struct ServerConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    max_body_size: Option<usize>,
}

impl ServerConfigBuilder {
    /// Set the server host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the maximum request body size in bytes
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = Some(size);
        self
    }

    /// Build the ServerConfig
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            host: self.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: self.port.unwrap_or(DEFAULT_PORT),
            max_body_size: self.max_body_size.unwrap_or(DEFAULT_MAX_BODY_SIZE),
        }
    }
}
