//! Configuration module
//!
//! - `.env` file loading with environment-based precedence
//! - Typed configuration structs built from an [`EnvSource`]
//!
//! Configuration is read once at startup and handed to the components that
//! need it; nothing else touches the process environment.
//!
//! # Example
//!
//! ```rust,no_run
//! use roster::config::{Config, ProcessEnv, ServerConfig};
//!
//! let dotenv = Config::init(std::path::Path::new("."));
//! let server = ServerConfig::from_env(&ProcessEnv).unwrap();
//! println!("{} on port {}", dotenv.environment, server.port);
//! ```

pub mod env;
pub mod providers;

pub use env::{
    env_optional, env_or, env_required, load_dotenv, DotenvReport, EnvSource, Environment, ProcessEnv,
};
pub use providers::{AppConfig, AppConfigBuilder, ServerConfig, ServerConfigBuilder};

use std::path::Path;

/// Entry point for the configuration system
pub struct Config;

impl Config {
    /// Initialize the configuration system
    ///
    /// Loads `.env` files from `project_root` into the process environment
    /// and reports what was read. Call once, before building any config
    /// struct from [`ProcessEnv`].
    pub fn init(project_root: &Path) -> DotenvReport {
        env::load_dotenv(project_root)
    }
}
