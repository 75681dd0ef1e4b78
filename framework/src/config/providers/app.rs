use crate::config::env::{env_or, EnvSource, Environment};
use crate::error::ConfigError;

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Application name
    pub name: String,
    /// Current environment
    pub environment: Environment,
    /// Debug mode enabled
    pub debug: bool,
}

impl AppConfig {
    /// Build config from environment variables
    pub fn from_env(source: &dyn EnvSource) -> Result<Self, ConfigError> {
        Ok(Self {
            name: env_or(source, "APP_NAME", "Employee Management API".to_string())?,
            environment: Environment::detect(source),
            debug: env_or(source, "APP_DEBUG", false)?,
        })
    }

    /// Create a builder for customizing config
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}

/// Builder for AppConfig
#[derive(Default)]
pub struct AppConfigBuilder {
    name: Option<String>,
    environment: Option<Environment>,
    debug: Option<bool>,
}

impl AppConfigBuilder {
    /// Set the application name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the environment
    pub fn environment(mut self, env: Environment) -> Self {
        self.environment = Some(env);
        self
    }

    /// Set debug mode
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Build the AppConfig, unset fields take their defaults
    pub fn build(self) -> AppConfig {
        AppConfig {
            name: self
                .name
                .unwrap_or_else(|| "Employee Management API".to_string()),
            environment: self.environment.unwrap_or(Environment::Local),
            debug: self.debug.unwrap_or(false),
        }
    }
}
