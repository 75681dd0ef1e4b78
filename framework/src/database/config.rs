//! Database connection configuration

use std::fmt;
use std::net::Ipv6Addr;

use crate::config::env::{env_optional, env_or, env_required, EnvSource};
use crate::error::ConfigError;

/// Port used when `DB_PORT` is unset or empty
pub const DEFAULT_PORT: u16 = 5432;

/// Relational driver the ORM connects with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatabaseDriver {
    #[default]
    Postgres,
}

impl DatabaseDriver {
    /// URL scheme understood by sqlx
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
        }
    }
}

/// Connection settings for the application database
///
/// Built once at startup, handed to `OrmModule::for_root`, never mutated.
#[derive(Clone, PartialEq)]
pub struct DatabaseConfig {
    /// Database name (`DB_NAME`)
    pub name: String,
    /// Authentication principal (`DB_USER`)
    pub user: String,
    /// Optional password (`DB_PASSWORD`)
    pub password: Option<String>,
    /// Network address of the server (`DB_HOST`)
    pub host: String,
    /// Network port (`DB_PORT`, default 5432)
    pub port: u16,
    /// Driver kind, always Postgres
    pub driver: DatabaseDriver,
    /// Pool upper bound (`DB_MAX_CONNECTIONS`)
    pub max_connections: u32,
    /// Pool lower bound (`DB_MIN_CONNECTIONS`)
    pub min_connections: u32,
    /// Connect timeout in seconds (`DB_CONNECT_TIMEOUT`)
    pub connect_timeout: u64,
    /// Log every SQL statement (`DB_LOGGING`)
    pub logging: bool,
}

impl DatabaseConfig {
    /// Build config from environment variables
    ///
    /// `DB_NAME`, `DB_USER` and `DB_HOST` are required. `DB_PORT` must be a
    /// base-10 port number when set; anything else is rejected instead of
    /// falling back to the default.
    pub fn from_env(source: &dyn EnvSource) -> Result<Self, ConfigError> {
        Ok(Self {
            name: env_required(source, "DB_NAME")?,
            user: env_required(source, "DB_USER")?,
            password: env_optional(source, "DB_PASSWORD")?,
            host: env_required(source, "DB_HOST")?,
            port: env_or(source, "DB_PORT", DEFAULT_PORT)?,
            driver: DatabaseDriver::Postgres,
            max_connections: env_or(source, "DB_MAX_CONNECTIONS", 10)?,
            min_connections: env_or(source, "DB_MIN_CONNECTIONS", 1)?,
            connect_timeout: env_or(source, "DB_CONNECT_TIMEOUT", 30)?,
            logging: env_or(source, "DB_LOGGING", false)?,
        })
    }

    /// Create a builder for customizing config
    pub fn builder() -> DatabaseConfigBuilder {
        DatabaseConfigBuilder::default()
    }

    /// Render the connection URL, e.g. `postgres://app@localhost:5432/app`
    ///
    /// User, password and database name are percent-encoded. IPv6 hosts are
    /// bracketed so the port stays unambiguous.
    pub fn connection_url(&self) -> String {
        let mut userinfo = urlencoding::encode(&self.user).into_owned();
        if let Some(password) = &self.password {
            userinfo.push(':');
            userinfo.push_str(&urlencoding::encode(password));
        }
        let host = if self.host.parse::<Ipv6Addr>().is_ok() {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        format!(
            "{}://{}@{}:{}/{}",
            self.driver.scheme(),
            userinfo,
            host,
            self.port,
            urlencoding::encode(&self.name)
        )
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("driver", &self.driver)
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout", &self.connect_timeout)
            .field("logging", &self.logging)
            .finish()
    }
}

/// Builder for DatabaseConfig
#[derive(Default)]
pub struct DatabaseConfigBuilder {
    name: Option<String>,
    user: Option<String>,
    password: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    max_connections: Option<u32>,
    min_connections: Option<u32>,
    connect_timeout: Option<u64>,
    logging: Option<bool>,
}

impl DatabaseConfigBuilder {
    /// Set the database name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the user
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Set the password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the port
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the pool upper bound
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = Some(max);
        self
    }

    /// Set the pool lower bound
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = Some(min);
        self
    }

    /// Set the connect timeout in seconds
    pub fn connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout = Some(secs);
        self
    }

    /// Enable SQL statement logging
    pub fn logging(mut self, enabled: bool) -> Self {
        self.logging = Some(enabled);
        self
    }

    /// Build the DatabaseConfig
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` naming the env variable of the first
    /// required field left unset.
    pub fn build(self) -> Result<DatabaseConfig, ConfigError> {
        Ok(DatabaseConfig {
            name: self.name.ok_or_else(|| ConfigError::missing("DB_NAME"))?,
            user: self.user.ok_or_else(|| ConfigError::missing("DB_USER"))?,
            password: self.password,
            host: self.host.ok_or_else(|| ConfigError::missing("DB_HOST"))?,
            port: self.port.unwrap_or(DEFAULT_PORT),
            driver: DatabaseDriver::Postgres,
            max_connections: self.max_connections.unwrap_or(10),
            min_connections: self.min_connections.unwrap_or(1),
            connect_timeout: self.connect_timeout.unwrap_or(30),
            logging: self.logging.unwrap_or(false),
        })
    }
}
