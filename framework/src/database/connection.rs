//! Database connection management

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::sync::Arc;
use std::time::Duration;

use crate::database::config::DatabaseConfig;
use crate::error::FrameworkError;

/// Wrapper around SeaORM's DatabaseConnection
///
/// Clonable and thread-safe so it can live in the container and be shared by
/// every provider that needs the database.
#[derive(Clone)]
pub struct DbConnection {
    inner: Arc<DatabaseConnection>,
}

impl DbConnection {
    /// Open a connection pool from config
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, FrameworkError> {
        let mut opt = ConnectOptions::new(config.connection_url());
        opt.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .sqlx_logging(config.logging);

        tracing::info!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            "connecting to database"
        );

        Self::open(opt).await
    }

    /// Open a connection pool from a raw URL
    ///
    /// Used for throwaway databases such as `sqlite::memory:` in tests. An
    /// in-memory sqlite database lives in a single connection, so pass
    /// `max_connections = 1` for those.
    pub async fn from_url(url: &str, max_connections: u32) -> Result<Self, FrameworkError> {
        let mut opt = ConnectOptions::new(url.to_owned());
        opt.max_connections(max_connections)
            .min_connections(1)
            .sqlx_logging(false);
        Self::open(opt).await
    }

    async fn open(opt: ConnectOptions) -> Result<Self, FrameworkError> {
        let conn = Database::connect(opt)
            .await
            .map_err(|e| FrameworkError::database(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(conn),
        })
    }

    /// Get a reference to the underlying SeaORM connection
    pub fn inner(&self) -> &DatabaseConnection {
        &self.inner
    }

    /// Round-trip to the server
    pub async fn ping(&self) -> Result<(), FrameworkError> {
        self.inner.ping().await.map_err(FrameworkError::from)
    }
}

impl AsRef<DatabaseConnection> for DbConnection {
    fn as_ref(&self) -> &DatabaseConnection {
        &self.inner
    }
}

impl std::ops::Deref for DbConnection {
    type Target = DatabaseConnection;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl std::fmt::Debug for DbConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConnection")
            .field("backend", &self.inner.get_database_backend())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectionTrait, DbBackend};

    #[tokio::test]
    async fn test_memory_connection_pings() {
        let conn = DbConnection::from_url("sqlite::memory:", 1).await.unwrap();

        assert_eq!(conn.get_database_backend(), DbBackend::Sqlite);
        conn.ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_database_is_a_database_error() {
        let err = DbConnection::from_url("sqlite:///definitely/not/here.db?mode=ro", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, FrameworkError::Database(_)));
    }
}
