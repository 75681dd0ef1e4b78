//! Database module
//!
//! Wraps SeaORM. An application imports the database by adding an
//! [`OrmModule`] to its root module:
//!
//! ```rust,ignore
//! use roster::database::{DatabaseConfig, OrmModule};
//!
//! let database = DatabaseConfig::from_env(&ProcessEnv)?;
//!
//! Module::new("AppModule")
//!     .import(OrmModule::for_root(database).entity::<user::Entity>())
//!     .controller::<AppController>()
//!     .provider::<AppService>();
//! ```
//!
//! # Configuration
//!
//! ```env
//! DB_NAME=employees
//! DB_USER=employees
//! DB_HOST=localhost
//! # Optional:
//! DB_PORT=5432
//! DB_PASSWORD=secret
//! DB_MAX_CONNECTIONS=10
//! DB_MIN_CONNECTIONS=1
//! DB_CONNECT_TIMEOUT=30
//! DB_LOGGING=false
//! ```

pub mod config;
pub mod connection;
pub mod entity;
pub mod schema;

pub use config::{DatabaseConfig, DatabaseConfigBuilder, DatabaseDriver};
pub use connection::DbConnection;
pub use entity::{EntityDef, EntityRegistry};
pub use schema::{SchemaSync, SchemaSyncMode, SyncReport};

use std::any::Any;

use async_trait::async_trait;
use sea_orm::EntityTrait;

use crate::container::Container;
use crate::error::FrameworkError;
use crate::module::Import;

/// The ORM import of a module
///
/// Holds the connection configuration and the entity list. When the module
/// is bootstrapped it opens the connection and registers `DbConnection`,
/// `DatabaseConfig` and `EntityRegistry` as container singletons.
#[derive(Debug)]
pub struct OrmModule {
    config: DatabaseConfig,
    entities: EntityRegistry,
    connection: Option<DbConnection>,
}

impl OrmModule {
    /// Configure the root database connection
    pub fn for_root(config: DatabaseConfig) -> Self {
        Self {
            config,
            entities: EntityRegistry::new(),
            connection: None,
        }
    }

    /// Declare an entity managed by this connection
    pub fn entity<E: EntityTrait + Default>(mut self) -> Self {
        self.entities.register::<E>();
        self
    }

    /// Reuse an already open connection instead of connecting at bootstrap
    pub fn with_connection(mut self, connection: DbConnection) -> Self {
        self.connection = Some(connection);
        self
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    pub fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    /// Open the connection described by the config (or hand out the reused one)
    pub async fn connect(&self) -> Result<DbConnection, FrameworkError> {
        match &self.connection {
            Some(conn) => Ok(conn.clone()),
            None => DbConnection::connect(&self.config).await,
        }
    }
}

#[async_trait]
impl Import for OrmModule {
    fn name(&self) -> &'static str {
        "OrmModule"
    }

    async fn register(&self, container: &mut Container) -> Result<(), FrameworkError> {
        let connection = self.connect().await?;
        tracing::info!(entities = ?self.entities.tables(), "database connected");

        container.singleton(connection);
        container.singleton(self.config.clone());
        container.singleton(self.entities.clone());
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::entity::fixtures::department;
    use super::*;

    fn config() -> DatabaseConfig {
        DatabaseConfig::builder()
            .name("app")
            .user("app")
            .host("localhost")
            .build()
            .unwrap()
    }

    #[test]
    fn test_for_root_collects_entities() {
        let orm = OrmModule::for_root(config()).entity::<department::Entity>();

        assert_eq!(orm.entities().tables(), vec!["departments"]);
        assert_eq!(orm.config().port, 5432);
    }

    #[tokio::test]
    async fn test_register_fills_container() {
        let conn = DbConnection::from_url("sqlite::memory:", 1).await.unwrap();
        let orm = OrmModule::for_root(config())
            .entity::<department::Entity>()
            .with_connection(conn);

        let mut container = Container::new();
        orm.register(&mut container).await.unwrap();

        assert!(container.has::<DbConnection>());
        assert_eq!(container.get::<DatabaseConfig>(), Some(config()));
        assert_eq!(container.get::<EntityRegistry>().map(|r| r.len()), Some(1));
    }
}
