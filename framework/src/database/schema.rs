//! Schema synchronization
//!
//! Reconciles the database's tables with the registered entities. This is a
//! development convenience: it never runs on its own, only when an operator
//! asks for it (`db:sync`, `serve --sync-schema`), and [`guard`] refuses it in
//! production unless forced. Production databases are managed by migrations.

use sea_orm::{ConnectionTrait, Schema};

use crate::config::Environment;
use crate::database::connection::DbConnection;
use crate::database::entity::EntityRegistry;
use crate::error::FrameworkError;

/// What a sync run is allowed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaSyncMode {
    /// Create tables that do not exist yet, leave existing ones alone
    CreateMissing,
    /// Drop every registered table, then create them again. Destroys data.
    Fresh,
}

impl SchemaSyncMode {
    pub fn is_destructive(&self) -> bool {
        matches!(self, Self::Fresh)
    }
}

impl std::fmt::Display for SchemaSyncMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateMissing => f.write_str("create-missing"),
            Self::Fresh => f.write_str("fresh"),
        }
    }
}

/// Decide whether a sync may run in `environment`
///
/// Any sync is refused in production unless `force` is set.
pub fn guard(mode: SchemaSyncMode, environment: &Environment, force: bool) -> Result<(), FrameworkError> {
    if environment.is_production() && !force {
        return Err(FrameworkError::refused(format!(
            "schema sync ({mode}) is disabled in production, use migrations or pass --force"
        )));
    }
    if mode.is_destructive() {
        tracing::warn!(%environment, "fresh schema sync drops every registered table");
    }
    Ok(())
}

/// Tables touched by a sync run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Tables dropped before creating (fresh mode only)
    pub dropped: Vec<String>,
    /// Tables that exist after the run, whether created now or already there
    pub ensured: Vec<String>,
}

/// Runs a sync for one connection and entity list
pub struct SchemaSync<'a> {
    conn: &'a DbConnection,
    entities: &'a EntityRegistry,
}

impl<'a> SchemaSync<'a> {
    pub fn new(conn: &'a DbConnection, entities: &'a EntityRegistry) -> Self {
        Self { conn, entities }
    }

    pub async fn run(&self, mode: SchemaSyncMode) -> Result<SyncReport, FrameworkError> {
        let backend = self.conn.get_database_backend();
        let schema = Schema::new(backend);
        let mut report = SyncReport::default();

        if mode == SchemaSyncMode::Fresh {
            for entity in self.entities.iter().rev() {
                self.conn
                    .execute(backend.build(&entity.drop_statement()))
                    .await?;
                tracing::info!(table = entity.table(), "dropped table");
                report.dropped.push(entity.table().to_owned());
            }
        }

        for entity in self.entities.iter() {
            let mut create = entity.create_statement(&schema);
            create.if_not_exists();
            self.conn.execute(backend.build(&create)).await?;
            tracing::info!(table = entity.table(), entity = entity.type_name(), "table in sync");
            report.ensured.push(entity.table().to_owned());
        }

        Ok(report)
    }
}
