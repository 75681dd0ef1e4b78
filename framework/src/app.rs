//! Application builder
//!
//! Parses the command line, loads configuration, builds the root module and
//! runs the requested command.
//!
//! # Example
//!
//! ```rust,ignore
//! use roster::Application;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), roster::FrameworkError> {
//!     Application::new()
//!         .module(app_module::register)
//!         .migrations::<migrations::Migrator>()
//!         .run()
//!         .await
//! }
//! ```

use crate::config::{AppConfig, Config, EnvSource, ProcessEnv, ServerConfig};
use crate::container::Container;
use crate::database::schema::guard;
use crate::database::{DbConnection, EntityRegistry, OrmModule, SchemaSync, SchemaSyncMode};
use crate::error::FrameworkError;
use crate::logging;
use crate::module::Module;
use crate::server::Server;
use clap::{Parser, Subcommand};
use sea_orm_migration::prelude::*;
use std::path::Path;

/// CLI structure for applications
#[derive(Parser, Debug)]
#[command(name = "api")]
#[command(about = "Application server and database utilities")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Run the web server (default command)
    Serve {
        /// Skip running migrations on startup
        #[arg(long)]
        no_migrate: bool,
        /// Create missing entity tables before serving
        #[arg(long)]
        sync_schema: bool,
        /// Allow --sync-schema in production
        #[arg(long)]
        force: bool,
    },
    /// Run pending database migrations
    Migrate,
    /// Show migration status
    #[command(name = "migrate:status")]
    MigrateStatus,
    /// Rollback the last migration(s)
    #[command(name = "migrate:rollback")]
    MigrateRollback {
        /// Number of migrations to rollback
        #[arg(default_value = "1")]
        steps: u32,
    },
    /// Drop all tables and re-run all migrations
    #[command(name = "migrate:fresh")]
    MigrateFresh,
    /// Create entity tables straight from the registered entities
    #[command(name = "db:sync")]
    DbSync {
        /// Drop the registered tables first (destroys data)
        #[arg(long)]
        fresh: bool,
        /// Allow running in production
        #[arg(long)]
        force: bool,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Self::Serve {
            no_migrate: false,
            sync_schema: false,
            force: false,
        }
    }
}

type ModuleFn = Box<dyn FnOnce(&dyn EnvSource) -> Result<Module, FrameworkError> + Send>;

/// Application builder
pub struct Application<M = NoMigrator>
where
    M: MigratorTrait,
{
    module_fn: Option<ModuleFn>,
    _migrator: std::marker::PhantomData<M>,
}

/// Placeholder type for when no migrator is configured
pub struct NoMigrator;

impl MigratorTrait for NoMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![]
    }
}

impl Application<NoMigrator> {
    /// Create a new application builder
    pub fn new() -> Self {
        Application {
            module_fn: None,
            _migrator: std::marker::PhantomData,
        }
    }
}

impl Default for Application<NoMigrator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Application<M>
where
    M: MigratorTrait,
{
    /// Register the function that builds the root module
    ///
    /// It receives the environment so it can read its own configuration,
    /// typically the database connection settings.
    pub fn module<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&dyn EnvSource) -> Result<Module, FrameworkError> + Send + 'static,
    {
        self.module_fn = Some(Box::new(f));
        self
    }

    /// Configure the migrator type for database migrations
    pub fn migrations<NewM>(self) -> Application<NewM>
    where
        NewM: MigratorTrait,
    {
        Application {
            module_fn: self.module_fn,
            _migrator: std::marker::PhantomData,
        }
    }

    /// Run the application
    ///
    /// Parses CLI arguments and executes the appropriate command:
    /// - `serve` (default): Run the web server
    /// - `migrate`, `migrate:status`, `migrate:rollback`, `migrate:fresh`
    /// - `db:sync`: Create (or recreate with `--fresh`) entity tables
    pub async fn run(self) -> Result<(), FrameworkError> {
        let cli = Cli::parse();

        // .env first so APP_DEBUG and RUST_LOG can come from it
        let dotenv = Config::init(Path::new("."));
        let app = AppConfig::from_env(&ProcessEnv)?;
        logging::init(app.debug);
        dotenv.log();
        tracing::info!(app = %app.name, environment = %app.environment, "booting");

        self.execute(cli.command.unwrap_or_default(), &app, &ProcessEnv)
            .await
    }

    async fn execute(
        self,
        command: Commands,
        app: &AppConfig,
        source: &dyn EnvSource,
    ) -> Result<(), FrameworkError> {
        let module_fn = self
            .module_fn
            .ok_or_else(|| FrameworkError::internal("no root module registered"))?;
        let module = module_fn(source)?;

        match command {
            Commands::Serve {
                no_migrate,
                sync_schema,
                force,
            } => {
                let server = ServerConfig::from_env(source)?;
                Self::serve(module, app, server, no_migrate, sync_schema, force).await
            }
            Commands::Migrate => {
                let db = Self::connect(&module).await?;
                tracing::info!("running migrations");
                M::up(db.inner(), None).await?;
                tracing::info!("migrations completed");
                Ok(())
            }
            Commands::MigrateStatus => {
                let db = Self::connect(&module).await?;
                M::status(db.inner()).await?;
                Ok(())
            }
            Commands::MigrateRollback { steps } => {
                let db = Self::connect(&module).await?;
                tracing::info!(steps, "rolling back migrations");
                M::down(db.inner(), Some(steps)).await?;
                tracing::info!("rollback completed");
                Ok(())
            }
            Commands::MigrateFresh => {
                let db = Self::connect(&module).await?;
                tracing::warn!("dropping all tables and re-running migrations");
                M::fresh(db.inner()).await?;
                tracing::info!("database refreshed");
                Ok(())
            }
            Commands::DbSync { fresh, force } => {
                let mode = if fresh {
                    SchemaSyncMode::Fresh
                } else {
                    SchemaSyncMode::CreateMissing
                };
                guard(mode, &app.environment, force)?;

                let orm = Self::orm(&module)?;
                let db = orm.connect().await?;
                let report = SchemaSync::new(&db, orm.entities()).run(mode).await?;
                tracing::info!(%mode, dropped = ?report.dropped, ensured = ?report.ensured, "schema synchronized");
                Ok(())
            }
        }
    }

    async fn serve(
        module: Module,
        app: &AppConfig,
        server: ServerConfig,
        no_migrate: bool,
        sync_schema: bool,
        force: bool,
    ) -> Result<(), FrameworkError> {
        // Refuse before anything connects
        if sync_schema {
            guard(SchemaSyncMode::CreateMissing, &app.environment, force)?;
        }

        let graph = module.bootstrap(Container::new()).await?;

        if let Some(db) = graph.container().instance::<DbConnection>() {
            if !no_migrate {
                tracing::info!("running migrations");
                M::up(db.inner(), None).await?;
            }
            if sync_schema {
                let entities = graph.container().require::<EntityRegistry>()?;
                SchemaSync::new(&db, &entities)
                    .run(SchemaSyncMode::CreateMissing)
                    .await?;
            }
        }

        Server::from_config(server, graph).run().await
    }

    fn orm(module: &Module) -> Result<&OrmModule, FrameworkError> {
        module.import_of::<OrmModule>().ok_or_else(|| {
            FrameworkError::internal(format!("module {} imports no OrmModule", module.name()))
        })
    }

    async fn connect(module: &Module) -> Result<DbConnection, FrameworkError> {
        Self::orm(module)?.connect().await
    }
}
