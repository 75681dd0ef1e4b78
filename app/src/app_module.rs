//! Root module of the API
//!
//! Reads the database settings from the environment and wires the ORM, the
//! controller and its service together.

use employee_db::entities::user;
use roster::database::{DatabaseConfig, OrmModule};
use roster::{EnvSource, FrameworkError, Module};

use crate::controllers::AppController;
use crate::services::AppService;

/// Build the root module from the environment
///
/// Requires `DB_NAME`, `DB_USER` and `DB_HOST`. `DB_PORT` defaults to 5432
/// and must be a valid port number when set.
pub fn register(env: &dyn EnvSource) -> Result<Module, FrameworkError> {
    let database = DatabaseConfig::from_env(env)?;
    Ok(module(OrmModule::for_root(database)))
}

/// Assemble the root module around an ORM import
pub fn module(orm: OrmModule) -> Module {
    Module::new("AppModule")
        .import(orm.entity::<user::Entity>())
        .controller::<AppController>()
        .provider::<AppService>()
}
