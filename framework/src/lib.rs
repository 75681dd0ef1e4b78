pub mod app;
pub mod config;
pub mod container;
pub mod database;
pub mod error;
pub mod http;
pub mod logging;
pub mod module;
pub mod routing;
pub mod server;

pub use app::Application;
pub use config::{AppConfig, Config, EnvSource, Environment, ProcessEnv, ServerConfig};
pub use container::{Container, Injectable};
pub use database::{DatabaseConfig, DbConnection, OrmModule, SchemaSync, SchemaSyncMode};
pub use error::{ConfigError, FrameworkError};
pub use crate::http::{json, text, HttpResponse, Request, Response, ResponseExt};
pub use module::{handler, ApplicationGraph, Controller, Import, Module};
pub use routing::Router;
pub use server::Server;

// `Import` impls need `async_trait`, `json_response!` expands to `serde_json`
pub use async_trait::async_trait;
pub use serde_json;
