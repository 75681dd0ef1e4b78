use employee_api::app_module;
use employee_db::entities::user;
use pretty_assertions::assert_eq;
use roster::database::{DatabaseConfig, EntityRegistry, OrmModule};
use roster::{ConfigError, Container, DbConnection, FrameworkError, Request};
use rstest::rstest;

const REQUIRED: [(&str, &str); 3] = [("DB_NAME", "app"), ("DB_USER", "app"), ("DB_HOST", "localhost")];

fn database_config(env: &[(&str, &str)]) -> Result<DatabaseConfig, FrameworkError> {
    let env: std::collections::HashMap<String, String> = env
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let module = app_module::register(&env)?;
    let orm = module.import_of::<OrmModule>().expect("root module imports the ORM");
    Ok(orm.config().clone())
}

#[test]
fn test_example_environment() {
    let config = database_config(&REQUIRED).unwrap();

    assert_eq!(config.name, "app");
    assert_eq!(config.user, "app");
    assert_eq!(config.host, "localhost");
    assert_eq!(config.port, 5432);
}

#[rstest]
#[case("5433", 5433)]
#[case("6543", 6543)]
#[case("", 5432)]
fn test_port_from_environment(#[case] raw: &str, #[case] expected: u16) {
    let mut env = REQUIRED.to_vec();
    env.push(("DB_PORT", raw));

    assert_eq!(database_config(&env).unwrap().port, expected);
}

#[rstest]
#[case("abc")]
#[case("5432abc")]
fn test_non_numeric_port_is_rejected(#[case] raw: &str) {
    let mut env = REQUIRED.to_vec();
    env.push(("DB_PORT", raw));

    match database_config(&env) {
        Err(FrameworkError::Config(ConfigError::Invalid { key, .. })) => assert_eq!(key, "DB_PORT"),
        other => panic!("expected an invalid DB_PORT, got {other:?}"),
    }
}

#[test]
fn test_missing_database_name_is_rejected() {
    let err = database_config(&REQUIRED[1..]).unwrap_err();
    assert!(matches!(err, FrameworkError::Config(ConfigError::Missing { .. })));
}

#[test]
fn test_same_environment_same_config() {
    assert_eq!(database_config(&REQUIRED).unwrap(), database_config(&REQUIRED).unwrap());
}

#[test]
fn test_module_shape() {
    let module = app_module::register(&REQUIRED).unwrap();
    let orm = module.import_of::<OrmModule>().unwrap();

    assert_eq!(orm.entities().tables(), vec!["users"]);
    assert_eq!(module.controller_names().len(), 1);
    assert_eq!(module.provider_names().len(), 1);
}

mod routes {
    use super::*;
    use pretty_assertions::assert_eq;
    use roster::database::SchemaSync;
    use roster::{ApplicationGraph, SchemaSyncMode};
    use sea_orm::{ActiveModelTrait, Set};

    async fn graph() -> ApplicationGraph {
        let conn = DbConnection::from_url("sqlite::memory:", 1).await.unwrap();
        let config = DatabaseConfig::builder()
            .name("app")
            .user("app")
            .host("localhost")
            .build()
            .unwrap();

        let graph = app_module::module(OrmModule::for_root(config).with_connection(conn.clone()))
            .bootstrap(Container::new())
            .await
            .unwrap();

        let entities = graph.container().require::<EntityRegistry>().unwrap();
        SchemaSync::new(&conn, &entities)
            .run(SchemaSyncMode::CreateMissing)
            .await
            .unwrap();

        for (first, last, email) in [
            ("Ada", "Lovelace", "ada@example.com"),
            ("Grace", "Hopper", "grace@example.com"),
        ] {
            user::ActiveModel {
                first_name: Set(first.to_string()),
                last_name: Set(last.to_string()),
                email: Set(email.to_string()),
                ..Default::default()
            }
            .insert(conn.inner())
            .await
            .unwrap();
        }

        graph
    }

    #[tokio::test]
    async fn test_hello() {
        let response = graph().await.handle(Request::get("/")).await;

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.body(), "Hello World!");
    }

    #[tokio::test]
    async fn test_health() {
        let response = graph().await.handle(Request::get("/health")).await;

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.json_body().unwrap()["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_users() {
        let response = graph().await.handle(Request::get("/users")).await;
        let body = response.json_body().unwrap();

        assert_eq!(response.status_code(), 200);
        assert_eq!(body.as_array().map(|users| users.len()), Some(2));
        assert_eq!(body[0]["email"], "ada@example.com");
    }

    #[rstest]
    #[case("/users/2", 200)]
    #[case("/users/99", 404)]
    #[case("/users/two", 400)]
    #[case("/employees", 404)]
    #[tokio::test]
    async fn test_find_user(#[case] path: &str, #[case] status: u16) {
        let response = graph().await.handle(Request::get(path)).await;
        assert_eq!(response.status_code(), status);
    }

    #[tokio::test]
    async fn test_controller_shares_the_service() {
        let graph = graph().await;
        let container = graph.container();

        assert!(container.instance::<employee_api::services::AppService>().is_some());
        assert!(container.instance::<employee_api::controllers::AppController>().is_some());
    }
}
