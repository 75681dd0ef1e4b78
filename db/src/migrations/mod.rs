pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_users_table::Migration)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::user;
    use sea_orm::{ActiveModelTrait, Database, EntityTrait, Set};

    #[tokio::test]
    async fn test_up_creates_users_and_down_drops_it() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        user::ActiveModel {
            first_name: Set("Grace".to_string()),
            last_name: Set("Hopper".to_string()),
            email: Set("grace@example.com".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
        assert_eq!(user::Entity::find().all(&db).await.unwrap().len(), 1);

        Migrator::down(&db, None).await.unwrap();
        assert!(user::Entity::find().all(&db).await.is_err());
    }

    #[tokio::test]
    async fn test_email_is_unique() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let row = || user::ActiveModel {
            first_name: Set("Grace".to_string()),
            last_name: Set("Hopper".to_string()),
            email: Set("grace@example.com".to_string()),
            ..Default::default()
        };
        row().insert(&db).await.unwrap();
        assert!(row().insert(&db).await.is_err());
    }

    #[tokio::test]
    async fn test_all_ordered_lists_by_id() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        for (id, first, email) in [(7, "Linus", "linus@example.com"), (3, "Ada", "ada@example.com")] {
            user::ActiveModel {
                id: Set(id),
                first_name: Set(first.to_string()),
                last_name: Set("Example".to_string()),
                email: Set(email.to_string()),
            }
            .insert(&db)
            .await
            .unwrap();
        }

        let ids: Vec<i32> = user::Entity::all_ordered(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec![3, 7]);
    }
}
