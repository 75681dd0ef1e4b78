use employee_db::entities::user;
use roster::{Container, DbConnection, FrameworkError, Injectable};
use sea_orm::EntityTrait;

pub struct AppService {
    db: DbConnection,
}

impl Injectable for AppService {
    fn inject(container: &mut Container) -> Result<Self, FrameworkError> {
        Ok(Self {
            db: container.require()?,
        })
    }
}

impl AppService {
    pub fn get_hello(&self) -> &'static str {
        "Hello World!"
    }

    pub async fn list_users(&self) -> Result<Vec<user::Model>, FrameworkError> {
        Ok(user::Entity::all_ordered(self.db.inner()).await?)
    }

    pub async fn find_user(&self, id: i32) -> Result<user::Model, FrameworkError> {
        user::Entity::find_by_id(id)
            .one(self.db.inner())
            .await?
            .ok_or_else(|| FrameworkError::model_not_found("User"))
    }

    /// Fails when the database does not answer
    pub async fn health(&self) -> Result<(), FrameworkError> {
        self.db.ping().await
    }
}
