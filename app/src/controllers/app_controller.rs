use std::sync::Arc;

use roster::{
    handler, json_response, text, Container, Controller, FrameworkError, Injectable, Request,
    Response, Router,
};

use crate::services::AppService;

pub struct AppController {
    app: Arc<AppService>,
}

impl Injectable for AppController {
    fn inject(container: &mut Container) -> Result<Self, FrameworkError> {
        Ok(Self {
            app: container.resolve()?,
        })
    }
}

impl Controller for AppController {
    fn routes(self: Arc<Self>, router: Router) -> Router {
        router
            .get("/", handler(&self, Self::get_hello))
            .get("/health", handler(&self, Self::health))
            .get("/users", handler(&self, Self::users))
            .get("/users/{id}", handler(&self, Self::user))
    }
}

impl AppController {
    async fn get_hello(self: Arc<Self>, _req: Request) -> Response {
        text(self.app.get_hello())
    }

    async fn health(self: Arc<Self>, _req: Request) -> Response {
        self.app.health().await?;
        json_response!({ "status": "ok" })
    }

    async fn users(self: Arc<Self>, _req: Request) -> Response {
        let users = self.app.list_users().await?;
        json_response!(users)
    }

    async fn user(self: Arc<Self>, req: Request) -> Response {
        let id: i32 = req.param_as("id")?;
        let user = self.app.find_user(id).await?;
        json_response!(user)
    }
}
