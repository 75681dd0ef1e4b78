use crate::http::{HttpResponse, Request, Response};
use matchit::Router as MatchitRouter;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for route handlers
pub type BoxedHandler =
    Box<dyn Fn(Request) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync>;

/// HTTP Router backed by one matchit tree per method
pub struct Router {
    get_routes: MatchitRouter<Arc<BoxedHandler>>,
    post_routes: MatchitRouter<Arc<BoxedHandler>>,
    put_routes: MatchitRouter<Arc<BoxedHandler>>,
    delete_routes: MatchitRouter<Arc<BoxedHandler>>,
    count: usize,
}

impl Router {
    pub fn new() -> Self {
        Self {
            get_routes: MatchitRouter::new(),
            post_routes: MatchitRouter::new(),
            put_routes: MatchitRouter::new(),
            delete_routes: MatchitRouter::new(),
            count: 0,
        }
    }

    fn insert<H, Fut>(mut self, method: http::Method, path: &str, handler: H) -> Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        let handler: BoxedHandler = Box::new(move |req| Box::pin(handler(req)));
        let routes = match method {
            http::Method::POST => &mut self.post_routes,
            http::Method::PUT => &mut self.put_routes,
            http::Method::DELETE => &mut self.delete_routes,
            _ => &mut self.get_routes,
        };

        match routes.insert(path, Arc::new(handler)) {
            Ok(()) => {
                self.count += 1;
                tracing::debug!(%method, path, "route mapped");
            }
            Err(e) => tracing::warn!(%method, path, error = %e, "route not mapped"),
        }
        self
    }

    /// Register a GET route
    pub fn get<H, Fut>(self, path: &str, handler: H) -> Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.insert(http::Method::GET, path, handler)
    }

    /// Register a POST route
    pub fn post<H, Fut>(self, path: &str, handler: H) -> Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.insert(http::Method::POST, path, handler)
    }

    /// Register a PUT route
    pub fn put<H, Fut>(self, path: &str, handler: H) -> Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.insert(http::Method::PUT, path, handler)
    }

    /// Register a DELETE route
    pub fn delete<H, Fut>(self, path: &str, handler: H) -> Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.insert(http::Method::DELETE, path, handler)
    }

    /// Number of mapped routes
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Match a request and return the handler with extracted params
    pub fn match_route(
        &self,
        method: &http::Method,
        path: &str,
    ) -> Option<(Arc<BoxedHandler>, HashMap<String, String>)> {
        let router = match *method {
            http::Method::GET => &self.get_routes,
            http::Method::POST => &self.post_routes,
            http::Method::PUT => &self.put_routes,
            http::Method::DELETE => &self.delete_routes,
            _ => return None,
        };

        router.at(path).ok().map(|matched| {
            let params: HashMap<String, String> = matched
                .params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            (matched.value.clone(), params)
        })
    }

    /// Run the matching handler, or answer 404
    pub async fn dispatch(&self, request: Request) -> HttpResponse {
        match self.match_route(request.method(), request.path()) {
            Some((handler, params)) => {
                // Both Ok and Err carry a response
                handler(request.with_params(params))
                    .await
                    .unwrap_or_else(|e| e)
            }
            None => HttpResponse::json(serde_json::json!({ "error": "Not Found" })).status(404),
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
