//! Module descriptors
//!
//! A [`Module`] declares what an application is made of: the modules it
//! imports (such as the ORM), its controllers and its providers.
//! [`Module::bootstrap`] consumes the descriptor, wires everything into a
//! [`Container`] and returns the [`ApplicationGraph`] the server dispatches
//! requests against.
//!
//! # Example
//!
//! ```rust,ignore
//! let graph = Module::new("AppModule")
//!     .import(OrmModule::for_root(database).entity::<user::Entity>())
//!     .controller::<AppController>()
//!     .provider::<AppService>()
//!     .bootstrap(Container::new())
//!     .await?;
//! ```

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::container::{Container, Injectable};
use crate::error::FrameworkError;
use crate::http::{HttpResponse, Request, Response};
use crate::routing::Router;

/// Something a module imports before its own providers are built
///
/// Imports register the services they contribute (connections, config,
/// clients) into the container.
#[async_trait]
pub trait Import: Send + Sync + 'static {
    /// Name used in startup logs
    fn name(&self) -> &'static str;

    /// Contribute services to the container
    async fn register(&self, container: &mut Container) -> Result<(), FrameworkError>;

    /// Downcast support for [`Module::import_of`]
    fn as_any(&self) -> &dyn Any;
}

/// A provider that maps HTTP routes onto its own methods
pub trait Controller: Injectable {
    /// Mount this controller's routes
    fn routes(self: Arc<Self>, router: Router) -> Router;
}

/// Turn a controller method into a route handler
///
/// ```rust,ignore
/// router.get("/", handler(&self, Self::get_hello))
/// ```
pub fn handler<C, F, Fut>(controller: &Arc<C>, method: F) -> impl Fn(Request) -> Fut + Send + Sync + 'static
where
    C: Send + Sync + 'static,
    F: Fn(Arc<C>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    let controller = controller.clone();
    move |req| method(controller.clone(), req)
}

struct ProviderDef {
    type_name: &'static str,
    provide: fn(&mut Container),
    resolve: fn(&mut Container) -> Result<(), FrameworkError>,
}

struct ControllerDef {
    type_name: &'static str,
    provide: fn(&mut Container),
    mount: fn(&mut Container, Router) -> Result<Router, FrameworkError>,
}

/// Declarative description of an application module
pub struct Module {
    name: &'static str,
    imports: Vec<Box<dyn Import>>,
    controllers: Vec<ControllerDef>,
    providers: Vec<ProviderDef>,
}

impl Module {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            imports: Vec::new(),
            controllers: Vec::new(),
            providers: Vec::new(),
        }
    }

    /// Import another module
    pub fn import<I: Import>(mut self, import: I) -> Self {
        self.imports.push(Box::new(import));
        self
    }

    /// Declare a controller
    pub fn controller<C: Controller>(mut self) -> Self {
        self.controllers.push(ControllerDef {
            type_name: std::any::type_name::<C>(),
            provide: |container| container.provide::<C>(),
            mount: |container, router| Ok(container.resolve::<C>()?.routes(router)),
        });
        self
    }

    /// Declare a provider
    pub fn provider<P: Injectable>(mut self) -> Self {
        self.providers.push(ProviderDef {
            type_name: std::any::type_name::<P>(),
            provide: |container| container.provide::<P>(),
            resolve: |container| container.resolve::<P>().map(|_| ()),
        });
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The first import of type `T`, if any
    pub fn import_of<T: Import>(&self) -> Option<&T> {
        self.imports
            .iter()
            .find_map(|import| import.as_any().downcast_ref::<T>())
    }

    pub fn import_names(&self) -> Vec<&'static str> {
        self.imports.iter().map(|import| import.name()).collect()
    }

    pub fn controller_names(&self) -> Vec<&'static str> {
        self.controllers.iter().map(|c| c.type_name).collect()
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.type_name).collect()
    }

    /// Wire the module into `container`
    ///
    /// Imports are registered in declaration order, then every provider is
    /// built, then every controller is built and mounted. The first failure
    /// aborts the bootstrap.
    pub async fn bootstrap(self, mut container: Container) -> Result<ApplicationGraph, FrameworkError> {
        tracing::info!(module = self.name, "starting module");

        for import in &self.imports {
            import.register(&mut container).await?;
            tracing::info!(module = self.name, import = import.name(), "dependencies initialized");
        }

        for provider in &self.providers {
            (provider.provide)(&mut container);
        }
        for controller in &self.controllers {
            (controller.provide)(&mut container);
        }

        for provider in &self.providers {
            (provider.resolve)(&mut container)?;
            tracing::debug!(provider = provider.type_name, "provider ready");
        }

        let mut router = Router::new();
        for controller in &self.controllers {
            let before = router.len();
            router = (controller.mount)(&mut container, router)?;
            tracing::info!(
                controller = controller.type_name,
                routes = router.len() - before,
                "controller mapped"
            );
        }

        Ok(ApplicationGraph {
            name: self.name,
            container: Arc::new(container),
            router: Arc::new(router),
        })
    }
}

impl std::fmt::Debug for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("imports", &self.import_names())
            .field("controllers", &self.controller_names())
            .field("providers", &self.provider_names())
            .finish()
    }
}

/// A bootstrapped module: its populated container and mounted routes
#[derive(Clone)]
pub struct ApplicationGraph {
    name: &'static str,
    container: Arc<Container>,
    router: Arc<Router>,
}

impl ApplicationGraph {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Dispatch a request to the matching controller route
    pub async fn handle(&self, request: Request) -> HttpResponse {
        self.router.dispatch(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::text;
    use pretty_assertions::assert_eq;

    #[derive(Clone)]
    struct Greeting(&'static str);

    struct GreetingImport;

    #[async_trait]
    impl Import for GreetingImport {
        fn name(&self) -> &'static str {
            "GreetingImport"
        }

        async fn register(&self, container: &mut Container) -> Result<(), FrameworkError> {
            container.singleton(Greeting("Hello World!"));
            Ok(())
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct GreetingService {
        greeting: Greeting,
    }

    impl Injectable for GreetingService {
        fn inject(container: &mut Container) -> Result<Self, FrameworkError> {
            Ok(Self {
                greeting: container.require()?,
            })
        }
    }

    struct GreetingController {
        service: Arc<GreetingService>,
    }

    impl Injectable for GreetingController {
        fn inject(container: &mut Container) -> Result<Self, FrameworkError> {
            Ok(Self {
                service: container.resolve()?,
            })
        }
    }

    impl GreetingController {
        async fn hello(self: Arc<Self>, _req: Request) -> Response {
            text(self.service.greeting.0)
        }
    }

    impl Controller for GreetingController {
        fn routes(self: Arc<Self>, router: Router) -> Router {
            router.get("/", handler(&self, Self::hello))
        }
    }

    fn module() -> Module {
        Module::new("TestModule")
            .import(GreetingImport)
            .controller::<GreetingController>()
            .provider::<GreetingService>()
    }

    #[tokio::test]
    async fn test_bootstrap_wires_controller_to_service() {
        let graph = module().bootstrap(Container::new()).await.unwrap();

        let controller = graph.container().instance::<GreetingController>().unwrap();
        let service = graph.container().instance::<GreetingService>().unwrap();
        assert!(Arc::ptr_eq(&controller.service, &service));

        let response = graph.handle(Request::get("/")).await;
        assert_eq!(response.body(), "Hello World!");
    }

    #[tokio::test]
    async fn test_bootstrap_fails_without_import() {
        let err = Module::new("Broken")
            .controller::<GreetingController>()
            .provider::<GreetingService>()
            .bootstrap(Container::new())
            .await
            .err()
            .unwrap();

        assert!(matches!(err, FrameworkError::ServiceNotFound { .. }));
    }

    #[tokio::test]
    async fn test_controller_without_declared_provider_fails() {
        let err = Module::new("Broken")
            .import(GreetingImport)
            .controller::<GreetingController>()
            .bootstrap(Container::new())
            .await
            .err()
            .unwrap();

        assert!(err.to_string().contains("GreetingService"));
    }

    #[test]
    fn test_descriptor_introspection() {
        let module = module();

        assert_eq!(module.name(), "TestModule");
        assert_eq!(module.import_names(), vec!["GreetingImport"]);
        assert_eq!(module.controller_names().len(), 1);
        assert_eq!(module.provider_names().len(), 1);
        assert!(module.import_of::<GreetingImport>().is_some());
    }
}
