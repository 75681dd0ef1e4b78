//! Application Container for Dependency Injection
//!
//! - Singletons: shared instances across the application
//! - Factories: new instance per resolution
//! - Trait bindings: bind interfaces to implementations
//! - Providers: [`Injectable`] types constructed lazily on first resolution
//!
//! The container is owned by whoever bootstraps the application. It is
//! mutable while the module graph is being assembled and shared read-only
//! (behind an `Arc`) once requests are served.
//!
//! # Example
//!
//! ```rust,ignore
//! use roster::container::{Container, Injectable};
//!
//! let mut container = Container::new();
//! container.singleton(DatabaseConfig::from_env(&ProcessEnv)?);
//! container.provide::<UserService>();
//!
//! let users: Arc<UserService> = container.resolve::<UserService>()?;
//! ```

mod chain;

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::FrameworkError;

use chain::DependencyChain;

type Shared = Arc<dyn Any + Send + Sync>;
type Constructor = fn(&mut Container) -> Result<Shared, FrameworkError>;

/// Binding types: either a singleton instance or a factory closure
#[derive(Clone)]
enum Binding {
    /// Shared singleton instance - same instance returned every time
    Singleton(Shared),

    /// Factory closure - creates new instance each time
    Factory(Arc<dyn Fn() -> Shared + Send + Sync>),
}

/// A registered provider that has not been constructed yet
#[derive(Clone, Copy)]
struct Pending {
    type_name: &'static str,
    construct: Constructor,
}

/// A type the container can construct by resolving its own dependencies
///
/// # Example
///
/// ```rust,ignore
/// pub struct UserController {
///     users: Arc<UserService>,
/// }
///
/// impl Injectable for UserController {
///     fn inject(container: &mut Container) -> Result<Self, FrameworkError> {
///         Ok(Self { users: container.resolve()? })
///     }
/// }
/// ```
pub trait Injectable: Send + Sync + Sized + 'static {
    /// Build an instance, pulling dependencies out of the container
    fn inject(container: &mut Container) -> Result<Self, FrameworkError>;
}

/// The main service container
///
/// Stores type-erased bindings keyed by TypeId. Supports both concrete types
/// and trait objects (via Arc<dyn Trait>).
pub struct Container {
    bindings: HashMap<TypeId, Binding>,
    pending: HashMap<TypeId, Pending>,
    chain: DependencyChain,
}

impl Container {
    /// Create a new empty container
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            pending: HashMap::new(),
            chain: DependencyChain::default(),
        }
    }

    /// Register a singleton instance (shared across all resolutions)
    pub fn singleton<T: Any + Send + Sync + 'static>(&mut self, instance: T) {
        let arc: Shared = Arc::new(instance);
        self.bindings.insert(TypeId::of::<T>(), Binding::Singleton(arc));
    }

    /// Register a factory closure (new instance per resolution)
    pub fn factory<T, F>(&mut self, factory: F)
    where
        T: Any + Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let wrapped: Arc<dyn Fn() -> Shared + Send + Sync> =
            Arc::new(move || Arc::new(factory()) as Shared);
        self.bindings.insert(TypeId::of::<T>(), Binding::Factory(wrapped));
    }

    /// Bind a trait object to a concrete implementation (as singleton)
    ///
    /// Stored under `TypeId::of::<Arc<T>>()` so it can be resolved with
    /// [`Container::make`].
    pub fn bind<T: ?Sized + Send + Sync + 'static>(&mut self, instance: Arc<T>) {
        let arc: Shared = Arc::new(instance);
        self.bindings
            .insert(TypeId::of::<Arc<T>>(), Binding::Singleton(arc));
    }

    /// Register an [`Injectable`] provider, constructed on first resolution
    ///
    /// Registering a type that is already built or pending is a no-op.
    pub fn provide<T: Injectable>(&mut self) {
        let type_id = TypeId::of::<T>();
        if self.bindings.contains_key(&type_id) || self.pending.contains_key(&type_id) {
            return;
        }

        self.pending.insert(
            type_id,
            Pending {
                type_name: std::any::type_name::<T>(),
                construct: |container| T::inject(container).map(|value| Arc::new(value) as Shared),
            },
        );
    }

    /// Resolve a provider as a shared singleton, constructing it if needed
    ///
    /// # Errors
    ///
    /// - `ServiceNotFound` when `T` was never registered
    /// - `CircularDependency` when constructing `T` requires `T`
    /// - whatever `T::inject` (or a transitive dependency) returns
    pub fn resolve<T: Any + Send + Sync + 'static>(&mut self) -> Result<Arc<T>, FrameworkError> {
        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        if self.chain.contains(type_id) {
            self.chain.push(type_id, type_name);
            let err = FrameworkError::CircularDependency {
                chain: self.chain.render(),
            };
            self.chain.clear();
            return Err(err);
        }

        if let Some(instance) = self.instance::<T>() {
            return Ok(instance);
        }

        let pending = self
            .pending
            .remove(&type_id)
            .ok_or_else(FrameworkError::service_not_found::<T>)?;

        tracing::debug!(provider = pending.type_name, "constructing provider");

        self.chain.push(type_id, pending.type_name);
        let built = (pending.construct)(self);
        self.chain.pop();

        // A failed construction stays registered so a later resolve can retry
        let shared = match built {
            Ok(shared) => shared,
            Err(e) => {
                self.pending.insert(type_id, pending);
                return Err(e);
            }
        };
        self.bindings
            .insert(type_id, Binding::Singleton(shared.clone()));

        shared
            .downcast::<T>()
            .map_err(|_| FrameworkError::internal(format!("provider {type_name} built a foreign type")))
    }

    /// Get an already constructed singleton without constructing anything
    pub fn instance<T: Any + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        match self.bindings.get(&TypeId::of::<T>())? {
            Binding::Singleton(arc) => arc.clone().downcast::<T>().ok(),
            Binding::Factory(factory) => factory().downcast::<T>().ok(),
        }
    }

    /// Resolve a concrete type by value (requires Clone)
    pub fn get<T: Any + Send + Sync + Clone + 'static>(&self) -> Option<T> {
        match self.bindings.get(&TypeId::of::<T>())? {
            Binding::Singleton(arc) => arc.downcast_ref::<T>().cloned(),
            Binding::Factory(factory) => factory().downcast_ref::<T>().cloned(),
        }
    }

    /// Resolve a trait binding - returns Arc<T>
    pub fn make<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        match self.bindings.get(&TypeId::of::<Arc<T>>())? {
            // The stored value is Arc<Arc<T>>, clone the inner Arc
            Binding::Singleton(arc) => arc.downcast_ref::<Arc<T>>().cloned(),
            Binding::Factory(factory) => factory().downcast_ref::<Arc<T>>().cloned(),
        }
    }

    /// Like [`Container::get`] but returns `ServiceNotFound` on a miss
    pub fn require<T: Any + Send + Sync + Clone + 'static>(&self) -> Result<T, FrameworkError> {
        self.get::<T>()
            .ok_or_else(FrameworkError::service_not_found::<T>)
    }

    /// Check if a concrete type is registered (built or pending)
    pub fn has<T: Any + 'static>(&self) -> bool {
        let type_id = TypeId::of::<T>();
        self.bindings.contains_key(&type_id) || self.pending.contains_key(&type_id)
    }

    /// Check if a trait binding is registered
    pub fn has_binding<T: ?Sized + 'static>(&self) -> bool {
        self.bindings.contains_key(&TypeId::of::<Arc<T>>())
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug, PartialEq)]
    struct Settings {
        greeting: &'static str,
    }

    struct Greeter {
        settings: Settings,
    }

    impl Injectable for Greeter {
        fn inject(container: &mut Container) -> Result<Self, FrameworkError> {
            Ok(Self {
                settings: container.require()?,
            })
        }
    }

    struct Front {
        greeter: Arc<Greeter>,
    }

    impl Injectable for Front {
        fn inject(container: &mut Container) -> Result<Self, FrameworkError> {
            Ok(Self {
                greeter: container.resolve()?,
            })
        }
    }

    struct Ping;
    struct Pong;

    impl Injectable for Ping {
        fn inject(container: &mut Container) -> Result<Self, FrameworkError> {
            container.resolve::<Pong>()?;
            Ok(Ping)
        }
    }

    impl Injectable for Pong {
        fn inject(container: &mut Container) -> Result<Self, FrameworkError> {
            container.resolve::<Ping>()?;
            Ok(Pong)
        }
    }

    trait Clock: Send + Sync {
        fn now(&self) -> u64;
    }

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> u64 {
            42
        }
    }

    #[test]
    fn test_singleton_and_get() {
        let mut container = Container::new();
        container.singleton(Settings { greeting: "hi" });

        assert!(container.has::<Settings>());
        assert_eq!(container.get::<Settings>(), Some(Settings { greeting: "hi" }));
    }

    #[test]
    fn test_factory_builds_each_time() {
        static BUILT: AtomicUsize = AtomicUsize::new(0);

        let mut container = Container::new();
        container.factory(|| {
            BUILT.fetch_add(1, Ordering::SeqCst);
            Settings { greeting: "fresh" }
        });

        container.get::<Settings>();
        container.get::<Settings>();
        assert_eq!(BUILT.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_bind_and_make_trait_object() {
        let mut container = Container::new();
        container.bind::<dyn Clock>(Arc::new(FixedClock));

        assert!(container.has_binding::<dyn Clock>());
        assert_eq!(container.make::<dyn Clock>().map(|c| c.now()), Some(42));
    }

    #[test]
    fn test_resolve_injects_dependencies_once() {
        let mut container = Container::new();
        container.singleton(Settings { greeting: "hello" });
        container.provide::<Greeter>();
        container.provide::<Front>();

        let front = container.resolve::<Front>().unwrap();
        let greeter = container.resolve::<Greeter>().unwrap();

        assert_eq!(front.greeter.settings.greeting, "hello");
        assert!(Arc::ptr_eq(&front.greeter, &greeter));
    }

    #[test]
    fn test_resolve_unregistered() {
        let mut container = Container::new();
        let err = container.resolve::<Greeter>().err().unwrap();
        assert!(matches!(err, FrameworkError::ServiceNotFound { .. }));
    }

    #[test]
    fn test_resolve_missing_dependency_propagates() {
        let mut container = Container::new();
        container.provide::<Greeter>();

        let err = container.resolve::<Greeter>().err().unwrap();
        assert!(err.to_string().contains("Settings"));
    }

    #[test]
    fn test_failed_resolve_can_be_retried() {
        let mut container = Container::new();
        container.provide::<Greeter>();

        let err = container.resolve::<Greeter>().err().unwrap();
        assert!(err.to_string().contains("Settings"));

        container.singleton(Settings { greeting: "hello" });
        let greeter = container.resolve::<Greeter>().unwrap();
        assert_eq!(greeter.settings.greeting, "hello");
    }

    #[test]
    fn test_circular_dependency_detected() {
        let mut container = Container::new();
        container.provide::<Ping>();
        container.provide::<Pong>();

        let err = container.resolve::<Ping>().err().unwrap();
        match err {
            FrameworkError::CircularDependency { chain } => {
                assert!(chain.contains("Ping"));
                assert!(chain.contains("Pong"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_instance_does_not_construct() {
        let mut container = Container::new();
        container.singleton(Settings { greeting: "x" });
        container.provide::<Greeter>();

        assert!(container.instance::<Greeter>().is_none());
        container.resolve::<Greeter>().unwrap();
        assert!(container.instance::<Greeter>().is_some());
    }
}
