//! Service collection: the registration surface.
//!
//! A [`ServiceCollection`] accumulates bindings during startup configuration
//! and is consumed by [`build`](ServiceCollection::build) into a
//! [`ServiceProvider`](crate::ServiceProvider). Registration order is free;
//! re-registering a key replaces the previous binding (last wins).

use std::any::TypeId;
use std::sync::Arc;

use crate::construct::Construct;
use crate::descriptors::ServiceDescriptor;
use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::observer::{DiObserver, Observers};
use crate::provider::{ResolverContext, ServiceProvider};
use crate::registration::{AnyArc, Registration, Registry};
use crate::validation::{validate_registry, ValidationReport};

pub mod module_system;
pub use module_system::*;

/// Mutable set of service registrations.
///
/// # Examples
///
/// ```rust
/// use lattice_di::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Database { url: "postgres://localhost".to_string() });
/// services.add_transient_factory::<UserService, _>(|r| UserService {
///     db: r.get_required::<Database>(),
/// });
///
/// let provider = services.build();
/// let user_service = provider.get_required::<UserService>();
/// assert_eq!(user_service.db.url, "postgres://localhost");
/// ```
pub struct ServiceCollection {
    registry: Registry,
    observers: Observers,
}

impl ServiceCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            observers: Observers::new(),
        }
    }

    // ----- Concrete type registrations -----

    /// Registers an already-constructed value as a singleton.
    ///
    /// The value is wrapped in an `Arc` immediately; every resolution
    /// returns the same instance.
    pub fn add_singleton<T: 'static + Send + Sync>(&mut self, value: T) -> &mut Self {
        let arc = Arc::new(value);
        let key = Key::Type(TypeId::of::<T>(), std::any::type_name::<T>());
        let ctor = move |_: &ResolverContext| -> DiResult<AnyArc> { Ok(arc.clone()) };
        self.registry.insert(
            key,
            Registration::with_impl(Lifetime::Singleton, Arc::new(ctor), Some(TypeId::of::<T>())),
        );
        self
    }

    /// Registers a singleton factory, invoked at most once on first
    /// resolution. The factory pulls its dependencies through the resolver
    /// context it receives.
    ///
    /// ```rust
    /// # use lattice_di::{ServiceCollection, Resolver};
    /// # use std::sync::Arc;
    /// struct Config { workers: usize }
    /// struct Pool { size: usize }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(Config { workers: 4 });
    /// services.add_singleton_factory::<Pool, _>(|r| Pool {
    ///     size: r.get_required::<Config>().workers,
    /// });
    /// # let provider = services.build();
    /// # assert_eq!(provider.get_required::<Pool>().size, 4);
    /// ```
    pub fn add_singleton_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Singleton, factory)
    }

    /// Registers a scoped factory: one instance per
    /// [`Scope`](crate::Scope), created on the scope's first resolution.
    pub fn add_scoped_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Scoped, factory)
    }

    /// Registers a transient factory, invoked on every resolution.
    pub fn add_transient_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Transient, factory)
    }

    fn add_factory<T, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        let key = Key::Type(TypeId::of::<T>(), std::any::type_name::<T>());
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> { Ok(Arc::new(factory(r))) };
        self.registry.insert(
            key,
            Registration::with_impl(lifetime, Arc::new(ctor), Some(TypeId::of::<T>())),
        );
        self
    }

    // ----- Fallible factories -----

    /// Registers a singleton factory that may fail.
    ///
    /// A returned error is wrapped in
    /// [`DiError::Producer`](crate::DiError::Producer) with the service's
    /// identifier and propagated to the resolving caller; nothing is cached
    /// on the error path, so a later resolution retries the factory.
    ///
    /// ```rust
    /// # use lattice_di::{ServiceCollection, DiError, Resolver};
    /// #[derive(Debug)]
    /// struct BadPort;
    /// impl std::fmt::Display for BadPort {
    ///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    ///         write!(f, "port out of range")
    ///     }
    /// }
    /// impl std::error::Error for BadPort {}
    ///
    /// struct Listener { port: u16 }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton_fallible_factory::<Listener, _, _>(|_| Err(BadPort));
    ///
    /// let provider = services.build();
    /// assert!(matches!(provider.get::<Listener>(), Err(DiError::Producer(_, _))));
    /// ```
    pub fn add_singleton_fallible_factory<T, E, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        E: std::error::Error + Send + Sync + 'static,
        F: Fn(&ResolverContext) -> Result<T, E> + Send + Sync + 'static,
    {
        self.add_fallible_factory(Lifetime::Singleton, factory)
    }

    /// Scoped counterpart of
    /// [`add_singleton_fallible_factory`](Self::add_singleton_fallible_factory).
    pub fn add_scoped_fallible_factory<T, E, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        E: std::error::Error + Send + Sync + 'static,
        F: Fn(&ResolverContext) -> Result<T, E> + Send + Sync + 'static,
    {
        self.add_fallible_factory(Lifetime::Scoped, factory)
    }

    /// Transient counterpart of
    /// [`add_singleton_fallible_factory`](Self::add_singleton_fallible_factory).
    pub fn add_transient_fallible_factory<T, E, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        E: std::error::Error + Send + Sync + 'static,
        F: Fn(&ResolverContext) -> Result<T, E> + Send + Sync + 'static,
    {
        self.add_fallible_factory(Lifetime::Transient, factory)
    }

    fn add_fallible_factory<T, E, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        E: std::error::Error + Send + Sync + 'static,
        F: Fn(&ResolverContext) -> Result<T, E> + Send + Sync + 'static,
    {
        let key = Key::Type(TypeId::of::<T>(), std::any::type_name::<T>());
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> {
            factory(r)
                .map(|value| Arc::new(value) as AnyArc)
                .map_err(|e| DiError::Producer(std::any::type_name::<T>(), Arc::new(e)))
        };
        self.registry.insert(
            key,
            Registration::with_impl(lifetime, Arc::new(ctor), Some(TypeId::of::<T>())),
        );
        self
    }

    // ----- Trait registrations -----

    /// Registers an existing trait object as a singleton.
    ///
    /// ```rust
    /// # use lattice_di::{ServiceCollection, Resolver};
    /// # use std::sync::Arc;
    /// trait Greeter: Send + Sync {
    ///     fn greet(&self) -> String;
    /// }
    ///
    /// struct English;
    /// impl Greeter for English {
    ///     fn greet(&self) -> String { "hello".to_string() }
    /// }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton_trait::<dyn Greeter>(Arc::new(English));
    ///
    /// let provider = services.build();
    /// assert_eq!(provider.get_required_trait::<dyn Greeter>().greet(), "hello");
    /// ```
    pub fn add_singleton_trait<T>(&mut self, value: Arc<T>) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
    {
        let key = Key::Trait(std::any::type_name::<T>());
        // Stored as Arc<Arc<dyn T>> so the Any layer sees a sized type.
        let any_arc: AnyArc = Arc::new(value);
        let ctor = move |_: &ResolverContext| -> DiResult<AnyArc> { Ok(any_arc.clone()) };
        self.registry
            .insert(key, Registration::new(Lifetime::Singleton, Arc::new(ctor)));
        self
    }

    /// Registers a singleton trait factory. The factory runs at most once;
    /// the produced implementation is shared afterwards.
    pub fn add_singleton_trait_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<T> + Send + Sync + 'static,
    {
        self.add_trait_factory(Lifetime::Singleton, factory)
    }

    /// Registers a scoped trait factory: one implementation per scope.
    pub fn add_scoped_trait_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<T> + Send + Sync + 'static,
    {
        self.add_trait_factory(Lifetime::Scoped, factory)
    }

    /// Registers a transient trait factory: a fresh implementation on every
    /// resolution.
    pub fn add_transient_trait_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<T> + Send + Sync + 'static,
    {
        self.add_trait_factory(Lifetime::Transient, factory)
    }

    fn add_trait_factory<T, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<T> + Send + Sync + 'static,
    {
        let key = Key::Trait(std::any::type_name::<T>());
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> { Ok(Arc::new(factory(r))) };
        self.registry
            .insert(key, Registration::new(lifetime, Arc::new(ctor)));
        self
    }

    // ----- Named registrations -----

    /// Registers a named singleton value. Named registrations let several
    /// instances of the same type coexist under symbolic names.
    ///
    /// ```rust
    /// # use lattice_di::{ServiceCollection, Resolver};
    /// let mut services = ServiceCollection::new();
    /// services.add_named_singleton("primary", 5432u16);
    /// services.add_named_singleton("replica", 5433u16);
    ///
    /// let provider = services.build();
    /// assert_eq!(*provider.get_named_required::<u16>("primary"), 5432);
    /// assert_eq!(*provider.get_named_required::<u16>("replica"), 5433);
    /// ```
    pub fn add_named_singleton<T: 'static + Send + Sync>(
        &mut self,
        name: &'static str,
        value: T,
    ) -> &mut Self {
        let arc = Arc::new(value);
        let key = Key::TypeNamed(TypeId::of::<T>(), std::any::type_name::<T>(), name);
        let ctor = move |_: &ResolverContext| -> DiResult<AnyArc> { Ok(arc.clone()) };
        self.registry.insert(
            key,
            Registration::with_impl(Lifetime::Singleton, Arc::new(ctor), Some(TypeId::of::<T>())),
        );
        self
    }

    /// Registers a named factory under the given lifetime.
    pub fn add_named_factory<T, F>(
        &mut self,
        name: &'static str,
        lifetime: Lifetime,
        factory: F,
    ) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        let key = Key::TypeNamed(TypeId::of::<T>(), std::any::type_name::<T>(), name);
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> { Ok(Arc::new(factory(r))) };
        self.registry.insert(
            key,
            Registration::with_impl(lifetime, Arc::new(ctor), Some(TypeId::of::<T>())),
        );
        self
    }

    /// Registers a named trait object as a singleton.
    pub fn add_named_trait<T>(&mut self, name: &'static str, value: Arc<T>) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
    {
        let key = Key::TraitNamed(std::any::type_name::<T>(), name);
        let any_arc: AnyArc = Arc::new(value);
        let ctor = move |_: &ResolverContext| -> DiResult<AnyArc> { Ok(any_arc.clone()) };
        self.registry
            .insert(key, Registration::new(Lifetime::Singleton, Arc::new(ctor)));
        self
    }

    // ----- Construct registrations -----

    /// Registers a [`Construct`] type under the given lifetime, recording
    /// its declared dependency list for validation and graph export.
    pub fn add_constructed<T: Construct>(&mut self, lifetime: Lifetime) -> &mut Self {
        let key = Key::Type(TypeId::of::<T>(), std::any::type_name::<T>());
        let ctor =
            move |r: &ResolverContext| -> DiResult<AnyArc> { T::construct(r).map(|v| Arc::new(v) as AnyArc) };
        self.registry.insert(
            key,
            Registration::with_impl(lifetime, Arc::new(ctor), Some(TypeId::of::<T>()))
                .with_dependencies(T::dependencies()),
        );
        self
    }

    // ----- Conditional registrations -----

    /// Registers a singleton value only if `T` has no binding yet.
    /// Returns whether the registration happened.
    pub fn try_add_singleton<T: 'static + Send + Sync>(&mut self, value: T) -> bool {
        let key = Key::Type(TypeId::of::<T>(), std::any::type_name::<T>());
        if self.registry.contains_key(&key) {
            false
        } else {
            self.add_singleton(value);
            true
        }
    }

    /// Registers a singleton factory only if `T` has no binding yet.
    pub fn try_add_singleton_factory<T, F>(&mut self, factory: F) -> bool
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        let key = Key::Type(TypeId::of::<T>(), std::any::type_name::<T>());
        if self.registry.contains_key(&key) {
            false
        } else {
            self.add_singleton_factory(factory);
            true
        }
    }

    /// Registers a scoped factory only if `T` has no binding yet.
    pub fn try_add_scoped_factory<T, F>(&mut self, factory: F) -> bool
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        let key = Key::Type(TypeId::of::<T>(), std::any::type_name::<T>());
        if self.registry.contains_key(&key) {
            false
        } else {
            self.add_scoped_factory(factory);
            true
        }
    }

    /// Registers a transient factory only if `T` has no binding yet.
    pub fn try_add_transient_factory<T, F>(&mut self, factory: F) -> bool
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        let key = Key::Type(TypeId::of::<T>(), std::any::type_name::<T>());
        if self.registry.contains_key(&key) {
            false
        } else {
            self.add_transient_factory(factory);
            true
        }
    }

    /// Registers a singleton trait object only if `dyn T` has no binding yet.
    pub fn try_add_singleton_trait<T>(&mut self, value: Arc<T>) -> bool
    where
        T: ?Sized + 'static + Send + Sync,
    {
        let key = Key::Trait(std::any::type_name::<T>());
        if self.registry.contains_key(&key) {
            false
        } else {
            self.add_singleton_trait(value);
            true
        }
    }

    // ----- Observers -----

    /// Attaches an observer that will receive callbacks around every
    /// resolution performed by the built provider and its scopes.
    pub fn add_observer(&mut self, observer: Arc<dyn DiObserver>) -> &mut Self {
        self.observers.push(observer);
        self
    }

    // ----- Introspection & validation -----

    /// Descriptors for every current registration.
    pub fn service_descriptors(&self) -> Vec<ServiceDescriptor> {
        self.registry
            .iter()
            .map(|(key, registration)| ServiceDescriptor {
                key: key.clone(),
                lifetime: registration.lifetime,
                impl_type_id: registration.impl_id,
                dependencies: registration.dependencies.clone(),
            })
            .collect()
    }

    /// Number of registrations currently held.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    /// Checks the declared dependency graph for configuration errors.
    /// See [`ValidationReport`] for the rules.
    pub fn validate(&self) -> ValidationReport {
        validate_registry(&self.registry)
    }

    /// Consumes the collection and builds the provider.
    pub fn build(self) -> ServiceProvider {
        log::debug!(
            target: "lattice_di",
            "building provider with {} registrations",
            self.registry.len()
        );
        ServiceProvider::new(self.registry, self.observers)
    }
}

impl Default for ServiceCollection {
    fn default() -> Self {
        Self::new()
    }
}
