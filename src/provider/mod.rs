//! Service provider: the resolution root.
//!
//! A [`ServiceProvider`] owns the registry and the singleton caches. It
//! resolves singletons and transients directly, hands out
//! [`Scope`](crate::Scope)s for unit-of-work resolution, and exposes the
//! introspection and rebinding surfaces.

use std::any::TypeId;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::descriptors::ServiceDescriptor;
use crate::error::{DiError, DiResult};
use crate::internal::{with_circular_catch, DisposeBag};
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::observer::Observers;
use crate::registration::{AnyArc, Ctor, Registration, Registry};
use crate::traits::{Resolver, ResolverCore};

pub mod context;
pub mod scope;
pub use context::ResolverContext;
pub use scope::Scope;

#[cfg(feature = "parking-lot")]
type RegistryLock = parking_lot::RwLock<Registry>;
#[cfg(not(feature = "parking-lot"))]
type RegistryLock = std::sync::RwLock<Registry>;

/// Thread-safe resolution root built from a
/// [`ServiceCollection`](crate::ServiceCollection).
///
/// The provider is cheap to clone (`Arc` internally) and safe to share
/// across threads. Singleton instances are created at most once per
/// provider, however many threads race the first resolution; scoped
/// services require a [`Scope`]; transients are built on demand.
///
/// # Examples
///
/// ```rust
/// use lattice_di::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Database { url: "postgres://localhost".to_string() });
///
/// let provider = services.build();
/// let a = provider.get_required::<Database>();
/// let b = provider.get_required::<Database>();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
pub struct ServiceProvider {
    inner: Arc<ProviderInner>,
}

pub(crate) struct ProviderInner {
    // Read-mostly; writes only through the rebind methods.
    pub(crate) registry: RegistryLock,
    pub(crate) root_disposers: Mutex<DisposeBag>,
    pub(crate) observers: Observers,
}

impl ProviderInner {
    #[cfg(feature = "parking-lot")]
    pub(crate) fn read_registry(&self) -> parking_lot::RwLockReadGuard<'_, Registry> {
        self.registry.read()
    }

    #[cfg(not(feature = "parking-lot"))]
    pub(crate) fn read_registry(&self) -> std::sync::RwLockReadGuard<'_, Registry> {
        self.registry.read().unwrap()
    }

    #[cfg(feature = "parking-lot")]
    fn write_registry(&self) -> parking_lot::RwLockWriteGuard<'_, Registry> {
        self.registry.write()
    }

    #[cfg(not(feature = "parking-lot"))]
    fn write_registry(&self) -> std::sync::RwLockWriteGuard<'_, Registry> {
        self.registry.write().unwrap()
    }
}

// What resolution needs from a registration, cloned out so the registry
// lock is never held while a producer runs.
pub(crate) struct ResolvedBinding {
    pub(crate) lifetime: Lifetime,
    pub(crate) ctor: Ctor,
    pub(crate) single: Option<Arc<crate::internal::InitCell>>,
}

impl ServiceProvider {
    pub(crate) fn new(registry: Registry, observers: Observers) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                registry: RegistryLock::new(registry),
                root_disposers: Mutex::new(DisposeBag::default()),
                observers,
            }),
        }
    }

    pub(crate) fn binding_of(&self, key: &Key) -> Option<ResolvedBinding> {
        let registry = self.inner.read_registry();
        registry.get(key).map(|registration| ResolvedBinding {
            lifetime: registration.lifetime,
            ctor: registration.ctor.clone(),
            single: registration.single.clone(),
        })
    }

    /// Creates a scope: the container's unit-of-work token.
    ///
    /// Scoped services resolved through the scope are cached in it and
    /// discarded when the scope closes; singletons are still shared with
    /// the root. The caller owns the scope and is responsible for calling
    /// [`Scope::close`] when the unit of work ends (dropping the scope
    /// closes it as a fallback).
    pub fn create_scope(&self) -> Scope {
        Scope::new(self.clone())
    }

    /// Runs `f` against a fresh scope and closes the scope on every exit
    /// path, mirroring how a request handler should bracket a unit of work.
    ///
    /// ```rust
    /// use lattice_di::{ServiceCollection, Resolver};
    ///
    /// struct RequestState { id: u32 }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_scoped_factory::<RequestState, _>(|_| RequestState { id: 1 });
    ///
    /// let provider = services.build();
    /// let id = provider.with_scope(|scope| scope.get_required::<RequestState>().id);
    /// assert_eq!(id, 1);
    /// ```
    pub fn with_scope<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Scope) -> R,
    {
        let scope = self.create_scope();
        let result = f(&scope);
        scope.close();
        result
    }

    /// Runs all root-level disposal hooks in LIFO order. Call once at
    /// process shutdown, after the last resolution.
    pub fn dispose_all(&self) {
        self.inner.root_disposers.lock().unwrap().run_all_reverse();
    }

    // ----- Rebinding -----

    /// Replaces (or adds) the binding for `T` at runtime.
    ///
    /// Rebinding is synchronized against concurrent resolutions and takes
    /// effect for future resolutions only: instances already cached under
    /// the old binding remain with their holders, and a replaced singleton
    /// starts from an empty cache. Intended for startup and test
    /// configuration, not steady-state request handling.
    ///
    /// ```rust
    /// use lattice_di::{Lifetime, ServiceCollection, Resolver};
    /// use std::sync::Arc;
    ///
    /// struct Ticket { serial: u32 }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_transient_factory::<Ticket, _>(|_| Ticket { serial: 0 });
    /// let provider = services.build();
    ///
    /// // Promote to singleton, e.g. inside a test fixture.
    /// provider.rebind_factory::<Ticket, _>(Lifetime::Singleton, |_| Ticket { serial: 7 });
    ///
    /// let a = provider.get_required::<Ticket>();
    /// let b = provider.get_required::<Ticket>();
    /// assert!(Arc::ptr_eq(&a, &b));
    /// assert_eq!(a.serial, 7);
    /// ```
    pub fn rebind_factory<T, F>(&self, lifetime: Lifetime, factory: F)
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        let key = Key::Type(TypeId::of::<T>(), std::any::type_name::<T>());
        log::debug!(
            target: "lattice_di",
            "rebinding {} as {}",
            key.display_name(),
            lifetime.label()
        );
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> { Ok(Arc::new(factory(r))) };
        self.inner.write_registry().insert(
            key,
            Registration::with_impl(lifetime, Arc::new(ctor), Some(TypeId::of::<T>())),
        );
    }

    /// Replaces the binding for `T` with a ready-made singleton value.
    pub fn rebind_instance<T: 'static + Send + Sync>(&self, value: T) {
        let arc = Arc::new(value);
        let key = Key::Type(TypeId::of::<T>(), std::any::type_name::<T>());
        log::debug!(target: "lattice_di", "rebinding {} to instance", key.display_name());
        let ctor = move |_: &ResolverContext| -> DiResult<AnyArc> { Ok(arc.clone()) };
        self.inner.write_registry().insert(
            key,
            Registration::with_impl(Lifetime::Singleton, Arc::new(ctor), Some(TypeId::of::<T>())),
        );
    }

    /// Replaces (or adds) the binding for trait `T` at runtime.
    pub fn rebind_trait_factory<T, F>(&self, lifetime: Lifetime, factory: F)
    where
        T: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<T> + Send + Sync + 'static,
    {
        let key = Key::Trait(std::any::type_name::<T>());
        log::debug!(
            target: "lattice_di",
            "rebinding {} as {}",
            key.display_name(),
            lifetime.label()
        );
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> { Ok(Arc::new(factory(r))) };
        self.inner
            .write_registry()
            .insert(key, Registration::new(lifetime, Arc::new(ctor)));
    }

    // ----- Introspection -----

    /// Lifetime policy of the binding for `key`, if one exists.
    pub fn lifetime_of(&self, key: &Key) -> Option<Lifetime> {
        self.inner.read_registry().get(key).map(|r| r.lifetime)
    }

    /// Whether any binding exists for `key`.
    pub fn contains(&self, key: &Key) -> bool {
        self.inner.read_registry().contains_key(key)
    }

    /// Whether the singleton for `key` has been resolved and cached.
    /// `false` for missing bindings and for non-singleton lifetimes.
    pub fn has_singleton(&self, key: &Key) -> bool {
        self.inner
            .read_registry()
            .get(key)
            .and_then(|r| r.single.as_ref().map(|cell| cell.is_initialized()))
            .unwrap_or(false)
    }

    /// Typed convenience for [`has_singleton`](Self::has_singleton).
    ///
    /// ```rust
    /// use lattice_di::{ServiceCollection, Resolver};
    ///
    /// struct Cache;
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton_factory::<Cache, _>(|_| Cache);
    /// let provider = services.build();
    ///
    /// assert!(!provider.has_singleton_of::<Cache>());
    /// let _ = provider.get_required::<Cache>();
    /// assert!(provider.has_singleton_of::<Cache>());
    /// ```
    pub fn has_singleton_of<T: 'static>(&self) -> bool {
        self.has_singleton(&crate::key::key_of_type::<T>())
    }

    /// Descriptors for every current registration.
    pub fn service_descriptors(&self) -> Vec<ServiceDescriptor> {
        self.inner
            .read_registry()
            .iter()
            .map(|(key, registration)| ServiceDescriptor {
                key: key.clone(),
                lifetime: registration.lifetime,
                impl_type_id: registration.impl_id,
                dependencies: registration.dependencies.clone(),
            })
            .collect()
    }

    /// Validates the current registrations; see
    /// [`ValidationReport`](crate::ValidationReport).
    pub fn validate(&self) -> crate::ValidationReport {
        crate::validation::validate_registry(&self.inner.read_registry())
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut out = String::from("=== Service Provider Debug ===\n");
        for (key, registration) in self.inner.read_registry().iter() {
            let cached = registration
                .single
                .as_ref()
                .map(|cell| {
                    if cell.is_initialized() {
                        " [cached]"
                    } else {
                        " [empty]"
                    }
                })
                .unwrap_or("");
            out.push_str(&format!(
                "  {}: {}{}\n",
                key.display_name(),
                registration.lifetime.label(),
                cached
            ));
        }
        out
    }

    // ----- Resolution internals -----

    // Singleton resolution shared by the root and by scopes. The init cell
    // serializes concurrent first resolutions. Dependency lookups always go
    // through the root, so a singleton factory that reaches for a scoped
    // service fails with a lifetime error instead of capturing it.
    pub(crate) fn resolve_singleton(&self, binding: &ResolvedBinding) -> DiResult<AnyArc> {
        match &binding.single {
            Some(cell) => cell.get_or_try_init(|| {
                let ctx = ResolverContext::new(self);
                (binding.ctor)(&ctx)
            }),
            None => {
                let ctx = ResolverContext::new(self);
                (binding.ctor)(&ctx)
            }
        }
    }

    fn resolve_any_impl(&self, key: &Key) -> DiResult<AnyArc> {
        match self.binding_of(key) {
            Some(binding) => match binding.lifetime {
                Lifetime::Singleton => self.resolve_singleton(&binding),
                Lifetime::Scoped => Err(DiError::WrongLifetime(
                    "cannot resolve a scoped service from the root provider; create a scope",
                )),
                Lifetime::Transient => {
                    let ctx = ResolverContext::new(self);
                    (binding.ctor)(&ctx)
                }
            },
            None => Err(DiError::NotFound(key.display_name())),
        }
    }

    // Observer notifications wrap the whole resolution, nested lookups
    // included, so each service in a chain reports its own timing.
    pub(crate) fn observed_resolve<F>(&self, key: &Key, resolve: F) -> DiResult<AnyArc>
    where
        F: FnOnce() -> DiResult<AnyArc>,
    {
        if !self.inner.observers.has_observers() {
            return resolve();
        }

        self.inner.observers.resolving(key);
        let start = Instant::now();
        let result = resolve();
        match &result {
            Ok(_) => self.inner.observers.resolved(key, start.elapsed()),
            Err(error) => self.inner.observers.resolution_failed(key, error),
        }
        result
    }
}

impl Clone for ServiceProvider {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl Drop for ServiceProvider {
    fn drop(&mut self) {
        if Arc::strong_count(&self.inner) == 1 {
            if let Ok(mut bag) = self.inner.root_disposers.try_lock() {
                if !bag.is_empty() {
                    log::warn!(
                        target: "lattice_di",
                        "provider dropped with pending disposers; running them now"
                    );
                    bag.run_all_reverse();
                }
            }
        }
    }
}

impl ResolverCore for ServiceProvider {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        let name = key.display_name();
        self.observed_resolve(key, || {
            with_circular_catch(name, || self.resolve_any_impl(key))
        })
    }

    fn push_disposer(&self, hook: Box<dyn FnOnce() + Send>) {
        self.inner.root_disposers.lock().unwrap().push(hook);
    }
}

impl Resolver for ServiceProvider {}
