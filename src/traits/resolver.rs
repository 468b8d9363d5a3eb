//! Resolver traits for service resolution.

use std::any::TypeId;
use std::sync::Arc;

use crate::construct::Construct;
use crate::error::{DiError, DiResult};
use crate::internal::with_circular_catch;
use crate::key::Key;
use crate::provider::ResolverContext;
use crate::traits::Dispose;

/// Object-safe resolution core.
///
/// Implemented by [`ServiceProvider`](crate::ServiceProvider),
/// [`Scope`](crate::Scope), and [`ResolverContext`](crate::ResolverContext).
/// Handles the type-erased mechanics: registry lookup, lifetime caching, and
/// circular dependency detection via the thread-local resolution stack.
/// Most callers want the generic methods on [`Resolver`] instead.
pub trait ResolverCore: Send + Sync {
    /// Resolves a single service as a type-erased `Arc`.
    fn resolve_any(&self, key: &Key) -> DiResult<Arc<dyn std::any::Any + Send + Sync>>;

    /// Registers a disposal hook with the surface that owns the current
    /// resolution (root provider or scope).
    fn push_disposer(&self, hook: Box<dyn FnOnce() + Send>);
}

/// Typed resolution interface.
///
/// Builds on [`ResolverCore`] to offer type-safe resolution of concrete
/// types and trait objects. Implemented by every resolution surface, so a
/// factory written against `&ResolverContext` behaves identically whether
/// the resolution started at the root provider or inside a scope.
///
/// # Examples
///
/// ```rust
/// use lattice_di::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// struct FixedClock;
/// impl Clock for FixedClock {
///     fn now(&self) -> u64 { 42 }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(8080u16);
/// services.add_singleton_trait::<dyn Clock>(Arc::new(FixedClock));
///
/// let provider = services.build();
/// assert_eq!(*provider.get_required::<u16>(), 8080);
/// assert_eq!(provider.get_required_trait::<dyn Clock>().now(), 42);
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves a concrete service type.
    fn get<T: 'static + Send + Sync>(&self) -> DiResult<Arc<T>> {
        let key = Key::Type(TypeId::of::<T>(), std::any::type_name::<T>());
        let any = self.resolve_any(&key)?;
        any.downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a trait object registered under `dyn T`.
    fn get_trait<T: ?Sized + 'static + Send + Sync>(&self) -> DiResult<Arc<T>>
    where
        Arc<T>: 'static,
    {
        let key = Key::Trait(std::any::type_name::<T>());
        let any = self.resolve_any(&key)?;
        // Trait objects are stored as Arc<Arc<dyn T>> inside the Any.
        any.downcast::<Arc<T>>()
            .map(|outer| (*outer).clone())
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a concrete type, panicking on failure.
    ///
    /// Use when the registration is part of the application's startup
    /// contract and a miss is a programming error.
    fn get_required<T: 'static + Send + Sync>(&self) -> Arc<T> {
        self.get::<T>()
            .unwrap_or_else(|e| panic!("Failed to resolve {}: {:?}", std::any::type_name::<T>(), e))
    }

    /// Resolves a trait object, panicking on failure.
    fn get_required_trait<T: ?Sized + 'static + Send + Sync>(&self) -> Arc<T>
    where
        Arc<T>: 'static,
    {
        self.get_trait::<T>().unwrap_or_else(|e| {
            panic!("Failed to resolve trait {}: {:?}", std::any::type_name::<T>(), e)
        })
    }

    /// Resolves a named concrete service.
    fn get_named<T: 'static + Send + Sync>(&self, name: &'static str) -> DiResult<Arc<T>> {
        let key = Key::TypeNamed(TypeId::of::<T>(), std::any::type_name::<T>(), name);
        let any = self.resolve_any(&key)?;
        any.downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a named concrete service, panicking on failure.
    fn get_named_required<T: 'static + Send + Sync>(&self, name: &'static str) -> Arc<T> {
        self.get_named::<T>(name).unwrap_or_else(|e| {
            panic!(
                "Failed to resolve named {} ({}): {:?}",
                std::any::type_name::<T>(),
                name,
                e
            )
        })
    }

    /// Resolves a named trait object.
    fn get_named_trait<T: ?Sized + 'static + Send + Sync>(
        &self,
        name: &'static str,
    ) -> DiResult<Arc<T>>
    where
        Arc<T>: 'static,
    {
        let key = Key::TraitNamed(std::any::type_name::<T>(), name);
        let any = self.resolve_any(&key)?;
        any.downcast::<Arc<T>>()
            .map(|outer| (*outer).clone())
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a registered binding for `T`, falling back to constructing
    /// `T` through its [`Construct`] implementation when nothing is bound.
    ///
    /// The fallback behaves like an implicit transient: each call builds a
    /// fresh instance, wiring `T`'s declared dependencies through this
    /// resolver. Trait objects cannot implement `Construct`, so an unbound
    /// interface still fails with [`DiError::NotFound`] — only concrete,
    /// self-describing types auto-wire.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lattice_di::{ServiceCollection, Construct, DiResult, Resolver, ResolverContext};
    /// use std::sync::Arc;
    ///
    /// struct Config { retries: u32 }
    ///
    /// struct Client { config: Arc<Config> }
    ///
    /// impl Construct for Client {
    ///     fn construct(ctx: &ResolverContext<'_>) -> DiResult<Self> {
    ///         Ok(Client { config: ctx.get::<Config>()? })
    ///     }
    /// }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(Config { retries: 3 });
    ///
    /// // Client itself is never registered.
    /// let provider = services.build();
    /// let client = provider.get_or_construct::<Client>().unwrap();
    /// assert_eq!(client.config.retries, 3);
    /// ```
    fn get_or_construct<T: Construct>(&self) -> DiResult<Arc<T>>
    where
        Self: Sized,
    {
        match self.get::<T>() {
            Err(DiError::NotFound(_)) => {
                let ctx = ResolverContext::new(self);
                with_circular_catch(std::any::type_name::<T>(), || {
                    T::construct(&ctx).map(Arc::new)
                })
            }
            other => other,
        }
    }

    /// Registers `service` for disposal when the owning provider or scope
    /// closes. Hooks run in LIFO order.
    fn register_disposer<T: Dispose + 'static>(&self, service: Arc<T>) {
        self.push_disposer(Box::new(move || service.dispose()));
    }
}
