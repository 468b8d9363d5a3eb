//! Scoped resolution: the unit-of-work surface.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{DiError, DiResult};
use crate::internal::{with_circular_catch, DisposeBag, InitCell};
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::{AnyArc, Map};
use crate::traits::{Resolver, ResolverCore};

use super::{ResolverContext, ServiceProvider};

/// One unit of work's resolution context.
///
/// A scope partitions the container's scoped cache: the first in-scope
/// resolution of a scoped service creates the instance, later resolutions in
/// the same scope return it, and other scopes never see it. Singletons
/// resolve through to the shared root cache; transients are always fresh.
///
/// The scope must be closed when the unit of work ends —
/// [`close`](Scope::close) runs the scope's disposal hooks and discards the
/// cache. Closing is idempotent, happens automatically on drop, and flips
/// the scope into a state where further scoped resolution fails rather than
/// silently producing instances that nothing will clean up.
/// [`ServiceProvider::with_scope`] brackets all of this for the common case.
///
/// # Examples
///
/// ```rust
/// use lattice_di::{ServiceCollection, Resolver};
/// use std::sync::{Arc, Mutex};
///
/// struct RequestId(u32);
///
/// let counter = Arc::new(Mutex::new(0));
/// let counter_in_factory = counter.clone();
///
/// let mut services = ServiceCollection::new();
/// services.add_scoped_factory::<RequestId, _>(move |_| {
///     let mut c = counter_in_factory.lock().unwrap();
///     *c += 1;
///     RequestId(*c)
/// });
///
/// let provider = services.build();
///
/// let scope1 = provider.create_scope();
/// let scope2 = provider.create_scope();
///
/// let a = scope1.get_required::<RequestId>();
/// let b = scope1.get_required::<RequestId>();
/// let c = scope2.get_required::<RequestId>();
///
/// assert!(Arc::ptr_eq(&a, &b)); // same scope, same instance
/// assert!(!Arc::ptr_eq(&a, &c)); // different scope, different instance
///
/// scope1.close();
/// scope2.close();
/// ```
pub struct Scope {
    root: ServiceProvider,
    // Per-key init cells; the cell is cloned out before the producer runs
    // so the map lock never wraps user code.
    scoped: Mutex<Map<Key, Arc<InitCell>>>,
    closed: AtomicBool,
    disposers: Mutex<DisposeBag>,
}

impl Scope {
    pub(crate) fn new(root: ServiceProvider) -> Self {
        Self {
            root,
            scoped: Mutex::new(Map::default()),
            closed: AtomicBool::new(false),
            disposers: Mutex::new(DisposeBag::default()),
        }
    }

    /// Ends the unit of work: runs the scope's disposal hooks in LIFO
    /// order and discards every scoped instance. Safe to call more than
    /// once; only the first call does the work.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.disposers.lock().unwrap().run_all_reverse();
        self.scoped.lock().unwrap().clear();
    }

    /// Whether [`close`](Self::close) has run.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Whether a scoped instance for `key` exists in this scope.
    pub fn has_scoped(&self, key: &Key) -> bool {
        self.scoped
            .lock()
            .unwrap()
            .get(key)
            .map(|cell| cell.is_initialized())
            .unwrap_or(false)
    }

    /// Typed convenience for [`has_scoped`](Self::has_scoped).
    pub fn has_scoped_of<T: 'static>(&self) -> bool {
        self.has_scoped(&crate::key::key_of_type::<T>())
    }

    fn resolve_scoped(&self, key: &Key, binding: &super::ResolvedBinding) -> DiResult<AnyArc> {
        if self.is_closed() {
            return Err(DiError::WrongLifetime(
                "cannot resolve a scoped service from a closed scope",
            ));
        }

        let cell = {
            let mut scoped = self.scoped.lock().unwrap();
            scoped
                .entry(key.clone())
                .or_insert_with(|| Arc::new(InitCell::new()))
                .clone()
        };

        cell.get_or_try_init(|| {
            let ctx = ResolverContext::new(self);
            (binding.ctor)(&ctx)
        })
    }

    fn resolve_any_impl(&self, key: &Key) -> DiResult<AnyArc> {
        match self.root.binding_of(key) {
            Some(binding) => match binding.lifetime {
                // Singletons share the root cache; their dependency lookups
                // go through the root, never through this scope.
                Lifetime::Singleton => self.root.resolve_singleton(&binding),
                Lifetime::Scoped => self.resolve_scoped(key, &binding),
                Lifetime::Transient => {
                    let ctx = ResolverContext::new(self);
                    (binding.ctor)(&ctx)
                }
            },
            None => Err(DiError::NotFound(key.display_name())),
        }
    }
}

impl ResolverCore for Scope {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        let name = key.display_name();
        self.root.observed_resolve(key, || {
            with_circular_catch(name, || self.resolve_any_impl(key))
        })
    }

    fn push_disposer(&self, hook: Box<dyn FnOnce() + Send>) {
        self.disposers.lock().unwrap().push(hook);
    }
}

impl Resolver for Scope {}

impl Drop for Scope {
    fn drop(&mut self) {
        if !self.is_closed() {
            log::trace!(target: "lattice_di", "scope dropped without close(); closing now");
            self.close();
        }
    }
}
