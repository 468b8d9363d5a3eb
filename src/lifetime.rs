//! Service lifetime policies.

/// Lifetime policy controlling how instances are cached and shared.
///
/// The lifetime attached to a registration decides what the container does
/// with the instance a producer returns: cache it for the whole process,
/// cache it for one unit of work, or hand it to the caller and forget it.
///
/// # Examples
///
/// ```rust
/// use lattice_di::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct Session { id: u32 }
/// struct Report;
///
/// let mut services = ServiceCollection::new();
///
/// // Singleton: one instance for the whole process.
/// services.add_singleton(Database { url: "postgres://localhost".to_string() });
///
/// // Scoped: one instance per scope (unit of work).
/// services.add_scoped_factory::<Session, _>(|_| Session { id: 7 });
///
/// // Transient: a fresh instance on every resolution.
/// services.add_transient_factory::<Report, _>(|_| Report);
///
/// let provider = services.build();
///
/// let db1 = provider.get_required::<Database>();
/// let scope = provider.create_scope();
/// let db2 = scope.get_required::<Database>();
/// assert!(Arc::ptr_eq(&db1, &db2)); // singletons cross scope boundaries
///
/// let s1 = scope.get_required::<Session>();
/// let s2 = scope.get_required::<Session>();
/// assert!(Arc::ptr_eq(&s1, &s2)); // scoped instances are reused in-scope
///
/// let r1 = scope.get_required::<Report>();
/// let r2 = scope.get_required::<Report>();
/// assert!(!Arc::ptr_eq(&r1, &r2)); // transients never repeat
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// One instance per provider, created on first resolution and cached for
    /// the process lifetime. All scopes and threads observe the same instance.
    Singleton,
    /// One instance per [`Scope`](crate::Scope), created on the scope's first
    /// resolution and discarded when the scope closes.
    Scoped,
    /// A new instance on every resolution. The container never caches
    /// transients; ownership passes entirely to the caller.
    Transient,
}

impl Lifetime {
    /// Lowercase label used in diagnostics and graph exports.
    pub fn label(&self) -> &'static str {
        match self {
            Lifetime::Singleton => "singleton",
            Lifetime::Scoped => "scoped",
            Lifetime::Transient => "transient",
        }
    }
}
