//! Disposal hook trait.

/// Cleanup hook for services that hold releasable resources.
///
/// Factories register instances with
/// [`register_disposer`](crate::Resolver::register_disposer); the owning
/// provider or scope runs the hooks in LIFO order when it closes. Disposal
/// is synchronous, matching the container's synchronous resolution model.
///
/// # Examples
///
/// ```rust
/// use lattice_di::{ServiceCollection, Dispose, Resolver};
/// use std::sync::Arc;
///
/// struct Connection { id: u32 }
///
/// impl Dispose for Connection {
///     fn dispose(&self) {
///         // close the underlying handle
///     }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_scoped_factory::<Connection, _>(|r| {
///     let conn = Arc::new(Connection { id: 1 });
///     r.register_disposer(conn.clone());
///     Connection { id: 1 }
/// });
///
/// let provider = services.build();
/// let scope = provider.create_scope();
/// let _conn = scope.get_required::<Connection>();
/// scope.close(); // runs Connection::dispose
/// ```
pub trait Dispose: Send + Sync {
    /// Releases whatever the service holds. Called at most once per
    /// registered hook.
    fn dispose(&self);
}
