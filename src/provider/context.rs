//! Resolver context passed to producers.

use crate::traits::{Resolver, ResolverCore};

/// The resolver handle a producer receives.
///
/// Wraps whichever surface started the resolution — root provider or scope —
/// behind one type, so a factory works identically in both settings and
/// dependency lookups stay within the correct scope. A factory resolving a
/// scoped dependency succeeds when the resolution came through a scope and
/// fails with a lifetime error when it came through the root provider.
///
/// # Examples
///
/// ```rust
/// use lattice_di::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Settings { name: &'static str }
/// struct App { settings: Arc<Settings> }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Settings { name: "demo" });
/// services.add_transient_factory::<App, _>(|ctx| App {
///     settings: ctx.get_required::<Settings>(),
/// });
///
/// let provider = services.build();
/// assert_eq!(provider.get_required::<App>().settings.name, "demo");
/// ```
pub struct ResolverContext<'a> {
    resolver: &'a dyn ResolverCore,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new<T: ResolverCore>(resolver: &'a T) -> Self {
        Self { resolver }
    }
}

impl<'a> ResolverCore for ResolverContext<'a> {
    fn resolve_any(
        &self,
        key: &crate::Key,
    ) -> crate::DiResult<std::sync::Arc<dyn std::any::Any + Send + Sync>> {
        self.resolver.resolve_any(key)
    }

    fn push_disposer(&self, hook: Box<dyn FnOnce() + Send>) {
        self.resolver.push_disposer(hook);
    }
}

impl<'a> Resolver for ResolverContext<'a> {}
