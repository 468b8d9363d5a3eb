//! Self-describing construction for concrete types.

use crate::error::DiResult;
use crate::key::Key;
use crate::provider::ResolverContext;

/// A concrete type that knows how to build itself from a resolver.
///
/// `Construct` is the explicit, compile-time-wired counterpart of
/// reflection-based auto-wiring: instead of the container discovering
/// constructor parameters at runtime, the type declares its dependency list
/// and its construction recipe once, and the container uses both.
///
/// Implementing types gain two capabilities:
///
/// - registration without a hand-written closure via
///   [`add_constructed`](crate::ServiceCollection::add_constructed), which
///   also records [`dependencies`](Construct::dependencies) for validation
///   and graph export;
/// - resolution without any registration at all via
///   [`get_or_construct`](crate::Resolver::get_or_construct), which treats
///   the type as an implicit transient.
///
/// The `Sized` bound means trait objects can never implement `Construct`,
/// so an interface with no binding always fails resolution instead of being
/// silently conjured.
///
/// `dependencies` should list the keys `construct` resolves, in the order
/// the constructor consumes them. The container does not enforce the match;
/// validation and graph export are only as accurate as the declaration.
///
/// # Examples
///
/// ```rust
/// use lattice_di::{
///     key_of_type, Construct, DiResult, Key, Resolver, ResolverContext, ServiceCollection,
///     Lifetime,
/// };
/// use std::sync::Arc;
///
/// struct Database { url: String }
///
/// struct UserRepo {
///     db: Arc<Database>,
/// }
///
/// impl Construct for UserRepo {
///     fn dependencies() -> Vec<Key> {
///         vec![key_of_type::<Database>()]
///     }
///
///     fn construct(ctx: &ResolverContext<'_>) -> DiResult<Self> {
///         Ok(UserRepo { db: ctx.get::<Database>()? })
///     }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Database { url: "postgres://localhost".to_string() });
/// services.add_constructed::<UserRepo>(Lifetime::Scoped);
///
/// let provider = services.build();
/// let scope = provider.create_scope();
/// let repo = scope.get_required::<UserRepo>();
/// assert_eq!(repo.db.url, "postgres://localhost");
/// ```
pub trait Construct: Sized + Send + Sync + 'static {
    /// Keys of the services `construct` resolves, in constructor-parameter
    /// order. Defaults to no dependencies.
    fn dependencies() -> Vec<Key> {
        Vec::new()
    }

    /// Builds an instance, pulling dependencies through `ctx`.
    fn construct(ctx: &ResolverContext<'_>) -> DiResult<Self>;
}
