//! Modular service registration.
//!
//! A [`ServiceModule`] bundles the registrations for one subsystem, the way
//! a framework's service provider class does: the host composes modules at
//! startup instead of listing every binding in one place.

use crate::{DiResult, ServiceCollection};

/// A reusable unit of service registrations.
///
/// # Examples
///
/// ```rust
/// use lattice_di::{DiResult, Resolver, ServiceCollection, ServiceCollectionExt, ServiceModule};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// struct StorageModule {
///     url: &'static str,
/// }
///
/// impl ServiceModule for StorageModule {
///     fn register_services(self, services: &mut ServiceCollection) -> DiResult<()> {
///         services.add_singleton(Database { url: self.url.to_string() });
///         services.add_scoped_factory::<UserService, _>(|r| UserService {
///             db: r.get_required::<Database>(),
///         });
///         Ok(())
///     }
/// }
///
/// # fn main() -> DiResult<()> {
/// let mut services = ServiceCollection::new();
/// services.add_module(StorageModule { url: "postgres://localhost" })?;
/// let provider = services.build();
/// # Ok(())
/// # }
/// ```
pub trait ServiceModule {
    /// Registers this module's services.
    fn register_services(self, services: &mut ServiceCollection) -> DiResult<()>;
}

/// Extension adding module registration to [`ServiceCollection`].
pub trait ServiceCollectionExt {
    /// Applies a module's registrations in place, returning `&mut Self`
    /// for chaining.
    fn add_module<M: ServiceModule>(&mut self, module: M) -> DiResult<&mut Self>;
}

impl ServiceCollectionExt for ServiceCollection {
    fn add_module<M: ServiceModule>(&mut self, module: M) -> DiResult<&mut Self> {
        module.register_services(self)?;
        Ok(self)
    }
}
