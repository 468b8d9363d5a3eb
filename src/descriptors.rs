//! Service descriptors for introspection.

use std::any::TypeId;

use crate::key::Key;
use crate::lifetime::Lifetime;

/// Snapshot of one registration, for diagnostics and tooling.
///
/// Descriptors expose what the container knows about a binding without
/// touching any cached instance: the key, the lifetime policy, the concrete
/// implementation type when one is known, and the declared dependency list
/// for [`Construct`](crate::Construct)-registered services.
///
/// # Examples
///
/// ```rust
/// use lattice_di::{ServiceCollection, Lifetime};
///
/// struct Cache;
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(5u32);
/// services.add_scoped_factory::<Cache, _>(|_| Cache);
///
/// let descriptors = services.service_descriptors();
/// assert_eq!(descriptors.len(), 2);
///
/// let cache = descriptors
///     .iter()
///     .find(|d| d.type_name().contains("Cache"))
///     .unwrap();
/// assert_eq!(cache.lifetime, Lifetime::Scoped);
/// ```
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    /// Registration key.
    pub key: Key,
    /// Lifetime policy of the binding.
    pub lifetime: Lifetime,
    /// Concrete implementation `TypeId`, when known.
    pub impl_type_id: Option<TypeId>,
    /// Declared dependency keys in constructor-parameter order; empty when
    /// the producer is an opaque closure.
    pub dependencies: Vec<Key>,
}

impl ServiceDescriptor {
    /// Human-readable type or trait name for this registration.
    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }

    /// Symbolic name for named registrations, `None` otherwise.
    pub fn service_name(&self) -> Option<&'static str> {
        self.key.service_name()
    }

    /// Whether this descriptor belongs to a named registration.
    pub fn is_named(&self) -> bool {
        self.service_name().is_some()
    }

    /// Display names of the declared dependencies.
    pub fn dependency_names(&self) -> Vec<&'static str> {
        self.dependencies.iter().map(|k| k.display_name()).collect()
    }
}
