//! Service registration storage.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::DiResult;
use crate::internal::InitCell;
use crate::key::Key;
use crate::lifetime::Lifetime;

pub(crate) use crate::provider::ResolverContext;

// Type-erased Arc for instance storage.
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

// Type-erased producer. Receives a resolver context through which it pulls
// its dependencies, in constructor-parameter order.
pub(crate) type Ctor = Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<AnyArc> + Send + Sync>;

#[cfg(feature = "ahash")]
pub(crate) type Map<K, V> = HashMap<K, V, ahash::RandomState>;
#[cfg(not(feature = "ahash"))]
pub(crate) type Map<K, V> = HashMap<K, V>;

/// One binding: lifetime policy, producer, and introspection metadata.
pub(crate) struct Registration {
    pub(crate) lifetime: Lifetime,
    pub(crate) ctor: Ctor,
    /// Concrete implementation type, when known (concrete registrations).
    pub(crate) impl_id: Option<TypeId>,
    /// Declared dependency keys in constructor-parameter order. Populated
    /// for `Construct`-registered services; empty when the producer is an
    /// opaque closure.
    pub(crate) dependencies: Vec<Key>,
    /// Singleton instance cell. Each registration carries its own cell, so
    /// replacing a binding starts from an empty cache while instances
    /// resolved under the old binding stay alive with their holders.
    pub(crate) single: Option<Arc<InitCell>>,
}

impl Registration {
    pub(crate) fn new(lifetime: Lifetime, ctor: Ctor) -> Self {
        let single = match lifetime {
            Lifetime::Singleton => Some(Arc::new(InitCell::new())),
            _ => None,
        };
        Self {
            lifetime,
            ctor,
            impl_id: None,
            dependencies: Vec::new(),
            single,
        }
    }

    pub(crate) fn with_impl(lifetime: Lifetime, ctor: Ctor, impl_id: Option<TypeId>) -> Self {
        let mut registration = Self::new(lifetime, ctor);
        registration.impl_id = impl_id;
        registration
    }

    pub(crate) fn with_dependencies(mut self, dependencies: Vec<Key>) -> Self {
        self.dependencies = dependencies;
        self
    }
}

// Vec lookup beats HashMap below this size; containers rarely exceed it.
const SMALL_THRESHOLD: usize = 16;

/// Binding storage: a small Vec scanned linearly, spilling into a HashMap
/// once the threshold is crossed. Insertion replaces an existing binding for
/// the same key wherever it lives (last registration wins).
pub(crate) struct Registry {
    small: Vec<(Key, Registration)>,
    large: Map<Key, Registration>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            small: Vec::new(),
            large: Map::default(),
        }
    }

    pub(crate) fn insert(&mut self, key: Key, registration: Registration) {
        if let Some(pos) = self.small.iter().position(|(k, _)| k == &key) {
            self.small[pos] = (key, registration);
        } else if self.large.contains_key(&key) || self.small.len() >= SMALL_THRESHOLD {
            self.large.insert(key, registration);
        } else {
            self.small.push((key, registration));
        }
    }

    #[inline]
    pub(crate) fn get(&self, key: &Key) -> Option<&Registration> {
        for (k, registration) in &self.small {
            if k == key {
                return Some(registration);
            }
        }
        self.large.get(key)
    }

    #[inline]
    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.get(key).is_some()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Key, &Registration)> {
        self.small
            .iter()
            .map(|(k, r)| (k, r))
            .chain(self.large.iter())
    }

    pub(crate) fn len(&self) -> usize {
        self.small.len() + self.large.len()
    }
}
