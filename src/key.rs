//! Service identifier types.

use std::any::TypeId;

/// Identifier under which a service is registered and resolved.
///
/// A key names a service contract: a concrete type, a trait object, or a
/// named ("symbolic") variant of either for cases where several registrations
/// of the same contract must coexist. Each key has at most one active binding
/// in a registry; re-registering under the same key replaces the previous
/// binding.
///
/// Concrete-type keys carry both the `TypeId` (used for lookup) and the
/// `std::any::type_name` string (used for diagnostics and error paths).
/// Trait objects have no `TypeId` of their own, so trait keys are compared
/// by name alone.
///
/// # Examples
///
/// ```rust
/// use lattice_di::{Key, key_of_type, key_of_trait};
///
/// trait Mailer: Send + Sync {}
///
/// struct SmtpMailer;
///
/// let type_key = key_of_type::<SmtpMailer>();
/// let trait_key = key_of_trait::<dyn Mailer>();
///
/// assert!(type_key.display_name().contains("SmtpMailer"));
/// assert!(trait_key.display_name().contains("Mailer"));
/// assert_ne!(type_key, trait_key);
/// ```
#[derive(Debug, Clone)]
pub enum Key {
    /// Concrete type, identified by `TypeId` with the type name for display.
    Type(TypeId, &'static str),
    /// Trait object, identified by the trait's type name.
    Trait(&'static str),
    /// Named concrete type: same contract, distinguished by a symbolic name.
    TypeNamed(TypeId, &'static str, &'static str),
    /// Named trait object.
    TraitNamed(&'static str, &'static str),
}

impl Key {
    /// Human-readable type or trait name, as produced by `std::any::type_name`.
    pub fn display_name(&self) -> &'static str {
        match self {
            Key::Type(_, name) => name,
            Key::Trait(name) => name,
            Key::TypeNamed(_, name, _) => name,
            Key::TraitNamed(name, _) => name,
        }
    }

    /// The symbolic name for named registrations, `None` for unnamed ones.
    ///
    /// ```rust
    /// use lattice_di::Key;
    /// use std::any::TypeId;
    ///
    /// let plain = Key::Type(TypeId::of::<u32>(), "u32");
    /// assert_eq!(plain.service_name(), None);
    ///
    /// let named = Key::TypeNamed(TypeId::of::<u32>(), "u32", "max_connections");
    /// assert_eq!(named.service_name(), Some("max_connections"));
    /// ```
    pub fn service_name(&self) -> Option<&'static str> {
        match self {
            Key::Type(_, _) | Key::Trait(_) => None,
            Key::TypeNamed(_, _, name) => Some(name),
            Key::TraitNamed(_, name) => Some(name),
        }
    }
}

// Equality and hashing compare TypeId first for concrete types; the display
// string is carried for diagnostics only.
impl PartialEq for Key {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Type(a, _), Key::Type(b, _)) => a == b,
            (Key::Trait(a), Key::Trait(b)) => a == b,
            (Key::TypeNamed(a, _, an), Key::TypeNamed(b, _, bn)) => a == b && an == bn,
            (Key::TraitNamed(a, an), Key::TraitNamed(b, bn)) => a == b && an == bn,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl std::hash::Hash for Key {
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Key::Type(id, _) => {
                0u8.hash(state);
                id.hash(state);
            }
            Key::Trait(name) => {
                1u8.hash(state);
                name.hash(state);
            }
            Key::TypeNamed(id, _, name) => {
                2u8.hash(state);
                id.hash(state);
                name.hash(state);
            }
            Key::TraitNamed(trait_name, name) => {
                3u8.hash(state);
                trait_name.hash(state);
                name.hash(state);
            }
        }
    }
}

impl PartialOrd for Key {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        fn rank(key: &Key) -> u8 {
            match key {
                Key::Type(_, _) => 0,
                Key::TypeNamed(_, _, _) => 1,
                Key::Trait(_) => 2,
                Key::TraitNamed(_, _) => 3,
            }
        }

        match (self, other) {
            (Key::Type(a, _), Key::Type(b, _)) => a.cmp(b),
            (Key::TypeNamed(a, _, an), Key::TypeNamed(b, _, bn)) => {
                a.cmp(b).then_with(|| an.cmp(bn))
            }
            (Key::Trait(a), Key::Trait(b)) => a.cmp(b),
            (Key::TraitNamed(a, an), Key::TraitNamed(b, bn)) => {
                a.cmp(b).then_with(|| an.cmp(bn))
            }
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

/// Builds the registry key for a concrete type.
#[inline]
pub fn key_of_type<T: 'static>() -> Key {
    Key::Type(TypeId::of::<T>(), std::any::type_name::<T>())
}

/// Builds the registry key for a trait object.
///
/// Useful when declaring dependency lists for
/// [`Construct`](crate::Construct) implementations that depend on
/// trait-bound services.
#[inline]
pub fn key_of_trait<T: ?Sized + 'static>() -> Key {
    Key::Trait(std::any::type_name::<T>())
}
