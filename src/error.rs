//! Error types for the dependency injection container.

use std::fmt;
use std::sync::Arc;

/// Errors surfaced by registration and resolution.
///
/// Every error is returned synchronously from the resolving call; the
/// container never substitutes a default instance or silently recovers.
/// A failure anywhere in a dependency chain aborts the entire resolution of
/// the parent, and nothing partially constructed is cached.
///
/// # Examples
///
/// ```rust
/// use lattice_di::{DiError, ServiceCollection, Resolver};
///
/// let provider = ServiceCollection::new().build();
/// match provider.get::<String>() {
///     Err(DiError::NotFound(name)) => assert_eq!(name, "alloc::string::String"),
///     other => panic!("expected NotFound, got {:?}", other),
/// }
/// ```
#[derive(Debug, Clone)]
pub enum DiError {
    /// No binding registered for the requested identifier.
    NotFound(&'static str),
    /// A cached or produced instance could not be downcast to the requested type.
    TypeMismatch(&'static str),
    /// Circular dependency detected; carries the full identifier path,
    /// first and last entry being the repeated service.
    Circular(Vec<&'static str>),
    /// Resolution attempted under an invalid scope, e.g. a scoped service
    /// requested from the root provider or from a closed scope.
    WrongLifetime(&'static str),
    /// The resolution stack grew past the recursion limit.
    DepthExceeded(usize),
    /// The producer for the named service returned an error. The source
    /// error is preserved so callers can walk the causal chain.
    Producer(&'static str, Arc<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::NotFound(name) => write!(f, "Service not found: {}", name),
            DiError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            DiError::Circular(path) => {
                write!(f, "Circular dependency: {}", path.join(" -> "))
            }
            DiError::WrongLifetime(msg) => write!(f, "Lifetime error: {}", msg),
            DiError::DepthExceeded(depth) => write!(f, "Max depth {} exceeded", depth),
            DiError::Producer(name, source) => {
                write!(f, "Producer for {} failed: {}", name, source)
            }
        }
    }
}

impl std::error::Error for DiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiError::Producer(_, source) => {
                let source: &(dyn std::error::Error + 'static) = source.as_ref();
                Some(source)
            }
            _ => None,
        }
    }
}

/// Result alias used throughout the crate.
///
/// ```rust
/// use lattice_di::{DiResult, DiError};
///
/// fn lookup() -> DiResult<u32> {
///     Err(DiError::NotFound("u32"))
/// }
///
/// assert!(lookup().is_err());
/// ```
pub type DiResult<T> = Result<T, DiError>;
