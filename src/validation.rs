//! Startup validation of container configuration.
//!
//! Validation walks the registry's declared dependency lists and reports
//! configuration mistakes before the first resolution: missing bindings,
//! lifetime captivity, and cycles. Only dependencies declared through
//! [`Construct`](crate::Construct) registrations participate — closure
//! factories are opaque to static analysis, and their mistakes surface at
//! resolution time instead.

use std::collections::HashSet;
use std::fmt;

use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::Registry;

/// One problem found in the container configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// A declared dependency has no binding.
    MissingDependency {
        service: &'static str,
        dependency: &'static str,
    },
    /// A singleton declares a scoped dependency. The scoped instance would
    /// be captured at first resolution and outlive every scope, which
    /// breaks the scoped contract.
    CaptiveDependency {
        service: &'static str,
        dependency: &'static str,
    },
    /// A singleton declares a transient dependency: the "fresh instance
    /// every time" expectation quietly becomes "one instance forever".
    SingletonHoldsTransient {
        service: &'static str,
        dependency: &'static str,
    },
    /// The declared dependency graph contains a cycle.
    DependencyCycle { path: Vec<&'static str> },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingDependency {
                service,
                dependency,
            } => write!(f, "{} depends on unregistered service {}", service, dependency),
            ValidationIssue::CaptiveDependency {
                service,
                dependency,
            } => write!(
                f,
                "singleton {} depends on scoped service {}",
                service, dependency
            ),
            ValidationIssue::SingletonHoldsTransient {
                service,
                dependency,
            } => write!(
                f,
                "singleton {} holds transient {} for the process lifetime",
                service, dependency
            ),
            ValidationIssue::DependencyCycle { path } => {
                write!(f, "dependency cycle: {}", path.join(" -> "))
            }
        }
    }
}

/// Outcome of a validation pass.
///
/// # Examples
///
/// ```rust
/// use lattice_di::{
///     key_of_type, Construct, DiResult, Key, Lifetime, Resolver, ResolverContext,
///     ServiceCollection,
/// };
/// use std::sync::Arc;
///
/// struct Session;
///
/// struct Tracker {
///     session: Arc<Session>,
/// }
///
/// impl Construct for Tracker {
///     fn dependencies() -> Vec<Key> {
///         vec![key_of_type::<Session>()]
///     }
///     fn construct(ctx: &ResolverContext<'_>) -> DiResult<Self> {
///         Ok(Tracker { session: ctx.get::<Session>()? })
///     }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_scoped_factory::<Session, _>(|_| Session);
/// services.add_constructed::<Tracker>(Lifetime::Singleton); // captive!
///
/// let report = services.validate();
/// assert!(!report.is_valid());
/// ```
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Configurations that will misbehave or fail at resolution time.
    pub errors: Vec<ValidationIssue>,
    /// Configurations that work but probably don't mean what they say.
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// True when no errors were found (warnings allowed).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Renders every issue, one per line, errors first.
    pub fn format_issues(&self) -> String {
        let mut out = String::new();
        for issue in &self.errors {
            out.push_str(&format!("error: {}\n", issue));
        }
        for issue in &self.warnings {
            out.push_str(&format!("warning: {}\n", issue));
        }
        out
    }
}

pub(crate) fn validate_registry(registry: &Registry) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (key, registration) in registry.iter() {
        let service = key.display_name();
        for dep_key in &registration.dependencies {
            let dependency = dep_key.display_name();
            match registry.get(dep_key) {
                None => report.errors.push(ValidationIssue::MissingDependency {
                    service,
                    dependency,
                }),
                Some(dep) => match (registration.lifetime, dep.lifetime) {
                    (Lifetime::Singleton, Lifetime::Scoped) => {
                        report.errors.push(ValidationIssue::CaptiveDependency {
                            service,
                            dependency,
                        })
                    }
                    (Lifetime::Singleton, Lifetime::Transient) => {
                        report.warnings.push(ValidationIssue::SingletonHoldsTransient {
                            service,
                            dependency,
                        })
                    }
                    _ => {}
                },
            }
        }
    }

    find_cycles(registry, &mut report);
    report
}

fn find_cycles(registry: &Registry, report: &mut ValidationReport) {
    let mut finished: HashSet<Key> = HashSet::new();

    for (key, _) in registry.iter() {
        if !finished.contains(key) {
            let mut path: Vec<Key> = Vec::new();
            visit(registry, key, &mut path, &mut finished, report);
        }
    }
}

fn visit(
    registry: &Registry,
    key: &Key,
    path: &mut Vec<Key>,
    finished: &mut HashSet<Key>,
    report: &mut ValidationReport,
) {
    if let Some(pos) = path.iter().position(|k| k == key) {
        let mut cycle: Vec<&'static str> =
            path[pos..].iter().map(|k| k.display_name()).collect();
        cycle.push(key.display_name());
        report
            .errors
            .push(ValidationIssue::DependencyCycle { path: cycle });
        return;
    }
    if finished.contains(key) {
        return;
    }

    if let Some(registration) = registry.get(key) {
        path.push(key.clone());
        for dep in &registration.dependencies {
            visit(registry, dep, path, finished, report);
        }
        path.pop();
    }

    finished.insert(key.clone());
}
