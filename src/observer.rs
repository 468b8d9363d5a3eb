//! Resolution observers: tracing and metrics hooks.
//!
//! Observers are registered on the [`ServiceCollection`](crate::ServiceCollection)
//! before build and receive a callback around every resolution the provider
//! or any of its scopes performs. They are the container's logging and
//! monitoring seam; the resolver itself stays silent.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::key::Key;

/// Hook into resolution events.
///
/// All methods default to no-ops so implementations override only what they
/// need. Callbacks run synchronously on the resolving thread; keep them
/// cheap.
///
/// # Examples
///
/// ```rust
/// use lattice_di::{DiObserver, Key, ServiceCollection, Resolver};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct CountingObserver {
///     seen: AtomicUsize,
/// }
///
/// impl DiObserver for CountingObserver {
///     fn resolved(&self, _key: &Key, _duration: Duration) {
///         self.seen.fetch_add(1, Ordering::Relaxed);
///     }
/// }
///
/// let observer = Arc::new(CountingObserver::default());
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(1u8);
/// services.add_observer(observer.clone());
///
/// let provider = services.build();
/// let _ = provider.get_required::<u8>();
/// assert_eq!(observer.seen.load(Ordering::Relaxed), 1);
/// ```
pub trait DiObserver: Send + Sync {
    /// A resolution for `key` is starting.
    fn resolving(&self, key: &Key) {
        let _ = key;
    }

    /// The resolution for `key` completed successfully.
    fn resolved(&self, key: &Key, duration: Duration) {
        let _ = (key, duration);
    }

    /// The resolution for `key` failed.
    fn resolution_failed(&self, key: &Key, error: &DiError) {
        let _ = (key, error);
    }
}

/// Fan-out over all registered observers.
pub(crate) struct Observers {
    list: Vec<Arc<dyn DiObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self { list: Vec::new() }
    }

    pub(crate) fn push(&mut self, observer: Arc<dyn DiObserver>) {
        self.list.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.list.is_empty()
    }

    pub(crate) fn resolving(&self, key: &Key) {
        for observer in &self.list {
            observer.resolving(key);
        }
    }

    pub(crate) fn resolved(&self, key: &Key, duration: Duration) {
        for observer in &self.list {
            observer.resolved(key, duration);
        }
    }

    pub(crate) fn resolution_failed(&self, key: &Key, error: &DiError) {
        for observer in &self.list {
            observer.resolution_failed(key, error);
        }
    }
}

/// Observer that emits resolution events through the [`log`] facade.
///
/// Successful resolutions log at `debug`, resolution starts at `trace`,
/// failures at `warn`. Install a logger implementation (e.g. `env_logger`)
/// in the host binary to see the output.
pub struct LoggingObserver {
    target: &'static str,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self {
            target: "lattice_di",
        }
    }

    /// Uses a custom log target instead of `lattice_di`.
    pub fn with_target(target: &'static str) -> Self {
        Self { target }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for LoggingObserver {
    fn resolving(&self, key: &Key) {
        log::trace!(target: self.target, "resolving {}", key.display_name());
    }

    fn resolved(&self, key: &Key, duration: Duration) {
        log::debug!(
            target: self.target,
            "resolved {} in {:?}",
            key.display_name(),
            duration
        );
    }

    fn resolution_failed(&self, key: &Key, error: &DiError) {
        log::warn!(
            target: self.target,
            "resolution of {} failed: {}",
            key.display_name(),
            error
        );
    }
}

/// Observer that counts resolutions with atomic counters.
///
/// Share the `Arc` with your monitoring code and read a
/// [`MetricsSnapshot`] whenever needed.
///
/// # Examples
///
/// ```rust
/// use lattice_di::{MetricsObserver, ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// let metrics = Arc::new(MetricsObserver::new());
///
/// let mut services = ServiceCollection::new();
/// services.add_transient_factory::<u64, _>(|_| 9);
/// services.add_observer(metrics.clone());
///
/// let provider = services.build();
/// let _ = provider.get_required::<u64>();
/// let _ = provider.get::<String>(); // not registered
///
/// let snapshot = metrics.snapshot();
/// assert_eq!(snapshot.completed, 1);
/// assert_eq!(snapshot.failed, 1);
/// ```
pub struct MetricsObserver {
    started: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    total_nanos: AtomicU64,
}

/// Point-in-time view of a [`MetricsObserver`]'s counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Resolutions started.
    pub started: u64,
    /// Resolutions that returned an instance.
    pub completed: u64,
    /// Resolutions that returned an error.
    pub failed: u64,
    /// Wall-clock time spent in successful resolutions.
    pub total_time: Duration,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self {
            started: AtomicU64::new(0),
            completed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            total_nanos: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            started: self.started.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            total_time: Duration::from_nanos(self.total_nanos.load(Ordering::Relaxed)),
        }
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for MetricsObserver {
    fn resolving(&self, _key: &Key) {
        self.started.fetch_add(1, Ordering::Relaxed);
    }

    fn resolved(&self, _key: &Key, duration: Duration) {
        self.completed.fetch_add(1, Ordering::Relaxed);
        self.total_nanos
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    fn resolution_failed(&self, _key: &Key, _error: &DiError) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }
}
