//! # lattice-di
//!
//! Lifetime-aware dependency injection for Rust: a registry of service
//! bindings, a recursive resolver with circular-dependency detection, and
//! three lifetime policies — transient, singleton, and request-scoped —
//! whose caching behavior is explicit, observable, and testable.
//!
//! ## Features
//!
//! - **Three lifetimes**: `Singleton` (one per provider), `Scoped` (one per
//!   unit of work), `Transient` (always fresh)
//! - **Trait bindings**: resolve `dyn Trait` contracts backed by any
//!   implementation
//! - **Thread-safe**: singleton first-resolution races are serialized per
//!   identifier; all instances are shared as `Arc`s
//! - **Circular dependency detection**: fails with the full identifier
//!   path instead of overflowing the stack
//! - **Scoped isolation**: per-scope caches with LIFO disposal on close
//! - **Runtime rebinding**: synchronized last-wins replacement for test and
//!   startup configuration
//! - **Introspection**: descriptors, cache-state queries, validation, and
//!   optional dependency-graph export
//!
//! ## Quick start
//!
//! ```rust
//! use lattice_di::{ServiceCollection, Resolver};
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! let mut services = ServiceCollection::new();
//! services.add_singleton(Database {
//!     url: "postgres://localhost".to_string(),
//! });
//! services.add_transient_factory::<UserService, _>(|r| UserService {
//!     db: r.get_required::<Database>(),
//! });
//!
//! let provider = services.build();
//! let user_service = provider.get_required::<UserService>();
//! assert_eq!(user_service.db.url, "postgres://localhost");
//! ```
//!
//! ## Units of work
//!
//! Scoped services model per-request state. The hosting layer creates a
//! [`Scope`] when a unit of work starts, resolves through it, and closes it
//! when the unit of work ends:
//!
//! ```rust
//! use lattice_di::{ServiceCollection, Resolver};
//! use std::sync::{Arc, Mutex};
//!
//! struct Session(u32);
//!
//! let counter = Arc::new(Mutex::new(0));
//! let counter_in_factory = counter.clone();
//!
//! let mut services = ServiceCollection::new();
//! services.add_scoped_factory::<Session, _>(move |_| {
//!     let mut c = counter_in_factory.lock().unwrap();
//!     *c += 1;
//!     Session(*c)
//! });
//!
//! let provider = services.build();
//!
//! // Each "request" gets its own session; within a request it is shared.
//! provider.with_scope(|scope| {
//!     let a = scope.get_required::<Session>();
//!     let b = scope.get_required::<Session>();
//!     assert!(Arc::ptr_eq(&a, &b));
//! });
//! provider.with_scope(|scope| {
//!     assert_eq!(scope.get_required::<Session>().0, 2);
//! });
//! ```
//!
//! ## Interface bindings
//!
//! ```rust
//! use lattice_di::{ServiceCollection, Resolver};
//! use std::sync::Arc;
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, message: &str);
//! }
//!
//! struct ConsoleLogger;
//! impl Logger for ConsoleLogger {
//!     fn log(&self, message: &str) {
//!         println!("[LOG] {}", message);
//!     }
//! }
//!
//! let mut services = ServiceCollection::new();
//! services.add_singleton_trait::<dyn Logger>(Arc::new(ConsoleLogger));
//!
//! let provider = services.build();
//! provider.get_required_trait::<dyn Logger>().log("ready");
//! ```
//!
//! ## Process models
//!
//! The singleton cache lives exactly as long as its [`ServiceProvider`]. In
//! a persistent worker that serves many units of work from one provider,
//! singletons accumulate state across all of them; in a
//! process-per-unit-of-work model each run builds a fresh provider and
//! singletons reset for free. The container's contract is identical either
//! way — only the host's process lifetime differs. The `worker_models` demo
//! makes the two observable side by side.

pub mod collection;
pub mod construct;
pub mod descriptors;
pub mod error;
pub mod key;
pub mod lifetime;
pub mod observer;
pub mod provider;
pub mod traits;
pub mod validation;

#[cfg(feature = "graph-export")]
pub mod graph_export;

mod internal;
mod registration;

pub use collection::{ServiceCollection, ServiceCollectionExt, ServiceModule};
pub use construct::Construct;
pub use descriptors::ServiceDescriptor;
pub use error::{DiError, DiResult};
pub use internal::CircularPanic;
pub use key::{key_of_trait, key_of_type, Key};
pub use lifetime::Lifetime;
pub use observer::{DiObserver, LoggingObserver, MetricsObserver, MetricsSnapshot};
pub use provider::{ResolverContext, Scope, ServiceProvider};
pub use traits::{Dispose, Resolver, ResolverCore};
pub use validation::{ValidationIssue, ValidationReport};

#[cfg(feature = "graph-export")]
pub use graph_export::{DependencyGraph, ExportError, GraphEdge, GraphMetadata, GraphNode};
