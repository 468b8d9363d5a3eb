//! Replays the lifecycle demonstration this container exists to make
//! observable: a singleton accumulating state across simulated requests, a
//! scoped service living exactly one request, and transient handlers that
//! never repeat.
//!
//! Run with `cargo run --example request_lifecycle`; set `RUST_LOG=debug`
//! to watch the container's own resolution log.

use lattice_di::{LoggingObserver, MetricsObserver, Resolver, ServiceCollection};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

struct AppLogger {
    lines: AtomicU32,
}

impl AppLogger {
    fn log(&self, message: &str) {
        let line = self.lines.fetch_add(1, Ordering::Relaxed) + 1;
        println!("    [app log #{line}] {message}");
    }
}

struct RequestSession {
    serial: u32,
    actions: AtomicU32,
}

struct Handler {
    session: Arc<RequestSession>,
    logger: Arc<AppLogger>,
}

impl Handler {
    fn handle(&self, action: &str) {
        let n = self.session.actions.fetch_add(1, Ordering::Relaxed) + 1;
        self.logger.log(&format!(
            "session {} action #{}: {}",
            self.session.serial, n, action
        ));
    }
}

fn main() {
    env_logger::init();

    let session_counter = Arc::new(AtomicU32::new(0));
    let session_counter_in_factory = session_counter.clone();

    let metrics = Arc::new(MetricsObserver::new());

    let mut services = ServiceCollection::new();
    services.add_singleton_factory::<AppLogger, _>(|_| AppLogger {
        lines: AtomicU32::new(0),
    });
    services.add_scoped_factory::<RequestSession, _>(move |_| RequestSession {
        serial: session_counter_in_factory.fetch_add(1, Ordering::Relaxed) + 1,
        actions: AtomicU32::new(0),
    });
    services.add_transient_factory::<Handler, _>(|r| Handler {
        session: r.get_required::<RequestSession>(),
        logger: r.get_required::<AppLogger>(),
    });
    services.add_observer(Arc::new(LoggingObserver::new()));
    services.add_observer(metrics.clone());

    let provider = services.build();

    for request in 1..=3 {
        println!("--- request {request} ---");
        provider.with_scope(|scope| {
            // Two handlers per request: distinct objects, one shared session.
            let first = scope.get_required::<Handler>();
            let second = scope.get_required::<Handler>();

            first.handle("load profile");
            second.handle("update profile");

            println!(
                "    handlers distinct: {}, session shared: {}",
                !Arc::ptr_eq(&first, &second),
                Arc::ptr_eq(&first.session, &second.session)
            );
        });
    }

    let logger = provider.get_required::<AppLogger>();
    println!("--- summary ---");
    println!(
        "singleton logger wrote {} lines across {} requests",
        logger.lines.load(Ordering::Relaxed),
        session_counter.load(Ordering::Relaxed)
    );

    let snapshot = metrics.snapshot();
    println!(
        "container resolutions: {} completed, {} failed",
        snapshot.completed, snapshot.failed
    );
}
