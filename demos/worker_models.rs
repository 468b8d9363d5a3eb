//! Contrasts the two hosting models that change what "singleton" means
//! operationally: a persistent worker serving every request from one
//! provider, versus a process-per-request host that rebuilds the provider
//! each time. The container's contract is identical in both; only the
//! provider's lifetime differs.
//!
//! Run with `cargo run --example worker_models`.

use lattice_di::{Resolver, ServiceCollection, ServiceProvider};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

struct VisitCounter {
    visits: AtomicU32,
}

struct RequestState {
    serial: u32,
}

fn build_provider(request_counter: Arc<AtomicU32>) -> ServiceProvider {
    let mut services = ServiceCollection::new();
    services.add_singleton_factory::<VisitCounter, _>(|_| VisitCounter {
        visits: AtomicU32::new(0),
    });
    services.add_scoped_factory::<RequestState, _>(move |_| RequestState {
        serial: request_counter.fetch_add(1, Ordering::Relaxed) + 1,
    });
    services.build()
}

fn serve_request(provider: &ServiceProvider) -> (u32, u32) {
    provider.with_scope(|scope| {
        let counter = scope.get_required::<VisitCounter>();
        let state = scope.get_required::<RequestState>();
        let visits = counter.visits.fetch_add(1, Ordering::Relaxed) + 1;
        (state.serial, visits)
    })
}

fn main() {
    env_logger::init();

    println!("=== persistent worker: one provider, many requests ===");
    let request_counter = Arc::new(AtomicU32::new(0));
    let provider = build_provider(request_counter.clone());
    for _ in 0..4 {
        let (serial, visits) = serve_request(&provider);
        println!("request {serial}: singleton has seen {visits} visits");
    }
    println!("singleton state accumulated across all requests\n");

    println!("=== process-per-request: fresh provider every time ===");
    let request_counter = Arc::new(AtomicU32::new(0));
    for _ in 0..4 {
        let provider = build_provider(request_counter.clone());
        let (serial, visits) = serve_request(&provider);
        println!("request {serial}: singleton has seen {visits} visits");
    }
    println!("singleton state reset with every provider");
}
