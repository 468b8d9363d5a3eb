#![no_main]

use lattice_di::{Resolver, ServiceCollection};
use libfuzzer_sys::fuzz_target;

struct Session(u64);

// Arbitrary interleavings of scope creation, resolution, and closing. A
// closed scope must reject scoped resolution and never panic.
fuzz_target!(|data: &[u8]| {
    let mut sc = ServiceCollection::new();
    sc.add_scoped_factory::<Session, _>(|_| Session(1));
    sc.add_singleton(9u8);
    let sp = sc.build();

    let mut scopes = Vec::new();

    for &byte in data {
        match byte % 4 {
            0 => {
                if scopes.len() < 32 {
                    scopes.push(sp.create_scope());
                }
            }
            1 => {
                if let Some(scope) = scopes.last() {
                    let result = scope.get::<Session>();
                    assert_eq!(result.is_err(), scope.is_closed());
                    // Singletons resolve regardless of the scope's state.
                    assert!(scope.get::<u8>().is_ok());
                }
            }
            2 => {
                if let Some(scope) = scopes.last() {
                    scope.close();
                    assert!(scope.is_closed());
                }
            }
            _ => {
                scopes.pop();
            }
        }
    }
});
