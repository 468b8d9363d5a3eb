#![no_main]

use lattice_di::{Resolver, ServiceCollection};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

struct ServiceA(u32);
struct ServiceB {
    a: Arc<ServiceA>,
}

// Arbitrary resolution patterns against a fixed registration set. Identity
// invariants must hold regardless of ordering or interleaving.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let register = data[0] % 2 == 0;

    let mut sc = ServiceCollection::new();
    if register {
        sc.add_singleton(ServiceA(7));
        sc.add_transient_factory::<ServiceB, _>(|r| ServiceB {
            a: r.get_required::<ServiceA>(),
        });
        sc.add_scoped_factory::<String, _>(|_| "scoped".to_string());
    }

    let sp = sc.build();
    let scope = sp.create_scope();
    let mut singleton_witness: Option<Arc<ServiceA>> = None;

    for &byte in &data[1..] {
        match byte % 5 {
            0 => {
                let result = sp.get::<ServiceA>();
                assert_eq!(result.is_ok(), register);
                if let Ok(a) = result {
                    if let Some(ref witness) = singleton_witness {
                        assert!(Arc::ptr_eq(witness, &a));
                    }
                    singleton_witness = Some(a);
                }
            }
            1 => {
                if register {
                    let b1 = sp.get_required::<ServiceB>();
                    let b2 = sp.get_required::<ServiceB>();
                    assert!(!Arc::ptr_eq(&b1, &b2));
                    assert!(Arc::ptr_eq(&b1.a, &b2.a));
                }
            }
            2 => {
                let result = scope.get::<String>();
                assert_eq!(result.is_ok(), register);
            }
            3 => {
                // Scoped from the root must fail even when registered.
                assert!(sp.get::<String>().is_err() || !register);
            }
            _ => {
                let _ = sp.get::<u128>(); // never registered
            }
        }
    }
});
