#![no_main]

use lattice_di::{Lifetime, Resolver, ServiceCollection};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

trait Port: Send + Sync {
    fn value(&self) -> u8;
}

struct PortImpl(u8);
impl Port for PortImpl {
    fn value(&self) -> u8 {
        self.0
    }
}

// Drives arbitrary registration sequences: replacements, conditional adds,
// named bindings. The container must accept any order and always honor
// last-registration-wins.
fuzz_target!(|data: &[u8]| {
    let mut sc = ServiceCollection::new();
    let mut last_u64: Option<u64> = None;

    for chunk in data.chunks(2) {
        let op = chunk[0] % 6;
        let payload = *chunk.get(1).unwrap_or(&0);

        match op {
            0 => {
                sc.add_singleton(payload as u64);
                last_u64 = Some(payload as u64);
            }
            1 => {
                sc.add_transient_factory::<String, _>(move |_| format!("s-{payload}"));
            }
            2 => {
                sc.add_scoped_factory::<u32, _>(move |_| payload as u32);
            }
            3 => {
                if sc.try_add_singleton(payload as u64) {
                    last_u64 = Some(payload as u64);
                }
            }
            4 => {
                sc.add_singleton_trait::<dyn Port>(Arc::new(PortImpl(payload)));
            }
            _ => {
                sc.add_named_singleton("fuzzed", payload as u16);
            }
        }
    }

    let sp = sc.build();

    if let Some(expected) = last_u64 {
        assert_eq!(*sp.get_required::<u64>(), expected);
    }
    let _ = sp.get::<String>();
    let _ = sp.get_trait::<dyn Port>();
    let _ = sp.get_named::<u16>("fuzzed");
});
