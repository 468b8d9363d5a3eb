//! Property-based tests: identity invariants hold for arbitrary values and
//! arbitrary resolution sequences.

use lattice_di::{Resolver, ServiceCollection};
use proptest::prelude::*;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct ServiceA {
    value: String,
}

#[derive(Debug, Clone)]
struct ServiceB {
    number: u64,
}

proptest! {
    // Singletons resolve to one identity no matter the payload.
    #[test]
    fn singleton_resolution_consistency(service_value in "\\PC{0,50}") {
        let mut services = ServiceCollection::new();
        services.add_singleton(ServiceA { value: service_value.clone() });

        let provider = services.build();

        let resolved1 = provider.get_required::<ServiceA>();
        let resolved2 = provider.get_required::<ServiceA>();
        let resolved3 = provider.get_required::<ServiceA>();

        prop_assert!(Arc::ptr_eq(&resolved1, &resolved2));
        prop_assert!(Arc::ptr_eq(&resolved2, &resolved3));
        prop_assert_eq!(&resolved1.value, &service_value);
    }
}

proptest! {
    // N transient resolutions yield N distinct instances and N factory runs.
    #[test]
    fn transient_uniqueness(n in 2usize..20) {
        let invocations = Arc::new(Mutex::new(0u64));
        let invocations_in_factory = invocations.clone();

        let mut services = ServiceCollection::new();
        services.add_transient_factory::<ServiceB, _>(move |_| {
            let mut count = invocations_in_factory.lock().unwrap();
            *count += 1;
            ServiceB { number: *count }
        });

        let provider = services.build();

        let instances: Vec<_> = (0..n).map(|_| provider.get_required::<ServiceB>()).collect();

        for i in 0..n {
            for j in (i + 1)..n {
                prop_assert!(!Arc::ptr_eq(&instances[i], &instances[j]));
            }
        }
        prop_assert_eq!(*invocations.lock().unwrap(), n as u64);
    }
}

proptest! {
    // Optional resolution mirrors registration state exactly.
    #[test]
    fn optional_resolution_behavior(register_service in any::<bool>()) {
        let mut services = ServiceCollection::new();

        if register_service {
            services.add_singleton(ServiceB { number: 42 });
        }

        let provider = services.build();
        let result = provider.get::<ServiceB>();

        prop_assert_eq!(result.is_ok(), register_service);
    }
}

proptest! {
    // Across any number of scopes, each scope sees exactly one scoped
    // instance and no scope shares with another.
    #[test]
    fn scoped_isolation_over_arbitrary_scope_counts(
        scope_count in 1usize..10,
        resolutions_per_scope in 1usize..5,
    ) {
        let serial = Arc::new(Mutex::new(0u64));
        let serial_in_factory = serial.clone();

        let mut services = ServiceCollection::new();
        services.add_scoped_factory::<ServiceB, _>(move |_| {
            let mut s = serial_in_factory.lock().unwrap();
            *s += 1;
            ServiceB { number: *s }
        });

        let provider = services.build();

        let mut first_instances = Vec::new();
        for _ in 0..scope_count {
            let scope = provider.create_scope();
            let first = scope.get_required::<ServiceB>();
            for _ in 1..resolutions_per_scope {
                let again = scope.get_required::<ServiceB>();
                prop_assert!(Arc::ptr_eq(&first, &again));
            }
            first_instances.push(first);
            scope.close();
        }

        for i in 0..first_instances.len() {
            for j in (i + 1)..first_instances.len() {
                prop_assert!(!Arc::ptr_eq(&first_instances[i], &first_instances[j]));
            }
        }
        prop_assert_eq!(*serial.lock().unwrap(), scope_count as u64);
    }
}

proptest! {
    // Whatever the registration sequence, the last binding wins.
    #[test]
    fn last_registration_wins(values in prop::collection::vec(0u64..1000, 1..8)) {
        let mut services = ServiceCollection::new();
        for value in &values {
            services.add_singleton(ServiceB { number: *value });
        }

        let provider = services.build();
        let resolved = provider.get_required::<ServiceB>();
        prop_assert_eq!(resolved.number, *values.last().unwrap());
    }
}
