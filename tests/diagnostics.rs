//! Introspection surface: lifetime queries, cache-state checks, descriptors,
//! and disposal ordering.

use lattice_di::{key_of_trait, key_of_type, Dispose, Lifetime, Resolver, ServiceCollection};
use std::sync::{Arc, Mutex};

#[test]
fn lifetime_of_reports_the_bound_policy() {
    trait Port: Send + Sync {}
    struct PortImpl;
    impl Port for PortImpl {}

    struct Single;
    struct PerScope;
    struct Fresh;

    let mut sc = ServiceCollection::new();
    sc.add_singleton(Single);
    sc.add_scoped_factory::<PerScope, _>(|_| PerScope);
    sc.add_transient_factory::<Fresh, _>(|_| Fresh);
    sc.add_singleton_trait::<dyn Port>(Arc::new(PortImpl));

    let sp = sc.build();

    assert_eq!(sp.lifetime_of(&key_of_type::<Single>()), Some(Lifetime::Singleton));
    assert_eq!(sp.lifetime_of(&key_of_type::<PerScope>()), Some(Lifetime::Scoped));
    assert_eq!(sp.lifetime_of(&key_of_type::<Fresh>()), Some(Lifetime::Transient));
    assert_eq!(sp.lifetime_of(&key_of_trait::<dyn Port>()), Some(Lifetime::Singleton));
    assert_eq!(sp.lifetime_of(&key_of_type::<String>()), None);

    assert!(sp.contains(&key_of_type::<Single>()));
    assert!(!sp.contains(&key_of_type::<String>()));
}

#[test]
fn singleton_cache_state_is_observable() {
    struct Cache;

    let mut sc = ServiceCollection::new();
    sc.add_singleton_factory::<Cache, _>(|_| Cache);

    let sp = sc.build();

    assert!(!sp.has_singleton_of::<Cache>());
    let _ = sp.get_required::<Cache>();
    assert!(sp.has_singleton_of::<Cache>());

    // Unbound and non-singleton keys always read false.
    assert!(!sp.has_singleton_of::<String>());
}

#[test]
fn scoped_cache_state_is_observable_per_scope() {
    struct Session;

    let mut sc = ServiceCollection::new();
    sc.add_scoped_factory::<Session, _>(|_| Session);

    let sp = sc.build();
    let scope1 = sp.create_scope();
    let scope2 = sp.create_scope();

    assert!(!scope1.has_scoped_of::<Session>());
    let _ = scope1.get_required::<Session>();
    assert!(scope1.has_scoped_of::<Session>());
    assert!(!scope2.has_scoped_of::<Session>());

    scope1.close();
    assert!(!scope1.has_scoped_of::<Session>());
}

#[test]
fn descriptors_match_on_collection_and_provider() {
    struct One;
    struct Two;

    let mut sc = ServiceCollection::new();
    sc.add_singleton(One);
    sc.add_scoped_factory::<Two, _>(|_| Two);

    let from_collection = sc.service_descriptors();
    let sp = sc.build();
    let from_provider = sp.service_descriptors();

    assert_eq!(from_collection.len(), 2);
    assert_eq!(from_provider.len(), 2);

    let names = |descriptors: &[lattice_di::ServiceDescriptor]| {
        let mut v: Vec<&str> = descriptors.iter().map(|d| d.type_name()).collect();
        v.sort_unstable();
        v
    };
    assert_eq!(names(&from_collection), names(&from_provider));
}

#[test]
fn rebinding_shows_up_in_introspection() {
    struct Service;

    let mut sc = ServiceCollection::new();
    sc.add_transient_factory::<Service, _>(|_| Service);
    let sp = sc.build();

    assert_eq!(sp.lifetime_of(&key_of_type::<Service>()), Some(Lifetime::Transient));

    sp.rebind_factory::<Service, _>(Lifetime::Singleton, |_| Service);
    assert_eq!(sp.lifetime_of(&key_of_type::<Service>()), Some(Lifetime::Singleton));
    assert!(!sp.has_singleton_of::<Service>());

    let _ = sp.get_required::<Service>();
    assert!(sp.has_singleton_of::<Service>());
}

#[test]
fn scope_disposers_run_lifo_on_close() {
    struct Inner {
        log: Arc<Mutex<Vec<&'static str>>>,
    }
    struct Outer {
        log: Arc<Mutex<Vec<&'static str>>>,
        _inner: Arc<Inner>,
    }

    impl Dispose for Inner {
        fn dispose(&self) {
            self.log.lock().unwrap().push("inner");
        }
    }

    impl Dispose for Outer {
        fn dispose(&self) {
            self.log.lock().unwrap().push("outer");
        }
    }

    let log = Arc::new(Mutex::new(Vec::new()));

    let log_inner = log.clone();
    let log_outer = log.clone();

    let mut sc = ServiceCollection::new();
    sc.add_scoped_factory::<Inner, _>(move |r| {
        let service = Arc::new(Inner {
            log: log_inner.clone(),
        });
        r.register_disposer(service.clone());
        Inner {
            log: log_inner.clone(),
        }
    });
    sc.add_scoped_factory::<Outer, _>(move |r| {
        let inner = r.get_required::<Inner>();
        let service = Arc::new(Outer {
            log: log_outer.clone(),
            _inner: inner.clone(),
        });
        r.register_disposer(service.clone());
        Outer {
            log: log_outer.clone(),
            _inner: inner,
        }
    });

    let sp = sc.build();
    let scope = sp.create_scope();
    let _ = scope.get_required::<Outer>();
    assert!(log.lock().unwrap().is_empty());

    scope.close();
    // Outer was registered last, so it disposes first.
    assert_eq!(*log.lock().unwrap(), vec!["outer", "inner"]);

    // Close is idempotent.
    scope.close();
    assert_eq!(log.lock().unwrap().len(), 2);
}

#[test]
fn dropping_a_scope_runs_its_disposers() {
    struct Resource {
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Dispose for Resource {
        fn dispose(&self) {
            self.log.lock().unwrap().push("disposed");
        }
    }

    let log = Arc::new(Mutex::new(Vec::new()));
    let log_in_factory = log.clone();

    let mut sc = ServiceCollection::new();
    sc.add_scoped_factory::<Resource, _>(move |r| {
        let service = Arc::new(Resource {
            log: log_in_factory.clone(),
        });
        r.register_disposer(service.clone());
        Resource {
            log: log_in_factory.clone(),
        }
    });

    let sp = sc.build();
    {
        let scope = sp.create_scope();
        let _ = scope.get_required::<Resource>();
        // No explicit close; the drop fallback releases the scope.
    }
    assert_eq!(*log.lock().unwrap(), vec!["disposed"]);
}

#[test]
fn provider_dispose_all_runs_root_hooks() {
    struct Root {
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Dispose for Root {
        fn dispose(&self) {
            self.log.lock().unwrap().push("root");
        }
    }

    let log = Arc::new(Mutex::new(Vec::new()));
    let log_in_factory = log.clone();

    let mut sc = ServiceCollection::new();
    sc.add_singleton_factory::<Root, _>(move |r| {
        let service = Arc::new(Root {
            log: log_in_factory.clone(),
        });
        r.register_disposer(service.clone());
        Root {
            log: log_in_factory.clone(),
        }
    });

    let sp = sc.build();
    let _ = sp.get_required::<Root>();
    assert!(log.lock().unwrap().is_empty());

    sp.dispose_all();
    assert_eq!(*log.lock().unwrap(), vec!["root"]);
}

#[cfg(feature = "diagnostics")]
#[test]
fn debug_dump_lists_registrations_and_cache_state() {
    struct Cache;

    let mut sc = ServiceCollection::new();
    sc.add_singleton_factory::<Cache, _>(|_| Cache);
    let sp = sc.build();

    let before = sp.to_debug_string();
    assert!(before.contains("Cache"));
    assert!(before.contains("[empty]"));

    let _ = sp.get_required::<Cache>();
    let after = sp.to_debug_string();
    assert!(after.contains("[cached]"));
}
