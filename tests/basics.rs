use lattice_di::{DiError, Resolver, ServiceCollection};
use std::sync::{Arc, Mutex};

#[test]
fn test_concrete_singleton() {
    let mut sc = ServiceCollection::new();
    sc.add_singleton(42usize);
    sc.add_singleton("hello".to_string());

    let sp = sc.build();

    let num1 = sp.get_required::<usize>();
    let num2 = sp.get_required::<usize>();
    let str1 = sp.get_required::<String>();
    let str2 = sp.get_required::<String>();

    assert_eq!(*num1, 42);
    assert_eq!(*str1, "hello");
    assert!(Arc::ptr_eq(&num1, &num2));
    assert!(Arc::ptr_eq(&str1, &str2));
}

#[test]
fn test_factory_with_dependencies() {
    #[derive(Debug)]
    struct Config {
        port: u16,
    }

    #[derive(Debug)]
    struct Server {
        config: Arc<Config>,
        name: String,
    }

    let mut sc = ServiceCollection::new();
    sc.add_singleton(Config { port: 8080 });
    sc.add_singleton_factory::<Server, _>(|r| Server {
        config: r.get_required::<Config>(),
        name: "MyServer".to_string(),
    });

    let sp = sc.build();
    let server = sp.get_required::<Server>();

    assert_eq!(server.config.port, 8080);
    assert_eq!(server.name, "MyServer");
}

#[test]
fn test_transient_creates_new_instances() {
    let counter = Arc::new(Mutex::new(0));
    let counter_in_factory = counter.clone();

    let mut sc = ServiceCollection::new();
    sc.add_transient_factory::<String, _>(move |_| {
        let mut c = counter_in_factory.lock().unwrap();
        *c += 1;
        format!("instance-{}", *c)
    });

    let sp = sc.build();

    let a = sp.get_required::<String>();
    let b = sp.get_required::<String>();
    let c = sp.get_required::<String>();

    assert_eq!(*a, "instance-1");
    assert_eq!(*b, "instance-2");
    assert_eq!(*c, "instance-3");

    assert!(!Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&b, &c));
    assert!(!Arc::ptr_eq(&a, &c));
}

#[test]
fn test_singleton_producer_runs_exactly_once() {
    struct Expensive;

    let invocations = Arc::new(Mutex::new(0));
    let invocations_in_factory = invocations.clone();

    let mut sc = ServiceCollection::new();
    sc.add_singleton_factory::<Expensive, _>(move |_| {
        *invocations_in_factory.lock().unwrap() += 1;
        Expensive
    });

    let sp = sc.build();
    for _ in 0..5 {
        let _ = sp.get_required::<Expensive>();
    }

    assert_eq!(*invocations.lock().unwrap(), 1);
}

#[test]
fn test_not_found_error() {
    struct UnregisteredType;

    let sc = ServiceCollection::new();
    let sp = sc.build();

    let result = sp.get::<UnregisteredType>();
    match result {
        Err(DiError::NotFound(name)) => assert!(name.contains("UnregisteredType")),
        other => panic!("expected NotFound, got {:?}", other.is_ok()),
    }
}

#[test]
fn test_unbound_trait_fails() {
    trait Unbound: Send + Sync {}

    let sp = ServiceCollection::new().build();
    assert!(matches!(
        sp.get_trait::<dyn Unbound>(),
        Err(DiError::NotFound(_))
    ));
}

#[test]
fn test_replace_semantics() {
    let mut sc = ServiceCollection::new();

    sc.add_singleton(1usize);
    sc.add_singleton(2usize);

    let sp = sc.build();
    let value = sp.get_required::<usize>();

    // Last registration wins.
    assert_eq!(*value, 2);
}

#[test]
fn test_try_add_does_not_replace() {
    let mut sc = ServiceCollection::new();

    assert!(sc.try_add_singleton(1usize));
    assert!(!sc.try_add_singleton(2usize));

    let sp = sc.build();
    assert_eq!(*sp.get_required::<usize>(), 1);
}

#[test]
fn test_complex_dependency_graph() {
    struct A {
        value: i32,
    }

    struct B {
        a: Arc<A>,
    }

    struct C {
        a: Arc<A>,
        b: Arc<B>,
    }

    let mut sc = ServiceCollection::new();

    sc.add_singleton(A { value: 100 });

    sc.add_singleton_factory::<B, _>(|r| B {
        a: r.get_required::<A>(),
    });

    sc.add_singleton_factory::<C, _>(|r| C {
        a: r.get_required::<A>(),
        b: r.get_required::<B>(),
    });

    let sp = sc.build();
    let c = sp.get_required::<C>();

    assert_eq!(c.a.value, 100);
    assert_eq!(c.b.a.value, 100);
    // A is a singleton, so both paths see the same instance.
    assert!(Arc::ptr_eq(&c.a, &c.b.a));
}

#[test]
fn test_dependency_order_and_cache_hits() {
    struct A(u32);
    struct B(u32);
    struct Parent {
        a: Arc<A>,
        b: Arc<B>,
    }

    let order = Arc::new(Mutex::new(Vec::new()));

    let order_a = order.clone();
    let order_b = order.clone();

    let mut sc = ServiceCollection::new();
    sc.add_singleton_factory::<A, _>(move |_| {
        order_a.lock().unwrap().push("A");
        A(1)
    });
    sc.add_transient_factory::<B, _>(move |_| {
        order_b.lock().unwrap().push("B");
        B(2)
    });
    sc.add_transient_factory::<Parent, _>(|r| Parent {
        a: r.get_required::<A>(),
        b: r.get_required::<B>(),
    });

    let sp = sc.build();

    // Prime the singleton.
    let a_first = sp.get_required::<A>();

    let parent = sp.get_required::<Parent>();
    assert_eq!(parent.a.0, 1);
    assert_eq!(parent.b.0, 2);

    // The cached A was passed through, not rebuilt; B was built fresh after.
    assert!(Arc::ptr_eq(&a_first, &parent.a));
    assert_eq!(*order.lock().unwrap(), vec!["A", "B"]);
}

#[test]
fn test_named_singletons_coexist() {
    let mut sc = ServiceCollection::new();
    sc.add_named_singleton("primary", 5432u16);
    sc.add_named_singleton("replica", 5433u16);
    sc.add_singleton(1u16);

    let sp = sc.build();

    assert_eq!(*sp.get_named_required::<u16>("primary"), 5432);
    assert_eq!(*sp.get_named_required::<u16>("replica"), 5433);
    assert_eq!(*sp.get_required::<u16>(), 1);
    assert!(sp.get_named::<u16>("missing").is_err());
}

#[test]
fn test_named_trait_binding() {
    trait Sink: Send + Sync {
        fn target(&self) -> &'static str;
    }

    struct FileSink;
    impl Sink for FileSink {
        fn target(&self) -> &'static str {
            "file"
        }
    }

    struct NullSink;
    impl Sink for NullSink {
        fn target(&self) -> &'static str {
            "null"
        }
    }

    let mut sc = ServiceCollection::new();
    sc.add_singleton_trait::<dyn Sink>(Arc::new(FileSink));
    sc.add_named_trait::<dyn Sink>("quiet", Arc::new(NullSink));

    let sp = sc.build();

    assert_eq!(sp.get_required_trait::<dyn Sink>().target(), "file");
    assert_eq!(sp.get_named_trait::<dyn Sink>("quiet").unwrap().target(), "null");
    assert!(sp.get_named_trait::<dyn Sink>("loud").is_err());
}

#[test]
fn test_fallible_factory_error_is_wrapped() {
    #[derive(Debug)]
    struct Invalid;

    impl std::fmt::Display for Invalid {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "invalid configuration")
        }
    }

    impl std::error::Error for Invalid {}

    struct Service;

    let mut sc = ServiceCollection::new();
    sc.add_transient_fallible_factory::<Service, _, _>(|_| Err(Invalid));

    let sp = sc.build();
    match sp.get::<Service>() {
        Err(DiError::Producer(name, source)) => {
            assert!(name.contains("Service"));
            assert_eq!(source.to_string(), "invalid configuration");
        }
        other => panic!("expected Producer error, got ok={}", other.is_ok()),
    }
}

#[test]
fn test_failed_singleton_producer_is_not_cached() {
    #[derive(Debug)]
    struct Flaky;

    impl std::fmt::Display for Flaky {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "flaky")
        }
    }

    impl std::error::Error for Flaky {}

    struct Service(u32);

    let attempts = Arc::new(Mutex::new(0));
    let attempts_in_factory = attempts.clone();

    let mut sc = ServiceCollection::new();
    sc.add_singleton_fallible_factory::<Service, _, _>(move |_| {
        let mut n = attempts_in_factory.lock().unwrap();
        *n += 1;
        if *n == 1 {
            Err(Flaky)
        } else {
            Ok(Service(*n))
        }
    });

    let sp = sc.build();

    assert!(sp.get::<Service>().is_err());
    // The failure left the cache empty; the retry succeeds and sticks.
    let ok = sp.get_required::<Service>();
    assert_eq!(ok.0, 2);
    let again = sp.get_required::<Service>();
    assert!(Arc::ptr_eq(&ok, &again));
    assert_eq!(*attempts.lock().unwrap(), 2);
}
