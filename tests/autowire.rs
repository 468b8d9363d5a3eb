//! Auto-construction through the `Construct` trait: resolution of concrete
//! types without explicit bindings, and its limits.

use lattice_di::{
    key_of_type, Construct, DiError, DiResult, Key, Lifetime, Resolver, ResolverContext,
    ServiceCollection,
};
use std::sync::{Arc, Mutex};

struct Config {
    retries: u32,
}

struct Client {
    config: Arc<Config>,
}

impl Construct for Client {
    fn dependencies() -> Vec<Key> {
        vec![key_of_type::<Config>()]
    }

    fn construct(ctx: &ResolverContext<'_>) -> DiResult<Self> {
        Ok(Client {
            config: ctx.get::<Config>()?,
        })
    }
}

#[test]
fn unregistered_construct_type_builds_as_implicit_transient() {
    let mut sc = ServiceCollection::new();
    sc.add_singleton(Config { retries: 3 });

    let sp = sc.build();

    let a = sp.get_or_construct::<Client>().unwrap();
    let b = sp.get_or_construct::<Client>().unwrap();

    assert_eq!(a.config.retries, 3);
    // Implicit transient: a fresh Client each call, same singleton inside.
    assert!(!Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&a.config, &b.config));
}

#[test]
fn explicit_binding_takes_precedence_over_construction() {
    let built = Arc::new(Mutex::new(0));
    let built_in_factory = built.clone();

    let mut sc = ServiceCollection::new();
    sc.add_singleton(Config { retries: 1 });
    sc.add_singleton_factory::<Client, _>(move |r| {
        *built_in_factory.lock().unwrap() += 1;
        Client {
            config: r.get_required::<Config>(),
        }
    });

    let sp = sc.build();

    let a = sp.get_or_construct::<Client>().unwrap();
    let b = sp.get_or_construct::<Client>().unwrap();

    // The registered singleton binding answered, not Construct.
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(*built.lock().unwrap(), 1);
}

#[test]
fn add_constructed_registers_with_declared_dependencies() {
    let mut sc = ServiceCollection::new();
    sc.add_singleton(Config { retries: 9 });
    sc.add_constructed::<Client>(Lifetime::Scoped);

    let descriptors = sc.service_descriptors();
    let client = descriptors
        .iter()
        .find(|d| d.type_name().contains("Client"))
        .unwrap();
    assert_eq!(client.lifetime, Lifetime::Scoped);
    assert_eq!(client.dependencies.len(), 1);
    assert!(client.dependency_names()[0].contains("Config"));

    let sp = sc.build();
    let scope = sp.create_scope();
    let a = scope.get_required::<Client>();
    let b = scope.get_required::<Client>();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.config.retries, 9);
}

#[test]
fn construction_works_from_scopes_and_nested_factories() {
    struct Handler {
        client: Arc<Client>,
    }

    let mut sc = ServiceCollection::new();
    sc.add_singleton(Config { retries: 2 });
    sc.add_transient_factory::<Handler, _>(|r| Handler {
        client: r.get_or_construct::<Client>().unwrap(),
    });

    let sp = sc.build();
    let scope = sp.create_scope();

    let from_scope = scope.get_or_construct::<Client>().unwrap();
    let handler = scope.get_required::<Handler>();

    assert_eq!(from_scope.config.retries, 2);
    assert_eq!(handler.client.config.retries, 2);
}

#[test]
fn missing_dependency_fails_construction() {
    // Config is never registered.
    let sp = ServiceCollection::new().build();
    assert!(matches!(
        sp.get_or_construct::<Client>(),
        Err(DiError::NotFound(_))
    ));
}

#[test]
fn construction_cycle_is_detected() {
    struct Ouro;
    struct Boros;

    impl Construct for Ouro {
        fn construct(ctx: &ResolverContext<'_>) -> DiResult<Self> {
            let _ = ctx.get_or_construct::<Boros>()?;
            Ok(Ouro)
        }
    }

    impl Construct for Boros {
        fn construct(ctx: &ResolverContext<'_>) -> DiResult<Self> {
            let _ = ctx.get_or_construct::<Ouro>()?;
            Ok(Boros)
        }
    }

    let sp = ServiceCollection::new().build();
    match sp.get_or_construct::<Ouro>() {
        Err(DiError::Circular(path)) => {
            assert!(path.first().unwrap().contains("Ouro"));
            assert!(path.last().unwrap().contains("Ouro"));
            assert!(path.iter().any(|n| n.contains("Boros")));
        }
        other => panic!("expected Circular error, got ok={}", other.is_ok()),
    }
}

#[test]
fn fallible_construction_propagates_producer_errors() {
    #[derive(Debug)]
    struct Rejected;

    impl std::fmt::Display for Rejected {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "rejected")
        }
    }

    impl std::error::Error for Rejected {}

    struct Picky;

    impl Construct for Picky {
        fn construct(_ctx: &ResolverContext<'_>) -> DiResult<Self> {
            Err(DiError::Producer(
                std::any::type_name::<Picky>(),
                Arc::new(Rejected),
            ))
        }
    }

    let sp = ServiceCollection::new().build();
    match sp.get_or_construct::<Picky>() {
        Err(DiError::Producer(name, source)) => {
            assert!(name.contains("Picky"));
            assert_eq!(source.to_string(), "rejected");
        }
        other => panic!("expected Producer error, got ok={}", other.is_ok()),
    }
}
