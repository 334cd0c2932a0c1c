//! Lifetime Scope Tests

use std::sync::Arc;

use weave_domain::error::Error;
use weave_infrastructure::container::ContainerBuilder;
use weave_infrastructure::services::ProviderOptions;

use crate::test_utils::{Clock, FixedClock, Greeter, Instances, Numbered, greeter};

#[test]
fn test_service_provider_is_the_same_instance() {
    let container = ContainerBuilder::new().build().unwrap();
    let first = container.service_provider();
    let second = container.service_provider();
    assert!(first.ptr_eq(&second));
}

#[test]
fn test_child_registrations_override_parent() {
    let mut builder = ContainerBuilder::new();
    builder
        .register_instance(greeter("parent"))
        .register_instance::<dyn Clock>(Arc::new(FixedClock(1)));
    let container = builder.build().unwrap();

    let child = container
        .begin_lifetime_scope_with(|b| {
            b.register_instance(greeter("child"));
        })
        .unwrap();

    assert_eq!(child.resolve::<dyn Greeter>().unwrap().greet(), "child");
    assert_eq!(child.resolve::<dyn Clock>().unwrap().now(), 1);
    assert_eq!(container.resolve::<dyn Greeter>().unwrap().greet(), "parent");

    let all: Vec<_> = child
        .resolve_all::<dyn Greeter>()
        .unwrap()
        .iter()
        .map(|g| g.greet())
        .collect();
    assert_eq!(all, vec!["parent", "child"]);
}

#[test]
fn test_scoped_services_per_lifetime_scope() {
    let instances = Arc::new(Instances::default());
    let counter = Arc::clone(&instances);

    let mut builder = ContainerBuilder::new();
    builder.register_scoped::<Numbered, _>(move |_| Ok(Arc::new(Numbered(counter.next()))));
    let container = builder.build().unwrap();

    let a = container.begin_lifetime_scope();
    let b = container.begin_lifetime_scope();
    let nested = a.begin_lifetime_scope();

    let a1 = a.resolve::<Numbered>().unwrap();
    let a2 = a.resolve::<Numbered>().unwrap();
    let b1 = b.resolve::<Numbered>().unwrap();
    let n1 = nested.resolve::<Numbered>().unwrap();

    assert!(Arc::ptr_eq(&a1, &a2));
    assert!(!Arc::ptr_eq(&a1, &b1));
    assert!(!Arc::ptr_eq(&a1, &n1));
    assert_eq!(instances.count(), 3);
}

#[test]
fn test_singletons_are_shared_with_child_scopes() {
    let mut builder = ContainerBuilder::new();
    builder.register_singleton::<Numbered, _>(|_| Ok(Arc::new(Numbered(1))));
    let container = builder.build().unwrap();

    let child = container.begin_lifetime_scope_with(|_| {}).unwrap();
    assert!(Arc::ptr_eq(
        &container.resolve::<Numbered>().unwrap(),
        &child.resolve::<Numbered>().unwrap()
    ));
}

#[test]
fn test_resolve_missing() {
    let container = ContainerBuilder::new().build().unwrap();

    assert!(matches!(
        container.resolve::<dyn Greeter>(),
        Err(Error::ServiceNotFound { .. })
    ));
    assert!(container.resolve_optional::<dyn Greeter>().unwrap().is_none());
    assert!(!container.is_registered::<dyn Greeter>());
}

#[test]
fn test_child_scope_callbacks_see_child_registrations() {
    let container = ContainerBuilder::new().build().unwrap();

    let child = container.begin_lifetime_scope_with(|b| {
        b.register_instance(greeter("child"))
            .register_build_callback(|scope| {
                scope.resolve::<dyn Greeter>()?;
                Ok(())
            });
    });

    assert!(child.is_ok());
}

#[test]
fn test_child_override_does_not_leak_into_parent_singleton() {
    struct Dep(&'static str);
    struct Svc(Arc<Dep>);

    let mut builder = ContainerBuilder::new();
    builder
        .register_instance(Arc::new(Dep("parent")))
        .register_singleton::<Svc, _>(|scope| Ok(Arc::new(Svc(scope.resolve::<Dep>()?))));
    let container = builder.build().unwrap();

    let child = container
        .begin_lifetime_scope_with(|b| {
            b.register_instance(Arc::new(Dep("child")));
        })
        .unwrap();

    assert_eq!(child.resolve::<Svc>().unwrap().0.0, "parent");
    assert_eq!(container.resolve::<Svc>().unwrap().0.0, "parent");
    assert_eq!(child.resolve::<Dep>().unwrap().0, "child");
}

#[test]
fn test_child_singletons_see_child_registrations() {
    struct Dep(&'static str);
    struct Svc(Arc<Dep>);

    let mut builder = ContainerBuilder::new();
    builder.register_instance(Arc::new(Dep("parent")));
    let container = builder.build().unwrap();

    let child = container
        .begin_lifetime_scope_with(|b| {
            b.register_instance(Arc::new(Dep("child")))
                .register_singleton::<Svc, _>(|scope| Ok(Arc::new(Svc(scope.resolve::<Dep>()?))));
        })
        .unwrap();

    assert_eq!(child.resolve::<Svc>().unwrap().0.0, "child");
    assert!(!container.is_registered::<Svc>());
}

#[test]
fn test_scope_validation_in_graph_container() {
    struct Holder(#[allow(dead_code)] Arc<Numbered>);

    let mut builder = ContainerBuilder::new();
    builder
        .register_scoped::<Numbered, _>(|_| Ok(Arc::new(Numbered(1))))
        .register_singleton::<Holder, _>(|scope| {
            Ok(Arc::new(Holder(scope.resolve::<Numbered>()?)))
        });
    let container = builder
        .build_with(ProviderOptions::with_validate_scopes(true))
        .unwrap();
    let scope = container.begin_lifetime_scope();

    assert!(matches!(
        container.resolve::<Numbered>(),
        Err(Error::ScopeValidation { .. })
    ));
    assert!(scope.resolve::<Numbered>().is_ok());
    assert!(matches!(
        scope.resolve::<Holder>(),
        Err(Error::ScopeValidation { .. })
    ));
    assert!(matches!(
        container.resolve::<Holder>(),
        Err(Error::ScopeValidation { .. })
    ));
}

#[test]
fn test_nested_scopes_inherit_container_options() {
    let container = ContainerBuilder::new()
        .build_with(ProviderOptions::with_validate_scopes(true))
        .unwrap();
    let child = container.begin_lifetime_scope_with(|_| {}).unwrap();

    assert!(container.is_root());
    assert!(!child.is_root());
    assert!(child.options().validate_scopes);
    assert!(child.begin_lifetime_scope().options().validate_scopes);
}
