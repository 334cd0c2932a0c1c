//! Container Builder Tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use weave_domain::error::Error;
use weave_infrastructure::container::ContainerBuilder;
use weave_infrastructure::services::ServiceCollection;

use crate::test_utils::{Clock, FixedClock, Greeter, greeter};

#[test]
fn test_default_instance_used_when_nothing_else_registered() {
    let mut builder = ContainerBuilder::new();
    builder.register_default_instance(greeter("default"));

    let container = builder.build().unwrap();
    assert_eq!(container.resolve::<dyn Greeter>().unwrap().greet(), "default");
}

#[test]
fn test_default_instance_is_dropped_when_overridden() {
    let mut builder = ContainerBuilder::new();
    builder
        .register_instance(greeter("explicit"))
        .register_default_instance(greeter("default"));

    let container = builder.build().unwrap();
    assert_eq!(container.resolve::<dyn Greeter>().unwrap().greet(), "explicit");
    assert_eq!(container.resolve_all::<dyn Greeter>().unwrap().len(), 1);
}

#[test]
fn test_populate_keeps_collection_order() {
    let mut services = ServiceCollection::new();
    services.add_singleton(greeter("from-collection"));

    let mut builder = ContainerBuilder::new();
    builder.register_instance(greeter("registered-first"));
    builder.populate(&services);

    let container = builder.build().unwrap();
    assert_eq!(
        container.resolve::<dyn Greeter>().unwrap().greet(),
        "from-collection"
    );
}

#[test]
fn test_factories_receive_the_scope() {
    struct TimedGreeter(u64);

    impl Greeter for TimedGreeter {
        fn greet(&self) -> String {
            format!("at {}", self.0)
        }
    }

    let mut builder = ContainerBuilder::new();
    builder
        .register_instance::<dyn Clock>(Arc::new(FixedClock(5)))
        .register_singleton::<dyn Greeter, _>(|scope| {
            Ok(Arc::new(TimedGreeter(scope.resolve::<dyn Clock>()?.now())))
        });

    let container = builder.build().unwrap();
    assert_eq!(container.resolve::<dyn Greeter>().unwrap().greet(), "at 5");
}

#[test]
fn test_build_callbacks_run_in_order_with_the_built_scope() {
    let order = Arc::new(Mutex::new(Vec::new()));

    let mut builder = ContainerBuilder::new();
    builder.register_instance(greeter("hello"));
    for id in 0..3 {
        let order = Arc::clone(&order);
        builder.register_build_callback(move |scope| {
            assert!(scope.is_registered::<dyn Greeter>());
            order.lock().unwrap().push(id);
            Ok(())
        });
    }

    builder.build().unwrap();
    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
}

#[test]
fn test_failing_callback_fails_build() {
    let later = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&later);

    let mut builder = ContainerBuilder::new();
    builder
        .register_build_callback(|_| Err(Error::invalid_operation("not ready")))
        .register_build_callback(move |_| {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        });

    assert!(matches!(builder.build(), Err(Error::InvalidOperation { .. })));
    assert!(!later.load(Ordering::SeqCst));
}

#[test]
fn test_is_registered_counts_defaults() {
    let mut builder = ContainerBuilder::new();
    assert!(builder.is_empty());
    builder.register_default_instance(greeter("default"));
    assert!(builder.is_registered::<dyn Greeter>());
    assert_eq!(builder.len(), 0);
}
