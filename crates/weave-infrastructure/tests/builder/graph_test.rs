//! Graph Strategy Build Tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use weave_application::ConventionScanner;
use weave_domain::error::{Error, Result};
use weave_infrastructure::builder::{GraphServicesBuilder, GraphStrategy};
use weave_infrastructure::config::{CompositionConfig, Configuration, HostEnvironment};
use weave_infrastructure::container::{Container, ContainerBuilder};
use weave_infrastructure::context::ConventionContext;
use weave_infrastructure::conventions::ContainerConvention;
use weave_infrastructure::services::{ProviderOptions, ServiceCollection, ServiceProvider};

use crate::test_utils::{
    ApplicationGreeterConvention, Clock, FailingConvention, FixedClock, Greeter,
    SystemGreeterConvention, greeter,
};

fn builder() -> GraphServicesBuilder {
    GraphServicesBuilder::graph(
        ConventionScanner::new(),
        Configuration::empty(),
        HostEnvironment::production("orders"),
    )
}

struct ClockContainerConvention;

impl ContainerConvention for ClockContainerConvention {
    fn register(
        &self,
        _context: &ConventionContext,
        _configuration: &Configuration,
        _services: &mut ServiceCollection,
        builder: &mut ContainerBuilder,
    ) -> Result<()> {
        builder.register_instance::<dyn Clock>(Arc::new(FixedClock(7)));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "clock"
    }
}

#[test]
fn test_all_notifiers_fire_including_system() {
    let mut builder = builder();
    builder.add_convention(Arc::new(SystemGreeterConvention("system")));

    let root = builder.on_build().clone();
    let system = builder.system().on_build().clone();
    let application = builder.application().on_build().clone();
    let containers: Arc<Mutex<Vec<Container>>> = Arc::default();
    let sink = Arc::clone(&containers);
    builder
        .on_container_build()
        .subscribe(move |container| sink.lock().unwrap().push(container));

    let built = builder.build().unwrap();

    for notifier in [&root, &system, &application] {
        let provider = notifier.value().expect("tier notified");
        assert!(provider.ptr_eq(&built.provider));
    }
    let containers = containers.lock().unwrap();
    assert_eq!(containers.len(), 1);
    assert!(containers[0].service_provider().ptr_eq(&built.provider));
    assert!(built.container.service_provider().ptr_eq(&built.provider));
}

#[test]
fn test_system_visible_and_application_overrides() {
    let mut builder = builder();
    builder.add_convention(Arc::new(ApplicationGreeterConvention("application")));
    builder.add_convention(Arc::new(SystemGreeterConvention("system")));

    let built = builder.build().unwrap();
    assert_eq!(
        built.container.resolve::<dyn Greeter>().unwrap().greet(),
        "application"
    );
    assert_eq!(built.container.resolve_all::<dyn Greeter>().unwrap().len(), 2);
}

#[test]
fn test_container_conventions_run_after_service_conventions() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let mut builder = builder();

    let seen = Arc::clone(&order);
    builder.add_container_delegate(
        "container",
        move |_context, _configuration, services, _builder| {
            assert!(services.contains::<dyn Greeter>());
            seen.lock().unwrap().push("container");
            Ok(())
        },
    );

    let seen = Arc::clone(&order);
    builder.add_delegate("service", move |context| {
        context.services().add_singleton(greeter("root"));
        seen.lock().unwrap().push("service");
        Ok(())
    });
    builder.add_container_convention(Arc::new(ClockContainerConvention));

    let built = builder.build().unwrap();

    assert_eq!(*order.lock().unwrap(), vec!["service", "container"]);
    assert_eq!(built.container.resolve::<dyn Clock>().unwrap().now(), 7);
}

#[test]
fn test_container_convention_failure_aborts_build() {
    let mut builder = builder();
    builder.add_container_delegate("refuses", |_, _, _, _| {
        Err(Error::invalid_operation("container refused"))
    });
    let root = builder.on_build().clone();

    match builder.build() {
        Err(Error::Convention {
            family, convention, ..
        }) => {
            assert_eq!(family, "container");
            assert_eq!(convention, "refuses");
        }
        Err(other) => panic!("Expected Convention error, got {other:?}"),
        Ok(_) => panic!("Expected build failure"),
    }
    assert!(!root.is_published());
}

#[test]
fn test_service_convention_failure_notifies_nobody() {
    let mut builder = builder();
    builder.add_convention(Arc::new(FailingConvention));
    let system = builder.system().on_build().clone();
    let containers = builder.on_container_build().clone();

    assert!(builder.build().is_err());
    assert!(!system.is_published());
    assert!(!containers.is_published());
}

#[test]
fn test_seeded_builder_keeps_registrations() {
    let mut seed = ContainerBuilder::new();
    seed.register_default_instance(greeter("seeded-default"));

    let mut builder = GraphServicesBuilder::new(
        ConventionScanner::new(),
        Configuration::empty(),
        HostEnvironment::production("orders"),
        GraphStrategy::with_builder(seed),
    );
    let built = builder.build().unwrap();
    assert_eq!(
        built.container.resolve::<dyn Greeter>().unwrap().greet(),
        "seeded-default"
    );

    let mut overriding = ContainerBuilder::new();
    overriding.register_default_instance(greeter("seeded-default"));
    builder = GraphServicesBuilder::new(
        ConventionScanner::new(),
        Configuration::empty(),
        HostEnvironment::production("orders"),
        GraphStrategy::with_builder(overriding),
    );
    builder.application_mut().add_singleton(greeter("application"));
    let built = builder.build().unwrap();
    assert_eq!(
        built.container.resolve::<dyn Greeter>().unwrap().greet(),
        "application"
    );
}

#[test]
fn test_configure_container_receives_container_builder() {
    let callbacks = Arc::new(AtomicUsize::new(0));
    let mut builder = builder();

    let counter = Arc::clone(&callbacks);
    builder.configure_system_container(move |_, container_builder| {
        container_builder.register_build_callback(move |scope| {
            assert!(scope.is_registered::<dyn Clock>());
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        Ok(())
    });
    builder.configure_container(|_, container_builder| {
        container_builder.register_instance::<dyn Clock>(Arc::new(FixedClock(1)));
        Ok(())
    });

    builder.build().unwrap();
    assert_eq!(callbacks.load(Ordering::SeqCst), 1);
}

#[test]
fn test_lifetime_scopes_from_built_container() {
    let mut builder = builder();
    builder.services_mut().add_singleton(greeter("root"));

    let built = builder.build().unwrap();
    let scope = built
        .container
        .begin_lifetime_scope_with(|b| {
            b.register_instance(greeter("scoped"));
        })
        .unwrap();

    assert_eq!(scope.resolve::<dyn Greeter>().unwrap().greet(), "scoped");
    let provider: ServiceProvider = scope.service_provider();
    assert!(!provider.ptr_eq(&built.provider));
    assert_eq!(built.provider.get_required::<dyn Greeter>().unwrap().greet(), "root");
}

#[test]
fn test_convention_configures_container_builder() {
    let observed = Arc::new(Mutex::new(None));
    let mut builder = builder();

    let slot = Arc::clone(&observed);
    builder.add_delegate("graph-convention", move |context| {
        context.system().add_singleton(greeter("system"));
        context
            .system()
            .configure_container::<ContainerBuilder, _>(|_, container_builder| {
                assert!(container_builder.is_registered::<dyn Greeter>());
                container_builder.register_instance::<dyn Clock>(Arc::new(FixedClock(9)));
                Ok(())
            });

        let slot = Arc::clone(&slot);
        context.on_container_build::<Container, _>(move |container| {
            *slot.lock().unwrap() = Some(container);
        });
        Ok(())
    });

    let built = builder.build().unwrap();
    let container = observed.lock().unwrap().take().expect("container observed");
    assert!(container.ptr_eq(&built.container));
    assert_eq!(container.resolve::<dyn Clock>().unwrap().now(), 9);
}

#[test]
fn test_strategy_options_reach_the_container() {
    let mut builder = GraphServicesBuilder::new(
        ConventionScanner::new(),
        Configuration::empty(),
        HostEnvironment::production("orders"),
        GraphStrategy::with_options(ProviderOptions::with_validate_scopes(true)),
    );
    builder
        .services_mut()
        .add_scoped_with::<dyn Clock, _>(|_| Ok(Arc::new(FixedClock(5))));

    let built = builder.build().unwrap();

    assert!(built.container.options().validate_scopes);
    assert!(matches!(
        built.provider.try_get::<dyn Clock>(),
        Err(Error::ScopeValidation { .. })
    ));
    let scope = built.provider.create_scope();
    assert_eq!(scope.get_required::<dyn Clock>().unwrap().now(), 5);
}

#[test]
fn test_graph_strategy_from_config() {
    let mut config = CompositionConfig::default();
    let development = HostEnvironment::development("orders");
    let production = HostEnvironment::production("orders");

    assert!(GraphStrategy::from_config(&config, &development).options().validate_scopes);
    assert!(!GraphStrategy::from_config(&config, &production).options().validate_scopes);

    config.validate_scopes = Some(true);
    assert!(GraphStrategy::from_config(&config, &production).options().validate_scopes);
    assert!(GraphStrategy::for_environment(&development).options().validate_scopes);
}
