//! Linked Convention Discovery Tests

use std::sync::{Arc, Mutex};

use weave::application::list_conventions;
use weave::prelude::*;

use super::{AuditLog, Handler, Storage, config_file, loader};

#[test]
fn test_linked_entries_are_listed() {
    let listed = list_conventions();

    assert!(listed.contains(&("scenario::storage", "storage")));
    assert!(listed.contains(&("scenario::web", "web")));
    assert!(listed.contains(&("scenario::audit", "audit")));
}

#[test]
fn test_discovered_conventions_register_into_their_tiers() {
    let (_dir, path) = config_file(
        r#"
        [composition]
        candidate_modules = ["scenario"]
        excluded_modules = ["scenario::disabled"]

        [storage]
        url = "postgres://orders"
        "#,
    );

    let builder = weave::registry_builder(&loader(&path)).unwrap();
    let provider = builder.build().unwrap().provider;

    let storage = provider.get_required::<dyn Storage>().unwrap();
    assert_eq!(storage.url(), "postgres://orders");

    let handlers = provider.get_all::<dyn Handler>().unwrap();
    let routes: Vec<_> = handlers.iter().map(|handler| handler.route()).collect();
    assert_eq!(routes, vec!["/orders"]);
}

#[test]
fn test_excluded_module_is_not_composed() {
    let (_dir, path) = config_file(
        r#"
        [composition]
        candidate_modules = ["scenario"]
        excluded_modules = ["scenario::web", "scenario::disabled"]
        "#,
    );

    let provider = weave::registry_builder(&loader(&path))
        .unwrap()
        .build()
        .unwrap()
        .provider;

    assert!(provider.get::<dyn Handler>().is_none());
    assert_eq!(
        provider.get_required::<dyn Storage>().unwrap().url(),
        "memory://"
    );
}

#[test]
fn test_discovered_conventions_run_before_appended_and_after_prepended() {
    let (_dir, path) = config_file(
        r#"
        [composition]
        candidate_modules = ["scenario::web"]
        "#,
    );
    let order = Arc::new(Mutex::new(Vec::new()));
    let mut builder = weave::registry_builder(&loader(&path)).unwrap();

    let seen = Arc::clone(&order);
    builder.add_delegate("after", move |context| {
        seen.lock().unwrap().push(context.application().len());
        Ok(())
    });
    let seen = Arc::clone(&order);
    builder.prepend_delegate("before", move |context| {
        seen.lock().unwrap().push(context.application().len());
        Ok(())
    });

    builder.build().unwrap();

    // The web entry adds one handler between the two explicit delegates
    assert_eq!(*order.lock().unwrap(), vec![0, 1]);
}

#[test]
fn test_container_conventions_are_discovered_by_the_graph_builder() {
    let (_dir, path) = config_file(
        r#"
        [composition]
        candidate_modules = ["scenario::audit", "scenario::storage"]
        "#,
    );

    let built = weave::graph_builder(&loader(&path)).unwrap().build().unwrap();

    assert!(built.container.resolve::<AuditLog>().is_ok());
    assert!(built.container.resolve::<dyn Storage>().is_ok());
    assert!(built.provider.get::<AuditLog>().is_some());
}

#[test]
fn test_registry_builder_ignores_container_conventions() {
    let (_dir, path) = config_file(
        r#"
        [composition]
        candidate_modules = ["scenario::audit"]
        "#,
    );

    let provider = weave::registry_builder(&loader(&path))
        .unwrap()
        .build()
        .unwrap()
        .provider;

    assert!(provider.get::<AuditLog>().is_none());
}
