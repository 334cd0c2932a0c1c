//! Unit tests for service identity value objects

use std::collections::HashSet;

use weave_domain::{ServiceKey, ServiceLifetime};

trait Clock {}
trait Greeter {}

#[test]
fn test_keys_compare_by_type() {
    assert_eq!(ServiceKey::of::<dyn Clock>(), ServiceKey::of::<dyn Clock>());
    assert_ne!(ServiceKey::of::<dyn Clock>(), ServiceKey::of::<dyn Greeter>());
    assert_ne!(ServiceKey::of::<String>(), ServiceKey::of::<str>());
}

#[test]
fn test_keys_hash_consistently() {
    let mut set = HashSet::new();
    set.insert(ServiceKey::of::<dyn Clock>());
    set.insert(ServiceKey::of::<dyn Clock>());
    set.insert(ServiceKey::of::<u32>());
    assert_eq!(set.len(), 2);
}

#[test]
fn test_key_display_uses_type_name() {
    let key = ServiceKey::of::<u32>();
    assert_eq!(key.to_string(), "u32");
    assert_eq!(key.name(), "u32");
}

#[test]
fn test_lifetime_display_and_default() {
    assert_eq!(ServiceLifetime::default(), ServiceLifetime::Singleton);
    assert_eq!(ServiceLifetime::Scoped.to_string(), "scoped");
    assert_eq!(ServiceLifetime::Transient.to_string(), "transient");
}
