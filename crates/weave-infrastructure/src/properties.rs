//! Key/value side-table
//!
//! Ambient state shared between conventions of one builder. Values are stored
//! behind `Arc`, so `get` after `set` returns the very same allocation.

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Shared property value
pub type Property = Arc<dyn Any + Send + Sync>;

/// Side-table of opaque values keyed by string
///
/// Clones share the same table.
#[derive(Clone, Default)]
pub struct Properties {
    values: Arc<RwLock<HashMap<String, Property>>>,
}

impl Properties {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, returning the previous value
    pub fn set(&self, key: impl Into<String>, value: Property) -> Option<Property> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value)
    }

    /// Value stored under `key`, `None` when unset
    pub fn get(&self, key: &str) -> Option<Property> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Value stored under `key` if it has type `T`
    pub fn get_as<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.get(key).and_then(|value| value.downcast::<T>().ok())
    }

    /// Store `value` under its type name
    pub fn set_typed<T: Any + Send + Sync>(&self, value: T) -> Option<Property> {
        self.set(type_name::<T>(), Arc::new(value))
    }

    /// Value stored under the type name of `T`
    pub fn get_typed<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.get_as::<T>(type_name::<T>())
    }

    /// Remove the value under `key`
    pub fn remove(&self, key: &str) -> Option<Property> {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }

    /// Whether a value is stored under `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<_> = values.keys().collect();
        keys.sort();
        f.debug_struct("Properties").field("keys", &keys).finish()
    }
}
