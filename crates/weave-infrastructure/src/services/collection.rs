//! Service collection

use std::sync::Arc;

use weave_domain::error::Result;
use weave_domain::value_objects::ServiceKey;

use super::descriptor::ServiceDescriptor;
use super::provider::{ProviderOptions, ServiceProvider};

/// Ordered list of service registrations
///
/// Registrations are never replaced in place: adding a second registration for
/// a key shadows the first at resolution time, and both are returned by
/// [`ServiceProvider::get_all`].
#[derive(Debug, Clone, Default)]
pub struct ServiceCollection {
    descriptors: Vec<ServiceDescriptor>,
}

impl ServiceCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor
    pub fn add(&mut self, descriptor: ServiceDescriptor) -> &mut Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Add a descriptor unless its key is already registered
    ///
    /// Returns whether the descriptor was added.
    pub fn try_add(&mut self, descriptor: ServiceDescriptor) -> bool {
        if self.contains_key(descriptor.key()) {
            return false;
        }
        self.descriptors.push(descriptor);
        true
    }

    /// Register an existing instance as a singleton
    pub fn add_singleton<T>(&mut self, instance: Arc<T>) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.add(ServiceDescriptor::instance(instance))
    }

    /// Register an existing instance unless `T` is already registered
    pub fn try_add_singleton<T>(&mut self, instance: Arc<T>) -> bool
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.try_add(ServiceDescriptor::instance(instance))
    }

    /// Register a singleton built on first resolution
    pub fn add_singleton_with<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.add(ServiceDescriptor::singleton(factory))
    }

    /// Register a service built once per scope
    pub fn add_scoped_with<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.add(ServiceDescriptor::scoped(factory))
    }

    /// Register a service built on every resolution
    pub fn add_transient_with<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.add(ServiceDescriptor::transient(factory))
    }

    /// Whether `T` has at least one registration
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.contains_key(ServiceKey::of::<T>())
    }

    /// Whether `key` has at least one registration
    pub fn contains_key(&self, key: ServiceKey) -> bool {
        self.descriptors.iter().any(|d| d.key() == key)
    }

    /// Remove every registration of `T`, returning how many were removed
    pub fn remove_all<T: ?Sized + 'static>(&mut self) -> usize {
        let key = ServiceKey::of::<T>();
        let before = self.descriptors.len();
        self.descriptors.retain(|d| d.key() != key);
        before - self.descriptors.len()
    }

    /// Append every registration of `other`, keeping its order
    pub fn extend(&mut self, other: &ServiceCollection) -> &mut Self {
        self.descriptors.extend(other.descriptors.iter().cloned());
        self
    }

    /// Iterate registrations in order
    pub fn iter(&self) -> std::slice::Iter<'_, ServiceDescriptor> {
        self.descriptors.iter()
    }

    /// Number of registrations
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the collection holds no registrations
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Build a provider with default options
    pub fn build_service_provider(&self) -> ServiceProvider {
        self.build_service_provider_with(ProviderOptions::default())
    }

    /// Build a provider
    ///
    /// The provider works on a snapshot: later changes to the collection are
    /// not visible to it.
    pub fn build_service_provider_with(&self, options: ProviderOptions) -> ServiceProvider {
        ServiceProvider::from_descriptors(self.descriptors.iter().cloned(), options)
    }
}

impl<'a> IntoIterator for &'a ServiceCollection {
    type Item = &'a ServiceDescriptor;
    type IntoIter = std::slice::Iter<'a, ServiceDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}

impl FromIterator<ServiceDescriptor> for ServiceCollection {
    fn from_iter<I: IntoIterator<Item = ServiceDescriptor>>(iter: I) -> Self {
        Self {
            descriptors: iter.into_iter().collect(),
        }
    }
}
