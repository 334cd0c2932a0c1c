//! Container builder

use std::fmt;
use std::sync::Arc;

use tracing::debug;
use weave_domain::error::{Error, Result};
use weave_domain::value_objects::{ServiceKey, ServiceLifetime};

use super::binding::build_catalog;
use super::scope::{Container, LifetimeScope};
use crate::services::{ProviderOptions, ServiceCollection, ServiceDescriptor, ServiceProvider};

/// Action run once the scope it was registered for has been built
pub type BuildCallback = Box<dyn FnOnce(&LifetimeScope) -> Result<()> + Send>;

/// Accumulates registrations for a [`Container`] or a nested scope
#[derive(Default)]
pub struct ContainerBuilder {
    registrations: Vec<ServiceDescriptor>,
    defaults: Vec<ServiceDescriptor>,
    callbacks: Vec<BuildCallback>,
}

impl ContainerBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an existing instance
    pub fn register_instance<T>(&mut self, instance: Arc<T>) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.registrations.push(ServiceDescriptor::instance(instance));
        self
    }

    /// Register an instance used only when nothing else registers `T`
    pub fn register_default_instance<T>(&mut self, instance: Arc<T>) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.defaults.push(ServiceDescriptor::instance(instance));
        self
    }

    /// Register a singleton built on first resolution
    pub fn register_singleton<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&LifetimeScope) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.register(ServiceLifetime::Singleton, factory)
    }

    /// Register a service built once per lifetime scope
    pub fn register_scoped<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&LifetimeScope) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.register(ServiceLifetime::Scoped, factory)
    }

    /// Register a service built on every resolution
    pub fn register_transient<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&LifetimeScope) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.register(ServiceLifetime::Transient, factory)
    }

    fn register<T, F>(&mut self, lifetime: ServiceLifetime, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&LifetimeScope) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.registrations.push(ServiceDescriptor::factory::<T, _>(
            lifetime,
            move |provider: &ServiceProvider| match provider.lifetime_scope() {
                Some(scope) => factory(scope),
                None => Err(Error::internal(
                    "graph registration resolved outside a lifetime scope",
                )),
            },
        ));
        self
    }

    /// Add every registration of a service collection, keeping its order
    pub fn populate(&mut self, services: &ServiceCollection) -> &mut Self {
        self.registrations.extend(services.iter().cloned());
        self
    }

    /// Run `callback` with the scope once it has been built
    pub fn register_build_callback<F>(&mut self, callback: F) -> &mut Self
    where
        F: FnOnce(&LifetimeScope) -> Result<()> + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
        self
    }

    /// Whether `T` is registered, counting default instances
    pub fn is_registered<T: ?Sized + 'static>(&self) -> bool {
        let key = ServiceKey::of::<T>();
        self.registrations
            .iter()
            .chain(&self.defaults)
            .any(|d| d.key() == key)
    }

    /// Number of registrations, excluding default instances
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Whether the builder holds no registrations
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty() && self.defaults.is_empty()
    }

    /// Build the root container with default options
    pub fn build(self) -> Result<Container> {
        self.build_with(ProviderOptions::default())
    }

    /// Build the root container and run build callbacks in registration order
    pub fn build_with(self, options: ProviderOptions) -> Result<Container> {
        let (descriptors, callbacks) = self.into_parts();
        let scope = LifetimeScope::new(build_catalog(descriptors), None, options);
        run_callbacks(&scope, callbacks)?;
        Ok(Container::new(scope))
    }

    /// Build a scope nested under `parent`
    pub(crate) fn build_nested(self, parent: &LifetimeScope) -> Result<LifetimeScope> {
        let (descriptors, callbacks) = self.into_parts();
        let scope = LifetimeScope::new(
            build_catalog(descriptors),
            Some(parent.clone()),
            parent.options(),
        );
        run_callbacks(&scope, callbacks)?;
        Ok(scope)
    }

    fn into_parts(self) -> (Vec<ServiceDescriptor>, Vec<BuildCallback>) {
        let Self {
            mut registrations,
            defaults,
            callbacks,
        } = self;

        // Defaults go first so any explicit registration shadows them; a default
        // with an explicit registration is dropped entirely.
        let mut descriptors: Vec<ServiceDescriptor> = defaults
            .into_iter()
            .filter(|default| !registrations.iter().any(|d| d.key() == default.key()))
            .collect();
        descriptors.append(&mut registrations);

        debug!(
            registrations = descriptors.len(),
            callbacks = callbacks.len(),
            "Building container"
        );
        (descriptors, callbacks)
    }
}

fn run_callbacks(scope: &LifetimeScope, callbacks: Vec<BuildCallback>) -> Result<()> {
    for callback in callbacks {
        callback(scope)?;
    }
    Ok(())
}

impl fmt::Debug for ContainerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerBuilder")
            .field("registrations", &self.registrations)
            .field("defaults", &self.defaults)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}
