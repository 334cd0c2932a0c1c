//! Service descriptors

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use weave_domain::error::Result;
use weave_domain::value_objects::{ServiceKey, ServiceLifetime};

use super::provider::ServiceProvider;
use crate::container::binding::{CatalogInstaller, install};

/// Type-erased service instance
///
/// Always holds an `Arc<T>` for the registered `T`, so unsized services
/// (`dyn Trait`) can be stored and recovered with `downcast_ref::<Arc<T>>()`.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Type-erased factory producing an [`Instance`]
pub type ServiceFactory = Arc<dyn Fn(&ServiceProvider) -> Result<Instance> + Send + Sync>;

/// How a descriptor produces its service
#[derive(Clone)]
pub enum Implementation {
    /// Pre-built instance
    Instance(Instance),
    /// Factory invoked according to the lifetime
    Factory(ServiceFactory),
}

/// Registration of one service
#[derive(Clone)]
pub struct ServiceDescriptor {
    key: ServiceKey,
    lifetime: ServiceLifetime,
    implementation: Implementation,
    installer: CatalogInstaller,
}

impl ServiceDescriptor {
    /// Singleton backed by an existing instance
    pub fn instance<T>(instance: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Self {
            key: ServiceKey::of::<T>(),
            lifetime: ServiceLifetime::Singleton,
            implementation: Implementation::Instance(Arc::new(instance)),
            installer: install::<T>,
        }
    }

    /// Service built by `factory` with the given lifetime
    pub fn factory<T, F>(lifetime: ServiceLifetime, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        Self {
            key: ServiceKey::of::<T>(),
            lifetime,
            implementation: Implementation::Factory(Arc::new(move |provider: &ServiceProvider| {
                factory(provider).map(|service| Arc::new(service) as Instance)
            })),
            installer: install::<T>,
        }
    }

    /// Singleton built on first resolution
    pub fn singleton<T, F>(factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        Self::factory(ServiceLifetime::Singleton, factory)
    }

    /// Service built once per scope
    pub fn scoped<T, F>(factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        Self::factory(ServiceLifetime::Scoped, factory)
    }

    /// Service built on every resolution
    pub fn transient<T, F>(factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&ServiceProvider) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        Self::factory(ServiceLifetime::Transient, factory)
    }

    /// Key the service is registered under
    pub fn key(&self) -> ServiceKey {
        self.key
    }

    /// Lifetime of resolved instances
    pub fn lifetime(&self) -> ServiceLifetime {
        self.lifetime
    }

    /// How the service is produced
    pub fn implementation(&self) -> &Implementation {
        &self.implementation
    }

    /// Adds the bindings of this descriptor's type to a graph catalog
    pub(crate) fn installer(&self) -> CatalogInstaller {
        self.installer
    }
}

impl fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let implementation = match self.implementation {
            Implementation::Instance(_) => "instance",
            Implementation::Factory(_) => "factory",
        };
        f.debug_struct("ServiceDescriptor")
            .field("key", &self.key.name())
            .field("lifetime", &self.lifetime)
            .field("implementation", &implementation)
            .finish()
    }
}
