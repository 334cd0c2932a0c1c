//! Service provider
//!
//! Resolves services from a snapshot of registrations.
//!
//! ## Resolution rules
//!
//! - The last registration of a key wins; [`ServiceProvider::get_all`]
//!   returns every registration in order.
//! - Singletons are built once per registration, always by the root provider,
//!   and shared by every scope.
//! - Scoped services are built once per scope.
//! - Transient services are built on every resolution.
//!
//! A provider is either a plain registry built from a [`ServiceCollection`]
//! or a view of a graph container [`LifetimeScope`]; both resolve through the
//! same API.
//!
//! [`ServiceCollection`]: super::ServiceCollection

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::warn;
use weave_domain::error::{Error, Result};
use weave_domain::value_objects::ServiceKey;

use super::descriptor::{Instance, ServiceDescriptor};
use super::resolution::{Registration, ScopedInstances, activate, downcast};
use crate::container::LifetimeScope;

/// Provider behaviour switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderOptions {
    /// Reject scoped services resolved from the root provider
    pub validate_scopes: bool,
}

impl ProviderOptions {
    /// Options with scope validation set to `validate_scopes`
    pub fn with_validate_scopes(validate_scopes: bool) -> Self {
        Self { validate_scopes }
    }
}

type Registry = HashMap<ServiceKey, Vec<Arc<Registration>>>;

/// One scope of the plain registry
struct RegistryScope {
    registry: Arc<Registry>,
    /// `None` on the root itself
    root: Option<Arc<RegistryScope>>,
    options: ProviderOptions,
    scoped: ScopedInstances,
}

#[derive(Clone)]
enum Backend {
    Registry(Arc<RegistryScope>),
    Graph(LifetimeScope),
}

/// Resolves registered services
///
/// Cloning yields a handle to the same provider; use [`ptr_eq`](Self::ptr_eq)
/// to compare handles.
#[derive(Clone)]
pub struct ServiceProvider {
    backend: Backend,
}

impl ServiceProvider {
    /// Root provider over `descriptors`
    pub fn from_descriptors<I>(descriptors: I, options: ProviderOptions) -> Self
    where
        I: IntoIterator<Item = ServiceDescriptor>,
    {
        let mut registry = Registry::new();
        for descriptor in descriptors {
            registry
                .entry(descriptor.key())
                .or_default()
                .push(Registration::new(descriptor));
        }

        Self::registry(Arc::new(RegistryScope {
            registry: Arc::new(registry),
            root: None,
            options,
            scoped: Mutex::new(HashMap::new()),
        }))
    }

    /// Provider without registrations
    pub fn empty() -> Self {
        Self::from_descriptors(std::iter::empty(), ProviderOptions::default())
    }

    fn registry(scope: Arc<RegistryScope>) -> Self {
        Self {
            backend: Backend::Registry(scope),
        }
    }

    /// Provider view of a graph container scope
    pub(crate) fn graph(scope: LifetimeScope) -> Self {
        Self {
            backend: Backend::Graph(scope),
        }
    }

    /// Graph container scope behind this provider, if any
    pub(crate) fn lifetime_scope(&self) -> Option<&LifetimeScope> {
        match &self.backend {
            Backend::Graph(scope) => Some(scope),
            Backend::Registry(_) => None,
        }
    }

    /// Create a scope sharing this provider's registrations and singletons
    pub fn create_scope(&self) -> Self {
        match &self.backend {
            Backend::Registry(scope) => Self::registry(Arc::new(RegistryScope {
                registry: Arc::clone(&scope.registry),
                root: Some(root_of(scope)),
                options: scope.options,
                scoped: Mutex::new(HashMap::new()),
            })),
            Backend::Graph(scope) => Self::graph(scope.begin_lifetime_scope()),
        }
    }

    /// Resolve `T`, logging and discarding resolution failures
    pub fn get<T>(&self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        match self.try_get::<T>() {
            Ok(service) => service,
            Err(err) => {
                warn!(
                    service = std::any::type_name::<T>(),
                    error = %err,
                    "Failed to resolve service"
                );
                None
            }
        }
    }

    /// Resolve `T`, returning `Ok(None)` when it is not registered
    pub fn try_get<T>(&self) -> Result<Option<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let scope = match &self.backend {
            Backend::Registry(scope) => scope,
            Backend::Graph(scope) => return scope.resolve_optional::<T>(),
        };

        let key = ServiceKey::of::<T>();
        match scope.registry.get(&key).and_then(|all| all.last()) {
            Some(registration) => {
                let instance = self.activate(scope, registration)?;
                downcast::<T>(&instance, key).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Resolve `T`, failing when it is not registered
    pub fn get_required<T>(&self) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.try_get::<T>()?
            .ok_or_else(|| Error::service_not_found(std::any::type_name::<T>()))
    }

    /// Resolve every registration of `T` in registration order
    pub fn get_all<T>(&self) -> Result<Vec<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let scope = match &self.backend {
            Backend::Registry(scope) => scope,
            Backend::Graph(scope) => return scope.resolve_all::<T>(),
        };

        let key = ServiceKey::of::<T>();
        scope
            .registry
            .get(&key)
            .into_iter()
            .flatten()
            .map(|registration| {
                let instance = self.activate(scope, registration)?;
                downcast::<T>(&instance, key)
            })
            .collect()
    }

    /// Whether `T` is registered
    pub fn is_registered<T: ?Sized + 'static>(&self) -> bool {
        match &self.backend {
            Backend::Registry(scope) => {
                scope.registry.contains_key(&ServiceKey::of::<T>())
            }
            Backend::Graph(scope) => scope.is_registered::<T>(),
        }
    }

    /// Whether this is the root provider rather than a scope
    pub fn is_root(&self) -> bool {
        match &self.backend {
            Backend::Registry(scope) => scope.root.is_none(),
            Backend::Graph(scope) => scope.is_root(),
        }
    }

    /// Options the provider was built with
    pub fn options(&self) -> ProviderOptions {
        match &self.backend {
            Backend::Registry(scope) => scope.options,
            Backend::Graph(scope) => scope.options(),
        }
    }

    /// Whether both handles refer to the same provider
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.backend, &other.backend) {
            (Backend::Registry(a), Backend::Registry(b)) => Arc::ptr_eq(a, b),
            (Backend::Graph(a), Backend::Graph(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    fn activate(
        &self,
        scope: &Arc<RegistryScope>,
        registration: &Arc<Registration>,
    ) -> Result<Instance> {
        let owner = Self::registry(root_of(scope));
        activate(registration, &owner, self, &scope.scoped)
    }
}

fn root_of(scope: &Arc<RegistryScope>) -> Arc<RegistryScope> {
    Arc::clone(scope.root.as_ref().unwrap_or(scope))
}

impl Default for ServiceProvider {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.backend {
            Backend::Registry(scope) => f
                .debug_struct("ServiceProvider")
                .field("services", &scope.registry.len())
                .field("is_root", &scope.root.is_none())
                .field("options", &scope.options)
                .finish(),
            Backend::Graph(scope) => f.debug_tuple("ServiceProvider").field(scope).finish(),
        }
    }
}
