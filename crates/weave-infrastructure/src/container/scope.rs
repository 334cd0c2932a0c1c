//! Lifetime scopes

use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use dill::Catalog;
use weave_domain::error::{Error, Result};
use weave_domain::value_objects::ServiceKey;

use super::binding::ServiceBindings;
use super::builder::ContainerBuilder;
use crate::services::resolution::{Registration, ScopedInstances, activate, downcast};
use crate::services::{ProviderOptions, ServiceProvider};

static NEXT_SCOPE_ID: AtomicUsize = AtomicUsize::new(0);

struct ScopeInner {
    id: usize,
    catalog: Catalog,
    parent: Option<LifetimeScope>,
    options: ProviderOptions,
    scoped: ScopedInstances,
}

/// A resolution scope of the graph container
///
/// Lookups walk from this scope up through its parents; the nearest scope
/// registering a type owns it, and its singletons are built there.
#[derive(Clone)]
pub struct LifetimeScope {
    inner: Arc<ScopeInner>,
}

impl LifetimeScope {
    pub(crate) fn new(
        catalog: Catalog,
        parent: Option<LifetimeScope>,
        options: ProviderOptions,
    ) -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                id: NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed),
                catalog,
                parent,
                options,
                scoped: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Resolve `T`, failing when it is not registered
    pub fn resolve<T>(&self) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.resolve_optional::<T>()?
            .ok_or_else(|| Error::service_not_found(std::any::type_name::<T>()))
    }

    /// Resolve `T`, returning `Ok(None)` when it is not registered
    pub fn resolve_optional<T>(&self) -> Result<Option<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let Some((owner, bindings)) = self.find::<T>() else {
            return Ok(None);
        };
        match bindings.last() {
            Some(registration) => self.activate::<T>(&owner, registration).map(Some),
            None => Ok(None),
        }
    }

    /// Resolve every registration of `T`, outermost scope first
    pub fn resolve_all<T>(&self) -> Result<Vec<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let mut chain: Vec<&LifetimeScope> = self.ancestry().collect();
        chain.reverse();

        let mut services = Vec::new();
        for owner in chain {
            if let Ok(bindings) = owner.inner.catalog.get_one::<ServiceBindings<T>>() {
                for registration in bindings.registrations() {
                    services.push(self.activate::<T>(owner, registration)?);
                }
            }
        }
        Ok(services)
    }

    /// Whether `T` is registered in this scope or a parent
    pub fn is_registered<T: ?Sized + 'static>(&self) -> bool {
        self.ancestry()
            .any(|scope| scope.inner.catalog.get_one::<ServiceBindings<T>>().is_ok())
    }

    /// Whether this is the root scope of its container
    pub fn is_root(&self) -> bool {
        self.inner.parent.is_none()
    }

    /// Options the container was built with
    pub fn options(&self) -> ProviderOptions {
        self.inner.options
    }

    /// Provider view of this scope
    pub fn service_provider(&self) -> ServiceProvider {
        ServiceProvider::graph(self.clone())
    }

    /// Begin a child scope with no registrations of its own
    pub fn begin_lifetime_scope(&self) -> LifetimeScope {
        Self::new(
            dill::CatalogBuilder::new().build(),
            Some(self.clone()),
            self.inner.options,
        )
    }

    /// Begin a child scope whose registrations are added by `configure`
    ///
    /// Registrations made here override the parent's for this scope only.
    pub fn begin_lifetime_scope_with<F>(&self, configure: F) -> Result<LifetimeScope>
    where
        F: FnOnce(&mut ContainerBuilder),
    {
        let mut builder = ContainerBuilder::new();
        configure(&mut builder);
        builder.build_nested(self)
    }

    /// Whether both handles refer to the same scope
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn ancestry(&self) -> impl Iterator<Item = &LifetimeScope> {
        std::iter::successors(Some(self), |scope| scope.inner.parent.as_ref())
    }

    fn find<T>(&self) -> Option<(LifetimeScope, Arc<ServiceBindings<T>>)>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.ancestry().find_map(|scope| {
            scope
                .inner
                .catalog
                .get_one::<ServiceBindings<T>>()
                .ok()
                .map(|bindings| (scope.clone(), bindings))
        })
    }

    fn activate<T>(&self, owner: &LifetimeScope, registration: &Arc<Registration>) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let instance = activate(
            registration,
            &owner.service_provider(),
            &self.service_provider(),
            &self.inner.scoped,
        )?;
        downcast::<T>(&instance, ServiceKey::of::<T>())
    }
}

impl fmt::Debug for LifetimeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifetimeScope")
            .field("id", &self.inner.id)
            .field("is_root", &self.is_root())
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}

/// The root scope of a built graph container
#[derive(Debug, Clone)]
pub struct Container {
    root: LifetimeScope,
}

impl Container {
    pub(crate) fn new(root: LifetimeScope) -> Self {
        Self { root }
    }

    /// Root lifetime scope
    pub fn root(&self) -> &LifetimeScope {
        &self.root
    }
}

impl Deref for Container {
    type Target = LifetimeScope;

    fn deref(&self) -> &Self::Target {
        &self.root
    }
}
