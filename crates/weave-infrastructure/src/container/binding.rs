//! Catalog bindings
//!
//! Each lifetime scope keeps its registrations in a [`dill::Catalog`], one
//! [`ServiceBindings`] value per service type. The value is keyed by the
//! service type, so the catalog lookup stays typed even for trait objects.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use dill::{Catalog, CatalogBuilder};
use weave_domain::value_objects::ServiceKey;

use crate::services::ServiceDescriptor;
use crate::services::resolution::Registration;

/// Every registration of `T` made in one scope, in registration order
pub(crate) struct ServiceBindings<T: ?Sized> {
    registrations: Vec<Arc<Registration>>,
    _service: PhantomData<fn() -> Arc<T>>,
}

impl<T: ?Sized> ServiceBindings<T> {
    pub(crate) fn registrations(&self) -> &[Arc<Registration>] {
        &self.registrations
    }

    /// Registration that wins single resolution
    pub(crate) fn last(&self) -> Option<&Arc<Registration>> {
        self.registrations.last()
    }
}

/// Adds one service type's registrations to a catalog
pub(crate) type CatalogInstaller = fn(&mut CatalogBuilder, Vec<Arc<Registration>>);

pub(crate) fn install<T>(catalog: &mut CatalogBuilder, registrations: Vec<Arc<Registration>>)
where
    T: ?Sized + Send + Sync + 'static,
{
    catalog.add_value(ServiceBindings::<T> {
        registrations,
        _service: PhantomData,
    });
}

/// Build the catalog of one scope
pub(crate) fn build_catalog(descriptors: Vec<ServiceDescriptor>) -> Catalog {
    let mut groups: Vec<(CatalogInstaller, Vec<Arc<Registration>>)> = Vec::new();
    let mut index: HashMap<ServiceKey, usize> = HashMap::new();

    for descriptor in descriptors {
        let slot = *index.entry(descriptor.key()).or_insert_with(|| {
            groups.push((descriptor.installer(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(Registration::new(descriptor));
    }

    let mut catalog = CatalogBuilder::new();
    for (installer, registrations) in groups {
        installer(&mut catalog, registrations);
    }
    catalog.build()
}
