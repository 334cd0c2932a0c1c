//! Child builder
//!
//! A short-lived handle onto a parent [`ServicesBuilder`], handed to code that
//! should add conventions and registrations but not build. Everything goes
//! straight to the parent; [`exit`](ChildServicesBuilder::exit) returns it.

use std::sync::Arc;

use weave_domain::error::Result;

use super::services_builder::ServicesBuilder;
use super::strategy::ContainerStrategy;
use crate::context::{ConventionContext, ServiceConventionContext, ServiceTier};
use crate::conventions::ServiceConvention;
use crate::notifier::BuildNotifier;
use crate::properties::Property;
use crate::services::{ServiceCollection, ServiceProvider};

/// Forwarding handle onto a parent builder
pub struct ChildServicesBuilder<'a, S: ContainerStrategy> {
    parent: &'a mut ServicesBuilder<S>,
}

impl<'a, S: ContainerStrategy> ChildServicesBuilder<'a, S> {
    pub(crate) fn new(parent: &'a mut ServicesBuilder<S>) -> Self {
        Self { parent }
    }

    /// Root registrations of the parent
    pub fn services_mut(&mut self) -> &mut ServiceCollection {
        self.parent.services_mut()
    }

    /// System tier of the parent
    pub fn system_mut(&mut self) -> &mut ServiceTier {
        self.parent.system_mut()
    }

    /// Application tier of the parent
    pub fn application_mut(&mut self) -> &mut ServiceTier {
        self.parent.application_mut()
    }

    /// Append a service convention to the parent
    pub fn add_convention(&mut self, convention: Arc<dyn ServiceConvention>) -> &mut Self {
        self.parent.add_convention(convention);
        self
    }

    /// Prepend a service convention to the parent
    pub fn prepend_convention(&mut self, convention: Arc<dyn ServiceConvention>) -> &mut Self {
        self.parent.prepend_convention(convention);
        self
    }

    /// Append a function service convention to the parent
    pub fn add_delegate<F>(&mut self, name: &'static str, delegate: F) -> &mut Self
    where
        F: for<'x, 'y> Fn(&'x mut ServiceConventionContext<'y>) -> Result<()>
            + Send
            + Sync
            + 'static,
    {
        self.parent.add_delegate(name, delegate);
        self
    }

    /// Prepend a function service convention to the parent
    pub fn prepend_delegate<F>(&mut self, name: &'static str, delegate: F) -> &mut Self
    where
        F: for<'x, 'y> Fn(&'x mut ServiceConventionContext<'y>) -> Result<()>
            + Send
            + Sync
            + 'static,
    {
        self.parent.prepend_delegate(name, delegate);
        self
    }

    /// Configure the parent's container builder after the root tier is merged
    pub fn configure_container<F>(&mut self, action: F) -> &mut Self
    where
        F: FnOnce(&ConventionContext, &mut S::Builder) -> Result<()> + Send + 'static,
    {
        self.parent.configure_container(action);
        self
    }

    /// Side-table value of the parent
    pub fn get(&self, key: &str) -> Option<Property> {
        self.parent.get(key)
    }

    /// Store a side-table value on the parent
    pub fn set(&mut self, key: impl Into<String>, value: Property) -> &mut Self {
        self.parent.set(key, value);
        self
    }

    /// Root build notifier of the parent
    pub fn on_build(&self) -> &BuildNotifier<ServiceProvider> {
        self.parent.on_build()
    }

    /// Give the parent back
    pub fn exit(self) -> &'a mut ServicesBuilder<S> {
        self.parent
    }
}
