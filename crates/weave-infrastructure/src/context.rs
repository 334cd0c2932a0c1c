//! Composition contexts
//!
//! A [`ConventionContext`] is created fresh for every build and carries the
//! ambient inputs every convention can read. [`ServiceConventionContext`]
//! adds the three registry tiers the service conventions mutate.
//!
//! Each tier also queues [`ContainerAction`]s: deferred edits of the
//! container builder, run right after that tier has been merged. Actions are
//! typed by the builder they expect; one queued for another strategy's
//! builder is skipped.

use std::any::{Any, type_name};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use tracing::debug;
use weave_domain::error::Result;

use crate::config::{Configuration, HostEnvironment};
use crate::notifier::BuildNotifier;
use crate::properties::{Properties, Property};
use crate::services::{ServiceCollection, ServiceProvider};

/// Inputs shared by every convention of one build
#[derive(Debug, Clone)]
pub struct ConventionContext {
    configuration: Configuration,
    environment: HostEnvironment,
    properties: Properties,
}

impl ConventionContext {
    /// Create a context
    pub fn new(
        configuration: Configuration,
        environment: HostEnvironment,
        properties: Properties,
    ) -> Self {
        Self {
            configuration,
            environment,
            properties,
        }
    }

    /// Configuration handle
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Host environment
    pub fn environment(&self) -> &HostEnvironment {
        &self.environment
    }

    /// Builder side-table
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Side-table value under `key`
    pub fn get(&self, key: &str) -> Option<Property> {
        self.properties.get(key)
    }

    /// Store a side-table value
    pub fn set(&self, key: impl Into<String>, value: Property) -> Option<Property> {
        self.properties.set(key, value)
    }
}

/// Registry layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Registrations made directly on the builder
    Root,
    /// Core and infrastructure registrations
    System,
    /// Feature registrations, merged last
    Application,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "root"),
            Self::System => write!(f, "system"),
            Self::Application => write!(f, "application"),
        }
    }
}

/// Deferred edit of the container builder, erased over the builder type
pub type ContainerAction = Box<dyn FnOnce(&ConventionContext, &mut dyn Any) -> Result<()> + Send>;

/// Low-level container published to convention observers
pub type BuiltContainer = Arc<dyn Any + Send + Sync>;

/// One registry layer, its container actions and its build notifier
///
/// Derefs to its [`ServiceCollection`], so registrations read naturally:
/// `context.system().add_singleton(..)`.
pub struct ServiceTier {
    tier: Tier,
    services: ServiceCollection,
    actions: Vec<ContainerAction>,
    on_build: BuildNotifier<ServiceProvider>,
}

impl ServiceTier {
    /// Create an empty tier
    pub fn new(tier: Tier) -> Self {
        Self {
            tier,
            services: ServiceCollection::new(),
            actions: Vec::new(),
            on_build: BuildNotifier::new(),
        }
    }

    /// Edit the container builder once this tier has been merged
    ///
    /// `B` is the builder of the strategy the action is written for:
    /// [`ServiceCollection`] for the registry,
    /// [`ContainerBuilder`](crate::container::ContainerBuilder) for the graph.
    pub fn configure_container<B, F>(&mut self, action: F) -> &mut Self
    where
        B: 'static,
        F: FnOnce(&ConventionContext, &mut B) -> Result<()> + Send + 'static,
    {
        let tier = self.tier;
        self.actions.push(Box::new(
            move |context: &ConventionContext, builder: &mut dyn Any| {
                match builder.downcast_mut::<B>() {
                    Some(builder) => action(context, builder),
                    None => {
                        debug!(%tier, builder = type_name::<B>(), "Skipping container action");
                        Ok(())
                    }
                }
            },
        ));
        self
    }

    /// Number of queued container actions
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    pub(crate) fn take_actions(&mut self) -> Vec<ContainerAction> {
        std::mem::take(&mut self.actions)
    }

    /// Which layer this is
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Registrations of this tier
    pub fn services(&self) -> &ServiceCollection {
        &self.services
    }

    /// Mutable registrations of this tier
    pub fn services_mut(&mut self) -> &mut ServiceCollection {
        &mut self.services
    }

    /// Fires with the built provider once this tier has been merged
    pub fn on_build(&self) -> &BuildNotifier<ServiceProvider> {
        &self.on_build
    }
}

impl fmt::Debug for ServiceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceTier")
            .field("tier", &self.tier)
            .field("services", &self.services)
            .field("actions", &self.actions.len())
            .field("on_build", &self.on_build)
            .finish()
    }
}

impl Deref for ServiceTier {
    type Target = ServiceCollection;

    fn deref(&self) -> &Self::Target {
        &self.services
    }
}

impl DerefMut for ServiceTier {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.services
    }
}

/// Context handed to service conventions
///
/// Derefs to the [`ConventionContext`] for configuration, environment and
/// side-table access.
pub struct ServiceConventionContext<'a> {
    context: &'a ConventionContext,
    root: &'a mut ServiceTier,
    system: &'a mut ServiceTier,
    application: &'a mut ServiceTier,
    container_built: &'a BuildNotifier<BuiltContainer>,
}

impl<'a> ServiceConventionContext<'a> {
    /// Create a context over the three tiers
    pub fn new(
        context: &'a ConventionContext,
        root: &'a mut ServiceTier,
        system: &'a mut ServiceTier,
        application: &'a mut ServiceTier,
        container_built: &'a BuildNotifier<BuiltContainer>,
    ) -> Self {
        Self {
            context,
            root,
            system,
            application,
            container_built,
        }
    }

    /// Shared convention inputs
    pub fn context(&self) -> &ConventionContext {
        self.context
    }

    /// Root registrations
    pub fn services(&mut self) -> &mut ServiceCollection {
        self.root.services_mut()
    }

    /// System tier
    pub fn system(&mut self) -> &mut ServiceTier {
        &mut *self.system
    }

    /// Application tier
    pub fn application(&mut self) -> &mut ServiceTier {
        &mut *self.application
    }

    /// Fires with the built provider once the root has been merged
    pub fn on_build(&self) -> &BuildNotifier<ServiceProvider> {
        self.root.on_build()
    }

    /// Edit the container builder once the root tier has been merged
    pub fn configure_container<B, F>(&mut self, action: F) -> &mut Self
    where
        B: 'static,
        F: FnOnce(&ConventionContext, &mut B) -> Result<()> + Send + 'static,
    {
        self.root.configure_container::<B, F>(action);
        self
    }

    /// Call `observer` with the low-level container once it is built
    ///
    /// `C` is the strategy's container type: [`ServiceProvider`] for the
    /// registry, [`Container`](crate::container::Container) for the graph.
    /// The observer is not called when the build produces another type.
    pub fn on_container_build<C, F>(&self, observer: F)
    where
        C: Clone + Send + Sync + 'static,
        F: FnOnce(C) + Send + 'static,
    {
        self.container_built.subscribe(move |container: BuiltContainer| {
            match (*container).downcast_ref::<C>() {
                Some(container) => observer(container.clone()),
                None => debug!(container = type_name::<C>(), "Skipping container observer"),
            }
        });
    }
}

impl Deref for ServiceConventionContext<'_> {
    type Target = ConventionContext;

    fn deref(&self) -> &Self::Target {
        self.context
    }
}

impl fmt::Debug for ServiceConventionContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConventionContext")
            .field("environment", self.context.environment())
            .field("root", &self.root.len())
            .field("system", &self.system.len())
            .field("application", &self.application.len())
            .finish()
    }
}
