//! Services builder

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, info_span};
use weave_application::{Composer, ConventionScanner, ConventionUnit};
use weave_domain::error::Result;

use super::child::ChildServicesBuilder;
use super::setup::ServicesBuilderSetup;
use super::strategy::{ContainerStrategy, GraphStrategy, RegistryStrategy};
use crate::config::{Configuration, HostEnvironment, WeaveConfig};
use crate::container::ContainerBuilder;
use crate::context::{
    BuiltContainer, ConventionContext, ServiceConventionContext, ServiceTier, Tier,
};
use crate::conventions::{
    ContainerConvention, ContainerConventionDelegate, ContainerConventions, ServiceConvention,
    ServiceConventions,
};
use crate::notifier::BuildNotifier;
use crate::properties::{Properties, Property};
use crate::services::{ServiceCollection, ServiceProvider};

/// Builder facade over the plain registry
pub type RegistryServicesBuilder = ServicesBuilder<RegistryStrategy>;

/// Builder facade over the graph container
pub type GraphServicesBuilder = ServicesBuilder<GraphStrategy>;

/// Result of a successful build
#[derive(Debug, Clone)]
pub struct BuiltServices<C> {
    /// Low-level container (the provider itself on the registry strategy)
    pub container: C,
    /// Provider handed to every tier observer
    pub provider: ServiceProvider,
}

/// Collects conventions and registrations, then builds the container
pub struct ServicesBuilder<S: ContainerStrategy> {
    scanner: ConventionScanner,
    configuration: Configuration,
    environment: HostEnvironment,
    properties: Properties,
    strategy: S,
    root: ServiceTier,
    system: ServiceTier,
    application: ServiceTier,
    on_container_build: BuildNotifier<S::Container>,
    container_built: BuildNotifier<BuiltContainer>,
}

impl<S: ContainerStrategy> ServicesBuilder<S> {
    /// Create a builder from its collaborators
    pub fn new(
        scanner: ConventionScanner,
        configuration: Configuration,
        environment: HostEnvironment,
        strategy: S,
    ) -> Self {
        Self {
            scanner,
            configuration,
            environment,
            properties: Properties::new(),
            strategy,
            root: ServiceTier::new(Tier::Root),
            system: ServiceTier::new(Tier::System),
            application: ServiceTier::new(Tier::Application),
            on_container_build: BuildNotifier::new(),
            container_built: BuildNotifier::new(),
        }
    }

    /// Start a builder whose collaborators are checked when it is finished
    pub fn setup() -> ServicesBuilderSetup<S> {
        ServicesBuilderSetup::new()
    }

    /// Create a builder from loaded settings
    ///
    /// The scanner discovers linked conventions from the configured candidate
    /// modules, minus the excluded ones.
    pub fn from_config(config: &WeaveConfig, configuration: Configuration, strategy: S) -> Self {
        Self::new(
            config.composition.scanner(),
            configuration,
            HostEnvironment::from(&config.environment),
            strategy,
        )
    }

    /// Convention scanner
    pub fn scanner(&self) -> &ConventionScanner {
        &self.scanner
    }

    /// Mutable convention scanner
    pub fn scanner_mut(&mut self) -> &mut ConventionScanner {
        &mut self.scanner
    }

    /// Configuration handle
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Host environment
    pub fn environment(&self) -> &HostEnvironment {
        &self.environment
    }

    /// Side-table shared with conventions
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Container strategy
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Root registrations
    pub fn services(&self) -> &ServiceCollection {
        self.root.services()
    }

    /// Mutable root registrations
    pub fn services_mut(&mut self) -> &mut ServiceCollection {
        self.root.services_mut()
    }

    /// System tier
    pub fn system(&self) -> &ServiceTier {
        &self.system
    }

    /// Mutable System tier
    pub fn system_mut(&mut self) -> &mut ServiceTier {
        &mut self.system
    }

    /// Application tier
    pub fn application(&self) -> &ServiceTier {
        &self.application
    }

    /// Mutable Application tier
    pub fn application_mut(&mut self) -> &mut ServiceTier {
        &mut self.application
    }

    /// Append a service convention
    pub fn add_convention(&mut self, convention: Arc<dyn ServiceConvention>) -> &mut Self {
        self.scanner.append_convention::<ServiceConventions>(convention);
        self
    }

    /// Insert a service convention before every other
    pub fn prepend_convention(&mut self, convention: Arc<dyn ServiceConvention>) -> &mut Self {
        self.scanner.prepend_convention::<ServiceConventions>(convention);
        self
    }

    /// Append a service convention written as a function
    pub fn add_delegate<F>(&mut self, name: &'static str, delegate: F) -> &mut Self
    where
        F: for<'a, 'b> Fn(&'a mut ServiceConventionContext<'b>) -> Result<()>
            + Send
            + Sync
            + 'static,
    {
        let unit = ConventionUnit::<ServiceConventions>::named_delegate(name, Arc::new(delegate));
        self.scanner.append_unit(unit);
        self
    }

    /// Insert a function service convention before every other
    pub fn prepend_delegate<F>(&mut self, name: &'static str, delegate: F) -> &mut Self
    where
        F: for<'a, 'b> Fn(&'a mut ServiceConventionContext<'b>) -> Result<()>
            + Send
            + Sync
            + 'static,
    {
        let unit = ConventionUnit::<ServiceConventions>::named_delegate(name, Arc::new(delegate));
        self.scanner.prepend_unit(unit);
        self
    }

    /// Configure the container builder after the root tier is merged
    pub fn configure_container<F>(&mut self, action: F) -> &mut Self
    where
        F: FnOnce(&ConventionContext, &mut S::Builder) -> Result<()> + Send + 'static,
    {
        self.root.configure_container::<S::Builder, F>(action);
        self
    }

    /// Configure the container builder after the System tier is merged
    pub fn configure_system_container<F>(&mut self, action: F) -> &mut Self
    where
        F: FnOnce(&ConventionContext, &mut S::Builder) -> Result<()> + Send + 'static,
    {
        self.system.configure_container::<S::Builder, F>(action);
        self
    }

    /// Configure the container builder after the Application tier is merged
    pub fn configure_application_container<F>(&mut self, action: F) -> &mut Self
    where
        F: FnOnce(&ConventionContext, &mut S::Builder) -> Result<()> + Send + 'static,
    {
        self.application.configure_container::<S::Builder, F>(action);
        self
    }

    /// Side-table value under `key`, `None` when unset
    pub fn get(&self, key: &str) -> Option<Property> {
        self.properties.get(key)
    }

    /// Store a side-table value
    pub fn set(&mut self, key: impl Into<String>, value: Property) -> &mut Self {
        self.properties.set(key, value);
        self
    }

    /// Fires with the built provider once the root tier is merged
    pub fn on_build(&self) -> &BuildNotifier<ServiceProvider> {
        self.root.on_build()
    }

    /// Fires with the low-level container
    pub fn on_container_build(&self) -> &BuildNotifier<S::Container> {
        &self.on_container_build
    }

    /// Borrow this builder through a child handle
    pub fn child(&mut self) -> ChildServicesBuilder<'_, S> {
        ChildServicesBuilder::new(self)
    }

    /// Compose, merge the tiers, build the container and notify observers
    ///
    /// Consumes the builder, so a builder can be built at most once. The
    /// first failing convention aborts the build with
    /// [`Error::Convention`](weave_domain::Error::Convention) carrying the
    /// error it returned; no observer is notified on failure.
    pub fn build(self) -> Result<BuiltServices<S::Container>> {
        let Self {
            scanner,
            configuration,
            environment,
            properties,
            mut strategy,
            mut root,
            mut system,
            mut application,
            on_container_build,
            container_built,
        } = self;

        let span = info_span!("build", strategy = strategy.name());
        let _enter = span.enter();

        let context = ConventionContext::new(configuration, environment, properties);

        let mut conventions = ServiceConventionContext::new(
            &context,
            &mut root,
            &mut system,
            &mut application,
            &container_built,
        );
        Composer::new(&scanner).register::<ServiceConventions>(&mut conventions)?;

        let mut builder = strategy.create_builder(&context)?;
        strategy.compose(&scanner, &context, root.services_mut(), &mut builder)?;

        for tier in [&mut root, &mut system, &mut application] {
            strategy.populate(&mut builder, tier.tier(), tier.services())?;
            let actions = tier.take_actions();
            debug!(
                tier = %tier.tier(),
                services = tier.len(),
                actions = actions.len(),
                "Merged tier"
            );
            for action in actions {
                action(&context, &mut builder as &mut dyn Any)?;
            }
        }

        let notifies_system = strategy.notifies_system();
        let (container, provider) = strategy.finish(builder, &context)?;
        info!(
            root = root.len(),
            system = system.len(),
            application = application.len(),
            "Container built"
        );

        on_container_build.publish(container.clone());
        container_built.publish(Arc::new(container.clone()) as BuiltContainer);
        root.on_build().publish(provider.clone());
        if notifies_system {
            system.on_build().publish(provider.clone());
        }
        application.on_build().publish(provider.clone());

        Ok(BuiltServices {
            container,
            provider,
        })
    }
}

impl ServicesBuilder<RegistryStrategy> {
    /// Registry builder with scope validation chosen by environment
    pub fn registry(
        scanner: ConventionScanner,
        configuration: Configuration,
        environment: HostEnvironment,
    ) -> Self {
        let strategy = RegistryStrategy::for_environment(&environment);
        Self::new(scanner, configuration, environment, strategy)
    }
}

impl ServicesBuilder<GraphStrategy> {
    /// Graph builder with scope validation chosen by environment
    pub fn graph(
        scanner: ConventionScanner,
        configuration: Configuration,
        environment: HostEnvironment,
    ) -> Self {
        let strategy = GraphStrategy::for_environment(&environment);
        Self::new(scanner, configuration, environment, strategy)
    }

    /// Append a container convention
    pub fn add_container_convention(
        &mut self,
        convention: Arc<dyn ContainerConvention>,
    ) -> &mut Self {
        self.scanner
            .append_convention::<ContainerConventions>(convention);
        self
    }

    /// Insert a container convention before every other
    pub fn prepend_container_convention(
        &mut self,
        convention: Arc<dyn ContainerConvention>,
    ) -> &mut Self {
        self.scanner
            .prepend_convention::<ContainerConventions>(convention);
        self
    }

    /// Append a container convention written as a function
    pub fn add_container_delegate<F>(&mut self, name: &'static str, delegate: F) -> &mut Self
    where
        F: Fn(
                &ConventionContext,
                &Configuration,
                &mut ServiceCollection,
                &mut ContainerBuilder,
            ) -> Result<()>
            + Send
            + Sync
            + 'static,
    {
        let delegate: Arc<ContainerConventionDelegate> = Arc::new(delegate);
        self.scanner
            .append_delegate::<ContainerConventions>(name, delegate);
        self
    }

    /// Insert a function container convention before every other
    pub fn prepend_container_delegate<F>(&mut self, name: &'static str, delegate: F) -> &mut Self
    where
        F: Fn(
                &ConventionContext,
                &Configuration,
                &mut ServiceCollection,
                &mut ContainerBuilder,
            ) -> Result<()>
            + Send
            + Sync
            + 'static,
    {
        let delegate: Arc<ContainerConventionDelegate> = Arc::new(delegate);
        self.scanner
            .prepend_delegate::<ContainerConventions>(name, delegate);
        self
    }
}

impl<S: ContainerStrategy> fmt::Debug for ServicesBuilder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServicesBuilder")
            .field("strategy", &self.strategy.name())
            .field("scanner", &self.scanner)
            .field("environment", &self.environment)
            .field("root", &self.root.len())
            .field("system", &self.system.len())
            .field("application", &self.application.len())
            .finish_non_exhaustive()
    }
}

