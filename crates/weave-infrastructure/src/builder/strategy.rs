//! Container strategies
//!
//! A strategy adapts one container technology to the build protocol of
//! [`ServicesBuilder`](super::ServicesBuilder). The builder drives it in this
//! order:
//!
//! ```text
//! create_builder → compose
//!   → populate(Root) → populate(System) → populate(Application)
//!   → finish
//! ```

use tracing::debug;
use weave_application::{ConventionScanner, compose};
use weave_domain::error::Result;

use crate::config::{CompositionConfig, HostEnvironment};
use crate::container::{Container, ContainerBuilder};
use crate::context::{ConventionContext, Tier};
use crate::conventions::{ContainerConventionContext, ContainerConventions};
use crate::services::{ProviderOptions, ServiceCollection, ServiceProvider};

/// Adapter between the builder facade and a container technology
pub trait ContainerStrategy {
    /// Accumulates registrations before the container is built
    type Builder: 'static;

    /// Finished container handed to `on_container_build` observers
    type Container: Clone + Send + Sync + 'static;

    /// Name reported in logs
    fn name(&self) -> &'static str;

    /// Whether the System tier gets its own build notification
    fn notifies_system(&self) -> bool;

    /// Create the builder the tiers are merged into
    fn create_builder(&mut self, context: &ConventionContext) -> Result<Self::Builder>;

    /// Run strategy-specific conventions after the service conventions
    fn compose(
        &mut self,
        _scanner: &ConventionScanner,
        _context: &ConventionContext,
        _services: &mut ServiceCollection,
        _builder: &mut Self::Builder,
    ) -> Result<()> {
        Ok(())
    }

    /// Merge the registrations of one tier
    fn populate(
        &mut self,
        builder: &mut Self::Builder,
        tier: Tier,
        services: &ServiceCollection,
    ) -> Result<()>;

    /// Build the container and the provider exposed to tier observers
    fn finish(
        self,
        builder: Self::Builder,
        context: &ConventionContext,
    ) -> Result<(Self::Container, ServiceProvider)>;
}

/// Builds a plain [`ServiceProvider`]
///
/// System registrations are merged into the root like any other tier and the
/// System tier is not notified.
#[derive(Debug, Clone, Default)]
pub struct RegistryStrategy {
    options: ProviderOptions,
}

impl RegistryStrategy {
    /// Strategy with default provider options
    pub fn new() -> Self {
        Self::default()
    }

    /// Strategy with explicit provider options
    pub fn with_options(options: ProviderOptions) -> Self {
        Self { options }
    }

    /// Validate scopes in Development only
    pub fn for_environment(environment: &HostEnvironment) -> Self {
        Self::with_options(ProviderOptions::with_validate_scopes(
            environment.is_development(),
        ))
    }

    /// Scope validation from configuration, else per environment
    pub fn from_config(config: &CompositionConfig, environment: &HostEnvironment) -> Self {
        Self::with_options(ProviderOptions::with_validate_scopes(
            config
                .validate_scopes
                .unwrap_or_else(|| environment.is_development()),
        ))
    }

    /// Options the provider will be built with
    pub fn options(&self) -> ProviderOptions {
        self.options
    }
}

impl ContainerStrategy for RegistryStrategy {
    type Builder = ServiceCollection;
    type Container = ServiceProvider;

    fn name(&self) -> &'static str {
        "registry"
    }

    fn notifies_system(&self) -> bool {
        false
    }

    fn create_builder(&mut self, _context: &ConventionContext) -> Result<ServiceCollection> {
        Ok(ServiceCollection::new())
    }

    fn populate(
        &mut self,
        builder: &mut ServiceCollection,
        tier: Tier,
        services: &ServiceCollection,
    ) -> Result<()> {
        debug!(%tier, services = services.len(), "Merging tier into registry");
        builder.extend(services);
        Ok(())
    }

    fn finish(
        self,
        builder: ServiceCollection,
        _context: &ConventionContext,
    ) -> Result<(ServiceProvider, ServiceProvider)> {
        let provider = builder.build_service_provider_with(self.options);
        Ok((provider.clone(), provider))
    }
}

/// Builds a graph [`Container`]
///
/// Runs the [`ContainerConventions`] family and notifies the System tier.
#[derive(Debug, Default)]
pub struct GraphStrategy {
    seed: Option<ContainerBuilder>,
    options: ProviderOptions,
}

impl GraphStrategy {
    /// Strategy starting from an empty container builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Strategy starting from `builder`, keeping its registrations
    pub fn with_builder(builder: ContainerBuilder) -> Self {
        Self {
            seed: Some(builder),
            options: ProviderOptions::default(),
        }
    }

    /// Strategy with explicit container options
    pub fn with_options(options: ProviderOptions) -> Self {
        Self {
            seed: None,
            options,
        }
    }

    /// Validate scopes in Development only
    pub fn for_environment(environment: &HostEnvironment) -> Self {
        Self::with_options(ProviderOptions::with_validate_scopes(
            environment.is_development(),
        ))
    }

    /// Scope validation from configuration, else per environment
    pub fn from_config(config: &CompositionConfig, environment: &HostEnvironment) -> Self {
        Self::with_options(ProviderOptions::with_validate_scopes(
            config
                .validate_scopes
                .unwrap_or_else(|| environment.is_development()),
        ))
    }

    /// Options the container will be built with
    pub fn options(&self) -> ProviderOptions {
        self.options
    }
}

impl ContainerStrategy for GraphStrategy {
    type Builder = ContainerBuilder;
    type Container = Container;

    fn name(&self) -> &'static str {
        "graph"
    }

    fn notifies_system(&self) -> bool {
        true
    }

    fn create_builder(&mut self, _context: &ConventionContext) -> Result<ContainerBuilder> {
        Ok(self.seed.take().unwrap_or_default())
    }

    fn compose(
        &mut self,
        scanner: &ConventionScanner,
        context: &ConventionContext,
        services: &mut ServiceCollection,
        builder: &mut ContainerBuilder,
    ) -> Result<()> {
        let mut conventions = ContainerConventionContext {
            context,
            services,
            builder,
        };
        compose::<ContainerConventions>(scanner, &mut conventions)?;
        Ok(())
    }

    fn populate(
        &mut self,
        builder: &mut ContainerBuilder,
        tier: Tier,
        services: &ServiceCollection,
    ) -> Result<()> {
        debug!(%tier, services = services.len(), "Populating container");
        builder.populate(services);
        Ok(())
    }

    fn finish(
        self,
        builder: ContainerBuilder,
        _context: &ConventionContext,
    ) -> Result<(Container, ServiceProvider)> {
        let container = builder.build_with(self.options)?;
        let provider = container.service_provider();
        Ok((container, provider))
    }
}
