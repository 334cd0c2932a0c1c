//! # Weave
//!
//! Convention-based dependency composition.
//!
//! Applications assemble their object graph from independently authored
//! *conventions* instead of one bootstrap routine. Each convention registers
//! services into one of three tiers:
//!
//! | Tier | Holds | Merged |
//! |------|-------|--------|
//! | Root | registrations made on the builder itself | first |
//! | System | core and infrastructure services | second |
//! | Application | feature services | last, so it wins |
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use weave::prelude::*;
//!
//! struct StorageConvention;
//!
//! impl ServiceConvention for StorageConvention {
//!     fn register(&self, context: &mut ServiceConventionContext<'_>) -> Result<()> {
//!         let url = context
//!             .configuration()
//!             .get_or("storage.url", String::from("sqlite::memory:"))?;
//!         context.system().add_singleton::<dyn Storage>(Arc::new(SqlStorage::new(url)));
//!         Ok(())
//!     }
//! }
//!
//! let mut builder = weave::registry_builder(&ConfigLoader::new())?;
//! builder.add_convention(Arc::new(StorageConvention));
//! builder.on_build().subscribe(|provider| tracing::info!(?provider, "ready"));
//!
//! let provider = builder.build()?.provider;
//! let storage = provider.get_required::<dyn Storage>()?;
//! ```
//!
//! Conventions can also be contributed at link time through the
//! [`CONVENTIONS`](application::CONVENTIONS) distributed slice and are then
//! discovered by every builder created from configuration.
//!
//! ## Architecture
//!
//! - `domain` - Error taxonomy and service identity
//! - `application` - Convention scanner, discovery and composer
//! - `infrastructure` - Registries, containers, builder facade, config, logging

use tracing::debug;

/// Domain layer - errors and service identity
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use weave_domain::*;
}

/// Application layer - scanning and composition
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use weave_application::*;
}

/// Infrastructure layer - registries, containers and the builder facade
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use weave_infrastructure::*;
}

/// Everything a convention author or host usually needs
pub mod prelude {
    pub use weave_application::{
        CONVENTIONS, ConventionEntry, ConventionScanner, DiscoveredConventions,
    };
    pub use weave_domain::{Error, Result, ServiceKey, ServiceLifetime};
    pub use weave_infrastructure::config::{ConfigLoader, WeaveConfig};
    pub use weave_infrastructure::{
        BuildNotifier, BuiltServices, Configuration, Container, ContainerBuilder,
        ContainerConvention, ContainerConventions, ConventionContext, GraphServicesBuilder,
        HostEnvironment, LifetimeScope, RegistryServicesBuilder, ServiceCollection,
        ServiceConvention, ServiceConventionContext, ServiceConventions, ServiceProvider,
        ServiceTier, Tier,
    };
}

// Re-export commonly used types at the crate root
pub use weave_domain::{Error, Result};
pub use weave_infrastructure::{GraphServicesBuilder, RegistryServicesBuilder};

use weave_infrastructure::builder::{GraphStrategy, RegistryStrategy};
use weave_infrastructure::config::ConfigLoader;

/// Registry builder wired from the sources of `loader`
///
/// Scope validation follows `composition.validate_scopes`, or the environment
/// when unset.
pub fn registry_builder(loader: &ConfigLoader) -> Result<RegistryServicesBuilder> {
    let config = loader.load()?;
    let environment = weave_infrastructure::HostEnvironment::from(&config.environment);
    let strategy = RegistryStrategy::from_config(&config.composition, &environment);
    debug!(environment = environment.environment_name(), "Creating registry builder");
    Ok(RegistryServicesBuilder::from_config(
        &config,
        loader.load_configuration(),
        strategy,
    ))
}

/// Graph container builder wired from the sources of `loader`
pub fn graph_builder(loader: &ConfigLoader) -> Result<GraphServicesBuilder> {
    let config = loader.load()?;
    let environment = weave_infrastructure::HostEnvironment::from(&config.environment);
    let strategy = GraphStrategy::from_config(&config.composition, &environment);
    debug!(environment = environment.environment_name(), "Creating graph builder");
    Ok(GraphServicesBuilder::from_config(
        &config,
        loader.load_configuration(),
        strategy,
    ))
}
