//! # Infrastructure Layer
//!
//! Concrete registries, containers and the builder facade that drive the
//! application-layer composer.
//!
//! ## Module Categories
//!
//! ### Registries & Containers
//! | Module | Description |
//! |--------|-------------|
//! | [`services`] | Plain registry: `ServiceCollection` and `ServiceProvider` |
//! | [`container`] | Graph container with nested lifetime scopes |
//!
//! ### Composition
//! | Module | Description |
//! |--------|-------------|
//! | [`builder`] | `ServicesBuilder` facade and container strategies |
//! | [`conventions`] | Service and container convention families |
//! | [`context`] | Convention contexts and registry tiers |
//! | [`notifier`] | One-shot build notifications |
//! | [`properties`] | Key/value side-table |
//!
//! ### Configuration & Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment-based configuration |
//! | [`constants`] | Centralized configuration constants |
//! | [`logging`] | Structured logging with tracing |

pub mod builder;
pub mod config;
pub mod constants;
pub mod container;
pub mod context;
pub mod conventions;
pub mod error_ext;
pub mod logging;
pub mod notifier;
pub mod properties;
pub mod services;

// Re-export commonly used types
pub use builder::{
    BuiltServices, ChildServicesBuilder, ContainerStrategy, GraphServicesBuilder, GraphStrategy,
    RegistryServicesBuilder, RegistryStrategy, ServicesBuilder,
};
pub use config::{Configuration, HostEnvironment};
pub use container::{Container, ContainerBuilder, LifetimeScope};
pub use context::{
    BuiltContainer, ContainerAction, ConventionContext, ServiceConventionContext, ServiceTier, Tier,
};
pub use conventions::{
    ContainerConvention, ContainerConventions, ServiceConvention, ServiceConventions,
};
pub use error_ext::ErrorContext;
pub use notifier::BuildNotifier;
pub use properties::Properties;
pub use services::{ServiceCollection, ServiceProvider};
