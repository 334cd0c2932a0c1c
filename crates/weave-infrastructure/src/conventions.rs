//! Convention families
//!
//! | Family | Capability | Context |
//! |--------|------------|---------|
//! | [`ServiceConventions`] | [`ServiceConvention`] | [`ServiceConventionContext`] |
//! | [`ContainerConventions`] | [`ContainerConvention`] | [`ContainerConventionContext`] |
//!
//! Service conventions run on every container strategy. Container conventions
//! only run on the graph container, after the service conventions.

use std::any::type_name;

use weave_application::ConventionFamily;
use weave_domain::error::Result;

use crate::config::Configuration;
use crate::container::ContainerBuilder;
use crate::context::{ConventionContext, ServiceConventionContext};
use crate::services::ServiceCollection;

/// Registers services into the tiers of a [`ServiceConventionContext`]
///
/// # Example
///
/// ```ignore
/// struct ClockConvention;
///
/// impl ServiceConvention for ClockConvention {
///     fn register(&self, context: &mut ServiceConventionContext<'_>) -> Result<()> {
///         context.system().add_singleton::<dyn Clock>(Arc::new(SystemClock));
///         Ok(())
///     }
/// }
/// ```
pub trait ServiceConvention: Send + Sync {
    /// Add registrations
    fn register(&self, context: &mut ServiceConventionContext<'_>) -> Result<()>;

    /// Name reported in logs and errors
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// Plain-function form of a [`ServiceConvention`]
pub type ServiceConventionDelegate =
    dyn for<'a, 'b> Fn(&'a mut ServiceConventionContext<'b>) -> Result<()> + Send + Sync;

/// Family of [`ServiceConvention`]s
pub struct ServiceConventions;

impl ConventionFamily for ServiceConventions {
    const NAME: &'static str = "service";
    type Capability = dyn ServiceConvention;
    type Delegate = ServiceConventionDelegate;
    type Context<'a> = ServiceConventionContext<'a>;

    fn capability_name(capability: &Self::Capability) -> &'static str {
        capability.name()
    }

    fn register(capability: &Self::Capability, context: &mut Self::Context<'_>) -> Result<()> {
        capability.register(context)
    }

    fn invoke(delegate: &Self::Delegate, context: &mut Self::Context<'_>) -> Result<()> {
        delegate(context)
    }
}

/// Configures the graph container directly
pub trait ContainerConvention: Send + Sync {
    /// Add registrations to `services` or `builder`
    fn register(
        &self,
        context: &ConventionContext,
        configuration: &Configuration,
        services: &mut ServiceCollection,
        builder: &mut ContainerBuilder,
    ) -> Result<()>;

    /// Name reported in logs and errors
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// Plain-function form of a [`ContainerConvention`]
pub type ContainerConventionDelegate = dyn Fn(
        &ConventionContext,
        &Configuration,
        &mut ServiceCollection,
        &mut ContainerBuilder,
    ) -> Result<()>
    + Send
    + Sync;

/// Context handed to container conventions
pub struct ContainerConventionContext<'a> {
    /// Shared convention inputs
    pub context: &'a ConventionContext,
    /// Root registrations
    pub services: &'a mut ServiceCollection,
    /// Builder of the container being assembled
    pub builder: &'a mut ContainerBuilder,
}

/// Family of [`ContainerConvention`]s
pub struct ContainerConventions;

impl ConventionFamily for ContainerConventions {
    const NAME: &'static str = "container";
    type Capability = dyn ContainerConvention;
    type Delegate = ContainerConventionDelegate;
    type Context<'a> = ContainerConventionContext<'a>;

    fn capability_name(capability: &Self::Capability) -> &'static str {
        capability.name()
    }

    fn register(capability: &Self::Capability, context: &mut Self::Context<'_>) -> Result<()> {
        capability.register(
            context.context,
            context.context.configuration(),
            context.services,
            context.builder,
        )
    }

    fn invoke(delegate: &Self::Delegate, context: &mut Self::Context<'_>) -> Result<()> {
        delegate(
            context.context,
            context.context.configuration(),
            context.services,
            context.builder,
        )
    }
}
