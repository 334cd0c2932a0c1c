//! Builder facade
//!
//! [`ServicesBuilder`] is what an application talks to: it owns the scanner,
//! the three registry tiers, the side-table and the notifiers, and turns them
//! into a container with [`ServicesBuilder::build`].
//!
//! ```text
//! build(self)
//!   1. compose ServiceConventions against Root / System / Application
//!   2. strategy.compose (graph: ContainerConventions)
//!   3. merge Root        + its queued container actions
//!   4. merge System      + its queued container actions
//!   5. merge Application + its queued container actions
//!   6. strategy.finish
//!   7. notify on_container_build (builder, then conventions), Root,
//!      System (graph only), Application
//! ```
//!
//! Any failure before step 7 returns the error and notifies nobody.

pub mod child;
pub mod services_builder;
pub mod setup;
pub mod strategy;

pub use child::ChildServicesBuilder;
pub use services_builder::{
    BuiltServices, GraphServicesBuilder, RegistryServicesBuilder, ServicesBuilder,
};
pub use setup::ServicesBuilderSetup;
pub use strategy::{ContainerStrategy, GraphStrategy, RegistryStrategy};
