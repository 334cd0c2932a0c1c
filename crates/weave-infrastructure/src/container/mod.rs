//! Graph container
//!
//! A container assembled from a [`ContainerBuilder`] and resolved through
//! nested [`LifetimeScope`]s. Child scopes may add registrations of their own
//! that override their parent's; anything they do not register is resolved
//! from the parent chain.
//!
//! Every scope stores its registrations in its own [`dill::Catalog`]; the
//! scope chain decides which catalog answers a lookup.
//!
//! ```text
//! Container (root scope)
//!   └─ begin_lifetime_scope_with(|b| b.register_instance(..))
//!        └─ begin_lifetime_scope()
//! ```

pub(crate) mod binding;
pub mod builder;
pub mod scope;

pub use builder::{BuildCallback, ContainerBuilder};
pub use scope::{Container, LifetimeScope};
