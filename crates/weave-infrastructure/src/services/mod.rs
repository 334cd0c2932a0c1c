//! Plain service registry
//!
//! [`ServiceCollection`] is an ordered list of [`ServiceDescriptor`]s;
//! [`ServiceProvider`] resolves from a snapshot of that list with
//! last-registration-wins semantics.
//!
//! Services are keyed by type, usually a trait object:
//!
//! ```ignore
//! let mut services = ServiceCollection::new();
//! services.add_singleton::<dyn Clock>(Arc::new(SystemClock));
//! services.add_transient_with::<dyn Greeter, _>(|provider| {
//!     Ok(Arc::new(Greeter::new(provider.get_required::<dyn Clock>()?)))
//! });
//!
//! let provider = services.build_service_provider();
//! let greeter = provider.get_required::<dyn Greeter>()?;
//! ```

pub mod collection;
pub mod descriptor;
pub mod provider;
pub(crate) mod resolution;

pub use collection::ServiceCollection;
pub use descriptor::{Implementation, Instance, ServiceDescriptor, ServiceFactory};
pub use provider::{ProviderOptions, ServiceProvider};
