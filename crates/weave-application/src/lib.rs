//! # Application Layer
//!
//! Discovers, orders and invokes convention units.
//!
//! ## Architecture
//!
//! ```text
//! #[linkme::distributed_slice(CONVENTIONS)]      explicit prepend/append
//!            ↓                                           ↓
//!    ConventionSource::discover()  ──→  ConventionScanner (ordered, de-duplicated)
//!                                               ↓ get::<F>()
//!                                      Composer::register::<F>(context)
//!                                               ↓
//!                        F::register(capability) / F::invoke(delegate)
//! ```
//!
//! The layer is generic over a [`ConventionFamily`]: the family names the
//! capability trait, the delegate signature and the context both receive.
//! Concrete families live next to the registries they mutate.

pub mod composer;
pub mod convention;
pub mod discovery;
pub mod scanner;

pub use composer::{Composer, compose};
pub use convention::{ConventionFamily, ConventionKind, ConventionUnit};
pub use discovery::{
    CONVENTIONS, ConventionEntry, ConventionSource, DiscoveredConventions, LinkedConventionSource,
    StaticConventionSource, list_conventions,
};
pub use scanner::{ConventionScanner, Conventions, ScannedUnit};
