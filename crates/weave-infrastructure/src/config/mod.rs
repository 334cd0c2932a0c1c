//! Configuration
//!
//! Typed settings ([`WeaveConfig`]) for the host and the raw, key-addressed
//! [`Configuration`] handle that conventions read from. Both are produced by
//! the same [`ConfigLoader`] so they always agree.

pub mod configuration;
pub mod environment;
pub mod loader;
pub mod types;

pub use configuration::Configuration;
pub use environment::HostEnvironment;
pub use loader::ConfigLoader;
pub use types::{CompositionConfig, EnvironmentConfig, LoggingConfig, WeaveConfig};
