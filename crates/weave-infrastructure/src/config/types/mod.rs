//! Configuration types module

pub mod app;
pub mod composition;
pub mod environment;
pub mod logging;

// Re-export main types
pub use app::WeaveConfig;
pub use composition::CompositionConfig;
pub use environment::EnvironmentConfig;
pub use logging::LoggingConfig;
