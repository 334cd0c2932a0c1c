//! Main application configuration

use serde::{Deserialize, Serialize};

use super::{CompositionConfig, EnvironmentConfig, LoggingConfig};

/// Root configuration loaded from `weave.toml` and `WEAVE_*` variables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaveConfig {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Host environment
    pub environment: EnvironmentConfig,

    /// Convention discovery and container options
    pub composition: CompositionConfig,
}
