//! Host environment configuration types

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_APPLICATION_NAME, DEFAULT_ENVIRONMENT_NAME};

/// Environment the application runs in
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Environment name (Development, Staging, Production, ...)
    pub name: String,

    /// Application name
    pub application_name: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_ENVIRONMENT_NAME.to_string(),
            application_name: DEFAULT_APPLICATION_NAME.to_string(),
        }
    }
}
