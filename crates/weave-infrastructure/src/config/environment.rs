//! Host environment descriptor

use crate::config::types::EnvironmentConfig;
use crate::constants::{ENVIRONMENT_DEVELOPMENT, ENVIRONMENT_PRODUCTION, ENVIRONMENT_STAGING};

/// Describes where the application runs
///
/// Environment names compare case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnvironment {
    environment_name: String,
    application_name: String,
}

impl HostEnvironment {
    /// Create an environment descriptor
    pub fn new(environment_name: impl Into<String>, application_name: impl Into<String>) -> Self {
        Self {
            environment_name: environment_name.into(),
            application_name: application_name.into(),
        }
    }

    /// Development environment for `application_name`
    pub fn development(application_name: impl Into<String>) -> Self {
        Self::new(ENVIRONMENT_DEVELOPMENT, application_name)
    }

    /// Production environment for `application_name`
    pub fn production(application_name: impl Into<String>) -> Self {
        Self::new(ENVIRONMENT_PRODUCTION, application_name)
    }

    /// Environment name
    pub fn environment_name(&self) -> &str {
        &self.environment_name
    }

    /// Application name
    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    /// Whether the environment is `name`
    pub fn is_environment(&self, name: &str) -> bool {
        self.environment_name.eq_ignore_ascii_case(name)
    }

    /// Whether this is the Development environment
    pub fn is_development(&self) -> bool {
        self.is_environment(ENVIRONMENT_DEVELOPMENT)
    }

    /// Whether this is the Staging environment
    pub fn is_staging(&self) -> bool {
        self.is_environment(ENVIRONMENT_STAGING)
    }

    /// Whether this is the Production environment
    pub fn is_production(&self) -> bool {
        self.is_environment(ENVIRONMENT_PRODUCTION)
    }
}

impl Default for HostEnvironment {
    fn default() -> Self {
        Self::from(&EnvironmentConfig::default())
    }
}

impl From<&EnvironmentConfig> for HostEnvironment {
    fn from(config: &EnvironmentConfig) -> Self {
        Self::new(config.name.clone(), config.application_name.clone())
    }
}
