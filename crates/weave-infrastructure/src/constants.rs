//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "weave.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "weave";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "WEAVE";

/// Separator for nested keys in environment variables (e.g. `WEAVE_LOGGING__LEVEL`)
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "WEAVE_LOG";

/// File name prefix for rolling log files
pub const DEFAULT_LOG_FILE_PREFIX: &str = "weave";

// ============================================================================
// ENVIRONMENT CONSTANTS
// ============================================================================

/// Environment name used when none is configured
pub const DEFAULT_ENVIRONMENT_NAME: &str = ENVIRONMENT_PRODUCTION;

/// Application name used when none is configured
pub const DEFAULT_APPLICATION_NAME: &str = "weave";

/// Development environment name
pub const ENVIRONMENT_DEVELOPMENT: &str = "Development";

/// Staging environment name
pub const ENVIRONMENT_STAGING: &str = "Staging";

/// Production environment name
pub const ENVIRONMENT_PRODUCTION: &str = "Production";
