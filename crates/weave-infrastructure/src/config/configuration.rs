//! Configuration handle
//!
//! Read-only view over merged configuration sources, addressed by dotted keys
//! (`"database.url"`). Cloning is cheap and every clone sees the same values.

use std::fmt;
use std::sync::Arc;

use figment::Figment;
use figment::providers::{Format, Serialized, Toml};
use serde::Serialize;
use serde::de::DeserializeOwned;
use weave_domain::error::Result;

use crate::error_ext::ErrorContext;

/// Configuration values handed to conventions
#[derive(Clone, Default)]
pub struct Configuration {
    figment: Arc<Figment>,
}

impl Configuration {
    /// Configuration without any values
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap already merged sources
    pub fn from_figment(figment: Figment) -> Self {
        Self {
            figment: Arc::new(figment),
        }
    }

    /// Configuration holding the fields of a serializable value
    pub fn from_serialized<T: Serialize>(value: T) -> Self {
        Self::from_figment(Figment::from(Serialized::defaults(value)))
    }

    /// Configuration parsed from a TOML document
    pub fn from_toml_str(toml: &str) -> Self {
        Self::from_figment(Figment::from(Toml::string(toml)))
    }

    /// Read the value at `key`
    ///
    /// Returns `Ok(None)` when the key is absent and an error when it is
    /// present but cannot be deserialized as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        if !self.figment.contains(key) {
            return Ok(None);
        }
        self.figment
            .extract_inner::<T>(key)
            .map(Some)
            .config_context(format!("Invalid configuration value at '{key}'"))
    }

    /// Read the value at `key`, falling back to `default` when absent
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// Whether a value exists at `key`
    pub fn contains(&self, key: &str) -> bool {
        self.figment.contains(key)
    }

    /// Underlying figment
    pub fn figment(&self) -> &Figment {
        &self.figment
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration").finish_non_exhaustive()
    }
}
