//! Checked construction of a [`ServicesBuilder`]

use weave_application::ConventionScanner;
use weave_domain::error::{Error, Result};

use super::services_builder::ServicesBuilder;
use super::strategy::ContainerStrategy;
use crate::config::{Configuration, HostEnvironment};

/// Collects the collaborators of a [`ServicesBuilder`]
///
/// [`finish`](Self::finish) fails with an invalid-argument error naming the
/// first missing collaborator.
pub struct ServicesBuilderSetup<S: ContainerStrategy> {
    scanner: Option<ConventionScanner>,
    configuration: Option<Configuration>,
    environment: Option<HostEnvironment>,
    strategy: Option<S>,
}

impl<S: ContainerStrategy> ServicesBuilderSetup<S> {
    pub(crate) fn new() -> Self {
        Self {
            scanner: None,
            configuration: None,
            environment: None,
            strategy: None,
        }
    }

    /// Convention scanner
    pub fn scanner(mut self, scanner: ConventionScanner) -> Self {
        self.scanner = Some(scanner);
        self
    }

    /// Configuration handle
    pub fn configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = Some(configuration);
        self
    }

    /// Host environment
    pub fn environment(mut self, environment: HostEnvironment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Container strategy
    pub fn strategy(mut self, strategy: S) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Create the builder
    pub fn finish(self) -> Result<ServicesBuilder<S>> {
        let scanner = self.scanner.ok_or_else(|| missing("scanner"))?;
        let configuration = self.configuration.ok_or_else(|| missing("configuration"))?;
        let environment = self.environment.ok_or_else(|| missing("environment"))?;
        let strategy = self.strategy.ok_or_else(|| missing("strategy"))?;
        Ok(ServicesBuilder::new(
            scanner,
            configuration,
            environment,
            strategy,
        ))
    }
}

fn missing(collaborator: &str) -> Error {
    Error::invalid_argument(format!("{collaborator} is required"))
}
