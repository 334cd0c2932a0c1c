//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for convention composition and service resolution
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// Generic error from external sources
    #[error("Generic error: {0}")]
    Generic(#[from] Box<dyn std::error::Error + Send + Sync>),

    /// A required collaborator was missing or malformed
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// An operation was attempted in a state that does not allow it
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// Description of the invalid operation
        message: String,
    },

    /// A convention unit failed while registering services
    ///
    /// The error returned by the convention is kept verbatim in `source`.
    #[error("Convention '{convention}' ({family}) failed: {source}")]
    Convention {
        /// Convention family that was being composed
        family: &'static str,
        /// Name of the failing convention
        convention: String,
        /// The error returned by the convention
        #[source]
        source: Box<Error>,
    },

    /// A required service has no registration
    #[error("Service not found: {service}")]
    ServiceNotFound {
        /// Type name of the requested service
        service: String,
    },

    /// A service depends on itself, directly or transitively
    #[error("Circular dependency detected: {chain}")]
    CircularDependency {
        /// Resolution chain, outermost first
        chain: String,
    },

    /// A scoped service was requested from the root provider
    #[error("Cannot resolve scoped service '{service}' from the root provider")]
    ScopeValidation {
        /// Type name of the scoped service
        service: String,
    },

    /// A stored instance did not have the registered type
    #[error("Type mismatch for service: {service}")]
    TypeMismatch {
        /// Type name of the requested service
        service: String,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Generic(err.into())
    }
}

// Basic error creation methods
impl Error {
    /// Create a generic error
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into().into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an invalid operation error
    pub fn invalid_operation<S: Into<String>>(message: S) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Composition and resolution error creation methods
impl Error {
    /// Wrap the error returned by a convention unit
    pub fn convention<S: Into<String>>(family: &'static str, convention: S, source: Error) -> Self {
        Self::Convention {
            family,
            convention: convention.into(),
            source: Box::new(source),
        }
    }

    /// Create a service not found error
    pub fn service_not_found<S: Into<String>>(service: S) -> Self {
        Self::ServiceNotFound {
            service: service.into(),
        }
    }

    /// Create a circular dependency error from a resolution chain
    pub fn circular_dependency<I, S>(chain: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let chain = chain
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(" -> ");
        Self::CircularDependency { chain }
    }

    /// Create a scope validation error
    pub fn scope_validation<S: Into<String>>(service: S) -> Self {
        Self::ScopeValidation {
            service: service.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch<S: Into<String>>(service: S) -> Self {
        Self::TypeMismatch {
            service: service.into(),
        }
    }

    /// Unwrap nested convention failures down to the error a convention returned
    pub fn root_cause(&self) -> &Error {
        match self {
            Self::Convention { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

// Configuration error creation methods
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
