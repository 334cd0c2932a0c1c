//! Unit tests for domain error types

use weave_domain::Error;

#[test]
fn test_error_creation() {
    let error = Error::generic("Something went wrong");
    let display_str = format!("{}", error);
    assert!(display_str.contains("Something went wrong"));
}

#[test]
fn test_invalid_argument_error() {
    let error = Error::invalid_argument("configuration is required");
    match error {
        Error::InvalidArgument { message } => assert_eq!(message, "configuration is required"),
        _ => panic!("Expected InvalidArgument error"),
    }
}

#[test]
fn test_service_not_found_error() {
    let error = Error::service_not_found("dyn app::Clock");
    match error {
        Error::ServiceNotFound { service } => assert_eq!(service, "dyn app::Clock"),
        _ => panic!("Expected ServiceNotFound error"),
    }
}

#[test]
fn test_convention_error_keeps_source() {
    let error = Error::convention(
        "service",
        "app::DatabaseConvention",
        Error::invalid_operation("connection string missing"),
    );

    let display = error.to_string();
    assert!(display.contains("app::DatabaseConvention"));
    assert!(display.contains("connection string missing"));

    match error.root_cause() {
        Error::InvalidOperation { message } => assert_eq!(message, "connection string missing"),
        other => panic!("Expected InvalidOperation root cause, got {other:?}"),
    }

    let source = std::error::Error::source(&error).expect("convention errors carry a source");
    assert!(source.to_string().contains("connection string missing"));
}

#[test]
fn test_root_cause_of_plain_error_is_itself() {
    let error = Error::internal("boom");
    assert!(matches!(error.root_cause(), Error::Internal { .. }));
}

#[test]
fn test_circular_dependency_chain() {
    let error = Error::circular_dependency(["A", "B", "A"]);
    match error {
        Error::CircularDependency { chain } => assert_eq!(chain, "A -> B -> A"),
        _ => panic!("Expected CircularDependency error"),
    }
}

#[test]
fn test_configuration_error_with_source() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "weave.toml");
    let error = Error::configuration_with_source("Failed to read config", io);
    match &error {
        Error::Configuration { message, source } => {
            assert_eq!(message, "Failed to read config");
            assert!(source.is_some());
        }
        _ => panic!("Expected Configuration error"),
    }
}

#[test]
fn test_from_anyhow() {
    let error: Error = anyhow::anyhow!("from a convention body").into();
    assert!(matches!(error, Error::Generic(_)));
    assert!(error.to_string().contains("from a convention body"));
}

#[test]
fn test_from_io() {
    let io = std::io::Error::other("disk");
    let error: Error = io.into();
    assert!(matches!(error, Error::Io { .. }));
}
