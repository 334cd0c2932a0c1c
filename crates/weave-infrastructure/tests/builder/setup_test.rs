//! Builder Setup Tests

use weave_application::ConventionScanner;
use weave_domain::error::Error;
use weave_infrastructure::builder::{
    GraphServicesBuilder, RegistryServicesBuilder, RegistryStrategy,
};
use weave_infrastructure::config::{Configuration, HostEnvironment, WeaveConfig};

#[test]
fn test_setup_requires_every_collaborator() {
    let result = RegistryServicesBuilder::setup()
        .scanner(ConventionScanner::new())
        .environment(HostEnvironment::default())
        .strategy(RegistryStrategy::new())
        .finish();

    match result {
        Err(Error::InvalidArgument { message }) => assert!(message.contains("configuration")),
        Err(other) => panic!("Expected InvalidArgument, got {other:?}"),
        Ok(_) => panic!("Expected InvalidArgument"),
    }

    let missing_scanner = GraphServicesBuilder::setup()
        .configuration(Configuration::empty())
        .environment(HostEnvironment::default())
        .finish();
    assert!(matches!(missing_scanner, Err(Error::InvalidArgument { .. })));
}

#[test]
fn test_setup_with_everything() {
    let builder = RegistryServicesBuilder::setup()
        .scanner(ConventionScanner::new())
        .configuration(Configuration::empty())
        .environment(HostEnvironment::development("orders"))
        .strategy(RegistryStrategy::new())
        .finish()
        .unwrap();

    assert!(builder.environment().is_development());
    assert!(builder.build().is_ok());
}

#[test]
fn test_from_config() {
    let mut config = WeaveConfig::default();
    config.environment.name = "Development".to_string();
    config.composition.validate_scopes = Some(false);
    config.composition.candidate_modules = vec!["nothing_links_here".to_string()];

    let strategy = RegistryStrategy::from_config(
        &config.composition,
        &HostEnvironment::from(&config.environment),
    );
    assert!(!strategy.options().validate_scopes);

    let builder = RegistryServicesBuilder::from_config(&config, Configuration::empty(), strategy);
    assert!(builder.environment().is_development());
    assert!(builder.scanner().is_empty());
}
