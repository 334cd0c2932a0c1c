//! Error Extension Tests

use std::io;

use weave_domain::error::{Error, Result};
use weave_infrastructure::error_ext::ErrorContext;

#[test]
fn test_config_context_keeps_source() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");

    let result: Result<()> = Err(io_error).config_context("failed to read config");

    match result {
        Err(Error::Configuration { message, source }) => {
            assert!(message.contains("failed to read config"));
            assert!(message.contains("file not found"));
            assert!(source.is_some());
        }
        other => panic!("Expected Configuration error, got {other:?}"),
    }
}

#[test]
fn test_context_is_generic() {
    let io_error = io::Error::other("boom");

    let result: Result<()> = Err(io_error).context("while composing");

    match result {
        Err(Error::Generic(err)) => assert_eq!(err.to_string(), "while composing: boom"),
        other => panic!("Expected Generic error, got {other:?}"),
    }
}

#[test]
fn test_with_context_is_lazy() {
    let ok: std::result::Result<u32, io::Error> = Ok(3);
    let value = ok
        .with_context(|| -> String { panic!("context must not be built on success") })
        .unwrap();
    assert_eq!(value, 3);
}
