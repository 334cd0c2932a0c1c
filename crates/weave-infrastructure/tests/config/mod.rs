//! Configuration Tests
//!
//! Tests for configuration loading and the configuration handle.

mod loader_test;
