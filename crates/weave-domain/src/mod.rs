//! # Domain Layer
//!
//! Core types shared by every layer of the composition engine.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error taxonomy and `Result` alias |
//! | [`value_objects`] | Service identity and lifetime |
//!
//! The domain knows nothing about containers, scanners or builders; it only
//! names *what* a service is and *how* composition can fail.

pub mod error;
pub mod value_objects;

pub use error::{Error, Result};
pub use value_objects::{ServiceKey, ServiceLifetime};
