//! Value objects describing service identity

pub mod service;

pub use service::{ServiceKey, ServiceLifetime};
