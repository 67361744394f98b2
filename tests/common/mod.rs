//! Common test utilities for folio-gateway

pub mod fixtures;

pub use fixtures::{ConfigFactory, HeaderFactory, RequestFactory};
