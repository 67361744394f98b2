//! Error handling for the gateway
//!
//! This module defines the error type used throughout the service and how it
//! is rendered to HTTP clients.

#![allow(missing_docs)]

mod helpers;
mod response;
mod types;

pub use response::{ErrorDetail, ErrorResponse};
pub use types::{GatewayError, Result};
