//! Health goals backend: an API gateway in front of a goal CRUD service.
//!
//! ```text
//! client ──► gateway (/goals/*) ──► goal service (/resource/*) ──► in-memory store
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types and their HTTP mapping
//! - [`goals`]: Goal types, validation, store and HTTP surface
//! - [`gateway`]: Gateway endpoints and the reverse proxy
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod config;
pub mod error;
pub mod gateway;
pub mod goals;
pub mod metrics;
pub mod utils;

pub use config::{GatewayConfig, ServiceConfig};
pub use error::{AppError, Result};
