//! Shared types for the recruiting pipeline workspace
//!
//! Contains only the domain types, configuration and logging helpers that
//! both the resource binding layer and the pipeline board depend on.

pub mod config;
pub mod errors;
pub mod logging;
pub mod types;

pub use config::GatewayConfig;
pub use errors::*;
pub use types::*;
