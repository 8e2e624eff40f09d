//! Configuration for the simulated backend
//!
//! Values come from struct defaults, optionally overridden by environment
//! variables (a `.env` file in the working directory is loaded first).

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::errors::{SharedError, SharedResult};

pub const LATENCY_ENV: &str = "PIPELINE_LATENCY_MS";
pub const FAILURE_RATE_ENV: &str = "PIPELINE_FAILURE_RATE";
pub const PERSIST_REORDER_ENV: &str = "PIPELINE_PERSIST_REORDER";

/// Persistence gateway configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    /// Simulated round trip for every persistence call
    pub latency_ms: u64,
    /// Probability in [0, 1] that a call is rejected
    pub failure_rate: f64,
    /// Whether same-stage reorders are sent to the backend
    pub persist_reorder: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            latency_ms: 300,
            failure_rate: 0.0,
            persist_reorder: false,
        }
    }
}

impl GatewayConfig {
    /// Config with no latency and no random failures
    pub fn instant() -> Self {
        Self {
            latency_ms: 0,
            ..Self::default()
        }
    }

    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = failure_rate;
        self
    }

    pub fn with_persist_reorder(mut self, persist_reorder: bool) -> Self {
        self.persist_reorder = persist_reorder;
        self
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// Load from `.env` and process environment, falling back to defaults
    pub fn from_env() -> SharedResult<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> SharedResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(LATENCY_ENV) {
            config.latency_ms = parse_field(LATENCY_ENV, &value)?;
        }
        if let Some(value) = lookup(FAILURE_RATE_ENV) {
            config.failure_rate = parse_field(FAILURE_RATE_ENV, &value)?;
        }
        if let Some(value) = lookup(PERSIST_REORDER_ENV) {
            config.persist_reorder = parse_field(PERSIST_REORDER_ENV, &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SharedResult<()> {
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(SharedError::InvalidConfig {
                field: FAILURE_RATE_ENV.to_string(),
                value: self.failure_rate.to_string(),
            });
        }
        Ok(())
    }
}

fn parse_field<T: FromStr>(field: &str, value: &str) -> SharedResult<T> {
    value.trim().parse().map_err(|_| SharedError::InvalidConfig {
        field: field.to_string(),
        value: value.to_string(),
    })
}
