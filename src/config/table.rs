//! Pending Interest Table configuration module.
//!
//! This module defines the tunables of the PIT: its size bound, the eviction
//! strategy applied at that bound, and the timing of entry expiry.

use super::{ConfigResult, Validate};
use crate::error::config::ConfigError;
use crate::pit::EvictionKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// PIT configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Maximum number of entries (0 = unbounded)
    pub max_size: usize,

    /// Victim selection when `max_size` is reached
    pub eviction: EvictionKind,

    /// Lifetime applied to Interests that carry none, in milliseconds
    pub default_lifetime_ms: u64,

    /// Interval between expiry sweeps, in milliseconds
    pub sweep_interval_ms: u64,

    /// Maximum number of name components accepted
    pub max_name_depth: usize,
}

impl TableConfig {
    /// Default Interest lifetime as a `Duration`.
    pub fn default_lifetime(&self) -> Duration {
        Duration::from_millis(self.default_lifetime_ms)
    }

    /// Sweep interval as a `Duration`.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            max_size: 0,
            eviction: EvictionKind::Fifo,
            default_lifetime_ms: 4_000,
            sweep_interval_ms: 1_000,
            max_name_depth: 128,
        }
    }
}

impl Validate for TableConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.default_lifetime_ms == 0 {
            return Err(ConfigError::ValidationError(
                "default_lifetime_ms must be greater than 0".to_string(),
            ));
        }

        if self.sweep_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "sweep_interval_ms must be greater than 0".to_string(),
            ));
        }

        if self.max_name_depth == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "table.max_name_depth".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}
