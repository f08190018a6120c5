//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Service-level settings
    #[serde(default)]
    pub service: RawServiceConfig,

    /// Loan policy
    #[serde(default)]
    pub loans: RawLoanConfig,

    /// Background sweep intervals
    #[serde(default)]
    pub sweeps: RawSweepConfig,
}

/// Service-level settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawServiceConfig {
    /// Data directory for the store
    pub data_dir: Option<PathBuf>,
}

/// Loan policy settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawLoanConfig {
    /// Loan period in days
    pub period_days: Option<u32>,

    /// Fine per overdue day, in cents
    pub fine_per_day_cents: Option<i64>,

    /// Look-ahead window for "due soon" notifications, in days
    pub due_soon_days: Option<u32>,
}

/// Background sweep intervals
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawSweepConfig {
    /// Seconds between fine-aggregation sweeps
    pub fine_interval_secs: Option<u64>,

    /// Seconds between notification sweeps
    pub notification_interval_secs: Option<u64>,
}
