//! Validated settings structures

use crate::schema::RawConfig;
use biblio_util::Money;
use std::path::PathBuf;
use std::time::Duration;

/// Validated settings ready for use by the library engine and the sweepers
#[derive(Debug, Clone)]
pub struct Settings {
    pub service: ServiceConfig,
    pub loans: LoanPolicy,
    pub sweeps: SweepSchedule,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            service: ServiceConfig {
                data_dir: raw
                    .service
                    .data_dir
                    .unwrap_or_else(biblio_util::data_dir_without_env),
            },
            loans: LoanPolicy {
                period_days: raw.loans.period_days.unwrap_or(DEFAULT_LOAN_PERIOD_DAYS),
                fine_per_day: raw
                    .loans
                    .fine_per_day_cents
                    .map(Money::from_cents)
                    .unwrap_or(DEFAULT_FINE_PER_DAY),
                due_soon_days: raw.loans.due_soon_days.unwrap_or(DEFAULT_DUE_SOON_DAYS),
            },
            sweeps: SweepSchedule {
                fine_interval: Duration::from_secs(
                    raw.sweeps
                        .fine_interval_secs
                        .unwrap_or(DEFAULT_FINE_INTERVAL_SECS),
                ),
                notification_interval: Duration::from_secs(
                    raw.sweeps
                        .notification_interval_secs
                        .unwrap_or(DEFAULT_NOTIFICATION_INTERVAL_SECS),
                ),
            },
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_raw(RawConfig {
            config_version: crate::CURRENT_CONFIG_VERSION,
            service: Default::default(),
            loans: Default::default(),
            sweeps: Default::default(),
        })
    }
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub data_dir: PathBuf,
}

/// Loan policy used by the library engine
#[derive(Debug, Clone, Copy)]
pub struct LoanPolicy {
    /// Loan period in days; the due date is borrow date + this.
    pub period_days: u32,

    /// Fine charged per overdue day.
    pub fine_per_day: Money,

    /// A held title is "due soon" when due within this many days.
    pub due_soon_days: u32,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self {
            period_days: DEFAULT_LOAN_PERIOD_DAYS,
            fine_per_day: DEFAULT_FINE_PER_DAY,
            due_soon_days: DEFAULT_DUE_SOON_DAYS,
        }
    }
}

/// Intervals for the two background sweeps
#[derive(Debug, Clone, Copy)]
pub struct SweepSchedule {
    pub fine_interval: Duration,
    pub notification_interval: Duration,
}

const DEFAULT_LOAN_PERIOD_DAYS: u32 = 5;
const DEFAULT_FINE_PER_DAY: Money = Money::from_cents(2000);
const DEFAULT_DUE_SOON_DAYS: u32 = 7;
const DEFAULT_FINE_INTERVAL_SECS: u64 = 10;
const DEFAULT_NOTIFICATION_INTERVAL_SECS: u64 = 35;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_values() {
        let settings = Settings::default();
        assert_eq!(settings.loans.period_days, 5);
        assert_eq!(settings.loans.fine_per_day, Money::from_cents(2000));
        assert_eq!(settings.loans.due_soon_days, 7);
        assert_eq!(settings.sweeps.fine_interval, Duration::from_secs(10));
        assert_eq!(
            settings.sweeps.notification_interval,
            Duration::from_secs(35)
        );
    }
}
