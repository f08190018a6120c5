//! Configuration validation

use crate::schema::RawConfig;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Loan policy error: {0}")]
    LoanError(String),

    #[error("Sweep interval '{name}' must be greater than zero")]
    ZeroInterval { name: String },
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.loans.period_days == Some(0) {
        errors.push(ValidationError::LoanError(
            "period_days must be at least 1".into(),
        ));
    }

    if config.loans.fine_per_day_cents.is_some_and(|c| c < 0) {
        errors.push(ValidationError::LoanError(
            "fine_per_day_cents cannot be negative".into(),
        ));
    }

    if config.sweeps.fine_interval_secs == Some(0) {
        errors.push(ValidationError::ZeroInterval {
            name: "fine_interval_secs".into(),
        });
    }

    if config.sweeps.notification_interval_secs == Some(0) {
        errors.push(ValidationError::ZeroInterval {
            name: "notification_interval_secs".into(),
        });
    }

    errors
}
