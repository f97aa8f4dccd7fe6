//! Configuration validation.

use crate::config::schema::Config;
use crate::error::{Error, Result};
use crate::money::Money;

/// Validates a merged configuration.
///
/// # Examples
///
/// ```
/// use frontdesk::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::default()).unwrap();
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Reject negative limits, a negative threshold and a zero lock wait.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` naming the offending key.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(bank) = config.bank {
            Self::validate_amount("bank.savings_minimum_balance", bank.savings_minimum_balance)?;
            Self::validate_amount(
                "bank.checking_overdraft_limit",
                bank.checking_overdraft_limit,
            )?;
        }

        if let Some(threshold) = config
            .inventory
            .and_then(|inventory| inventory.low_stock_threshold)
        {
            if threshold < 0 {
                return Err(Error::Validation {
                    field: "inventory.low_stock_threshold".into(),
                    message: "Threshold must not be negative".into(),
                });
            }
        }

        if config.maximum_lock_wait_seconds == Some(0) {
            return Err(Error::Validation {
                field: "maximum_lock_wait_seconds".into(),
                message: "Timeout must be greater than 0".into(),
            });
        }

        Ok(())
    }

    fn validate_amount(field: &str, amount: Option<Money>) -> Result<()> {
        match amount {
            Some(value) if value.is_negative() => Err(Error::Validation {
                field: field.into(),
                message: format!("Amount must not be negative, got {value}"),
            }),
            _ => Ok(()),
        }
    }
}
