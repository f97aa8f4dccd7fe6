//! Environment variable overrides.
//!
//! Recognised variables:
//!
//! - `FRONTDESK_SAVINGS_MINIMUM`
//! - `FRONTDESK_OVERDRAFT_LIMIT`
//! - `FRONTDESK_LOW_STOCK_THRESHOLD`
//! - `FRONTDESK_MAXIMUM_LOCK_WAIT_SECONDS`

use crate::config::schema::Config;
use crate::error::{Error, Result};
use crate::money::Money;
use std::env;

/// Savings minimum balance override.
pub const SAVINGS_MINIMUM_VAR: &str = "FRONTDESK_SAVINGS_MINIMUM";
/// Checking overdraft limit override.
pub const OVERDRAFT_LIMIT_VAR: &str = "FRONTDESK_OVERDRAFT_LIMIT";
/// Low-stock threshold override.
pub const LOW_STOCK_THRESHOLD_VAR: &str = "FRONTDESK_LOW_STOCK_THRESHOLD";
/// Lock wait override.
pub const LOCK_WAIT_VAR: &str = "FRONTDESK_MAXIMUM_LOCK_WAIT_SECONDS";

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use frontdesk::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply `FRONTDESK_*` variables on top of `config`.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the variable if its value does not parse.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Ok(value) = env::var(SAVINGS_MINIMUM_VAR) {
            let bank = config.bank.get_or_insert_with(Default::default);
            bank.savings_minimum_balance = Some(Money::parse_field(SAVINGS_MINIMUM_VAR, &value)?);
        }

        if let Ok(value) = env::var(OVERDRAFT_LIMIT_VAR) {
            let bank = config.bank.get_or_insert_with(Default::default);
            bank.checking_overdraft_limit = Some(Money::parse_field(OVERDRAFT_LIMIT_VAR, &value)?);
        }

        if let Ok(value) = env::var(LOW_STOCK_THRESHOLD_VAR) {
            let threshold = value.trim().parse().map_err(|_| Error::Validation {
                field: LOW_STOCK_THRESHOLD_VAR.into(),
                message: "Must be an integer".into(),
            })?;
            let inventory = config.inventory.get_or_insert_with(Default::default);
            inventory.low_stock_threshold = Some(threshold);
        }

        if let Ok(seconds) = env::var(LOCK_WAIT_VAR) {
            config.maximum_lock_wait_seconds =
                Some(seconds.trim().parse().map_err(|_| Error::Validation {
                    field: LOCK_WAIT_VAR.into(),
                    message: "Must be a positive integer".into(),
                })?);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear() {
        for var in [
            SAVINGS_MINIMUM_VAR,
            OVERDRAFT_LIMIT_VAR,
            LOW_STOCK_THRESHOLD_VAR,
            LOCK_WAIT_VAR,
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_no_variables_leaves_config_untouched() {
        clear();
        let mut config = Config::default();
        EnvironmentConfig::apply_overrides(&mut config).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn test_all_variables_applied() {
        clear();
        env::set_var(SAVINGS_MINIMUM_VAR, "750");
        env::set_var(OVERDRAFT_LIMIT_VAR, "25.50");
        env::set_var(LOW_STOCK_THRESHOLD_VAR, "2");
        env::set_var(LOCK_WAIT_VAR, "30");

        let mut config = Config::default();
        EnvironmentConfig::apply_overrides(&mut config).unwrap();
        clear();

        let policy = config.bank_policy();
        assert_eq!(policy.savings_minimum, Money::from_units(750));
        assert_eq!(policy.overdraft_limit, Money::from_cents(2550));
        assert_eq!(config.low_stock_threshold(), 2);
        assert_eq!(config.maximum_lock_wait_seconds, Some(30));
    }

    #[test]
    #[serial]
    fn test_invalid_value_names_variable() {
        clear();
        env::set_var(LOCK_WAIT_VAR, "soon");
        let result = EnvironmentConfig::apply_overrides(&mut Config::default());
        clear();

        match result {
            Err(Error::Validation { field, .. }) => assert_eq!(field, LOCK_WAIT_VAR),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    #[serial]
    fn test_bad_amount_rejected() {
        clear();
        env::set_var(OVERDRAFT_LIMIT_VAR, "12.345");
        let result = EnvironmentConfig::apply_overrides(&mut Config::default());
        clear();
        assert!(result.is_err());
    }
}
