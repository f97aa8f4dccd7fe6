//! Configuration schema.
//!
//! Mirrors the layout of `config.yaml`:
//!
//! ```yaml
//! bank:
//!   savings_minimum_balance: 500.00
//!   checking_overdraft_limit: 1000.00
//! inventory:
//!   low_stock_threshold: 10
//! maximum_lock_wait_seconds: 5
//! ```

use crate::money::Money;
use crate::programs::bank::BankPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default lowest balance for savings accounts, in whole units.
pub const DEFAULT_SAVINGS_MINIMUM: i64 = 500;

/// Default overdraft allowance for checking accounts, in whole units.
pub const DEFAULT_OVERDRAFT_LIMIT: i64 = 1000;

/// Default quantity below which a product counts as low on stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Default seconds to wait for the database lock.
pub const DEFAULT_LOCK_WAIT_SECONDS: u64 = 5;

/// Complete configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Bank account rules.
    pub bank: Option<BankConfig>,

    /// Inventory reporting settings.
    pub inventory: Option<InventoryConfig>,

    /// Maximum time to wait for database lock acquisition (seconds).
    pub maximum_lock_wait_seconds: Option<u64>,
}

/// Bank account rules.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BankConfig {
    /// Lowest balance a savings account may keep.
    pub savings_minimum_balance: Option<Money>,

    /// How far below zero a checking account may go.
    pub checking_overdraft_limit: Option<Money>,
}

/// Inventory reporting settings.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct InventoryConfig {
    /// Products with fewer units than this are reported as low on stock.
    pub low_stock_threshold: Option<i64>,
}

impl Config {
    /// The bank policy described by this configuration, with defaults filled in.
    #[must_use]
    pub fn bank_policy(&self) -> BankPolicy {
        let bank = self.bank.unwrap_or_default();
        BankPolicy {
            savings_minimum: bank
                .savings_minimum_balance
                .unwrap_or(Money::from_units(DEFAULT_SAVINGS_MINIMUM)),
            overdraft_limit: bank
                .checking_overdraft_limit
                .unwrap_or(Money::from_units(DEFAULT_OVERDRAFT_LIMIT)),
        }
    }

    /// The low-stock threshold, defaulting to 10.
    #[must_use]
    pub fn low_stock_threshold(&self) -> i64 {
        self.inventory
            .and_then(|inventory| inventory.low_stock_threshold)
            .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD)
    }

    /// How long to wait for the database lock.
    #[must_use]
    pub fn lock_wait(&self) -> Duration {
        Duration::from_secs(
            self.maximum_lock_wait_seconds
                .unwrap_or(DEFAULT_LOCK_WAIT_SECONDS),
        )
    }

    /// A configuration with every field set to its default value.
    #[must_use]
    pub fn filled_defaults() -> Self {
        let policy = Self::default().bank_policy();
        Self {
            bank: Some(BankConfig {
                savings_minimum_balance: Some(policy.savings_minimum),
                checking_overdraft_limit: Some(policy.overdraft_limit),
            }),
            inventory: Some(InventoryConfig {
                low_stock_threshold: Some(DEFAULT_LOW_STOCK_THRESHOLD),
            }),
            maximum_lock_wait_seconds: Some(DEFAULT_LOCK_WAIT_SECONDS),
        }
    }
}
