//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::{BankConfig, Config, InventoryConfig};

/// Merges configuration layers according to precedence rules.
///
/// # Examples
///
/// ```
/// use frontdesk::config::{Config, ConfigMerger};
///
/// let low = Config { maximum_lock_wait_seconds: Some(5), ..Default::default() };
/// let high = Config { maximum_lock_wait_seconds: Some(9), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.maximum_lock_wait_seconds, Some(9));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge sources given from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merge `source` into `target`; every `Some` in `source` wins.
    ///
    /// Nested sections merge field by field, so a layer that only sets the
    /// overdraft limit keeps a lower layer's savings minimum.
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.maximum_lock_wait_seconds.is_some() {
            target.maximum_lock_wait_seconds = source.maximum_lock_wait_seconds;
        }

        if let Some(source_bank) = source.bank {
            target.bank = Some(match target.bank {
                Some(target_bank) => Self::merge_bank(target_bank, source_bank),
                None => source_bank,
            });
        }

        if let Some(source_inventory) = source.inventory {
            target.inventory = Some(match target.inventory {
                Some(target_inventory) => InventoryConfig {
                    low_stock_threshold: source_inventory
                        .low_stock_threshold
                        .or(target_inventory.low_stock_threshold),
                },
                None => source_inventory,
            });
        }
    }

    fn merge_bank(target: BankConfig, source: BankConfig) -> BankConfig {
        BankConfig {
            savings_minimum_balance: source
                .savings_minimum_balance
                .or(target.savings_minimum_balance),
            checking_overdraft_limit: source
                .checking_overdraft_limit
                .or(target.checking_overdraft_limit),
        }
    }
}
