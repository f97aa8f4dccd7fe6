//! Property-based tests for configuration merging.

use super::merger::ConfigMerger;
use super::schema::{BankConfig, Config, InventoryConfig};
use crate::money::Money;
use proptest::prelude::*;

fn money_strategy() -> impl Strategy<Value = Money> {
    (0i64..10_000_000).prop_map(Money::from_cents)
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of((
            prop::option::of(money_strategy()),
            prop::option::of(money_strategy()),
        )),
        prop::option::of(prop::option::of(0i64..1000)),
        prop::option::of(1u64..600),
    )
        .prop_map(|(bank, inventory, wait)| Config {
            bank: bank.map(|(savings, overdraft)| BankConfig {
                savings_minimum_balance: savings,
                checking_overdraft_limit: overdraft,
            }),
            inventory: inventory.map(|threshold| InventoryConfig {
                low_stock_threshold: threshold,
            }),
            maximum_lock_wait_seconds: wait,
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn merge_empty_is_right_identity(config in config_strategy()) {
        let mut merged = config.clone();
        ConfigMerger::merge_into(&mut merged, &Config::default());
        prop_assert_eq!(merged, config);
    }

    #[test]
    fn merge_into_default_copies_values(config in config_strategy()) {
        let mut merged = Config::default();
        ConfigMerger::merge_into(&mut merged, &config);
        prop_assert_eq!(merged.bank_policy(), config.bank_policy());
        prop_assert_eq!(merged.low_stock_threshold(), config.low_stock_threshold());
        prop_assert_eq!(merged.lock_wait(), config.lock_wait());
    }

    #[test]
    fn higher_layer_wins_where_set(low in config_strategy(), high in config_strategy()) {
        let mut merged = low.clone();
        ConfigMerger::merge_into(&mut merged, &high);

        let expected_wait = high.maximum_lock_wait_seconds.or(low.maximum_lock_wait_seconds);
        prop_assert_eq!(merged.maximum_lock_wait_seconds, expected_wait);

        let high_savings = high.bank.and_then(|b| b.savings_minimum_balance);
        let low_savings = low.bank.and_then(|b| b.savings_minimum_balance);
        prop_assert_eq!(
            merged.bank.and_then(|b| b.savings_minimum_balance),
            high_savings.or(low_savings)
        );
    }
}
