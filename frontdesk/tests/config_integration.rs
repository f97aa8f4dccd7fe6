//! Configuration layers feeding the programs.

mod common;

use common::temp_database;
use frontdesk::config::{ConfigBuilder, CONFIG_FILE_NAME};
use frontdesk::programs::bank::{Account, AccountKind};
use frontdesk::programs::inventory::Product;
use frontdesk::{Error, Money};
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_file_drives_bank_policy() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "bank:\n  savings_minimum_balance: 100\n  checking_overdraft_limit: 50\n",
    )
    .unwrap();
    let config = ConfigBuilder::new()
        .with_data_dir(dir.path())
        .skip_env()
        .build()
        .unwrap();

    let (_db_dir, _path, mut db) = temp_database();
    let mut bank = db.bank(config.bank_policy());
    bank.open(&Account::new("S1", "Ana", AccountKind::Savings, Money::from_units(300)).unwrap())
        .unwrap();
    bank.open(&Account::new("C1", "Ben", AccountKind::Checking, Money::from_units(0)).unwrap())
        .unwrap();

    assert_eq!(
        bank.withdraw("S1", Money::from_units(200)).unwrap(),
        Money::from_units(100)
    );
    assert!(matches!(
        bank.withdraw("S1", Money::from_cents(1)),
        Err(Error::LimitExceeded { .. })
    ));

    assert_eq!(
        bank.withdraw("C1", Money::from_units(50)).unwrap(),
        Money::from_units(-50)
    );
    assert!(matches!(
        bank.withdraw("C1", Money::from_cents(1)),
        Err(Error::LimitExceeded { .. })
    ));
}

#[test]
#[serial]
fn test_env_threshold_drives_low_stock_report() {
    env::set_var("FRONTDESK_LOW_STOCK_THRESHOLD", "3");
    let config = ConfigBuilder::new().skip_files().build();
    env::remove_var("FRONTDESK_LOW_STOCK_THRESHOLD");
    let config = config.unwrap();

    let (_dir, _path, mut db) = temp_database();
    let mut inventory = db.inventory();
    for (id, qty) in [("P1", 2), ("P2", 3), ("P3", 9)] {
        inventory
            .add(&Product::new(id, "Item", "General", qty, Money::from_units(1)).unwrap())
            .unwrap();
    }

    let low: Vec<_> = inventory
        .low_stock(config.low_stock_threshold())
        .unwrap()
        .into_iter()
        .map(|p| p.product_id)
        .collect();
    assert_eq!(low, vec!["P1".to_string()]);
}

#[test]
fn test_malformed_config_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(CONFIG_FILE_NAME), "bank: [1, 2\n").unwrap();

    let result = ConfigBuilder::new()
        .with_data_dir(dir.path())
        .skip_env()
        .build();
    assert!(matches!(result, Err(Error::Configuration(_))));
}
