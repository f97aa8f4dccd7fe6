//! Configuration for frontdesk.
//!
//! Settings come from up to four layers, highest precedence first:
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`FRONTDESK_*`)
//! 3. `<data_dir>/config.yaml`
//! 4. Built-in defaults
//!
//! Every field is optional; the accessors on [`Config`] fill in defaults.
//!
//! # Examples
//!
//! ```
//! use frontdesk::config::{BankConfig, Config, ConfigBuilder};
//! use frontdesk::Money;
//!
//! let custom = Config {
//!     bank: Some(BankConfig {
//!         savings_minimum_balance: Some(Money::from_units(100)),
//!         checking_overdraft_limit: None,
//!     }),
//!     ..Default::default()
//! };
//!
//! let config = ConfigBuilder::new()
//!     .skip_files()
//!     .skip_env()
//!     .with_config(custom)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.bank_policy().savings_minimum, Money::from_units(100));
//! assert_eq!(config.bank_policy().overdraft_limit, Money::from_units(1000));
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource, CONFIG_FILE_NAME};
pub use merger::ConfigMerger;
pub use schema::{BankConfig, Config, InventoryConfig};
pub use validator::ConfigValidator;
