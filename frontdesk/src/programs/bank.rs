//! Savings and checking accounts with per-kind withdrawal limits.
//!
//! The limit check and the balance change are one conditional `UPDATE`:
//! the row only changes when the post-withdrawal balance stays at or above
//! the account kind's floor.

use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use super::collect_rows;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::money::Money;
use crate::validate::{non_negative, positive, required};

text_enum! {
    /// Account kind, which decides the balance floor.
    pub enum AccountKind as "kind" {
        /// Must keep at least the savings minimum.
        Savings => "Savings",
        /// May go negative down to the overdraft limit.
        Checking => "Checking",
    }
}

/// Balance floors for each account kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankPolicy {
    /// Lowest balance a savings account may keep.
    pub savings_minimum: Money,
    /// How far below zero a checking account may go.
    pub overdraft_limit: Money,
}

impl Default for BankPolicy {
    fn default() -> Self {
        Self {
            savings_minimum: Money::from_units(500),
            overdraft_limit: Money::from_units(1000),
        }
    }
}

impl BankPolicy {
    /// The lowest balance allowed for `kind`.
    #[must_use]
    pub const fn floor(&self, kind: AccountKind) -> Money {
        match kind {
            AccountKind::Savings => self.savings_minimum,
            AccountKind::Checking => self.overdraft_limit.negate(),
        }
    }
}

/// A bank account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    /// Unique account number.
    pub number: String,
    /// Account holder's name.
    pub holder: String,
    /// Savings or checking.
    pub kind: AccountKind,
    /// Current balance; may be negative for checking accounts.
    pub balance: Money,
}

impl Account {
    /// Builds an account with an opening balance.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank text or a negative balance.
    pub fn new(number: &str, holder: &str, kind: AccountKind, opening: Money) -> Result<Self> {
        Ok(Self {
            number: required("account_number", number)?,
            holder: required("holder", holder)?,
            kind,
            balance: non_negative("initial_balance", opening)?,
        })
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            number: row.get(0)?,
            holder: row.get(1)?,
            kind: row.get(2)?,
            balance: Money::from_cents(row.get(3)?),
        })
    }
}

const COLUMNS: &str = "account_number, holder, kind, balance_cents";

/// Bank operations over the shared database.
#[derive(Debug)]
pub struct BankStore<'a> {
    db: &'a mut Database,
    policy: BankPolicy,
}

impl Database {
    /// Bank accounts governed by `policy`.
    pub fn bank(&mut self, policy: BankPolicy) -> BankStore<'_> {
        BankStore { db: self, policy }
    }
}

impl BankStore<'_> {
    /// The policy in force.
    #[must_use]
    pub const fn policy(&self) -> BankPolicy {
        self.policy
    }

    /// Opens an account.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Duplicate`] for a taken number and
    /// [`Error::LimitExceeded`] when a savings account opens below the
    /// minimum balance.
    pub fn open(&mut self, account: &Account) -> Result<()> {
        non_negative("initial_balance", account.balance)?;
        let floor = self.policy.floor(account.kind);
        if account.balance < floor {
            return Err(Error::LimitExceeded {
                details: format!(
                    "{} accounts must open with at least {floor}",
                    account.kind
                ),
            });
        }

        self.db
            .connection()
            .execute(
                &format!("INSERT INTO bank_accounts ({COLUMNS}) VALUES (?1, ?2, ?3, ?4)"),
                params![
                    account.number,
                    account.holder,
                    account.kind,
                    account.balance.cents()
                ],
            )
            .map_err(|e| Error::on_unique_violation(e, "account", &account.number))?;
        log::debug!("opened {} account {}", account.kind, account.number);
        Ok(())
    }

    /// Looks up one account.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no account has this number.
    pub fn get(&self, number: &str) -> Result<Account> {
        let number = number.trim();
        self.db
            .connection()
            .query_row(
                &format!("SELECT {COLUMNS} FROM bank_accounts WHERE account_number = ?1"),
                [number],
                Account::from_row,
            )
            .optional()?
            .ok_or_else(|| Error::not_found("account", number))
    }

    /// All accounts ordered by number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list(&self) -> Result<Vec<Account>> {
        collect_rows(
            self.db.connection(),
            &format!("SELECT {COLUMNS} FROM bank_accounts ORDER BY account_number"),
            [],
            Account::from_row,
        )
    }

    /// Adds `amount` and returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive amount,
    /// [`Error::LimitExceeded`] when the balance would no longer fit, or
    /// [`Error::NotFound`].
    pub fn deposit(&mut self, number: &str, amount: Money) -> Result<Money> {
        let number = number.trim();
        let amount = positive("amount", amount)?;

        let tx = self.db.begin_transaction()?;
        let balance: Option<i64> = tx
            .query_row(
                "UPDATE bank_accounts SET balance_cents = balance_cents + ?1 \
                 WHERE account_number = ?2 AND balance_cents <= ?3 - ?1 \
                 RETURNING balance_cents",
                params![amount.cents(), number, i64::MAX],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(cents) = balance {
            tx.commit()?;
            let balance = Money::from_cents(cents);
            log::debug!("deposited {amount} to {number}, balance {balance}");
            return Ok(balance);
        }

        let current: Option<i64> = tx
            .query_row(
                "SELECT balance_cents FROM bank_accounts WHERE account_number = ?1",
                [number],
                |row| row.get(0),
            )
            .optional()?;
        match current {
            Some(cents) => Err(Error::LimitExceeded {
                details: format!(
                    "depositing {amount} would overflow the balance of {}",
                    Money::from_cents(cents)
                ),
            }),
            None => Err(Error::not_found("account", number)),
        }
    }

    /// Takes `amount` out and returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LimitExceeded`] when the balance would drop below
    /// the account kind's floor, a validation error for a non-positive
    /// amount, or [`Error::NotFound`].
    pub fn withdraw(&mut self, number: &str, amount: Money) -> Result<Money> {
        let number = number.trim();
        let amount = positive("amount", amount)?;
        let policy = self.policy;

        let tx = self.db.begin_transaction()?;
        let balance: Option<i64> = tx
            .query_row(
                "UPDATE bank_accounts SET balance_cents = balance_cents - ?1 \
                 WHERE account_number = ?2 \
                   AND balance_cents - ?1 >= CASE kind WHEN 'Savings' THEN ?3 ELSE ?4 END \
                 RETURNING balance_cents",
                params![
                    amount.cents(),
                    number,
                    policy.floor(AccountKind::Savings).cents(),
                    policy.floor(AccountKind::Checking).cents()
                ],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(cents) = balance {
            tx.commit()?;
            let balance = Money::from_cents(cents);
            log::debug!("withdrew {amount} from {number}, balance {balance}");
            return Ok(balance);
        }

        let current: Option<(AccountKind, i64)> = tx
            .query_row(
                "SELECT kind, balance_cents FROM bank_accounts WHERE account_number = ?1",
                [number],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        match current {
            Some((kind, cents)) => Err(Error::LimitExceeded {
                details: match kind {
                    AccountKind::Savings => format!(
                        "savings balance must stay at or above {} (balance {})",
                        policy.floor(kind),
                        Money::from_cents(cents)
                    ),
                    AccountKind::Checking => format!(
                        "overdraft limit of {} exceeded (balance {})",
                        policy.floor(kind),
                        Money::from_cents(cents)
                    ),
                },
            }),
            None => Err(Error::not_found("account", number)),
        }
    }
}
