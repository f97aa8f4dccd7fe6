//! Bank account menu.

use crate::console::{finish, stdio_console, ActionResult, Console};
use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};
use clap::Args;
use frontdesk::programs::bank::{Account, AccountKind, BankPolicy};
use frontdesk::Database;
use std::io::{BufRead, Write};

/// Manage bank accounts interactively.
#[derive(Args)]
pub struct BankCommand {}

impl BankCommand {
    /// Execute the bank menu on stdin/stdout.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        finish(run(&mut stdio_console(), &mut db, config.bank_policy()))
    }
}

/// Multi-line account summary.
pub fn describe(a: &Account) -> String {
    format!(
        "Account Number: {}\nHolder: {}\nType: {}\nBalance: {}",
        a.number, a.holder, a.kind, a.balance
    )
}

/// Runs the bank menu until "Exit" or end of input.
pub fn run<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    db: &mut Database,
    policy: BankPolicy,
) -> ActionResult {
    console.run_menu(
        "Bank Account Management",
        &[
            "Create New Account",
            "Deposit",
            "Withdraw",
            "Display Account Info",
            "Exit",
        ],
        |console, choice| {
            match choice {
                1 => {
                    let number = console.ask("Account number: ")?;
                    let holder = console.ask("Holder name: ")?;
                    let kind: AccountKind = console.ask_parsed("Type (Savings/Checking): ")?;
                    let opening = console.ask_money("initial_balance", "Initial balance: ")?;
                    db.bank(policy)
                        .open(&Account::new(&number, &holder, kind, opening)?)?;
                    console.say(format!("{kind} account created."))?;
                }
                2 => {
                    let number = console.ask("Account number: ")?;
                    let amount = console.ask_money("amount", "Amount to deposit: ")?;
                    let balance = db.bank(policy).deposit(&number, amount)?;
                    console.say(format!("Deposited {amount}. New balance: {balance}"))?;
                }
                3 => {
                    let number = console.ask("Account number: ")?;
                    let amount = console.ask_money("amount", "Amount to withdraw: ")?;
                    let balance = db.bank(policy).withdraw(&number, amount)?;
                    console.say(format!("Withdrew {amount}. New balance: {balance}"))?;
                }
                _ => {
                    let number = console.ask("Account number: ")?;
                    let account = db.bank(policy).get(&number)?;
                    console.say(describe(&account))?;
                }
            }
            Ok(())
        },
    )
}
