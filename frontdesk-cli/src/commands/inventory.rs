//! Inventory menu.

use crate::console::{finish, stdio_console, ActionResult, Console};
use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};
use clap::Args;
use frontdesk::programs::inventory::Product;
use frontdesk::Database;
use std::io::{BufRead, Write};

/// Manage the product inventory interactively.
#[derive(Args)]
pub struct InventoryCommand {}

impl InventoryCommand {
    /// Execute the inventory menu on stdin/stdout.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        finish(run(
            &mut stdio_console(),
            &mut db,
            config.low_stock_threshold(),
        ))
    }
}

/// One-line rendering used by the menu and the `list` table.
pub fn describe(p: &Product) -> String {
    format!(
        "{} | {} | {} | Qty: {} | Price: {}",
        p.product_id, p.name, p.category, p.quantity, p.unit_price
    )
}

/// Runs the inventory menu until "Exit" or end of input.
///
/// `low_stock_threshold` feeds the low-stock report.
pub fn run<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    db: &mut Database,
    low_stock_threshold: i64,
) -> ActionResult {
    console.run_menu(
        "Inventory Management",
        &[
            "Add Product",
            "View Products",
            "Search Product",
            "Update Product",
            "Delete Product",
            "Withdraw Stock",
            "Restock",
            "Reports",
            "Exit",
        ],
        |console, choice| {
            match choice {
                1 => {
                    let id = console.ask("Product ID: ")?;
                    let name = console.ask("Name: ")?;
                    let category = console.ask("Category: ")?;
                    let quantity = console.ask_number("quantity", "Quantity: ")?;
                    let price = console.ask_money("unit_price", "Unit price: ")?;
                    db.inventory()
                        .add(&Product::new(&id, &name, &category, quantity, price)?)?;
                    console.say("Product added.")?;
                }
                2 => {
                    let rows: Vec<String> = db.inventory().list()?.iter().map(describe).collect();
                    console.show_all(&rows, "No products found.")?;
                }
                3 => {
                    let term = console.ask("Search by ID or name: ")?;
                    let rows: Vec<String> =
                        db.inventory().search(&term)?.iter().map(describe).collect();
                    console.show_all(&rows, "No matching products.")?;
                }
                4 => {
                    let id = console.ask("Product ID: ")?;
                    let quantity = console.ask_number("quantity", "New quantity: ")?;
                    let price = console.ask_money("unit_price", "New unit price: ")?;
                    db.inventory().update(&id, quantity, price)?;
                    console.say("Product updated.")?;
                }
                5 => {
                    let id = console.ask("Product ID: ")?;
                    db.inventory().delete(&id)?;
                    console.say("Product deleted.")?;
                }
                6 => {
                    let id = console.ask("Product ID: ")?;
                    let quantity = console.ask_number("quantity", "Units to withdraw: ")?;
                    let left = db.inventory().withdraw_stock(&id, quantity)?;
                    console.say(format!("Withdrawn. {left} left in stock."))?;
                }
                7 => {
                    let id = console.ask("Product ID: ")?;
                    let quantity = console.ask_number("quantity", "Units to add: ")?;
                    let level = db.inventory().restock(&id, quantity)?;
                    console.say(format!("Restocked. {level} now in stock."))?;
                }
                _ => reports(console, db, low_stock_threshold)?,
            }
            Ok(())
        },
    )
}

fn reports<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    db: &mut Database,
    threshold: i64,
) -> ActionResult {
    console.run_menu(
        "Reports",
        &["Low Stock Report", "Total Inventory Value", "Back"],
        |console, choice| {
            if choice == 1 {
                console.say(format!("Products with fewer than {threshold} units:"))?;
                let rows: Vec<String> = db
                    .inventory()
                    .low_stock(threshold)?
                    .iter()
                    .map(describe)
                    .collect();
                console.show_all(&rows, "No products are low on stock.")?;
            } else {
                let total = db.inventory().total_value()?;
                console.say(format!("Total Inventory Value: {total}"))?;
            }
            Ok(())
        },
    )
}
