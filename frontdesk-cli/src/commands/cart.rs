//! Shopping cart menu.

use crate::console::{finish, stdio_console, ActionResult, Console};
use crate::error::CliError;
use crate::utils::{load_configuration, open_database, GlobalOptions};
use clap::Args;
use frontdesk::programs::cart::{CartItem, Category};
use frontdesk::Database;
use std::io::{BufRead, Write};

/// Fill a shopping cart and check out interactively.
#[derive(Args)]
pub struct CartCommand {}

impl CartCommand {
    /// Execute the cart menu on stdin/stdout.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut db = open_database(global, &config)?;
        finish(run(&mut stdio_console(), &mut db))
    }
}

/// One-line rendering with the discounted price.
pub fn describe(item: &CartItem) -> String {
    format!(
        "{} | {} | {} | Price: {} | Final: {}",
        item.product_id,
        item.name,
        item.category,
        item.price,
        item.final_price()
    )
}

/// Runs the cart menu until "Exit" or end of input.
pub fn run<R: BufRead, W: Write>(console: &mut Console<R, W>, db: &mut Database) -> ActionResult {
    console.run_menu(
        "Shopping Cart",
        &[
            "Add Product",
            "Remove Product",
            "Display Cart",
            "Checkout",
            "Clear Cart",
            "Exit",
        ],
        |console, choice| {
            match choice {
                1 => {
                    let id = console.ask("Product ID: ")?;
                    let name = console.ask("Name: ")?;
                    let category: Category =
                        console.ask_parsed("Category (Electronics/Clothing/Grocery): ")?;
                    let price = console.ask_money("price", "Price: ")?;
                    db.cart().add(&CartItem::new(&id, &name, category, price)?)?;
                    console.say("Product added to cart.")?;
                }
                2 => {
                    let id = console.ask("Product ID to remove: ")?;
                    db.cart().remove(&id)?;
                    console.say("Product removed from cart.")?;
                }
                3 => {
                    let rows: Vec<String> = db.cart().items()?.iter().map(describe).collect();
                    console.show_all(&rows, "Cart is empty.")?;
                }
                4 => {
                    let total = db.cart().checkout_total()?;
                    console.say(format!("Total Amount to Pay: {total}"))?;
                }
                _ => {
                    let removed = db.cart().clear()?;
                    console.say(format!("Removed {removed} item(s)."))?;
                }
            }
            Ok(())
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_script(db: &mut Database, script: &str) -> String {
        let mut console = Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        finish(run(&mut console, db)).unwrap();
        String::from_utf8(console.output().clone()).unwrap()
    }

    #[test]
    fn test_checkout_applies_discounts() {
        let mut db = Database::open_in_memory().unwrap();
        let out = run_script(
            &mut db,
            "1\nE1\nPhone\nelectronics\n100\n1\nC1\nCoat\nClothing\n2000\n1\nG1\nRice\nGrocery\n50\n4\n6\n",
        );
        assert!(out.contains("Total Amount to Pay: 1740.00"));
        assert_eq!(db.cart().items().unwrap().len(), 3);
    }

    #[test]
    fn test_duplicate_code_ignores_case() {
        let mut db = Database::open_in_memory().unwrap();
        let out = run_script(&mut db, "1\nE1\nPhone\nElectronics\n100\n1\ne1\nTablet\nElectronics\n300\n6\n");
        assert!(out.contains("Error: cart item 'e1' already exists"));
    }

    #[test]
    fn test_clear_empties_cart() {
        let mut db = Database::open_in_memory().unwrap();
        let out = run_script(&mut db, "1\nG1\nRice\nGrocery\n50\n5\n3\n6\n");
        assert!(out.contains("Removed 1 item(s)."));
        assert!(out.contains("Cart is empty."));
    }
}
