//! Product inventory with stock counters.

use rusqlite::{params, Row};
use serde::Serialize;

use super::collect_rows;
use crate::capacity::{self, Counter};
use crate::database::Database;
use crate::error::{Error, Result};
use crate::money::Money;
use crate::validate::{non_negative, positive, required};

const STOCK: Counter = Counter::new("inventory_products", "product_id", "quantity", "product");

/// A stocked product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    /// Unique product code.
    pub product_id: String,
    /// Display name.
    pub name: String,
    /// Free-form category.
    pub category: String,
    /// Units on hand, never negative.
    pub quantity: i64,
    /// Price per unit, always positive.
    pub unit_price: Money,
}

impl Product {
    /// Builds a validated product.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank text, negative quantity or a
    /// non-positive price.
    pub fn new(
        product_id: &str,
        name: &str,
        category: &str,
        quantity: i64,
        unit_price: Money,
    ) -> Result<Self> {
        Ok(Self {
            product_id: required("product_id", product_id)?,
            name: required("name", name)?,
            category: required("category", category)?,
            quantity: non_negative("quantity", quantity)?,
            unit_price: positive("unit_price", unit_price)?,
        })
    }

    /// Quantity times unit price.
    ///
    /// # Errors
    ///
    /// Returns an error on overflow.
    pub fn stock_value(&self) -> Result<Money> {
        self.unit_price.checked_times(self.quantity)
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            product_id: row.get(0)?,
            name: row.get(1)?,
            category: row.get(2)?,
            quantity: row.get(3)?,
            unit_price: Money::from_cents(row.get(4)?),
        })
    }
}

const COLUMNS: &str = "product_id, name, category, quantity, unit_price_cents";

/// Inventory operations over the shared database.
#[derive(Debug)]
pub struct InventoryStore<'a> {
    db: &'a mut Database,
}

impl Database {
    /// Inventory records.
    pub fn inventory(&mut self) -> InventoryStore<'_> {
        InventoryStore { db: self }
    }
}

impl InventoryStore<'_> {
    /// Inserts a new product.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Duplicate`] when the product code is taken.
    pub fn add(&mut self, product: &Product) -> Result<()> {
        self.db
            .connection()
            .execute(
                &format!("INSERT INTO inventory_products ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
                params![
                    product.product_id,
                    product.name,
                    product.category,
                    product.quantity,
                    product.unit_price.cents()
                ],
            )
            .map_err(|e| Error::on_unique_violation(e, "product", &product.product_id))?;
        Ok(())
    }

    /// All products ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list(&self) -> Result<Vec<Product>> {
        self.query(
            &format!("SELECT {COLUMNS} FROM inventory_products ORDER BY product_id"),
            params![],
        )
    }

    /// Products whose code equals `term` or whose name contains it.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn search(&self, term: &str) -> Result<Vec<Product>> {
        let term = term.trim();
        self.query(
            &format!(
                "SELECT {COLUMNS} FROM inventory_products \
                 WHERE product_id = ?1 OR name LIKE '%' || ?1 || '%' ORDER BY product_id"
            ),
            params![term],
        )
    }

    /// Replaces quantity and price of a product.
    ///
    /// # Errors
    ///
    /// Returns a validation error or [`Error::NotFound`].
    pub fn update(&mut self, product_id: &str, quantity: i64, unit_price: Money) -> Result<()> {
        let product_id = product_id.trim();
        let quantity = non_negative("quantity", quantity)?;
        let unit_price = positive("unit_price", unit_price)?;
        let changed = self.db.connection().execute(
            "UPDATE inventory_products SET quantity = ?1, unit_price_cents = ?2 WHERE product_id = ?3",
            params![quantity, unit_price.cents(), product_id],
        )?;
        if changed == 0 {
            return Err(Error::not_found("product", product_id));
        }
        Ok(())
    }

    /// Removes a product.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no product has this code.
    pub fn delete(&mut self, product_id: &str) -> Result<()> {
        let product_id = product_id.trim();
        let changed = self.db.connection().execute(
            "DELETE FROM inventory_products WHERE product_id = ?1",
            [product_id],
        )?;
        if changed == 0 {
            return Err(Error::not_found("product", product_id));
        }
        Ok(())
    }

    /// Products with fewer than `threshold` units on hand.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn low_stock(&self, threshold: i64) -> Result<Vec<Product>> {
        self.query(
            &format!(
                "SELECT {COLUMNS} FROM inventory_products WHERE quantity < ?1 \
                 ORDER BY quantity, product_id"
            ),
            params![threshold],
        )
    }

    /// Sum of quantity times price over every product.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn total_value(&self) -> Result<Money> {
        let cents: i64 = self.db.connection().query_row(
            "SELECT COALESCE(SUM(quantity * unit_price_cents), 0) FROM inventory_products",
            [],
            |row| row.get(0),
        )?;
        Ok(Money::from_cents(cents))
    }

    /// Takes `quantity` units out of stock and returns what is left.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] when stock would go negative,
    /// or [`Error::NotFound`].
    pub fn withdraw_stock(&mut self, product_id: &str, quantity: i64) -> Result<i64> {
        let product_id = product_id.trim();
        let tx = self.db.begin_transaction()?;
        let left = capacity::claim(&tx, &STOCK, product_id, quantity)?;
        tx.commit()?;
        Ok(left)
    }

    /// Adds `quantity` units to stock and returns the new level.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive quantity,
    /// [`Error::LimitExceeded`] when the level would overflow, or
    /// [`Error::NotFound`].
    pub fn restock(&mut self, product_id: &str, quantity: i64) -> Result<i64> {
        let product_id = product_id.trim();
        let tx = self.db.begin_transaction()?;
        let level = capacity::release(&tx, &STOCK, product_id, quantity, None)?;
        tx.commit()?;
        Ok(level)
    }

    fn query(&self, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<Product>> {
        collect_rows(self.db.connection(), sql, args, Product::from_row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, name: &str, qty: i64, price: &str) -> Product {
        Product::new(id, name, "General", qty, price.parse().unwrap()).unwrap()
    }

    fn seeded() -> Database {
        let mut db = Database::open_in_memory().unwrap();
        db.inventory().add(&product("P1", "USB Cable", 25, "150")).unwrap();
        db.inventory().add(&product("P2", "Mouse", 4, "499.50")).unwrap();
        db.inventory().add(&product("P3", "Mouse Pad", 0, "99")).unwrap();
        db
    }

    #[test]
    fn test_product_validation() {
        assert!(Product::new("P", "n", "c", -1, Money::from_units(1)).is_err());
        assert!(Product::new("P", "n", "c", 1, Money::ZERO).is_err());
        assert!(Product::new("P", "n", "c", 0, Money::from_cents(1)).is_ok());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut db = seeded();
        let err = db.inventory().add(&product("P1", "Other", 1, "1")).unwrap_err();
        assert!(err.is_duplicate());
    }

    #[test]
    fn test_search_by_id_or_name() {
        let mut db = seeded();
        let by_name = db.inventory().search("mouse").unwrap();
        assert_eq!(by_name.len(), 2);
        let by_id = db.inventory().search("P1").unwrap();
        assert_eq!(by_id[0].name, "USB Cable");
        assert!(db.inventory().search("keyboard").unwrap().is_empty());
    }

    #[test]
    fn test_reports() {
        let mut db = seeded();
        let low: Vec<String> = db
            .inventory()
            .low_stock(10)
            .unwrap()
            .into_iter()
            .map(|p| p.product_id)
            .collect();
        assert_eq!(low, ["P3", "P2"]);
        // 25 * 150 + 4 * 499.50
        assert_eq!(db.inventory().total_value().unwrap().to_string(), "5748.00");

        let summed = db
            .inventory()
            .list()
            .unwrap()
            .iter()
            .map(|p| p.stock_value().unwrap())
            .fold(Money::ZERO, |acc, v| acc.checked_add(v).unwrap());
        assert_eq!(summed, db.inventory().total_value().unwrap());
    }

    #[test]
    fn test_withdraw_never_goes_negative() {
        let mut db = seeded();
        assert_eq!(db.inventory().withdraw_stock("P2", 3).unwrap(), 1);
        let err = db.inventory().withdraw_stock("P2", 2).unwrap_err();
        assert!(matches!(err, Error::CapacityExhausted { .. }));
        assert_eq!(db.inventory().search("P2").unwrap()[0].quantity, 1);
        assert_eq!(db.inventory().restock("P2", 9).unwrap(), 10);
        assert!(db.inventory().withdraw_stock("P9", 1).unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_and_delete() {
        let mut db = seeded();
        db.inventory().update("P1", 3, Money::from_units(200)).unwrap();
        assert_eq!(db.inventory().search("P1").unwrap()[0].quantity, 3);
        assert!(db.inventory().update("P1", -3, Money::from_units(1)).is_err());
        db.inventory().delete("P1").unwrap();
        assert!(db.inventory().delete("P1").unwrap_err().is_not_found());
    }

    #[test]
    fn test_restock_that_would_overflow_is_a_limit() {
        let mut db = Database::open_in_memory().unwrap();
        let huge =
            Product::new("P1", "Bolt", "Hardware", i64::MAX - 5, Money::from_cents(1)).unwrap();
        db.inventory().add(&huge).unwrap();

        let err = db.inventory().restock("P1", 6).unwrap_err();
        assert!(matches!(err, Error::LimitExceeded { .. }));
        assert_eq!(db.inventory().list().unwrap()[0].quantity, i64::MAX - 5);
    }
}
