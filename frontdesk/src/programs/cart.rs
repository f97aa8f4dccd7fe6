//! Shopping cart with per-category discounts.

use rusqlite::{params, Row};
use serde::Serialize;

use super::collect_rows;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::money::Money;
use crate::validate::{positive, required};

/// Clothing above this price gets the clothing discount.
pub const CLOTHING_DISCOUNT_THRESHOLD: Money = Money::from_units(1000);

text_enum! {
    /// Product category; decides the discount.
    pub enum Category as "category" {
        /// 10% off.
        Electronics => "Electronics",
        /// 20% off when priced above 1000.
        Clothing => "Clothing",
        /// Never discounted.
        Grocery => "Grocery",
    }
}

impl Category {
    /// Price after this category's discount.
    ///
    /// ```
    /// use frontdesk::programs::cart::Category;
    /// use frontdesk::Money;
    ///
    /// assert_eq!(Category::Electronics.final_price(Money::from_units(100)), Money::from_units(90));
    /// assert_eq!(Category::Clothing.final_price(Money::from_units(1000)), Money::from_units(1000));
    /// assert_eq!(Category::Clothing.final_price(Money::from_units(2000)), Money::from_units(1600));
    /// ```
    #[must_use]
    pub fn final_price(self, price: Money) -> Money {
        match self {
            Self::Electronics => price.percent_of(90),
            Self::Clothing if price > CLOTHING_DISCOUNT_THRESHOLD => price.percent_of(80),
            Self::Clothing | Self::Grocery => price,
        }
    }
}

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItem {
    /// Product code, unique ignoring case.
    pub product_id: String,
    /// Display name.
    pub name: String,
    /// Category.
    pub category: Category,
    /// List price, always positive.
    pub price: Money,
}

impl CartItem {
    /// Builds a validated cart item.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank text or a non-positive price.
    pub fn new(product_id: &str, name: &str, category: Category, price: Money) -> Result<Self> {
        Ok(Self {
            product_id: required("product_id", product_id)?,
            name: required("name", name)?,
            category,
            price: positive("price", price)?,
        })
    }

    /// Price after discount.
    #[must_use]
    pub fn final_price(&self) -> Money {
        self.category.final_price(self.price)
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            product_id: row.get(0)?,
            name: row.get(1)?,
            category: row.get(2)?,
            price: Money::from_cents(row.get(3)?),
        })
    }
}

/// Cart operations over the shared database.
#[derive(Debug)]
pub struct CartStore<'a> {
    db: &'a mut Database,
}

impl Database {
    /// The shopping cart.
    pub fn cart(&mut self) -> CartStore<'_> {
        CartStore { db: self }
    }
}

impl CartStore<'_> {
    /// Puts an item in the cart.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Duplicate`] when an item with the same code (any
    /// case) is already in the cart.
    pub fn add(&mut self, item: &CartItem) -> Result<()> {
        self.db
            .connection()
            .execute(
                "INSERT INTO cart_items (product_id, name, category, price_cents) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![item.product_id, item.name, item.category, item.price.cents()],
            )
            .map_err(|e| Error::on_unique_violation(e, "cart item", &item.product_id))?;
        Ok(())
    }

    /// Takes an item out of the cart.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the code is not in the cart.
    pub fn remove(&mut self, product_id: &str) -> Result<()> {
        let product_id = product_id.trim();
        let changed = self
            .db
            .connection()
            .execute("DELETE FROM cart_items WHERE product_id = ?1", [product_id])?;
        if changed == 0 {
            return Err(Error::not_found("cart item", product_id));
        }
        Ok(())
    }

    /// Items in the order they were added.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn items(&self) -> Result<Vec<CartItem>> {
        collect_rows(
            self.db.connection(),
            "SELECT product_id, name, category, price_cents FROM cart_items ORDER BY rowid",
            [],
            CartItem::from_row,
        )
    }

    /// Sum of discounted prices. Leaves the cart as it is.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the sum overflows.
    pub fn checkout_total(&self) -> Result<Money> {
        self.items()?
            .iter()
            .try_fold(Money::ZERO, |total, item| total.checked_add(item.final_price()))
    }

    /// Empties the cart and returns how many items were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn clear(&mut self) -> Result<usize> {
        Ok(self.db.connection().execute("DELETE FROM cart_items", [])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, category: Category, price: &str) -> CartItem {
        CartItem::new(id, "Thing", category, price.parse().unwrap()).unwrap()
    }

    #[test]
    fn test_ids_are_case_insensitive() {
        let mut db = Database::open_in_memory().unwrap();
        db.cart().add(&item("abc", Category::Grocery, "10")).unwrap();
        let err = db.cart().add(&item("ABC", Category::Grocery, "5")).unwrap_err();
        assert!(err.is_duplicate());
        db.cart().remove("AbC").unwrap();
        assert!(db.cart().remove("abc").unwrap_err().is_not_found());
    }

    #[test]
    fn test_checkout_total_applies_discounts() {
        let mut db = Database::open_in_memory().unwrap();
        db.cart().add(&item("E1", Category::Electronics, "1000")).unwrap();
        db.cart().add(&item("C1", Category::Clothing, "1500")).unwrap();
        db.cart().add(&item("C2", Category::Clothing, "999.99")).unwrap();
        db.cart().add(&item("G1", Category::Grocery, "45.50")).unwrap();

        // 900 + 1200 + 999.99 + 45.50
        assert_eq!(db.cart().checkout_total().unwrap().to_string(), "3145.49");
        assert_eq!(db.cart().items().unwrap().len(), 4);
        assert_eq!(db.cart().clear().unwrap(), 4);
        assert_eq!(db.cart().checkout_total().unwrap(), Money::ZERO);
    }

    #[test]
    fn test_items_keep_insertion_order() {
        let mut db = Database::open_in_memory().unwrap();
        for id in ["Z", "A", "M"] {
            db.cart().add(&item(id, Category::Grocery, "1")).unwrap();
        }
        let ids: Vec<String> = db
            .cart()
            .items()
            .unwrap()
            .into_iter()
            .map(|i| i.product_id)
            .collect();
        assert_eq!(ids, ["Z", "A", "M"]);
    }

    #[test]
    fn test_price_must_be_positive() {
        assert!(CartItem::new("X", "n", Category::Grocery, Money::ZERO).is_err());
        assert!("books".parse::<Category>().is_err());
        assert_eq!("clothing".parse::<Category>().unwrap(), Category::Clothing);
    }
}
