//! In-memory shopping cart container.
//!
//! The cart is a plain state container: an insertion-ordered list of line
//! items with add/remove/update/clear operations and derived count and
//! subtotal. It performs no I/O; the service layer decides where it lives
//! (one cart per session). It is serde-serializable for that purpose.

use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;
use crate::types::price::Price;

/// One product entry in the shopping cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product ID.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Unit price.
    pub price: Price,
    /// Product image URL.
    #[serde(default)]
    pub image: String,
    /// Quantity, always at least 1.
    pub quantity: u32,
}

/// The shopping cart.
///
/// Invariants:
/// - at most one line item per product ID (repeated adds merge quantities)
/// - every quantity is at least 1
/// - items keep their insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add an item to the cart.
    ///
    /// If a line with the same product ID already exists its quantity is
    /// incremented by the added quantity; otherwise the item is appended.
    /// A zero quantity is treated as 1.
    pub fn add(&mut self, item: CartItem) {
        let quantity = item.quantity.max(1);
        if let Some(existing) = self.items.iter_mut().find(|line| line.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(quantity);
        } else {
            self.items.push(CartItem { quantity, ..item });
        }
    }

    /// Remove the line item with the given product ID.
    pub fn remove(&mut self, id: ProductId) {
        self.items.retain(|line| line.id != id);
    }

    /// Set the quantity of a line item, clamped to a minimum of 1.
    ///
    /// Returns `false` if no line with that ID exists.
    pub fn update_quantity(&mut self, id: ProductId, quantity: u32) -> bool {
        match self.items.iter_mut().find(|line| line.id == id) {
            Some(line) => {
                line.quantity = quantity.max(1);
                true
            }
            None => false,
        }
    }

    /// Empty the cart. Called after a successful order submission.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// The line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Total number of articles: the sum of all quantities.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |sum, line| sum.saturating_add(line.quantity))
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of `unit price x quantity` over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items
            .iter()
            .fold(Price::ZERO, |sum, line| {
                sum.plus(line.price.times(line.quantity))
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: i64, price: &str, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            name: format!("produit {id}"),
            price: Price::parse(price).unwrap(),
            image: String::new(),
            quantity,
        }
    }

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = Cart::new();
        cart.add(item(1, "100,00", 1));
        cart.add(item(1, "100,00", 2));
        cart.add(item(1, "100,00", 1));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 4);
        assert_eq!(cart.count(), 4);
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut cart = Cart::new();
        cart.add(item(3, "10,00", 1));
        cart.add(item(1, "10,00", 1));
        cart.add(item(2, "10,00", 1));
        cart.add(item(1, "10,00", 1));

        let ids: Vec<i64> = cart.items().iter().map(|l| l.id.as_i64()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_add_zero_quantity_counts_as_one() {
        let mut cart = Cart::new();
        cart.add(item(1, "10,00", 0));
        assert_eq!(cart.count(), 1);
    }

    #[test]
    fn test_update_quantity_clamps_at_one() {
        let mut cart = Cart::new();
        cart.add(item(1, "10,00", 3));

        assert!(cart.update_quantity(ProductId::new(1), 0));
        assert_eq!(cart.items()[0].quantity, 1);

        assert!(cart.update_quantity(ProductId::new(1), 7));
        assert_eq!(cart.items()[0].quantity, 7);
    }

    #[test]
    fn test_update_quantity_unknown_id() {
        let mut cart = Cart::new();
        assert!(!cart.update_quantity(ProductId::new(9), 2));
    }

    #[test]
    fn test_remove() {
        let mut cart = Cart::new();
        cart.add(item(1, "10,00", 1));
        cart.add(item(2, "10,00", 1));
        cart.remove(ProductId::new(1));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].id, ProductId::new(2));
    }

    #[test]
    fn test_clear_empties_cart() {
        let mut cart = Cart::new();
        cart.add(item(1, "10,00", 2));
        cart.add(item(2, "10,00", 5));
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.count(), 0);
    }

    #[test]
    fn test_subtotal_uses_decimal_arithmetic() {
        let mut cart = Cart::new();
        cart.add(item(1, "1 200,50 DA", 2));
        cart.add(item(2, "99,90", 1));

        assert_eq!(cart.subtotal().to_wire(), "2500,90");
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut cart = Cart::new();
        cart.add(item(1, "49,99", 2));

        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }
}
