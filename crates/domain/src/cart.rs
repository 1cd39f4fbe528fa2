//! Shopping cart engine.

use common::{ItemId, Money};
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;

/// A catalog item snapshot and how many of it are in the cart.
///
/// Quantity is always at least 1; a line that would drop to 0 is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub item: CatalogItem,
    pub quantity: u32,
}

impl CartLine {
    /// Returns unit price times quantity.
    pub fn subtotal(&self) -> Money {
        self.item.price.multiply(self.quantity)
    }
}

/// The session's cart: at most one line per item, in the order items
/// were first added.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit of `item`, merging into an existing line.
    pub fn add(&mut self, item: &CatalogItem) {
        if let Some(line) = self.line_mut(item.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.lines.push(CartLine {
                item: item.clone(),
                quantity: 1,
            });
        }
    }

    /// Removes the line for `item_id`, if any.
    pub fn remove(&mut self, item_id: ItemId) {
        self.lines.retain(|line| line.item.id != item_id);
    }

    /// Applies `delta` to the line's quantity. A result of zero or less
    /// removes the line. Unknown items are ignored.
    pub fn adjust_quantity(&mut self, item_id: ItemId, delta: i64) {
        let Some(line) = self.line_mut(item_id) else {
            return;
        };

        let next = i64::from(line.quantity).saturating_add(delta);
        if next <= 0 {
            self.remove(item_id);
        } else {
            line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        }
    }

    /// Sum of price times quantity over all lines.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |count, line| count.saturating_add(line.quantity))
    }

    /// Returns the lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Returns the line for `item_id`.
    pub fn get(&self, item_id: ItemId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.item.id == item_id)
    }

    /// Returns true if the cart has an entry for `item_id`.
    pub fn contains(&self, item_id: ItemId) -> bool {
        self.get(item_id).is_some()
    }

    /// Returns true if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn line_mut(&mut self, item_id: ItemId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.item.id == item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aspirin() -> CatalogItem {
        CatalogItem::new(1, "Aspirin", "Pain relief", Money::from_paise(500), "aspirin.jpg")
    }

    fn vitamin_c() -> CatalogItem {
        CatalogItem::new(2, "Vitamin C", "Immunity", Money::from_paise(1250), "vitc.jpg")
    }

    #[test]
    fn test_new_cart_is_empty() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::zero());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_adding_same_item_twice_merges_lines() {
        let mut cart = Cart::new();
        cart.add(&aspirin());
        cart.add(&aspirin());

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.get(ItemId::new(1)).unwrap().quantity, 2);
        assert_eq!(cart.total(), Money::from_paise(1000));
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = Cart::new();
        cart.add(&vitamin_c());
        cart.add(&aspirin());
        cart.add(&vitamin_c());

        let ids: Vec<_> = cart.lines().iter().map(|l| l.item.id).collect();
        assert_eq!(ids, vec![ItemId::new(2), ItemId::new(1)]);
    }

    #[test]
    fn test_remove_deletes_line() {
        let mut cart = Cart::new();
        cart.add(&aspirin());
        cart.add(&vitamin_c());

        cart.remove(ItemId::new(1));

        assert!(!cart.contains(ItemId::new(1)));
        assert_eq!(cart.total(), Money::from_paise(1250));
    }

    #[test]
    fn test_remove_unknown_item_is_noop() {
        let mut cart = Cart::new();
        cart.add(&aspirin());
        cart.remove(ItemId::new(99));
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_adjust_quantity_up_and_down() {
        let mut cart = Cart::new();
        cart.add(&aspirin());

        cart.adjust_quantity(ItemId::new(1), 3);
        assert_eq!(cart.get(ItemId::new(1)).unwrap().quantity, 4);

        cart.adjust_quantity(ItemId::new(1), -2);
        assert_eq!(cart.get(ItemId::new(1)).unwrap().quantity, 2);
        assert_eq!(cart.total(), Money::from_paise(1000));
    }

    #[test]
    fn test_decrementing_last_unit_removes_line() {
        let mut cart = Cart::new();
        cart.add(&aspirin());

        cart.adjust_quantity(ItemId::new(1), -1);

        assert!(!cart.contains(ItemId::new(1)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_large_negative_delta_removes_line() {
        let mut cart = Cart::new();
        cart.add(&aspirin());
        cart.add(&aspirin());

        cart.adjust_quantity(ItemId::new(1), -10);

        assert!(cart.is_empty());
    }

    #[test]
    fn test_adjust_unknown_item_is_noop() {
        let mut cart = Cart::new();
        cart.adjust_quantity(ItemId::new(1), 5);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_is_stable_without_mutation() {
        let mut cart = Cart::new();
        cart.add(&aspirin());
        cart.add(&vitamin_c());
        cart.adjust_quantity(ItemId::new(2), 2);

        assert_eq!(cart.total(), cart.total());
        assert_eq!(cart.total(), Money::from_paise(500 + 3 * 1250));
    }

    #[test]
    fn test_item_count_sums_quantities() {
        let mut cart = Cart::new();
        cart.add(&aspirin());
        cart.add(&aspirin());
        cart.add(&vitamin_c());
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_mixed_operations_keep_lines_consistent() {
        let mut cart = Cart::new();
        let items = [aspirin(), vitamin_c()];

        for step in 0..40i64 {
            let item = &items[(step % 2) as usize];
            match step % 5 {
                0 | 1 => cart.add(item),
                2 => cart.adjust_quantity(item.id, -1),
                3 => cart.adjust_quantity(item.id, 2),
                _ => cart.remove(item.id),
            }

            assert!(cart.lines().iter().all(|line| line.quantity >= 1));
            let expected: Money = cart
                .lines()
                .iter()
                .map(|line| line.item.price.multiply(line.quantity))
                .sum();
            assert_eq!(cart.total(), expected);
        }
    }

    #[test]
    fn test_clear_empties_cart() {
        let mut cart = Cart::new();
        cart.add(&aspirin());
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_saturates_at_max_quantity() {
        let mut cart = Cart::new();
        cart.add(&aspirin());
        cart.adjust_quantity(ItemId::new(1), i64::MAX);
        assert_eq!(cart.get(ItemId::new(1)).unwrap().quantity, u32::MAX);

        cart.add(&aspirin());
        assert_eq!(cart.get(ItemId::new(1)).unwrap().quantity, u32::MAX);

        cart.add(&vitamin_c());
        assert_eq!(cart.item_count(), u32::MAX);
    }
}
