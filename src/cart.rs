//! Shopping cart
//!
//! Maps product ids to purchased quantities. An entry exists only while its
//! quantity is at least one; dropping to zero removes it.

use crate::catalog::Product;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u64,
}

impl CartItem {
    pub fn line_total(&self) -> u64 {
        self.product.price * self.quantity
    }
}

#[derive(Debug, Default)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `product`, merging into an existing line if present.
    pub fn add_to_cart(&mut self, product: &Product) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity += 1;
            return;
        }
        self.items.push(CartItem {
            product: product.clone(),
            quantity: 1,
        });
    }

    /// Adjust the quantity of `id` by `delta`, clamping at zero.
    ///
    /// Unknown ids are ignored. A line that reaches zero is removed.
    pub fn update_quantity(&mut self, id: &str, delta: i64) {
        let Some(idx) = self.items.iter().position(|i| i.product.id == id) else {
            return;
        };

        let next = (self.items[idx].quantity as i128 + delta as i128).max(0);
        if next == 0 {
            self.items.remove(idx);
        } else {
            self.items[idx].quantity = u64::try_from(next).unwrap_or(u64::MAX);
        }
    }

    /// Total number of units across all lines (badge count)
    pub fn cart_count(&self) -> u64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn cart_total(&self) -> u64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn gold() -> &'static Product {
        catalog::find("std-250").unwrap()
    }

    #[test]
    fn test_add_twice_merges_into_one_line() {
        let mut cart = Cart::new();
        cart.add_to_cart(gold());
        cart.add_to_cart(gold());

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("std-250").unwrap().quantity, 2);
        assert_eq!(cart.cart_total(), 700);
    }

    #[test]
    fn test_count_matches_number_of_adds() {
        let mut cart = Cart::new();
        let order = ["sample-100", "std-250", "sample-100", "jumbo-1kg", "std-250", "sample-100"];
        for id in order {
            cart.add_to_cart(catalog::find(id).unwrap());
        }

        assert_eq!(cart.cart_count(), order.len() as u64);
        assert_eq!(cart.len(), 3);
        assert_eq!(cart.get("sample-100").unwrap().quantity, 3);
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = Cart::new();
        cart.add_to_cart(catalog::find("jumbo-1kg").unwrap());
        cart.add_to_cart(catalog::find("sample-100").unwrap());
        cart.add_to_cart(catalog::find("jumbo-1kg").unwrap());

        let ids: Vec<&str> = cart.items().iter().map(|i| i.product.id).collect();
        assert_eq!(ids, vec!["jumbo-1kg", "sample-100"]);
    }

    #[test]
    fn test_decrement_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_to_cart(gold());
        cart.add_to_cart(gold());

        cart.update_quantity("std-250", -2);

        assert!(cart.get("std-250").is_none());
        assert!(cart.is_empty());
        assert_eq!(cart.cart_count(), 0);
    }

    #[test]
    fn test_large_negative_delta_clamps_at_zero() {
        let mut cart = Cart::new();
        cart.add_to_cart(gold());

        cart.update_quantity("std-250", -50);

        assert!(cart.is_empty());
        assert_eq!(cart.cart_total(), 0);
    }

    #[test]
    fn test_positive_delta_has_no_upper_bound() {
        let mut cart = Cart::new();
        cart.add_to_cart(gold());

        cart.update_quantity("std-250", 999);

        assert_eq!(cart.get("std-250").unwrap().quantity, 1000);
        assert_eq!(cart.cart_total(), 350_000);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut cart = Cart::new();
        cart.add_to_cart(gold());

        cart.update_quantity("darjeeling-50", -1);
        cart.update_quantity("darjeeling-50", 3);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.cart_count(), 1);
    }

    #[test]
    fn test_zero_delta_keeps_line() {
        let mut cart = Cart::new();
        cart.add_to_cart(gold());

        cart.update_quantity("std-250", 0);

        assert_eq!(cart.get("std-250").unwrap().quantity, 1);
    }

    #[test]
    fn test_add_then_remove_restores_total() {
        let mut cart = Cart::new();
        cart.add_to_cart(catalog::find("family-500").unwrap());
        let before = cart.cart_total();

        cart.add_to_cart(catalog::find("jumbo-1kg").unwrap());
        assert_eq!(cart.cart_total(), before + 1200);

        cart.update_quantity("jumbo-1kg", -1);
        assert_eq!(cart.cart_total(), before);
    }

    #[test]
    fn test_total_sums_price_times_quantity() {
        let mut cart = Cart::new();
        cart.add_to_cart(catalog::find("sample-100").unwrap());
        cart.add_to_cart(catalog::find("family-500").unwrap());
        cart.update_quantity("family-500", 2);

        let expected: u64 = cart.items().iter().map(|i| i.product.price * i.quantity).sum();
        assert_eq!(cart.cart_total(), expected);
        assert_eq!(cart.cart_total(), 150 + 650 * 3);
    }
}
