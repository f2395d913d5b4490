//! Static product catalog
//!
//! The storefront sells a single estate tea in four pack sizes. The list is
//! fixed at compile time and never mutated.

use ratatui::style::Color;

/// A product offered in the shop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: &'static str,
    pub name: &'static str,
    pub size: &'static str,
    /// Price in rupees
    pub price: u64,
    pub description: &'static str,
    pub accent_color: Color,
}

pub const PRODUCTS: &[Product] = &[
    Product {
        id: "sample-100",
        name: "Lailpuriya Taster",
        size: "100g",
        price: 150,
        description: "Perfect for first-timers. Experience the bold aroma of authentic Assam gardens.",
        accent_color: Color::Yellow,
    },
    Product {
        id: "std-250",
        name: "Lailpuriya Gold",
        size: "250g",
        price: 350,
        description: "Our signature blend. Rich, malty, and full-bodied. The ideal daily brew.",
        accent_color: Color::Green,
    },
    Product {
        id: "family-500",
        name: "Lailpuriya Family",
        size: "500g",
        price: 650,
        description: "Keep the family energized. Processed without preservatives for pure health.",
        accent_color: Color::LightGreen,
    },
    Product {
        id: "jumbo-1kg",
        name: "Estate Jumbo Pack",
        size: "1kg",
        price: 1200,
        description: "For the true connoisseur. Best value direct from the source.",
        accent_color: Color::Cyan,
    },
];

pub fn all() -> &'static [Product] {
    PRODUCTS
}

pub fn find(id: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.id == id)
}

/// Format a rupee amount for display
pub fn format_price(amount: u64) -> String {
    format!("₹{}", amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_product_ids_are_unique() {
        let ids: HashSet<&str> = all().iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), all().len());
    }

    #[test]
    fn test_prices_are_positive() {
        assert!(all().iter().all(|p| p.price > 0));
    }

    #[test]
    fn test_find_standard_pack() {
        let product = find("std-250").unwrap();
        assert_eq!(product.name, "Lailpuriya Gold");
        assert_eq!(product.price, 350);
        assert!(find("darjeeling-50").is_none());
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(1200), "₹1200");
    }
}
