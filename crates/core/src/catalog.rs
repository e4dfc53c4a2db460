//! The fixed stall menu: one base product with flavor variants, a short
//! drink list, and a single optional add-on.
//!
//! The catalog is static data. Nothing mutates it; the cart engine and the
//! HTTP menu endpoint only read from it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A flavor variant of the base product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flavor {
    pub id: String,
    pub name: String,
    /// Added to the base price; zero for standard flavors.
    #[serde(default)]
    pub price_delta: Decimal,
    /// Highlighted on the menu.
    #[serde(default)]
    pub popular: bool,
}

/// A drink with its own fixed price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drink {
    pub id: String,
    pub name: String,
    pub price: Decimal,
}

/// The single optional add-on (a topping), attachable to any line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonDef {
    pub id: String,
    pub name: String,
    pub price: Decimal,
}

/// Read-only menu for one stall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Display name of the base product (e.g. "Pandan Waffle").
    pub product_name: String,
    /// Sku stem for flavor line items; combined with the flavor id.
    pub product_sku: String,
    /// Base price of the product before any flavor delta.
    pub base_price: Decimal,
    /// Ordered flavor list as shown on the menu.
    pub flavors: Vec<Flavor>,
    /// Ordered drink list.
    pub drinks: Vec<Drink>,
    /// The optional add-on, if the stall offers one.
    pub addon: Option<AddonDef>,
}

impl Catalog {
    /// Look up a flavor by id.
    #[must_use]
    pub fn flavor(&self, id: &str) -> Option<&Flavor> {
        self.flavors.iter().find(|f| f.id == id)
    }

    /// Look up a drink by id.
    #[must_use]
    pub fn drink(&self, id: &str) -> Option<&Drink> {
        self.drinks.iter().find(|d| d.id == id)
    }

    /// Unit price for a flavor: base price plus the flavor's delta.
    #[must_use]
    pub fn price_for_flavor(&self, flavor: &Flavor) -> Decimal {
        self.base_price + flavor.price_delta
    }

    /// The default Pandan Stand menu.
    #[must_use]
    pub fn stall_default() -> Self {
        Self {
            product_name: "Pandan Waffle".to_string(),
            product_sku: "waffle".to_string(),
            base_price: Decimal::new(1200, 2),
            flavors: vec![
                Flavor {
                    id: "original".to_string(),
                    name: "Original".to_string(),
                    price_delta: Decimal::ZERO,
                    popular: true,
                },
                Flavor {
                    id: "coconut".to_string(),
                    name: "Coconut".to_string(),
                    price_delta: Decimal::ZERO,
                    popular: false,
                },
                Flavor {
                    id: "chocolate".to_string(),
                    name: "Chocolate".to_string(),
                    price_delta: Decimal::new(100, 2),
                    popular: true,
                },
                Flavor {
                    id: "ube".to_string(),
                    name: "Ube".to_string(),
                    price_delta: Decimal::new(150, 2),
                    popular: false,
                },
            ],
            drinks: vec![
                Drink {
                    id: "iced-tea".to_string(),
                    name: "Thai Iced Tea".to_string(),
                    price: Decimal::new(300, 2),
                },
                Drink {
                    id: "iced-coffee".to_string(),
                    name: "Vietnamese Iced Coffee".to_string(),
                    price: Decimal::new(350, 2),
                },
            ],
            addon: Some(AddonDef {
                id: "coconut-cream".to_string(),
                name: "Coconut Cream".to_string(),
                price: Decimal::new(200, 2),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_for_flavor_adds_delta() {
        let catalog = Catalog::stall_default();
        let original = catalog.flavor("original").unwrap();
        let chocolate = catalog.flavor("chocolate").unwrap();
        assert_eq!(catalog.price_for_flavor(original), dec!(12.00));
        assert_eq!(catalog.price_for_flavor(chocolate), dec!(13.00));
    }

    #[test]
    fn test_lookup_miss_is_none() {
        let catalog = Catalog::stall_default();
        assert!(catalog.flavor("durian").is_none());
        assert!(catalog.drink("bubble-tea").is_none());
    }
}
