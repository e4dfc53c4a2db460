//! Cart engine: line items, add-on arithmetic and the subtotal.
//!
//! A [`Cart`] is an ordered sequence of [`CartLineItem`]s with at most one
//! line per [`Sku`]; repeated additions increment the quantity instead of
//! duplicating the line, and removing the last unit removes the line
//! entirely (a quantity is never stored as zero).
//!
//! All operations are pure transformations of the in-memory cart. The cart
//! is owned exclusively by one customer session until submission, at which
//! point [`crate::order::OrderDraft::from_cart`] freezes it into an order
//! draft and the cart is cleared.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;

/// Unique key of a cart line, derived from product + flavor (or the drink's
/// own id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    /// Sku for a flavor line: the product sku stem plus the flavor id.
    #[must_use]
    pub fn for_flavor(catalog: &Catalog, flavor_id: &str) -> Self {
        Self(format!("{}-{flavor_id}", catalog.product_sku))
    }

    /// Sku for a drink line: the drink's own id.
    #[must_use]
    pub fn for_drink(drink_id: &str) -> Self {
        Self(drink_id.to_string())
    }

    /// Get the sku as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Sku {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Sku {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// What kind of catalog entry a line item came from. Drink lines cap their
/// add-on quantity at the parent quantity; flavor lines do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Flavor,
    Drink,
}

/// An add-on attached to one cart line. Its quantity is tracked
/// independently of the parent line's quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartAddon {
    pub id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub qty: u32,
}

/// One line of the cart: a flavor or drink plus quantity and add-ons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub sku: Sku,
    /// Flavor id for flavor lines, drink id for drink lines.
    pub flavor_id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub qty: u32,
    pub kind: LineKind,
    #[serde(default)]
    pub addons: Vec<CartAddon>,
}

impl CartLineItem {
    /// Line total: `unit_price * qty` plus every add-on's
    /// `unit_price * qty`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        let addons: Decimal = self
            .addons
            .iter()
            .map(|a| a.unit_price * Decimal::from(a.qty))
            .sum();
        self.unit_price * Decimal::from(self.qty) + addons
    }
}

/// Errors from cart operations that reference the catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("unknown flavor: {0}")]
    UnknownFlavor(String),
    #[error("unknown drink: {0}")]
    UnknownDrink(String),
    #[error("catalog has no add-on configured")]
    NoAddonConfigured,
}

/// An in-progress customer cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Rebuild a cart from client-supplied line items by replaying every
    /// addition through the normal cart operations against the catalog.
    ///
    /// Nothing from the submitted lines survives except catalog ids,
    /// kinds and quantities: unit prices come from the catalog, skus are
    /// re-derived, duplicate lines merge, zero quantities drop out and
    /// the drink add-on cap is re-applied. This is the submit path's
    /// defense against a tampered client cart.
    ///
    /// # Errors
    ///
    /// Returns the first `CartError` hit during the replay (unknown
    /// flavor or drink id, or an add-on with none configured).
    pub fn rebuild(catalog: &Catalog, lines: &[CartLineItem]) -> Result<Self, CartError> {
        let mut cart = Self::new();
        for line in lines {
            let sku = match line.kind {
                LineKind::Flavor => Sku::for_flavor(catalog, &line.flavor_id),
                LineKind::Drink => Sku::for_drink(&line.flavor_id),
            };
            for _ in 0..line.qty {
                match line.kind {
                    LineKind::Flavor => cart.add_flavor(catalog, &line.flavor_id)?,
                    LineKind::Drink => cart.add_drink(catalog, &line.flavor_id)?,
                }
            }
            for addon in &line.addons {
                for _ in 0..addon.qty {
                    cart.add_addon(catalog, &sku)?;
                }
            }
        }
        Ok(cart)
    }

    /// The line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines (add-ons not counted).
    #[must_use]
    pub fn total_units(&self) -> u32 {
        self.items.iter().map(|i| i.qty).sum()
    }

    /// Add one unit of a flavor. Increments the existing line for the
    /// derived sku, or appends a fresh line with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns `CartError::UnknownFlavor` if the id is not in the catalog.
    pub fn add_flavor(&mut self, catalog: &Catalog, flavor_id: &str) -> Result<(), CartError> {
        let flavor = catalog
            .flavor(flavor_id)
            .ok_or_else(|| CartError::UnknownFlavor(flavor_id.to_string()))?;
        let sku = Sku::for_flavor(catalog, flavor_id);
        if let Some(line) = self.line_mut(&sku) {
            line.qty += 1;
            return Ok(());
        }
        self.items.push(CartLineItem {
            sku,
            flavor_id: flavor.id.clone(),
            name: format!("{} ({})", catalog.product_name, flavor.name),
            unit_price: catalog.price_for_flavor(flavor),
            qty: 1,
            kind: LineKind::Flavor,
            addons: Vec::new(),
        });
        Ok(())
    }

    /// Add one unit of a drink, with the same increment-or-append
    /// semantics keyed by the drink's own sku.
    ///
    /// # Errors
    ///
    /// Returns `CartError::UnknownDrink` if the id is not in the catalog.
    pub fn add_drink(&mut self, catalog: &Catalog, drink_id: &str) -> Result<(), CartError> {
        let drink = catalog
            .drink(drink_id)
            .ok_or_else(|| CartError::UnknownDrink(drink_id.to_string()))?;
        let sku = Sku::for_drink(drink_id);
        if let Some(line) = self.line_mut(&sku) {
            line.qty += 1;
            return Ok(());
        }
        self.items.push(CartLineItem {
            sku,
            flavor_id: drink.id.clone(),
            name: drink.name.clone(),
            unit_price: drink.price,
            qty: 1,
            kind: LineKind::Drink,
            addons: Vec::new(),
        });
        Ok(())
    }

    /// Attach one unit of the catalog add-on to the line with the given
    /// sku: increments the existing add-on entry or appends it with
    /// quantity 1. On drink lines the add-on quantity is capped at the
    /// parent quantity (one per unit of drink); flavor lines have no cap.
    ///
    /// Targeting a sku that is not in the cart is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NoAddonConfigured` if the catalog has no add-on.
    pub fn add_addon(&mut self, catalog: &Catalog, sku: &Sku) -> Result<(), CartError> {
        let def = catalog.addon.as_ref().ok_or(CartError::NoAddonConfigured)?;
        let Some(line) = self.line_mut(sku) else {
            return Ok(());
        };
        let cap = match line.kind {
            LineKind::Drink => Some(line.qty),
            LineKind::Flavor => None,
        };
        if let Some(addon) = line.addons.iter_mut().find(|a| a.id == def.id) {
            match cap {
                Some(cap) if addon.qty >= cap => {}
                _ => addon.qty += 1,
            }
            return Ok(());
        }
        line.addons.push(CartAddon {
            id: def.id.clone(),
            name: def.name.clone(),
            unit_price: def.price,
            qty: 1,
        });
        Ok(())
    }

    /// Increment the quantity of the line with the given sku by one.
    /// No-op when the sku is not in the cart.
    pub fn increment(&mut self, sku: &Sku) {
        if let Some(line) = self.line_mut(sku) {
            line.qty += 1;
        }
    }

    /// Decrement the quantity of the line with the given sku by one.
    /// A line at quantity 1 is removed entirely; a missing sku is a no-op.
    /// Drink-line add-ons are clamped back under the new quantity so the
    /// one-per-unit cap keeps holding.
    pub fn decrement(&mut self, sku: &Sku) {
        let Some(pos) = self.items.iter().position(|i| &i.sku == sku) else {
            return;
        };
        let Some(line) = self.items.get_mut(pos) else {
            return;
        };
        if line.qty <= 1 {
            self.items.remove(pos);
            return;
        }
        line.qty -= 1;
        if line.kind == LineKind::Drink {
            let cap = line.qty;
            for addon in &mut line.addons {
                addon.qty = addon.qty.min(cap);
            }
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of every line's total. Exact decimal arithmetic; rounding to
    /// 2 decimal places happens once, at order submission.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    fn line_mut(&mut self, sku: &Sku) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|i| &i.sku == sku)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn catalog() -> Catalog {
        Catalog::stall_default()
    }

    #[test]
    fn test_repeat_add_merges_into_one_line() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_flavor(&catalog, "original").unwrap();
        cart.add_flavor(&catalog, "original").unwrap();
        cart.add_flavor(&catalog, "chocolate").unwrap();
        cart.add_drink(&catalog, "iced-tea").unwrap();
        cart.add_drink(&catalog, "iced-tea").unwrap();
        cart.add_drink(&catalog, "iced-tea").unwrap();

        assert_eq!(cart.items().len(), 3);
        assert_eq!(cart.items()[0].qty, 2);
        assert_eq!(cart.items()[1].qty, 1);
        assert_eq!(cart.items()[2].qty, 3);
        assert_eq!(cart.total_units(), 6);
    }

    #[test]
    fn test_unknown_catalog_ids_rejected() {
        let catalog = catalog();
        let mut cart = Cart::new();
        assert_eq!(
            cart.add_flavor(&catalog, "durian"),
            Err(CartError::UnknownFlavor("durian".to_string()))
        );
        assert_eq!(
            cart.add_drink(&catalog, "bubble-tea"),
            Err(CartError::UnknownDrink("bubble-tea".to_string()))
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_decrement_at_one_removes_line() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_flavor(&catalog, "original").unwrap();
        let sku = Sku::for_flavor(&catalog, "original");
        cart.decrement(&sku);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_decrement_missing_sku_is_noop() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_flavor(&catalog, "original").unwrap();
        let before = cart.clone();
        cart.decrement(&Sku::from("nope"));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_drink_addon_capped_at_parent_qty() {
        let catalog = catalog();
        let mut cart = Cart::new();
        let sku = Sku::for_drink("iced-tea");
        cart.add_drink(&catalog, "iced-tea").unwrap();
        // Only one unit of drink: repeated add-on calls stay at 1
        cart.add_addon(&catalog, &sku).unwrap();
        cart.add_addon(&catalog, &sku).unwrap();
        cart.add_addon(&catalog, &sku).unwrap();
        assert_eq!(cart.items()[0].addons[0].qty, 1);

        // Second unit raises the cap
        cart.add_drink(&catalog, "iced-tea").unwrap();
        cart.add_addon(&catalog, &sku).unwrap();
        cart.add_addon(&catalog, &sku).unwrap();
        assert_eq!(cart.items()[0].addons[0].qty, 2);
    }

    #[test]
    fn test_flavor_addon_has_no_cap() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_flavor(&catalog, "original").unwrap();
        let sku = Sku::for_flavor(&catalog, "original");
        for _ in 0..5 {
            cart.add_addon(&catalog, &sku).unwrap();
        }
        assert_eq!(cart.items()[0].addons[0].qty, 5);
    }

    #[test]
    fn test_decrement_clamps_drink_addons() {
        let catalog = catalog();
        let mut cart = Cart::new();
        let sku = Sku::for_drink("iced-coffee");
        cart.add_drink(&catalog, "iced-coffee").unwrap();
        cart.add_drink(&catalog, "iced-coffee").unwrap();
        cart.add_addon(&catalog, &sku).unwrap();
        cart.add_addon(&catalog, &sku).unwrap();
        assert_eq!(cart.items()[0].addons[0].qty, 2);

        cart.decrement(&sku);
        assert_eq!(cart.items()[0].qty, 1);
        assert_eq!(cart.items()[0].addons[0].qty, 1);
    }

    #[test]
    fn test_addon_on_missing_line_is_noop() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_addon(&catalog, &Sku::from("nope")).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subtotal_worked_example() {
        // cart = [{12.00 x2}, {3.00 x1 + addon 2.00 x1}] -> 24.00 + 5.00
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_flavor(&catalog, "original").unwrap();
        cart.add_flavor(&catalog, "original").unwrap();
        cart.add_drink(&catalog, "iced-tea").unwrap();
        cart.add_addon(&catalog, &Sku::for_drink("iced-tea")).unwrap();
        assert_eq!(cart.subtotal(), dec!(29.00));
    }

    #[test]
    fn test_rebuild_ignores_client_prices_and_skus() {
        let catalog = catalog();
        let forged = vec![CartLineItem {
            sku: Sku::from("totally-made-up"),
            flavor_id: "iced-tea".to_string(),
            name: "Free Tea".to_string(),
            unit_price: dec!(0.01),
            qty: 1,
            kind: LineKind::Drink,
            addons: Vec::new(),
        }];
        let cart = Cart::rebuild(&catalog, &forged).unwrap();
        assert_eq!(cart.items()[0].sku, Sku::for_drink("iced-tea"));
        assert_eq!(cart.items()[0].unit_price, dec!(3.00));
        assert_eq!(cart.subtotal(), dec!(3.00));
    }

    #[test]
    fn test_rebuild_merges_duplicates_and_drops_zero_qty() {
        let catalog = catalog();
        let line = |qty| CartLineItem {
            sku: Sku::for_flavor(&catalog, "original"),
            flavor_id: "original".to_string(),
            name: "Pandan Waffle (Original)".to_string(),
            unit_price: dec!(12.00),
            qty,
            kind: LineKind::Flavor,
            addons: Vec::new(),
        };
        let cart = Cart::rebuild(&catalog, &[line(2), line(0), line(1)]).unwrap();
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].qty, 3);
    }

    #[test]
    fn test_rebuild_reapplies_drink_addon_cap() {
        let catalog = catalog();
        let inflated = vec![CartLineItem {
            sku: Sku::for_drink("iced-tea"),
            flavor_id: "iced-tea".to_string(),
            name: "Thai Iced Tea".to_string(),
            unit_price: dec!(3.00),
            qty: 1,
            kind: LineKind::Drink,
            addons: vec![CartAddon {
                id: "coconut-cream".to_string(),
                name: "Coconut Cream".to_string(),
                unit_price: dec!(2.00),
                qty: 5,
            }],
        }];
        let cart = Cart::rebuild(&catalog, &inflated).unwrap();
        assert_eq!(cart.items()[0].addons[0].qty, 1);
        assert_eq!(cart.subtotal(), dec!(5.00));
    }

    #[test]
    fn test_rebuild_rejects_unknown_ids() {
        let catalog = catalog();
        let unknown = vec![CartLineItem {
            sku: Sku::from("waffle-durian"),
            flavor_id: "durian".to_string(),
            name: "Durian".to_string(),
            unit_price: dec!(1.00),
            qty: 1,
            kind: LineKind::Flavor,
            addons: Vec::new(),
        }];
        assert_eq!(
            Cart::rebuild(&catalog, &unknown).unwrap_err(),
            CartError::UnknownFlavor("durian".to_string())
        );
    }

    #[test]
    fn test_empty_cart_subtotal_is_zero() {
        assert_eq!(Cart::new().subtotal(), Decimal::ZERO);
    }

    #[test]
    fn test_clear_empties_cart() {
        let catalog = catalog();
        let mut cart = Cart::new();
        cart.add_flavor(&catalog, "ube").unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_units(), 0);
    }
}
