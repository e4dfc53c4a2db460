//! Print the stall menu.

#![allow(clippy::print_stdout)]

use pandan_stand_core::Catalog;

/// Print the default stall menu with effective per-flavor prices.
///
/// # Errors
///
/// Infallible today; kept fallible for symmetry with the other commands.
pub fn show() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Catalog::stall_default();

    println!("{} (base {})", catalog.product_name, catalog.base_price);
    for flavor in &catalog.flavors {
        let marker = if flavor.popular { " *" } else { "" };
        println!(
            "  {:<12} {}{marker}",
            flavor.name,
            catalog.price_for_flavor(flavor)
        );
    }

    println!("Drinks");
    for drink in &catalog.drinks {
        println!("  {:<12} {}", drink.name, drink.price);
    }

    if let Some(addon) = &catalog.addon {
        println!("Add-on");
        println!("  {:<12} {}", addon.name, addon.price);
    }

    Ok(())
}
