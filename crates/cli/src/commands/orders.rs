//! Inspect and manage the stored order document.

#![allow(clippy::print_stdout)]

use std::sync::Arc;

use tracing::info;

use pandan_stand_core::PAYMENT_WINDOW;
use pandan_stand_counter::store::{JsonFileBackend, OrderStore};

/// Open the order store over the document path from the flag or
/// `COUNTER_DATA_FILE`.
fn open_store(data_file: Option<&str>) -> Result<Arc<OrderStore>, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let path = match data_file {
        Some(path) => path.to_string(),
        None => std::env::var("COUNTER_DATA_FILE")
            .map_err(|_| "COUNTER_DATA_FILE not set (or pass --data-file)")?,
    };
    Ok(Arc::new(OrderStore::open(
        Box::new(JsonFileBackend::new(path)),
        PAYMENT_WINDOW,
    )))
}

/// List stored orders, newest first.
///
/// # Errors
///
/// Returns an error if no document path is configured.
pub fn list(data_file: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(data_file)?;
    let mut orders = store.list_all();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    if orders.is_empty() {
        println!("no orders stored");
        return Ok(());
    }
    for order in &orders {
        println!(
            "{}  {:<10} {:>8}  {}  {}",
            order.id,
            order.status,
            order.total,
            order.created_at.format("%Y-%m-%d %H:%M"),
            order.pickup_name,
        );
    }
    Ok(())
}

/// Wipe all orders and reset the queue sequence.
///
/// # Errors
///
/// Returns an error if no document path is configured, the wipe was not
/// confirmed, or the write fails.
pub fn wipe(data_file: Option<&str>, confirmed: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !confirmed {
        return Err("refusing to wipe without --yes".into());
    }
    let store = open_store(data_file)?;
    let count = store.list_all().len();
    store.wipe_all()?;
    info!(removed = count, "order document wiped, queue sequence reset");
    Ok(())
}
