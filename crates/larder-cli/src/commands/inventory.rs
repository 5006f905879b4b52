//! Inventory command handlers

use anyhow::Result;

use larder_core::{Store, Unit, INVENTORY_LIST_ID, SHOPPING_LIST_ID};

use crate::commands::resolve_item;
use crate::output::Output;

/// Add an amount of an item to the inventory
pub fn add(
    store: &mut Store,
    name: &str,
    amount: i64,
    unit: Option<Unit>,
    output: &Output,
) -> Result<()> {
    let item = resolve_item(store, name, unit)?;
    store.add_to_inventory(item.id, amount);

    report_stock(store, &item, output);
    Ok(())
}

/// Consume an amount of an item from the inventory
pub fn consume(
    store: &mut Store,
    name: &str,
    amount: i64,
    unit: Option<Unit>,
    output: &Output,
) -> Result<()> {
    let item = resolve_item(store, name, unit)?;
    store.consume(item.id, amount);

    report_stock(store, &item, output);
    Ok(())
}

/// Report the resulting stock, and whether the item is now marked for
/// shopping
fn report_stock(store: &Store, item: &larder_core::Item, output: &Output) {
    match store.lists().amount(INVENTORY_LIST_ID, item.id) {
        Some(amount) => output.success(&format!(
            "{}: {} {} in stock",
            item.name,
            amount,
            item.unit.suffix()
        )),
        None => output.success(&format!("{}: out of stock", item.name)),
    }

    if store
        .lists()
        .get(SHOPPING_LIST_ID)
        .map(|list| list.contains(item.id))
        .unwrap_or(false)
    {
        output.message(&format!("{} is on the shopping list", item.name));
    }
}
