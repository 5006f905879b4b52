//! Shopping list command handlers

use anyhow::Result;

use larder_core::{Store, Unit, INVENTORY_LIST_ID};

use crate::commands::{confirm, resolve_item};
use crate::output::Output;

/// Put an item on the shopping list (presence only, no amount)
pub fn add(store: &mut Store, name: &str, unit: Option<Unit>, output: &Output) -> Result<()> {
    let item = resolve_item(store, name, unit)?;
    store.add_to_shopping(item.id, 0);

    output.success(&format!("{} put on the shopping list", item.name));
    Ok(())
}

/// Take an item off the shopping list
pub fn remove(store: &mut Store, name: &str, unit: Option<Unit>, output: &Output) -> Result<()> {
    let item = resolve_item(store, name, unit)?;

    if output.should_prompt()
        && !confirm(&format!("Take {} off the shopping list?", item.name))?
    {
        println!("Cancelled.");
        return Ok(());
    }

    store.remove_from_shopping(item.id);

    output.success(&format!("{} taken off the shopping list", item.name));
    Ok(())
}

/// Move a bought item from the shopping list into the inventory
pub fn buy(
    store: &mut Store,
    name: &str,
    amount: Option<i64>,
    unit: Option<Unit>,
    output: &Output,
) -> Result<()> {
    let item = resolve_item(store, name, unit)?;
    let bought = amount.unwrap_or(item.default_value);

    store.buy(item.id, Some(bought));

    let stock = store
        .lists()
        .amount(INVENTORY_LIST_ID, item.id)
        .unwrap_or(0);
    output.success(&format!(
        "Bought {} {} of {}; {} {} in stock",
        bought,
        item.unit.suffix(),
        item.name,
        stock,
        item.unit.suffix()
    ));
    Ok(())
}
