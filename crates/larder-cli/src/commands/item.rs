//! Item command handlers

use anyhow::{anyhow, bail, Result};

use larder_core::{Store, Unit};

use crate::commands::resolve_item;
use crate::output::Output;

/// Create a new item
pub fn create(
    store: &mut Store,
    name: String,
    unit: Unit,
    critical: Option<i64>,
    default_value: Option<i64>,
    output: &Output,
) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Item name cannot be empty");
    }
    if store.registry().find_existing(&name, unit).is_some() {
        bail!("Item '{}' ({}) already exists", name, unit);
    }

    let id = store.create_item(name, unit);
    if let Some(value) = critical {
        store.registry_mut().set_critical_value(id, value);
    }
    if let Some(value) = default_value {
        store.registry_mut().set_default_value(id, value);
    }

    let item = store
        .registry()
        .get(id)
        .cloned()
        .ok_or_else(|| anyhow!("Item vanished after creation"))?;

    output.success(&format!("Created item: {}", item.name));
    output.print_item(&item);

    Ok(())
}

/// List all items, optionally filtered by a name substring
pub fn list(store: &Store, filter: Option<String>, output: &Output) -> Result<()> {
    let items: Vec<_> = store
        .registry()
        .filter(filter.as_deref().unwrap_or(""))
        .into_values()
        .collect();

    output.print_items(&items);
    Ok(())
}

/// Edit an item's critical and default values
pub fn edit(
    store: &mut Store,
    name: &str,
    unit: Option<Unit>,
    critical: Option<i64>,
    default_value: Option<i64>,
    output: &Output,
) -> Result<()> {
    if critical.is_none() && default_value.is_none() {
        bail!("Nothing to change; pass --critical and/or --default");
    }

    let item = resolve_item(store, name, unit)?;
    if let Some(value) = critical {
        store.registry_mut().set_critical_value(item.id, value);
    }
    if let Some(value) = default_value {
        store.registry_mut().set_default_value(item.id, value);
    }

    let item = store
        .registry()
        .get(item.id)
        .cloned()
        .ok_or_else(|| anyhow!("Item vanished while editing"))?;

    output.success("Item updated");
    output.print_item(&item);

    Ok(())
}
