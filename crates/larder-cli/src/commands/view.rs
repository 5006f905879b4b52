//! List view command handlers

use anyhow::{anyhow, Result};

use larder_core::{Item, ListId, Store, INVENTORY_LIST_ID};

use crate::output::Output;

/// Show a list, optionally filtered by a name substring
///
/// Defaults to the active list. Entries come out in name order since
/// list keys follow the sorted registry ids.
pub fn list(
    store: &Store,
    which: Option<ListId>,
    filter: Option<String>,
    output: &Output,
) -> Result<()> {
    let list_id = which.unwrap_or_else(|| store.active_list());
    let view = store
        .lists()
        .filtered_view(list_id, filter.as_deref().unwrap_or(""), store.registry())
        .ok_or_else(|| anyhow!("No such list: {}", list_id))?;

    let entries: Vec<(Item, i64)> = view
        .contents()
        .iter()
        .filter_map(|(&item_id, &amount)| {
            store
                .registry()
                .get(item_id)
                .map(|item| (item.clone(), amount))
        })
        .collect();

    output.print_entries(list_label(list_id), &entries);
    Ok(())
}

/// Switch the active list
pub fn use_list(store: &mut Store, which: ListId, output: &Output) -> Result<()> {
    store.set_active_list(which);
    output.success(&format!("Active list is now {}", list_label(which)));
    Ok(())
}

fn list_label(list_id: ListId) -> &'static str {
    if list_id == INVENTORY_LIST_ID {
        "inventory"
    } else {
        "shopping"
    }
}
