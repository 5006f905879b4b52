//! Status command handler

use anyhow::Result;

use larder_core::{Store, INVENTORY_LIST_ID, SHOPPING_LIST_ID};

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(store: &Store, output: &Output) -> Result<()> {
    let config = store.config();
    let items = store.registry().len();
    let inventory = store
        .lists()
        .get(INVENTORY_LIST_ID)
        .map(|list| list.len())
        .unwrap_or(0);
    let shopping = store
        .lists()
        .get(SHOPPING_LIST_ID)
        .map(|list| list.len())
        .unwrap_or(0);
    let active = if store.active_list() == SHOPPING_LIST_ID {
        "shopping"
    } else {
        "inventory"
    };

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "snapshot_exists": config.snapshot_path().exists(),
                    "active_list": active,
                    "counts": {
                        "items": items,
                        "inventory_entries": inventory,
                        "shopping_entries": shopping
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{} {} {}", items, inventory, shopping);
        }
        OutputFormat::Human => {
            println!("larder Status");
            println!("=============");
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!(
                "  Snapshot: {}",
                if config.snapshot_path().exists() {
                    "present"
                } else {
                    "not yet written"
                }
            );
            println!();
            println!("Active list: {}", active);
            println!();
            println!("Contents:");
            println!("  Items:            {}", items);
            println!("  Inventory stocks: {}", inventory);
            println!("  Shopping entries: {}", shopping);
        }
    }

    Ok(())
}
