//! Export, import and reset command handlers

use std::path::PathBuf;

use anyhow::Result;

use larder_core::Store;

use crate::commands::confirm;
use crate::output::Output;

/// Export the dataset as CSV
pub fn export(store: &Store, path: Option<PathBuf>, output: &Output) -> Result<()> {
    let path = path.unwrap_or_else(|| store.config().default_export_path());
    store.export_csv(&path)?;

    output.success(&format!(
        "Exported {} item(s) to {}",
        store.registry().len(),
        path.display()
    ));
    Ok(())
}

/// Replace the dataset with the contents of a CSV file
pub fn import(store: &mut Store, path: Option<PathBuf>, output: &Output) -> Result<()> {
    let path = path.unwrap_or_else(|| store.config().default_export_path());

    if output.should_prompt()
        && !confirm("Importing replaces all current data. Continue?")?
    {
        println!("Cancelled.");
        return Ok(());
    }

    let imported = store.import_csv(&path)?;

    output.success(&format!(
        "Imported {} item(s) from {}",
        imported,
        path.display()
    ));
    Ok(())
}

/// Delete all items and empty both lists
pub fn reset(store: &mut Store, output: &Output) -> Result<()> {
    if output.should_prompt() && !confirm("Delete all items and list entries?")? {
        println!("Cancelled.");
        return Ok(());
    }

    store.reset();

    output.success("Dataset reset");
    Ok(())
}
