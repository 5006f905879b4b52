//! Command handlers
//!
//! One module per command family, plus the shared item-name resolution
//! and confirmation helpers.

pub mod config;
pub mod data;
pub mod inventory;
pub mod item;
pub mod shopping;
pub mod status;
pub mod view;

use anyhow::{bail, Result};

use larder_core::{Item, Store, Unit};

/// Resolve an item by name, and unit if given.
///
/// A unique name match is enough; identical names under different units
/// need `--unit` to disambiguate.
pub(crate) fn resolve_item(store: &Store, name: &str, unit: Option<Unit>) -> Result<Item> {
    if let Some(unit) = unit {
        let found = store
            .registry()
            .find_existing(name, unit)
            .and_then(|id| store.registry().get(id).cloned());
        return match found {
            Some(item) => Ok(item),
            None => bail!("No item named '{}' with unit {}", name, unit),
        };
    }

    let matches: Vec<&Item> = store
        .registry()
        .all()
        .values()
        .filter(|item| item.name == name)
        .collect();

    match matches.len() {
        0 => bail!("No item named '{}'", name),
        1 => Ok(matches[0].clone()),
        _ => {
            eprintln!("Multiple items named '{}':", name);
            for item in &matches {
                eprintln!("  {} ({})", item.name, item.unit);
            }
            bail!("Ambiguous item name. Disambiguate with --unit.");
        }
    }
}

/// Ask a yes/no question on the terminal
pub(crate) fn confirm(prompt: &str) -> Result<bool> {
    use std::io::{self, Write};

    print!("{} [y/N]: ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let answer = input.trim().to_lowercase();

    Ok(answer == "y" || answer == "yes")
}
