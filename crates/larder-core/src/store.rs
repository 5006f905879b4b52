//! Unified session interface
//!
//! The `Store` owns one item registry, one list store and the app state
//! for a running session, and coordinates them with the snapshot
//! persistence layer.
//!
//! ## Lifecycle
//!
//! All I/O happens at the boundaries: `open` loads the snapshot (an
//! absent snapshot means an empty dataset with the two reserved lists),
//! and `save` writes it back. In between, every operation is a plain
//! synchronous in-memory mutation.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open()?;
//!
//! let milk = store.create_item("Milk", Unit::Milliliter);
//! store.add_to_inventory(milk, 1500);
//!
//! store.save()?;
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::csv;
use crate::lists::ListStore;
use crate::models::{ItemId, ListId, Unit, INVENTORY_LIST_ID, SHOPPING_LIST_ID};
use crate::registry::ItemRegistry;
use crate::storage::{Snapshot, SnapshotPersistence};

/// Session state that survives restarts but is not part of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppState {
    /// The list the user last worked with
    pub active_list: ListId,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            active_list: INVENTORY_LIST_ID,
        }
    }
}

/// Unified session interface for larder
///
/// Owns the registry, the lists and the app state; persistence happens
/// only through [`Store::open`] and [`Store::save`].
pub struct Store {
    registry: ItemRegistry,
    lists: ListStore,
    state: AppState,
    persistence: SnapshotPersistence,
    config: Config,
}

impl Store {
    /// Open the store, loading prior state from disk if there is any
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open the store with a specific configuration
    ///
    /// Ids are normalized (sorted by name) right after loading, so a
    /// dataset written by an older installation ends up in canonical
    /// order; the reserved lists are created if the snapshot lacked them.
    pub fn open_with_config(config: Config) -> Result<Self> {
        let persistence = SnapshotPersistence::new(config.clone());

        let snapshot = persistence.load().context("Failed to load data snapshot")?;
        let (items, lists) = match snapshot {
            Some(snapshot) => (snapshot.items, snapshot.lists),
            None => (BTreeMap::new(), BTreeMap::new()),
        };

        let registry = ItemRegistry::from_items(items);
        let lists = ListStore::from_lists(lists);
        let state = AppState {
            active_list: persistence.load_app_state(),
        };

        let mut store = Self {
            registry,
            lists,
            state,
            persistence,
            config,
        };
        store.sort_items();
        Ok(store)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Write the current dataset and app state to disk
    pub fn save(&self) -> Result<()> {
        let snapshot = Snapshot::new(self.registry.all().clone(), self.lists.all().clone());
        self.persistence
            .save(&snapshot)
            .context("Failed to save data snapshot")?;
        self.persistence
            .save_app_state(self.state.active_list)
            .context("Failed to save app state")?;
        Ok(())
    }

    // ==================== Item Operations ====================

    /// Create an item and return its id after the registry re-sort.
    ///
    /// Does not de-duplicate; callers wanting one item per `(name, unit)`
    /// probe [`ItemRegistry::find_existing`] first. The registry is
    /// sorted right away (and every list remapped) so that displayed
    /// views stay alphabetic.
    pub fn create_item(&mut self, name: impl Into<String>, unit: Unit) -> ItemId {
        let id = self.registry.create(name, unit);
        let mapping = self.registry.sort_by_name();
        self.lists.remap_item_ids(&mapping);
        mapping.get(&id).copied().unwrap_or(id)
    }

    /// Sort all items by name, reassigning ids, and rewrite every
    /// registered list to the new ids.
    pub fn sort_items(&mut self) {
        let mapping = self.registry.sort_by_name();
        self.lists.remap_item_ids(&mapping);
    }

    // ==================== List Operations ====================

    /// Add an amount of an item to the inventory list.
    ///
    /// Returns false when the id is unknown.
    pub fn add_to_inventory(&mut self, item_id: ItemId, amount: i64) -> bool {
        let Some(item) = self.registry.get(item_id).cloned() else {
            return false;
        };
        self.lists.add(INVENTORY_LIST_ID, &item, amount);
        true
    }

    /// Consume an amount of an item from the inventory list.
    ///
    /// Returns false when the id is unknown.
    pub fn consume(&mut self, item_id: ItemId, amount: i64) -> bool {
        let Some(item) = self.registry.get(item_id).cloned() else {
            return false;
        };
        self.lists.remove_amount(INVENTORY_LIST_ID, &item, amount);
        true
    }

    /// Put an item on the shopping list without an amount.
    ///
    /// Returns false when the id is unknown.
    pub fn add_to_shopping(&mut self, item_id: ItemId, amount: i64) -> bool {
        let Some(item) = self.registry.get(item_id).cloned() else {
            return false;
        };
        self.lists.add(SHOPPING_LIST_ID, &item, amount);
        true
    }

    /// Take an item off the shopping list.
    ///
    /// Returns false when the id is unknown.
    pub fn remove_from_shopping(&mut self, item_id: ItemId) -> bool {
        if self.registry.get(item_id).is_none() {
            return false;
        }
        self.lists.remove(SHOPPING_LIST_ID, item_id);
        true
    }

    /// Restock an item from the shopping list: add the bought amount
    /// (the item's default value if none is given) to the inventory and
    /// take the item off the shopping list.
    ///
    /// Returns false when the id is unknown.
    pub fn buy(&mut self, item_id: ItemId, amount: Option<i64>) -> bool {
        let Some(item) = self.registry.get(item_id).cloned() else {
            return false;
        };
        let amount = amount.unwrap_or(item.default_value);
        self.lists.add(INVENTORY_LIST_ID, &item, amount);
        self.lists.remove(SHOPPING_LIST_ID, item.id);
        true
    }

    // ==================== Bulk Operations ====================

    /// Reset the whole dataset: clear the registry and the lists
    /// together, leaving the two reserved lists empty.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.lists.clear();
    }

    /// Export the dataset in the CSV exchange format
    pub fn export_csv(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create export file: {:?}", path))?;
        let mut writer = BufWriter::new(file);
        csv::write_csv(&mut writer, &self.registry, &self.lists)
            .with_context(|| format!("Failed to write export file: {:?}", path))?;
        writer
            .flush()
            .with_context(|| format!("Failed to write export file: {:?}", path))?;
        Ok(())
    }

    /// Replace the dataset with the contents of a CSV exchange file.
    ///
    /// Returns the number of records imported; malformed records are
    /// skipped.
    pub fn import_csv(&mut self, path: &Path) -> Result<usize> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open import file: {:?}", path))?;
        let reader = BufReader::new(file);
        csv::read_csv(reader, &mut self.registry, &mut self.lists)
            .with_context(|| format!("Failed to read import file: {:?}", path))
    }

    // ==================== App State ====================

    /// The list the user last worked with
    pub fn active_list(&self) -> ListId {
        self.state.active_list
    }

    pub fn set_active_list(&mut self, list_id: ListId) {
        self.state.active_list = list_id;
    }

    // ==================== Direct Access ====================

    /// The item registry
    pub fn registry(&self) -> &ItemRegistry {
        &self.registry
    }

    /// Mutable access to the item registry
    ///
    /// Callers mutating through this must not cache item ids across a
    /// [`Store::sort_items`] call.
    pub fn registry_mut(&mut self) -> &mut ItemRegistry {
        &mut self.registry
    }

    /// The list store
    pub fn lists(&self) -> &ListStore {
        &self.lists
    }

    /// Mutable access to the list store
    pub fn lists_mut(&mut self) -> &mut ListStore {
        &mut self.lists
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            export_dir: temp_dir.path().to_path_buf(),
        }
    }

    #[test]
    fn test_open_creates_empty_dataset() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        assert!(store.registry().is_empty());
        assert_eq!(store.lists().all().len(), 2);
        assert_eq!(store.active_list(), INVENTORY_LIST_ID);
    }

    #[test]
    fn test_milk_scenario() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        let milk = store.create_item("Milk", Unit::Milliliter);
        let item = store.registry().get(milk).unwrap();
        assert_eq!(item.critical_value, 1000);
        assert_eq!(item.default_value, 1000);

        store.add_to_inventory(milk, 1500);
        assert_eq!(store.lists().amount(INVENTORY_LIST_ID, milk), Some(1500));
        assert!(!store.lists().get(SHOPPING_LIST_ID).unwrap().contains(milk));

        store.consume(milk, 600);
        assert_eq!(store.lists().amount(INVENTORY_LIST_ID, milk), Some(900));
        assert_eq!(store.lists().amount(SHOPPING_LIST_ID, milk), Some(0));
    }

    #[test]
    fn test_create_item_keeps_lists_consistent_across_sorts() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        let zucchini = store.create_item("Zucchini", Unit::Piece);
        store.add_to_inventory(zucchini, 5);

        // Creating an item that sorts before Zucchini shifts its id
        let apples = store.create_item("Apples", Unit::Piece);
        assert_eq!(apples, 0);

        let zucchini = store
            .registry()
            .find_existing("Zucchini", Unit::Piece)
            .unwrap();
        assert_eq!(zucchini, 1);
        assert_eq!(store.lists().amount(INVENTORY_LIST_ID, zucchini), Some(5));
        assert_eq!(store.lists().get(INVENTORY_LIST_ID).unwrap().len(), 1);
    }

    #[test]
    fn test_operations_on_unknown_items_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        assert!(!store.add_to_inventory(7, 100));
        assert!(!store.consume(7, 100));
        assert!(!store.add_to_shopping(7, 0));
        assert!(!store.remove_from_shopping(7));
        assert!(!store.buy(7, None));
    }

    #[test]
    fn test_buy_uses_default_value() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        let milk = store.create_item("Milk", Unit::Milliliter);
        store.add_to_inventory(milk, 500);
        assert_eq!(store.lists().amount(SHOPPING_LIST_ID, milk), Some(0));

        store.buy(milk, None);
        assert_eq!(store.lists().amount(INVENTORY_LIST_ID, milk), Some(1500));
        assert!(!store.lists().get(SHOPPING_LIST_ID).unwrap().contains(milk));
    }

    #[test]
    fn test_buy_with_small_amount_keeps_item_off_shopping() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        let milk = store.create_item("Milk", Unit::Milliliter);
        store.add_to_inventory(milk, 100);

        // Bought far less than the critical value: the add re-marks the
        // item, the buy still clears it afterwards
        store.buy(milk, Some(50));
        assert_eq!(store.lists().amount(INVENTORY_LIST_ID, milk), Some(150));
        assert!(!store.lists().get(SHOPPING_LIST_ID).unwrap().contains(milk));
    }

    #[test]
    fn test_reset_leaves_reserved_lists() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        let milk = store.create_item("Milk", Unit::Milliliter);
        store.add_to_inventory(milk, 500);

        store.reset();

        assert!(store.registry().is_empty());
        assert_eq!(store.lists().all().len(), 2);
        assert!(store.lists().get(INVENTORY_LIST_ID).unwrap().is_empty());
        assert!(store.lists().get(SHOPPING_LIST_ID).unwrap().is_empty());
    }

    #[test]
    fn test_data_persists_across_reopens() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        {
            let mut store = Store::open_with_config(config.clone()).unwrap();
            let milk = store.create_item("Milk", Unit::Milliliter);
            store.add_to_inventory(milk, 800);
            store.set_active_list(SHOPPING_LIST_ID);
            store.save().unwrap();
        }

        {
            let store = Store::open_with_config(config).unwrap();
            let milk = store
                .registry()
                .find_existing("Milk", Unit::Milliliter)
                .unwrap();
            assert_eq!(store.lists().amount(INVENTORY_LIST_ID, milk), Some(800));
            // 800 <= 1000 marked it for shopping before the save
            assert_eq!(store.lists().amount(SHOPPING_LIST_ID, milk), Some(0));
            assert_eq!(store.active_list(), SHOPPING_LIST_ID);
        }
    }

    #[test]
    fn test_export_import_files_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let mut store = Store::open_with_config(config.clone()).unwrap();

        store.create_item("Milk", Unit::Milliliter);
        // Creating Eggs re-sorts the registry, so the Milk id has to be
        // resolved again before use
        let eggs = store.create_item("Eggs", Unit::Piece);
        let milk = store
            .registry()
            .find_existing("Milk", Unit::Milliliter)
            .unwrap();
        store.add_to_inventory(milk, 1500);
        store.add_to_shopping(eggs, 10);

        let path = config.default_export_path();
        store.export_csv(&path).unwrap();

        store.reset();
        assert!(store.registry().is_empty());

        let imported = store.import_csv(&path).unwrap();
        assert_eq!(imported, 2);

        let milk = store
            .registry()
            .find_existing("Milk", Unit::Milliliter)
            .unwrap();
        let eggs = store.registry().find_existing("Eggs", Unit::Piece).unwrap();
        assert_eq!(store.lists().amount(INVENTORY_LIST_ID, milk), Some(1500));
        assert_eq!(store.lists().amount(SHOPPING_LIST_ID, eggs), Some(10));
    }

    #[test]
    fn test_import_missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        let result = store.import_csv(Path::new("/nonexistent/export.csv"));
        assert!(result.is_err());
    }

    #[test]
    fn test_open_normalizes_ids_from_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        // Write a snapshot whose ids are not in name order
        {
            let mut store = Store::open_with_config(config.clone()).unwrap();
            store.create_item("Zucchini", Unit::Piece);
            store.create_item("Milk", Unit::Milliliter);
            store.create_item("Apples", Unit::Piece);
            store.save().unwrap();
        }

        let store = Store::open_with_config(config).unwrap();
        let names: Vec<_> = store
            .registry()
            .all()
            .values()
            .map(|item| item.name.clone())
            .collect();
        assert_eq!(names, vec!["Apples", "Milk", "Zucchini"]);
    }
}
