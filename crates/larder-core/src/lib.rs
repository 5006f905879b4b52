//! larder core library
//!
//! This crate provides the core functionality for larder, a household
//! inventory and shopping-list tracker.
//!
//! # Architecture
//!
//! Two linked collections are tracked: the inventory list (stock on
//! hand, id 0) and the shopping list (items to replenish, id 1). Every
//! inventory mutation re-evaluates the shopping-sync rule: once an
//! item's amount drops to its critical value or below, it is marked on
//! the shopping list until the user explicitly takes it off.
//!
//! All state is in-memory and single-threaded; I/O happens only at the
//! lifecycle boundaries (open, save, explicit import/export).
//!
//! # Quick Start
//!
//! ```text
//! let mut store = Store::open()?;
//!
//! // Track an item
//! let milk = store.create_item("Milk", Unit::Milliliter);
//! store.add_to_inventory(milk, 1500);
//!
//! // Using it up marks it for shopping
//! store.consume(milk, 600);
//! assert!(store.lists().get(SHOPPING_LIST_ID).unwrap().contains(milk));
//!
//! store.save()?;
//! ```
//!
//! # Modules
//!
//! - `store`: Unified session interface (main entry point)
//! - `models`: Data structures for items, units, and lists
//! - `registry`: The canonical item set and its id assignment
//! - `lists`: The list store and the shopping-sync rule
//! - `csv`: The CSV exchange format
//! - `storage`: Snapshot persistence
//! - `config`: Application configuration

pub mod config;
pub mod csv;
pub mod lists;
pub mod models;
pub mod registry;
pub mod storage;
pub mod store;

pub use config::Config;
pub use lists::ListStore;
pub use models::{
    Item, ItemId, ItemList, ListId, Unit, INVENTORY_LIST_ID, SHOPPING_LIST_ID, TEMPORARY_LIST_ID,
};
pub use registry::ItemRegistry;
pub use storage::{Snapshot, SnapshotPersistence, StorageError};
pub use store::{AppState, Store};
