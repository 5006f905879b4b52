//! List store and the shopping-sync rule
//!
//! The `ListStore` owns the registered lists: the inventory list (id 0)
//! and the shopping list (id 1), which both exist from initialization on
//! and are never absent. Every quantity mutation that targets the
//! inventory list re-evaluates the shopping-sync rule: when the resulting
//! amount is at or below the item's critical value, the item is inserted
//! into the shopping list as a presence-only marker (amount 0).
//!
//! The rule runs only here. Temporary lists returned by
//! [`ListStore::filtered_view`] are plain [`ItemList`] values outside the
//! store, so mutating them cannot reach the shopping list.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{
    Item, ItemId, ItemList, ListId, INVENTORY_LIST_ID, SHOPPING_LIST_ID,
};
use crate::registry::ItemRegistry;

/// The registered lists, keyed by list id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListStore {
    lists: BTreeMap<ListId, ItemList>,
}

impl ListStore {
    /// Create a store holding empty inventory and shopping lists.
    pub fn new() -> Self {
        let mut store = Self {
            lists: BTreeMap::new(),
        };
        store.initialize();
        store
    }

    /// Rebuild a store from a loaded snapshot.
    ///
    /// The reserved lists are recreated if the snapshot lacked them.
    pub(crate) fn from_lists(lists: BTreeMap<ListId, ItemList>) -> Self {
        let mut store = Self { lists };
        store.initialize();
        store
    }

    /// Ensure the inventory list (id 0) and shopping list (id 1) exist,
    /// creating them empty in that order if they do not.
    pub fn initialize(&mut self) {
        self.lists
            .entry(INVENTORY_LIST_ID)
            .or_insert_with(|| ItemList::new(INVENTORY_LIST_ID));
        self.lists
            .entry(SHOPPING_LIST_ID)
            .or_insert_with(|| ItemList::new(SHOPPING_LIST_ID));
    }

    /// Look up a list by id.
    pub fn get(&self, id: ListId) -> Option<&ItemList> {
        self.lists.get(&id)
    }

    /// Add an amount of an item to a list, accumulating with any existing
    /// amount. An amount of 0 registers presence only.
    ///
    /// Inventory mutations re-evaluate the shopping-sync rule against the
    /// resulting amount. Unknown list ids are a no-op.
    pub fn add(&mut self, list_id: ListId, item: &Item, amount: i64) {
        let Some(list) = self.lists.get_mut(&list_id) else {
            return;
        };
        let resulting = list.add(item.id, amount);
        if list_id == INVENTORY_LIST_ID {
            self.check_restock(item, resulting);
        }
    }

    /// Remove an item from a list completely.
    ///
    /// Explicit removal is an intentional override of the threshold
    /// logic, so the sync rule does not run. No-op if absent.
    pub fn remove(&mut self, list_id: ListId, item_id: ItemId) {
        if let Some(list) = self.lists.get_mut(&list_id) {
            list.remove(item_id);
        }
    }

    /// Reduce the amount of an item in a list. Driving the amount to 0 or
    /// below removes the item from the list.
    ///
    /// Inventory mutations re-evaluate the shopping-sync rule against the
    /// resulting amount, where a removed item counts as 0. No-op when the
    /// list or the item is absent.
    pub fn remove_amount(&mut self, list_id: ListId, item: &Item, amount: i64) {
        let Some(list) = self.lists.get_mut(&list_id) else {
            return;
        };
        let Some(resulting) = list.remove_amount(item.id, amount) else {
            return;
        };
        if list_id == INVENTORY_LIST_ID {
            self.check_restock(item, resulting);
        }
    }

    /// The stored amount of an item in a list, or `None` when the list or
    /// the item is absent.
    pub fn amount(&self, list_id: ListId, item_id: ItemId) -> Option<i64> {
        self.lists.get(&list_id)?.amount(item_id)
    }

    /// A filtered view of a list.
    ///
    /// An empty filter returns the list as-is (cloned, keeping its id).
    /// Otherwise the result is a temporary list (id -1) holding the
    /// entries whose item name contains `filter` case-insensitively,
    /// amounts preserved. Returns `None` for unknown list ids.
    pub fn filtered_view(
        &self,
        list_id: ListId,
        filter: &str,
        registry: &ItemRegistry,
    ) -> Option<ItemList> {
        let list = self.lists.get(&list_id)?;
        if filter.is_empty() {
            return Some(list.clone());
        }

        let needle = filter.to_lowercase();
        let mut view = ItemList::temporary();
        for (&item_id, &amount) in list.contents() {
            let Some(item) = registry.get(item_id) else {
                continue;
            };
            if item.name.to_lowercase().contains(&needle) {
                view.add(item_id, amount);
            }
        }
        Some(view)
    }

    /// Drop all lists and immediately recreate the empty inventory and
    /// shopping lists; the two reserved lists are never left absent.
    pub fn clear(&mut self) {
        self.lists.clear();
        self.initialize();
    }

    /// Rewrite the item ids in every registered list after a registry
    /// sort reassigned them.
    pub(crate) fn remap_item_ids(&mut self, mapping: &BTreeMap<ItemId, ItemId>) {
        for list in self.lists.values_mut() {
            list.remap_item_ids(mapping);
        }
    }

    /// The full id -> list mapping.
    pub fn all(&self) -> &BTreeMap<ListId, ItemList> {
        &self.lists
    }

    /// The shopping-sync rule.
    ///
    /// Runs after an inventory mutation: at or below the critical value,
    /// the item is inserted into the shopping list with amount 0 unless
    /// it is already there. Presence is never bumped and never removed by
    /// this rule.
    fn check_restock(&mut self, item: &Item, resulting_amount: i64) {
        if resulting_amount > item.critical_value {
            return;
        }
        let Some(shopping) = self.lists.get_mut(&SHOPPING_LIST_ID) else {
            return;
        };
        if shopping.contains(item.id) {
            return;
        }
        shopping.add(item.id, 0);
        debug!(
            item = %item.name,
            amount = resulting_amount,
            critical = item.critical_value,
            "item due for restocking, added to shopping list"
        );
    }
}

impl Default for ListStore {
    fn default() -> Self {
        Self::new()
    }
}
