//! Item registry
//!
//! Owns the canonical set of items and their ids. Ids are dense: a
//! freshly created item gets `id = len()`, and [`ItemRegistry::sort_by_name`]
//! reassigns them to `0..N-1` in name order. Because a sort invalidates
//! every id held elsewhere, it returns the old -> new mapping so the
//! caller can rewrite list contents in the same step.
//!
//! The registry never de-duplicates on its own; callers that want one
//! item per `(name, unit)` pair probe with [`ItemRegistry::find_existing`]
//! before calling [`ItemRegistry::create`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Item, ItemId, Unit};

/// The canonical item set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemRegistry {
    items: BTreeMap<ItemId, Item>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from a loaded snapshot.
    pub(crate) fn from_items(items: BTreeMap<ItemId, Item>) -> Self {
        Self { items }
    }

    /// Find the first item matching `(name, unit)` exactly.
    pub fn find_existing(&self, name: &str, unit: Unit) -> Option<ItemId> {
        self.items
            .values()
            .find(|item| item.unit == unit && item.name == name)
            .map(|item| item.id)
    }

    /// Create a new item with unit-based default values and return its id.
    ///
    /// Does not de-duplicate; probe with [`Self::find_existing`] first.
    pub fn create(&mut self, name: impl Into<String>, unit: Unit) -> ItemId {
        let id = self.next_id();
        self.items.insert(id, Item::new(id, name, unit));
        id
    }

    /// Look up an item by id.
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    /// Set an item's critical value. Returns false if the id is unknown.
    ///
    /// A negative value resets the field to the item's unit-based default.
    pub fn set_critical_value(&mut self, id: ItemId, value: i64) -> bool {
        match self.items.get_mut(&id) {
            Some(item) => {
                item.critical_value = if value < 0 {
                    item.unit.default_critical()
                } else {
                    value
                };
                true
            }
            None => false,
        }
    }

    /// Set an item's default restock value. Returns false if the id is unknown.
    ///
    /// A negative value resets the field to the item's unit-based default.
    pub fn set_default_value(&mut self, id: ItemId, value: i64) -> bool {
        match self.items.get_mut(&id) {
            Some(item) => {
                item.default_value = if value < 0 {
                    item.unit.default_restock()
                } else {
                    value
                };
                true
            }
            None => false,
        }
    }

    /// Sort all items by name and reassign ids to `0..N-1` in that order.
    ///
    /// The comparison is byte-wise and case-sensitive. The sort is stable,
    /// so sorting an already-sorted registry leaves every id unchanged.
    /// Returns the old -> new id mapping; every registered list must be
    /// remapped with it before the old ids are used again.
    pub fn sort_by_name(&mut self) -> BTreeMap<ItemId, ItemId> {
        let mut entries: Vec<(ItemId, Item)> =
            std::mem::take(&mut self.items).into_iter().collect();
        entries.sort_by(|a, b| a.1.name.cmp(&b.1.name));

        let mut mapping = BTreeMap::new();
        for (position, (old_id, mut item)) in entries.into_iter().enumerate() {
            let new_id = position as ItemId;
            mapping.insert(old_id, new_id);
            item.id = new_id;
            self.items.insert(new_id, item);
        }
        mapping
    }

    /// All items whose name contains `text`, case-insensitively.
    ///
    /// An empty filter returns every item.
    pub fn filter(&self, text: &str) -> BTreeMap<ItemId, Item> {
        if text.is_empty() {
            return self.items.clone();
        }
        let needle = text.to_lowercase();
        self.items
            .iter()
            .filter(|(_, item)| item.name.to_lowercase().contains(&needle))
            .map(|(id, item)| (*id, item.clone()))
            .collect()
    }

    /// The full id -> item mapping, in id order.
    pub fn all(&self) -> &BTreeMap<ItemId, Item> {
        &self.items
    }

    /// Empty the registry. Only used during a bulk reset, always paired
    /// with clearing the list store.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn next_id(&self) -> ItemId {
        self.items.len() as ItemId
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_registry() -> ItemRegistry {
        let mut registry = ItemRegistry::new();
        registry.create("Milk", Unit::Milliliter);
        registry.create("Apples", Unit::Piece);
        registry.create("Flour", Unit::Gram);
        registry
    }

    #[test]
    fn test_create_assigns_dense_ids() {
        let mut registry = ItemRegistry::new();
        assert_eq!(registry.create("Milk", Unit::Milliliter), 0);
        assert_eq!(registry.create("Flour", Unit::Gram), 1);
        assert_eq!(registry.create("Eggs", Unit::Piece), 2);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_find_existing() {
        let registry = sample_registry();
        assert_eq!(registry.find_existing("Milk", Unit::Milliliter), Some(0));
        assert_eq!(registry.find_existing("Milk", Unit::Gram), None);
        assert_eq!(registry.find_existing("milk", Unit::Milliliter), None);
        assert_eq!(registry.find_existing("Butter", Unit::Gram), None);
    }

    #[test]
    fn test_get_unknown_id() {
        let registry = sample_registry();
        assert!(registry.get(999).is_none());
    }

    #[test]
    fn test_sort_by_name_reassigns_ids() {
        let mut registry = sample_registry();
        let mapping = registry.sort_by_name();

        // Apples, Flour, Milk
        assert_eq!(registry.get(0).unwrap().name, "Apples");
        assert_eq!(registry.get(1).unwrap().name, "Flour");
        assert_eq!(registry.get(2).unwrap().name, "Milk");

        // items carry their new id
        for (id, item) in registry.all() {
            assert_eq!(*id, item.id);
        }

        // Milk 0 -> 2, Apples 1 -> 0, Flour 2 -> 1
        assert_eq!(mapping.get(&0), Some(&2));
        assert_eq!(mapping.get(&1), Some(&0));
        assert_eq!(mapping.get(&2), Some(&1));
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut registry = sample_registry();
        registry.sort_by_name();
        let before: Vec<_> = registry.all().values().cloned().collect();

        let mapping = registry.sort_by_name();
        let after: Vec<_> = registry.all().values().cloned().collect();

        assert_eq!(before.len(), after.len());
        for (a, b) in before.iter().zip(after.iter()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.name, b.name);
        }
        for (old, new) in mapping {
            assert_eq!(old, new);
        }
    }

    #[test]
    fn test_sort_ids_are_contiguous() {
        let mut registry = sample_registry();
        registry.create("Butter", Unit::Gram);
        registry.sort_by_name();

        let ids: Vec<ItemId> = registry.all().keys().copied().collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_sort_is_case_sensitive() {
        let mut registry = ItemRegistry::new();
        registry.create("apples", Unit::Piece);
        registry.create("Bread", Unit::Piece);
        registry.sort_by_name();

        // Uppercase sorts before lowercase in byte order
        assert_eq!(registry.get(0).unwrap().name, "Bread");
        assert_eq!(registry.get(1).unwrap().name, "apples");
    }

    #[test]
    fn test_filter_case_insensitive() {
        let registry = sample_registry();

        let matches = registry.filter("IL");
        assert_eq!(matches.len(), 1);
        assert!(matches.values().any(|item| item.name == "Milk"));

        let all = registry.filter("");
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_set_values() {
        let mut registry = sample_registry();
        assert!(registry.set_critical_value(0, 250));
        assert!(registry.set_default_value(0, 2000));

        let milk = registry.get(0).unwrap();
        assert_eq!(milk.critical_value, 250);
        assert_eq!(milk.default_value, 2000);

        assert!(!registry.set_critical_value(999, 1));
        assert!(!registry.set_default_value(999, 1));
    }

    #[test]
    fn test_negative_value_resets_to_unit_default() {
        let mut registry = ItemRegistry::new();
        let milk = registry.create("Milk", Unit::Milliliter);
        let eggs = registry.create("Eggs", Unit::Piece);

        registry.set_critical_value(milk, 300);
        registry.set_critical_value(milk, -1);
        assert_eq!(registry.get(milk).unwrap().critical_value, 1000);

        registry.set_default_value(eggs, 12);
        registry.set_default_value(eggs, -5);
        assert_eq!(registry.get(eggs).unwrap().default_value, 1);
    }

    #[test]
    fn test_zero_value_is_stored_verbatim() {
        let mut registry = sample_registry();
        registry.set_critical_value(0, 0);
        assert_eq!(registry.get(0).unwrap().critical_value, 0);
    }

    #[test]
    fn test_clear() {
        let mut registry = sample_registry();
        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.create("Milk", Unit::Milliliter), 0);
    }

    #[test]
    fn test_create_does_not_deduplicate() {
        let mut registry = ItemRegistry::new();
        registry.create("Milk", Unit::Milliliter);
        registry.create("Milk", Unit::Milliliter);
        assert_eq!(registry.len(), 2);
    }
}
