//! Data models for larder
//!
//! Defines the core data structures: Item, Unit, and ItemList.
//! Two list ids are fixed by contract: 0 is the inventory list and 1 is
//! the shopping list. Temporary lists (id -1) hold filtered query results
//! and are never persisted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

/// Identifier of an item within the registry.
///
/// Ids are dense: after a registry sort they are exactly `0..N-1` in
/// name order, which means they are reassigned by the sort. Anything
/// that holds an id across a sort must re-resolve it (see
/// [`crate::registry::ItemRegistry::sort_by_name`]).
pub type ItemId = u32;

/// Identifier of a list within the list store.
pub type ListId = i32;

/// The inventory list: stock currently on hand.
pub const INVENTORY_LIST_ID: ListId = 0;
/// The shopping list: items due for replenishing.
pub const SHOPPING_LIST_ID: ListId = 1;
/// Id carried by unregistered temporary lists (filtered views).
pub const TEMPORARY_LIST_ID: ListId = -1;

/// Measuring unit of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Mass, in grams
    Gram,
    /// Volume, in milliliters
    Milliliter,
    /// Count, in pieces
    Piece,
}

impl Unit {
    /// Wire token used by the CSV exchange format.
    ///
    /// The tokens are fixed for compatibility with existing export files
    /// (including their historical spellings) and must not change.
    pub fn token(&self) -> &'static str {
        match self {
            Unit::Gram => "GRAMM",
            Unit::Milliliter => "MILILITER",
            Unit::Piece => "PIECE",
        }
    }

    /// Parse a wire token. Unrecognized tokens fall back to [`Unit::Piece`].
    pub fn from_token(token: &str) -> Self {
        match token {
            "GRAMM" => Unit::Gram,
            "MILILITER" => Unit::Milliliter,
            _ => Unit::Piece,
        }
    }

    /// Default critical value for a freshly created item of this unit.
    pub fn default_critical(&self) -> i64 {
        match self {
            Unit::Piece => 1,
            _ => 1000,
        }
    }

    /// Default restock value for a freshly created item of this unit.
    pub fn default_restock(&self) -> i64 {
        match self {
            Unit::Piece => 1,
            _ => 1000,
        }
    }

    /// Short suffix for rendering amounts ("500 g", "3 pc").
    pub fn suffix(&self) -> &'static str {
        match self {
            Unit::Gram => "g",
            Unit::Milliliter => "ml",
            Unit::Piece => "pc",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Unit::Gram => "gram",
            Unit::Milliliter => "milliliter",
            Unit::Piece => "piece",
        };
        write!(f, "{}", name)
    }
}

/// A household item tracked by the registry.
///
/// Identity is `(name, unit)`, case-sensitive; the `id` is a display/join
/// key that the registry reassigns on every sort and never factors into
/// equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Registry id; reassigned on every full resort
    pub id: ItemId,
    /// Human-readable name
    pub name: String,
    /// Measuring unit
    pub unit: Unit,
    /// At or below this inventory amount the item is due for restocking
    pub critical_value: i64,
    /// Suggested restock amount
    pub default_value: i64,
}

impl Item {
    /// Create a new item with unit-based default values.
    ///
    /// Piece items default critical and restock values to 1; gram and
    /// milliliter items to 1000.
    pub fn new(id: ItemId, name: impl Into<String>, unit: Unit) -> Self {
        Self {
            id,
            name: name.into(),
            unit,
            critical_value: unit.default_critical(),
            default_value: unit.default_restock(),
        }
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.unit == other.unit
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.unit.hash(state);
    }
}

/// A collection mapping item ids to amounts.
///
/// `ItemList` is a plain container: its mutators never invoke the
/// shopping-sync rule. The rule lives on [`crate::lists::ListStore`],
/// which is why temporary lists handed out by filtered queries cannot
/// trigger it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemList {
    id: ListId,
    contents: BTreeMap<ItemId, i64>,
}

impl ItemList {
    /// Create an empty list with the given id.
    pub fn new(id: ListId) -> Self {
        Self {
            id,
            contents: BTreeMap::new(),
        }
    }

    /// Create an empty temporary list (id -1, never registered).
    pub fn temporary() -> Self {
        Self::new(TEMPORARY_LIST_ID)
    }

    /// The list id.
    pub fn id(&self) -> ListId {
        self.id
    }

    /// Add an amount for an item, accumulating with any existing amount.
    ///
    /// An amount of 0 registers presence without storing a quantity,
    /// which is how the shopping list marks items that merely need
    /// restocking. Returns the resulting amount.
    pub fn add(&mut self, item_id: ItemId, amount: i64) -> i64 {
        let entry = self.contents.entry(item_id).or_insert(0);
        *entry += amount;
        *entry
    }

    /// Remove an item completely. No-op if absent.
    pub fn remove(&mut self, item_id: ItemId) {
        self.contents.remove(&item_id);
    }

    /// Reduce the amount of an item.
    ///
    /// Driving the amount to 0 or below removes the key entirely.
    /// Returns the resulting amount (0 when removed), or `None` when the
    /// item was not in the list to begin with.
    pub fn remove_amount(&mut self, item_id: ItemId, amount: i64) -> Option<i64> {
        let current = *self.contents.get(&item_id)?;
        let remaining = current - amount;
        if remaining <= 0 {
            self.contents.remove(&item_id);
            Some(0)
        } else {
            self.contents.insert(item_id, remaining);
            Some(remaining)
        }
    }

    /// The stored amount for an item, or `None` if it is not in the list.
    pub fn amount(&self, item_id: ItemId) -> Option<i64> {
        self.contents.get(&item_id).copied()
    }

    /// Whether the item is present in the list.
    pub fn contains(&self, item_id: ItemId) -> bool {
        self.contents.contains_key(&item_id)
    }

    /// The full id -> amount mapping.
    pub fn contents(&self) -> &BTreeMap<ItemId, i64> {
        &self.contents
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Rewrite item ids after a registry sort reassigned them.
    ///
    /// Ids missing from the mapping are kept as-is.
    pub(crate) fn remap_item_ids(&mut self, mapping: &BTreeMap<ItemId, ItemId>) {
        let old = std::mem::take(&mut self.contents);
        for (item_id, amount) in old {
            let new_id = mapping.get(&item_id).copied().unwrap_or(item_id);
            self.contents.insert(new_id, amount);
        }
    }
}
