//! CSV exchange format
//!
//! The one textual format shared with other installations: one line per
//! item, in id order, with the fields
//!
//! ```text
//! id,name,unit,critical_value,default_value,inventory_amount,shopping_amount
//! ```
//!
//! Amount fields are `-1` (or empty) when the item is not in that list.
//! The unit field uses the fixed wire tokens of [`Unit::token`].
//!
//! Import replaces the whole dataset: registry and lists are cleared
//! first, records with the wrong field count or an unparseable numeric
//! field are skipped (the rest of the file still imports), and the
//! stored ids are ignored since ids are re-derived by the final sort.
//! Amounts are added through the list store, so the shopping-sync rule
//! runs during import exactly as it does for live mutations.

use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::lists::ListStore;
use crate::models::{Unit, INVENTORY_LIST_ID, SHOPPING_LIST_ID};
use crate::registry::ItemRegistry;

const FIELD_COUNT: usize = 7;

/// One successfully parsed line.
struct Record {
    name: String,
    unit: Unit,
    critical_value: i64,
    default_value: i64,
    inventory: Option<i64>,
    shopping: Option<i64>,
}

/// Write the full dataset in the exchange format.
pub fn write_csv<W: Write>(
    writer: &mut W,
    registry: &ItemRegistry,
    lists: &ListStore,
) -> io::Result<()> {
    for (id, item) in registry.all() {
        let inventory = lists.amount(INVENTORY_LIST_ID, *id).unwrap_or(-1);
        let shopping = lists.amount(SHOPPING_LIST_ID, *id).unwrap_or(-1);
        writeln!(
            writer,
            "{},{},{},{},{},{},{}",
            id,
            item.name,
            item.unit.token(),
            item.critical_value,
            item.default_value,
            inventory,
            shopping
        )?;
    }
    Ok(())
}

/// Replace the dataset with the records read from `reader`.
///
/// Returns the number of records imported. Malformed records are
/// skipped with a warning; an I/O error aborts the import.
pub fn read_csv<R: BufRead>(
    reader: R,
    registry: &mut ItemRegistry,
    lists: &mut ListStore,
) -> io::Result<usize> {
    registry.clear();
    lists.clear();

    let mut imported = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        match parse_record(line) {
            Some(record) => {
                apply_record(record, registry, lists);
                imported += 1;
            }
            None => warn!(line = index + 1, "skipping malformed record"),
        }
    }

    // Ids were handed out in file order; normalize to name order and
    // carry the list contents along.
    let mapping = registry.sort_by_name();
    lists.remap_item_ids(&mapping);

    Ok(imported)
}

fn parse_record(line: &str) -> Option<Record> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != FIELD_COUNT {
        return None;
    }

    // fields[0] holds the exporter's id; it is not meaningful here
    Some(Record {
        name: fields[1].to_string(),
        unit: Unit::from_token(fields[2]),
        critical_value: fields[3].parse().ok()?,
        default_value: fields[4].parse().ok()?,
        inventory: parse_amount(fields[5])?,
        shopping: parse_amount(fields[6])?,
    })
}

/// Parse an amount field. Outer `None` marks a malformed field, inner
/// `None` an item that is absent from the list.
fn parse_amount(field: &str) -> Option<Option<i64>> {
    if field.is_empty() || field == "-1" {
        return Some(None);
    }
    field.parse().map(Some).ok()
}

fn apply_record(record: Record, registry: &mut ItemRegistry, lists: &mut ListStore) {
    // Probe before creating so duplicate lines collapse into one item
    let item_id = match registry.find_existing(&record.name, record.unit) {
        Some(id) => id,
        None => registry.create(record.name, record.unit),
    };
    registry.set_critical_value(item_id, record.critical_value);
    registry.set_default_value(item_id, record.default_value);

    let Some(item) = registry.get(item_id) else {
        return;
    };
    if let Some(amount) = record.inventory {
        lists.add(INVENTORY_LIST_ID, item, amount);
    }
    if let Some(amount) = record.shopping {
        lists.add(SHOPPING_LIST_ID, item, amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    fn export_string(registry: &ItemRegistry, lists: &ListStore) -> String {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, registry, lists).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn import_string(data: &str) -> (ItemRegistry, ListStore, usize) {
        let mut registry = ItemRegistry::new();
        let mut lists = ListStore::new();
        let imported =
            read_csv(BufReader::new(data.as_bytes()), &mut registry, &mut lists).unwrap();
        (registry, lists, imported)
    }

    #[test]
    fn test_export_format() {
        let mut registry = ItemRegistry::new();
        let milk = registry.create("Milk", Unit::Milliliter);
        registry.set_critical_value(milk, 500);

        let mut lists = ListStore::new();
        lists.add(
            INVENTORY_LIST_ID,
            &registry.get(milk).unwrap().clone(),
            1500,
        );

        let out = export_string(&registry, &lists);
        assert_eq!(out, "0,Milk,MILILITER,500,1000,1500,-1\n");
    }

    #[test]
    fn test_export_absent_amounts_are_minus_one() {
        let mut registry = ItemRegistry::new();
        registry.create("Soap", Unit::Piece);
        let lists = ListStore::new();

        let out = export_string(&registry, &lists);
        assert!(out.ends_with(",-1,-1\n"));
    }

    #[test]
    fn test_import_basic() {
        let (registry, lists, imported) =
            import_string("0,Milk,MILILITER,500,1000,1500,-1\n1,Eggs,PIECE,2,10,-1,6\n");

        assert_eq!(imported, 2);
        assert_eq!(registry.len(), 2);

        let eggs = registry.find_existing("Eggs", Unit::Piece).unwrap();
        let milk = registry.find_existing("Milk", Unit::Milliliter).unwrap();
        // Sorted: Eggs before Milk
        assert_eq!(eggs, 0);
        assert_eq!(milk, 1);

        assert_eq!(lists.amount(INVENTORY_LIST_ID, milk), Some(1500));
        assert_eq!(lists.amount(INVENTORY_LIST_ID, eggs), None);
        assert_eq!(lists.amount(SHOPPING_LIST_ID, eggs), Some(6));

        let milk_item = registry.get(milk).unwrap();
        assert_eq!(milk_item.critical_value, 500);
        assert_eq!(milk_item.default_value, 1000);
    }

    #[test]
    fn test_import_skips_malformed_records() {
        let data = "0,Milk,MILILITER,500,1000,1500,-1\n\
                    not a record\n\
                    1,Eggs,PIECE,two,10,-1,-1\n\
                    2,Bread,PIECE,1,2,3,-1\n";
        let (registry, lists, imported) = import_string(data);

        assert_eq!(imported, 2);
        assert!(registry.find_existing("Milk", Unit::Milliliter).is_some());
        assert!(registry.find_existing("Eggs", Unit::Piece).is_none());

        let bread = registry.find_existing("Bread", Unit::Piece).unwrap();
        assert_eq!(lists.amount(INVENTORY_LIST_ID, bread), Some(3));
    }

    #[test]
    fn test_import_unknown_unit_defaults_to_piece() {
        let (registry, _, imported) = import_string("0,Thing,FURLONG,1,1,-1,-1\n");
        assert_eq!(imported, 1);
        assert!(registry.find_existing("Thing", Unit::Piece).is_some());
    }

    #[test]
    fn test_import_empty_amount_means_absent() {
        let (registry, lists, _) = import_string("0,Milk,MILILITER,500,1000,,\n");
        let milk = registry.find_existing("Milk", Unit::Milliliter).unwrap();
        assert_eq!(lists.amount(INVENTORY_LIST_ID, milk), None);
        assert_eq!(lists.amount(SHOPPING_LIST_ID, milk), None);
    }

    #[test]
    fn test_import_clears_existing_dataset(){
        let mut registry = ItemRegistry::new();
        registry.create("Old", Unit::Piece);
        let mut lists = ListStore::new();
        lists.add(INVENTORY_LIST_ID, &registry.get(0).unwrap().clone(), 5);

        read_csv(
            BufReader::new("0,New,PIECE,1,1,-1,-1\n".as_bytes()),
            &mut registry,
            &mut lists,
        )
        .unwrap();

        assert!(registry.find_existing("Old", Unit::Piece).is_none());
        assert_eq!(registry.len(), 1);
        assert!(lists.get(INVENTORY_LIST_ID).unwrap().is_empty());
    }

    #[test]
    fn test_import_runs_the_sync_rule() {
        // Inventory amount at the critical value, shopping field absent:
        // the rule must still mark the item
        let (registry, lists, _) = import_string("0,Milk,MILILITER,500,1000,500,-1\n");
        let milk = registry.find_existing("Milk", Unit::Milliliter).unwrap();
        assert_eq!(lists.amount(SHOPPING_LIST_ID, milk), Some(0));
    }

    #[test]
    fn test_import_duplicate_lines_collapse() {
        let data = "0,Milk,MILILITER,500,1000,200,-1\n0,Milk,MILILITER,400,900,300,-1\n";
        let (registry, lists, imported) = import_string(data);

        assert_eq!(imported, 2);
        assert_eq!(registry.len(), 1);

        let milk = registry.find_existing("Milk", Unit::Milliliter).unwrap();
        // Last record wins for the item fields, amounts accumulate
        assert_eq!(registry.get(milk).unwrap().critical_value, 400);
        assert_eq!(lists.amount(INVENTORY_LIST_ID, milk), Some(500));
    }

    #[test]
    fn test_import_negative_values_reset_to_unit_defaults() {
        let (registry, _, _) = import_string("0,Milk,MILILITER,-1,-1,-1,-1\n");
        let milk = registry.find_existing("Milk", Unit::Milliliter).unwrap();
        let item = registry.get(milk).unwrap();
        assert_eq!(item.critical_value, 1000);
        assert_eq!(item.default_value, 1000);
    }

    #[test]
    fn test_round_trip() {
        let mut registry = ItemRegistry::new();
        let zucchini = registry.create("Zucchini", Unit::Piece);
        let milk = registry.create("Milk", Unit::Milliliter);
        let flour = registry.create("Flour", Unit::Gram);
        registry.set_critical_value(milk, 500);
        registry.set_default_value(flour, 2000);

        let mut lists = ListStore::new();
        lists.add(INVENTORY_LIST_ID, &registry.get(milk).unwrap().clone(), 1500);
        lists.add(INVENTORY_LIST_ID, &registry.get(flour).unwrap().clone(), 250);
        lists.add(SHOPPING_LIST_ID, &registry.get(zucchini).unwrap().clone(), 4);

        let exported = export_string(&registry, &lists);
        let (registry2, lists2, imported) = import_string(&exported);

        assert_eq!(imported, 3);
        for item in registry.all().values() {
            let id2 = registry2.find_existing(&item.name, item.unit).unwrap();
            let item2 = registry2.get(id2).unwrap();
            assert_eq!(item2.critical_value, item.critical_value);
            assert_eq!(item2.default_value, item.default_value);
            assert_eq!(
                lists2.amount(INVENTORY_LIST_ID, id2),
                lists.amount(INVENTORY_LIST_ID, item.id)
            );
            assert_eq!(
                lists2.amount(SHOPPING_LIST_ID, id2),
                lists.amount(SHOPPING_LIST_ID, item.id)
            );
        }
    }

    #[test]
    fn test_round_trip_reassigns_ids_by_name() {
        let mut registry = ItemRegistry::new();
        registry.create("Zucchini", Unit::Piece);
        registry.create("Apples", Unit::Piece);
        let lists = ListStore::new();

        let exported = export_string(&registry, &lists);
        let (registry2, _, _) = import_string(&exported);

        assert_eq!(registry2.find_existing("Apples", Unit::Piece), Some(0));
        assert_eq!(registry2.find_existing("Zucchini", Unit::Piece), Some(1));
    }
}
