//! Reconciliation of a persisted table with the in-memory one

use std::collections::{HashMap, HashSet};

use crate::item::RecordId;
use crate::table::Table;
use crate::traits::Record;

/// Merge `new` (usually the in-memory table) into `old` (usually the last persisted snapshot).
///
/// Records are matched by ID. For every ID of either table, the merged table holds the record from `new` if there is one, and the record from `old` otherwise.
/// There is no field-level merge: a record from `new` entirely replaces its `old` counterpart. \
/// Records without an ID are given a random one first. If a table contains the same ID several times, the last one wins.
///
/// Records are ordered as they are first seen when scanning `old`, then `new`.
/// Note that a record that is in `old` but that has been deleted from `new` is kept.
pub fn merge<R: Record>(old: &Table<R>, new: &Table<R>) -> Table<R> {
    let mut old = old.clone();
    old.assign_missing_ids();
    let mut new = new.clone();
    new.assign_missing_ids();

    let mut latest: HashMap<RecordId, R> = HashMap::new();
    let mut order: Vec<RecordId> = Vec::new();
    let mut seen: HashSet<RecordId> = HashSet::new();

    // `new` is scanned last, so that its records shadow the ones from `old`
    for record in old.into_iter().chain(new.into_iter()) {
        let id = record.id().clone();
        if seen.insert(id.clone()) {
            order.push(id.clone());
        }
        latest.insert(id, record);
    }

    let merged: Table<R> = order.into_iter()
        .filter_map(|id| latest.remove(&id))
        .collect();
    log::debug!("Merged {} into {} records", R::SHEET_NAME, merged.len());
    merged
}
