//! Column normalization: fold a board's columns into the four standard ones.
//!
//! Each standard column claims at most one existing column, in two passes:
//! first an exact case-insensitive name match, then a fuzzy match where the
//! lowercased names contain one another or the column name has one of the
//! standard column's aliases as a whole word. Within a pass the first
//! unclaimed column in board order wins.
//! Claimed columns keep their ID and tasks. Tasks from unclaimed columns are
//! appended to TO DO, so no task is ever dropped.

use crate::model::board::{Column, StandardColumn};

/// Whether a legacy column name plausibly means the given standard column.
pub fn fuzzy_matches(column_name: &str, kind: StandardColumn) -> bool {
    let name = column_name.trim().to_lowercase();
    if name.is_empty() {
        return false;
    }
    let standard = kind.name().to_lowercase();
    if name.contains(&standard) || standard.contains(&name) {
        return true;
    }
    name.split(|c: char| !c.is_alphanumeric())
        .any(|word| kind.aliases().contains(&word))
}

/// Build the four standard columns, all empty, with fresh IDs.
pub fn standard_columns() -> Vec<Column> {
    StandardColumn::ALL
        .iter()
        .map(|kind| Column::new(kind.name()))
        .collect()
}

/// Reconcile existing columns into the standard four.
///
/// The returned columns are in standard order, every task's status equals its
/// column's name, and the multiset of task IDs is unchanged.
pub fn normalize_columns(existing: Vec<Column>) -> Vec<Column> {
    let mut slots: Vec<Option<Column>> = existing.into_iter().map(Some).collect();
    let mut claimed: [Option<usize>; 4] = [None; 4];

    // exact names first so a real "DONE" column is never lost to "Not done"
    for (k, kind) in StandardColumn::ALL.iter().enumerate() {
        let found = slots.iter().enumerate().position(|(i, slot)| {
            !claimed.contains(&Some(i))
                && slot
                    .as_ref()
                    .is_some_and(|c| c.name.trim().eq_ignore_ascii_case(kind.name()))
        });
        claimed[k] = found;
    }
    for (k, kind) in StandardColumn::ALL.iter().enumerate() {
        if claimed[k].is_some() {
            continue;
        }
        let found = slots.iter().enumerate().position(|(i, slot)| {
            !claimed.contains(&Some(i))
                && slot.as_ref().is_some_and(|c| fuzzy_matches(&c.name, *kind))
        });
        claimed[k] = found;
    }

    let mut columns: Vec<Column> = StandardColumn::ALL
        .iter()
        .zip(claimed)
        .map(|(kind, idx)| match idx.and_then(|i| slots[i].take()) {
            Some(mut col) => {
                col.name = kind.name().to_string();
                col
            }
            None => Column::new(kind.name()),
        })
        .collect();

    let orphans: Vec<_> = slots.into_iter().flatten().flat_map(|c| c.tasks).collect();
    if !orphans.is_empty() {
        tracing::debug!(count = orphans.len(), "moving tasks from unmatched columns to TO DO");
    }
    columns[0].tasks.extend(orphans);

    for col in &mut columns {
        for task in &mut col.tasks {
            task.status = col.name.clone();
        }
    }
    columns
}
