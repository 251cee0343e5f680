use std::collections::{HashMap, HashSet};

use crate::{DedupKey, GameRecord};

/// Collapses same-day duplicates by [`DedupKey`], keeping the last occurrence.
///
/// Survivors keep the relative order of their last occurrence.
pub fn dedupe_day(records: Vec<GameRecord>) -> Vec<GameRecord> {
    let mut last_index: HashMap<DedupKey, usize> = HashMap::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        last_index.insert(record.key(), idx);
    }
    records
        .into_iter()
        .enumerate()
        .filter(|(idx, record)| last_index.get(&record.key()) == Some(idx))
        .map(|(_, record)| record)
        .collect()
}

/// Drops records whose key is already present in the persisted dataset.
pub fn drop_existing(records: Vec<GameRecord>, existing: &HashSet<DedupKey>) -> Vec<GameRecord> {
    records
        .into_iter()
        .filter(|record| !existing.contains(&record.key()))
        .collect()
}
