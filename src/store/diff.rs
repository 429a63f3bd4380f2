//! Snapshot comparison engine.
//!
//! Change detection is textual: two snapshots differ iff their compact JSON
//! serializations differ, so reordering stations counts as a change.
//!
//! Per-station price changes come from one of two pairings:
//! - by position (default): old and new matched by list index
//! - by name: old and new matched by station name, with added/removed sets

use std::collections::HashMap;

use serde::Deserialize;

use crate::station::{Price, Snapshot, StationRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckMode {
    FirstRun,
    Changed,
    Unchanged,
}

impl CheckMode {
    /// A stored `null` counts as no prior data.
    pub fn classify(old: Option<&Snapshot>, new: &Snapshot) -> Self {
        match old {
            None => CheckMode::FirstRun,
            Some(old) if old.as_value().is_null() => CheckMode::FirstRun,
            Some(_) if has_changed(old, new) => CheckMode::Changed,
            Some(_) => CheckMode::Unchanged,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckMode::FirstRun => "first-run",
            CheckMode::Changed => "changed",
            CheckMode::Unchanged => "unchanged",
        }
    }
}

/// How stations are paired between the old and new snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MatchBy {
    /// List index. Mis-attributes changes when the scraper reorders,
    /// adds or drops stations.
    #[default]
    Position,
    /// Station name.
    Name,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiffType {
    Changed,
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceChange {
    pub name: String,
    pub old_price: Option<Price>,
    pub new_price: Option<Price>,
    pub diff_type: DiffType,
}

/// An absent old snapshot always counts as changed.
pub fn has_changed(old: Option<&Snapshot>, new: &Snapshot) -> bool {
    match old {
        None => true,
        Some(old) => canonical(old) != canonical(new),
    }
}

fn canonical(snapshot: &Snapshot) -> String {
    snapshot.as_value().to_string()
}

pub fn compare(old: &Snapshot, new: &Snapshot, match_by: MatchBy) -> Vec<PriceChange> {
    match match_by {
        MatchBy::Position => positional_changes(old, new),
        MatchBy::Name => keyed_changes(old, new),
    }
}

/// Walks `new` by index and pairs each station with the same index in `old`.
/// An index yields a change only when the old price is present and differs.
pub fn positional_changes(old: &Snapshot, new: &Snapshot) -> Vec<PriceChange> {
    let mut changes = Vec::new();

    for index in 0..new.len() {
        let Some(station) = new.record_at(index) else { continue };
        let Some(old_price) = old
            .record_at(index)
            .and_then(|r| r.price)
            .filter(Price::is_present)
        else {
            continue;
        };

        if station.price.as_ref() != Some(&old_price) {
            changes.push(PriceChange {
                name: station.name,
                old_price: Some(old_price),
                new_price: station.price,
                diff_type: DiffType::Changed,
            });
        }
    }

    changes
}

/// Pairs stations by name. New-side order first, then removals in old order.
/// With duplicate names the first occurrence wins.
pub fn keyed_changes(old: &Snapshot, new: &Snapshot) -> Vec<PriceChange> {
    let old_records = old.records();
    let new_records = new.records();

    let mut old_map: HashMap<&str, &StationRecord> = HashMap::new();
    for record in &old_records {
        old_map.entry(record.name.as_str()).or_insert(record);
    }

    let mut new_map: HashMap<&str, &StationRecord> = HashMap::new();
    for record in &new_records {
        new_map.entry(record.name.as_str()).or_insert(record);
    }

    let mut changes = Vec::new();

    for record in &new_records {
        if !std::ptr::eq(new_map[record.name.as_str()], record) {
            continue;
        }

        match old_map.get(record.name.as_str()) {
            Some(old_record) if old_record.price != record.price => {
                changes.push(PriceChange {
                    name: record.name.clone(),
                    old_price: old_record.price.clone(),
                    new_price: record.price.clone(),
                    diff_type: DiffType::Changed,
                });
            }
            Some(_) => {}
            None => changes.push(PriceChange {
                name: record.name.clone(),
                old_price: None,
                new_price: record.price.clone(),
                diff_type: DiffType::Added,
            }),
        }
    }

    for record in &old_records {
        if !std::ptr::eq(old_map[record.name.as_str()], record) {
            continue;
        }

        if !new_map.contains_key(record.name.as_str()) {
            changes.push(PriceChange {
                name: record.name.clone(),
                old_price: record.price.clone(),
                new_price: None,
                diff_type: DiffType::Removed,
            });
        }
    }

    changes
}
