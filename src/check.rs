//! One price check: fetch, load, compare, notify, save.

use log::{info, warn};

use crate::error::Result;
use crate::fetch::PriceSource;
use crate::notify::Notifier;
use crate::store::diff::CheckMode;
use crate::store::SnapshotStore;

#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub mode: CheckMode,
    pub notified: bool,
    pub stations: usize,
}

/// Runs a single check.
///
/// A fetch error or a corrupt state file aborts before anything is written
/// or sent. Once both snapshots are in hand the new one is always saved,
/// whether or not the mail went out.
pub fn run(
    source: &dyn PriceSource,
    store: &SnapshotStore,
    notifier: &Notifier,
    always_notify: bool,
) -> Result<CheckReport> {
    let new = source.fetch()?;
    if !new.has_station_list() {
        warn!("scraper output holds no station list, treating it as zero stations");
    }
    for index in new.undecodable_positions() {
        warn!("station at position {index} is not a name/price record, it is left out of the report");
    }

    let old = store.load()?;
    let mode = CheckMode::classify(old.as_ref(), &new);

    match mode {
        CheckMode::FirstRun => info!("first run, storing current prices"),
        CheckMode::Changed => info!("price change detected"),
        CheckMode::Unchanged => info!("no price changes"),
    }

    let notified = if mode == CheckMode::Unchanged && !always_notify {
        info!("always-notify is off, skipping mail");
        false
    } else {
        notifier.notify(old.as_ref(), &new, mode)
    };

    store.save(&new)?;

    Ok(CheckReport {
        mode,
        notified,
        stations: new.len(),
    })
}
