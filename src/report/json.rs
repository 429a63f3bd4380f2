//! Raw snapshot JSON, formatted the way it is stored.

use crate::station::Snapshot;

pub fn render(snapshot: &Snapshot) -> String {
    serde_json::to_string_pretty(snapshot.as_value()).unwrap_or_else(|_| snapshot.as_value().to_string())
}
