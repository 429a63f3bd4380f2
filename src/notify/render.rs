//! HTML report rendering per check mode.
//!
//! - first run: every station with its price
//! - changed: one line per price change, old struck through, new inserted
//! - unchanged: every station under a "no changes" banner

use crate::station::{Price, Snapshot};
use crate::store::diff::{self, CheckMode, DiffType, MatchBy, PriceChange};

pub const SUBJECT_CHANGED: &str = "⚠️ Fuel price changed!";
pub const SUBJECT_UNCHANGED: &str = "✅ No fuel price changes";
pub const SUBJECT_FIRST_RUN: &str = "📌 First fuel price measurement";

#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub subject: String,
    pub html: String,
}

pub fn subject(mode: CheckMode) -> &'static str {
    match mode {
        CheckMode::Changed => SUBJECT_CHANGED,
        CheckMode::Unchanged => SUBJECT_UNCHANGED,
        CheckMode::FirstRun => SUBJECT_FIRST_RUN,
    }
}

pub fn render(
    old: Option<&Snapshot>,
    new: &Snapshot,
    mode: CheckMode,
    match_by: MatchBy,
    checked_at: &str,
) -> Rendered {
    let mut html = String::from("<h2>⛽ Fuel prices checked</h2>");

    match mode {
        CheckMode::FirstRun => {
            html.push_str("<p>First measurement, current prices:</p><ul>");
            push_station_list(&mut html, new);
            html.push_str("</ul>");
        }
        CheckMode::Changed => {
            let empty = Snapshot::from_value(serde_json::Value::Array(Vec::new()));
            let changes = diff::compare(old.unwrap_or(&empty), new, match_by);

            html.push_str("<p>The following stations have new prices:</p><ul>");
            for change in &changes {
                html.push_str(&change_line(change));
            }
            html.push_str("</ul>");

            if changes.is_empty() {
                html.push_str("<p>The station list changed, but no station shows a different price.</p>");
            }
        }
        CheckMode::Unchanged => {
            html.push_str("<p>✅ No price changes today. Current prices:</p><ul>");
            push_station_list(&mut html, new);
            html.push_str("</ul>");
        }
    }

    html.push_str(&format!(
        "<hr><small>Generated automatically by fuelcheck on {}.</small>",
        escape_html(checked_at)
    ));

    Rendered {
        subject: subject(mode).to_string(),
        html,
    }
}

fn push_station_list(html: &mut String, snapshot: &Snapshot) {
    for station in snapshot.records() {
        html.push_str(&format!(
            "<li><strong>{}</strong>: {}</li>",
            escape_html(&station.name),
            price_text(station.price.as_ref())
        ));
    }
}

fn change_line(change: &PriceChange) -> String {
    let name = escape_html(&change.name);
    let old = price_text(change.old_price.as_ref());
    let new = price_text(change.new_price.as_ref());

    match change.diff_type {
        DiffType::Changed => format!("<li><strong>{name}</strong>: <del>{old}</del> → <ins>{new}</ins></li>"),
        DiffType::Added => format!("<li><strong>{name}</strong>: new station, <ins>{new}</ins></li>"),
        DiffType::Removed => format!("<li><strong>{name}</strong>: <del>{old}</del>, no longer listed</li>"),
    }
}

fn price_text(price: Option<&Price>) -> String {
    match price {
        Some(p) => escape_html(&p.to_string()),
        None => "–".to_string(),
    }
}

/// Minimal entity encoding for text placed inside HTML elements.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
