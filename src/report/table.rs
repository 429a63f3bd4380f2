//! Terminal table of station prices in stored order.

use crate::station::Snapshot;

const NAME_WIDTH: usize = 40;

pub fn render(snapshot: &Snapshot) -> String {
    let records = snapshot.records();
    if records.is_empty() {
        return String::from("No stations in snapshot.\n");
    }

    let mut output = String::new();

    output.push_str(&format!("{:<width$} {:>10}\n", "Station", "Price", width = NAME_WIDTH));
    output.push_str(&"-".repeat(NAME_WIDTH + 11));
    output.push('\n');

    for record in &records {
        let price = record
            .price
            .as_ref()
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        output.push_str(&format!(
            "{:<width$} {:>10}\n",
            fit(&record.name, NAME_WIDTH),
            price,
            width = NAME_WIDTH
        ));
    }

    output.push_str(&format!("\n{} stations\n", records.len()));
    output
}

/// Cuts `s` to at most `width` characters, ending in an ellipsis when cut.
fn fit(s: &str, width: usize) -> String {
    match s.char_indices().nth(width) {
        None => s.to_string(),
        Some(_) => {
            let keep = width.saturating_sub(1);
            let end = s.char_indices().nth(keep).map_or(s.len(), |(i, _)| i);
            format!("{}…", &s[..end])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::station::StationRecord;

    #[test]
    fn lists_stations_in_order() {
        let snap = Snapshot::from_records(&[StationRecord::new("Tango", "1.89"), StationRecord::new("Esso", "1.95")]);
        let out = render(&snap);
        let tango = out.find("Tango").unwrap();
        let esso = out.find("Esso").unwrap();
        assert!(tango < esso);
        assert!(out.contains("1.89"));
        assert!(out.ends_with("2 stations\n"));
    }

    #[test]
    fn empty_snapshot_message() {
        let snap = Snapshot::from_records(&[]);
        assert_eq!(render(&snap), "No stations in snapshot.\n");
    }

    #[test]
    fn long_names_are_cut_to_width() {
        let long = "x".repeat(60);
        assert_eq!(fit(&long, 10), "xxxxxxxxx…");
        assert_eq!(fit("short", 10), "short");
        assert_eq!(fit("exactly10!", 10), "exactly10!");
        assert_eq!(fit("Tankstation Zuidwolde", 8), "Tanksta…");
    }
}
