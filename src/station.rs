use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A price token exactly as the scraper emitted it. Not parsed into a
/// currency; `"1.80"` and `1.80` are different prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Text(String),
    Number(Number),
}

impl Price {
    /// Empty text and zero do not count as an observed price.
    pub fn is_present(&self) -> bool {
        match self {
            Price::Text(s) => !s.is_empty(),
            Price::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Text(s) => f.write_str(s),
            Price::Number(n) => write!(f, "{n}"),
        }
    }
}

/// One station's observed price. The existing scraper emits Dutch keys,
/// so `naam` and `prijs` are accepted too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    #[serde(default, alias = "naam")]
    pub name: String,
    #[serde(default, alias = "prijs")]
    pub price: Option<Price>,
}

impl StationRecord {
    pub fn new(name: &str, price: &str) -> Self {
        StationRecord {
            name: name.to_string(),
            price: Some(Price::Text(price.to_string())),
        }
    }
}

/// All stations observed in one fetch, kept as the raw JSON value so that
/// key order and formatting survive untouched from scraper to state file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(Value);

impl Snapshot {
    pub fn from_value(value: Value) -> Self {
        Snapshot(value)
    }

    pub fn from_records(records: &[StationRecord]) -> Self {
        let items = records
            .iter()
            .map(|r| serde_json::to_value(r).unwrap_or(Value::Null))
            .collect();
        Snapshot(Value::Array(items))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// The station list: the root array, or the `stations` array of a root
    /// object. Any other shape has no stations.
    pub fn stations(&self) -> &[Value] {
        match &self.0 {
            Value::Array(items) => items,
            Value::Object(map) => match map.get("stations") {
                Some(Value::Array(items)) => items,
                _ => &[],
            },
            _ => &[],
        }
    }

    pub fn has_station_list(&self) -> bool {
        match &self.0 {
            Value::Array(_) => true,
            Value::Object(map) => matches!(map.get("stations"), Some(Value::Array(_))),
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.stations().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations().is_empty()
    }

    /// Record at a list position; `None` past the end or when the element
    /// does not decode as a station.
    pub fn record_at(&self, index: usize) -> Option<StationRecord> {
        self.stations()
            .get(index)
            .and_then(|v| StationRecord::deserialize(v).ok())
    }

    /// Positions whose element does not decode as a station, e.g. a price
    /// that is neither text nor a number.
    pub fn undecodable_positions(&self) -> Vec<usize> {
        self.stations()
            .iter()
            .enumerate()
            .filter(|(_, v)| StationRecord::deserialize(*v).is_err())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn records(&self) -> Vec<StationRecord> {
        self.stations()
            .iter()
            .filter_map(|v| StationRecord::deserialize(v).ok())
            .collect()
    }
}
