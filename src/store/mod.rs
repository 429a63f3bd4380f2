//! JSON snapshot storage.
//!
//! Persists exactly one snapshot, the result of the last successful fetch:
//! - missing file means no prior data (first run)
//! - content that is not JSON is an error, never a first run
//! - saves write a sibling temp file and rename it over the target

pub mod diff;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::StoreError;
use crate::station::Snapshot;

pub const STATE_FILE_NAME: &str = "last-result.json";

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SnapshotStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no snapshot at {}", self.path.display());
                return Ok(None);
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let value = serde_json::from_str(&data).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        Ok(Some(Snapshot::from_value(value)))
    }

    pub fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(snapshot.as_value())?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, json).map_err(io_err)?;
        fs::rename(&tmp_path, &self.path).map_err(io_err)?;

        debug!("saved {} stations to {}", snapshot.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::station::StationRecord;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SnapshotStore {
        SnapshotStore::new(dir.path().join(STATE_FILE_NAME))
    }

    #[test]
    fn missing_file_is_absent() {
        let dir = TempDir::new().unwrap();
        assert!(store_in(&dir).load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let snap = Snapshot::from_records(&[
            StationRecord::new("A", "1.80"),
            StationRecord::new("B", "1.75"),
        ]);

        store.save(&snap).unwrap();
        assert_eq!(store.load().unwrap(), Some(snap));
    }

    #[test]
    fn key_order_survives_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let snap = Snapshot::from_value(json!([{ "prijs": "1.80", "naam": "A" }]));

        store.save(&snap).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(
            serde_json::to_string(loaded.as_value()).unwrap(),
            r#"[{"prijs":"1.80","naam":"A"}]"#
        );
    }

    #[test]
    fn saved_file_is_pretty_printed() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&Snapshot::from_records(&[StationRecord::new("A", "1.80")])).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\n  {\n    \"name\": \"A\""));
    }

    #[test]
    fn malformed_file_is_corrupt_not_absent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(store.load(), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn save_creates_parent_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().join("nested/state").join(STATE_FILE_NAME));
        store.save(&Snapshot::from_value(json!([]))).unwrap();

        assert!(store.path().exists());
        let names: Vec<_> = fs::read_dir(store.path().parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&Snapshot::from_records(&[StationRecord::new("A", "1.80")])).unwrap();
        let newer = Snapshot::from_records(&[StationRecord::new("A", "1.85")]);
        store.save(&newer).unwrap();

        assert_eq!(store.load().unwrap(), Some(newer));
    }
}
