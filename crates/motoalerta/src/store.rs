//! Record store for motoalerta.
//!
//! This module provides the JSON-file-backed store of incident records.
//! The full record set is held in memory, rewritten wholesale on every
//! mutation, and reloaded at startup. A missing file seeds the store with
//! example data; an unreadable file degrades to an empty store.

use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::incident::{normalize_plate, IncidentRecord, Location};

/// In-memory incident store mirrored to a JSON file.
///
/// Mutations (`add`, `update`, `mark_recovered`) persist the whole set.
/// Persistence failures are logged and never surfaced; the store keeps
/// operating in memory.
#[derive(Debug)]
pub struct IncidentStore {
    /// Path to the store file.
    path: PathBuf,
    /// The full record set, in insertion order.
    records: Vec<IncidentRecord>,
}

impl IncidentStore {
    /// Load the store from the given path.
    ///
    /// A missing file populates the store with seed data. A file that
    /// exists but cannot be parsed is logged and treated as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let records = if path.exists() {
            match Self::read_records(&path) {
                Ok(records) => {
                    debug!("Loaded {} records from {}", records.len(), path.display());
                    records
                }
                Err(err) => {
                    warn!(
                        "Failed to read store at {}, starting empty: {}",
                        path.display(),
                        err
                    );
                    Vec::new()
                }
            }
        } else {
            info!("No store found at {}, seeding example data", path.display());
            seed_records()
        };

        let store = Self { path, records };
        if !store.path.exists() {
            store.persist();
        }
        Ok(store)
    }

    /// Create an empty in-memory store for testing.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::from(":memory:"),
            records: Vec::new(),
        }
    }

    fn read_records(path: &Path) -> Result<Vec<IncidentRecord>> {
        let contents = std::fs::read_to_string(path)?;
        let records = serde_json::from_str(&contents)?;
        Ok(records)
    }

    /// Get the path to the store file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize the full record set back to disk.
    ///
    /// Write failures are logged, never returned; the in-memory set stays
    /// authoritative for the rest of the session.
    fn persist(&self) {
        if self.path.to_string_lossy() == ":memory:" {
            return;
        }
        let result = serde_json::to_string_pretty(&self.records)
            .map_err(Error::from)
            .and_then(|json| std::fs::write(&self.path, json).map_err(Error::from));
        if let Err(err) = result {
            warn!("Failed to persist store to {}: {}", self.path.display(), err);
        }
    }

    /// Add a new record.
    ///
    /// # Errors
    ///
    /// Returns an error if a record with the same case-insensitive plate
    /// already exists; the store is left unchanged.
    pub fn add(&mut self, record: IncidentRecord) -> Result<()> {
        if self.find(&record.plate).is_some() {
            return Err(Error::duplicate_plate(record.plate));
        }
        debug!("Adding report for plate {}", record.plate);
        self.records.push(record);
        self.persist();
        Ok(())
    }

    /// Replace the record with a matching id.
    ///
    /// No-op when no record has the given id.
    pub fn update(&mut self, record: IncidentRecord) {
        if let Some(existing) = self.records.iter_mut().find(|r| r.id == record.id) {
            *existing = record;
            self.persist();
        }
    }

    /// Look up a record by plate, case-insensitively.
    #[must_use]
    pub fn find(&self, plate: &str) -> Option<&IncidentRecord> {
        self.records.iter().find(|r| r.matches_plate(plate))
    }

    /// Mark the record for the given plate as recovered at the given location.
    ///
    /// Returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns an error if no record matches the plate or the record is
    /// already recovered; the store is left unchanged on failure.
    pub fn mark_recovered(&mut self, plate: &str, location: Location) -> Result<IncidentRecord> {
        let normalized = normalize_plate(plate);
        let record = self
            .records
            .iter_mut()
            .find(|r| r.plate == normalized)
            .ok_or_else(|| Error::record_not_found(normalized.clone()))?;

        record.recover(location, Utc::now())?;
        let updated = record.clone();
        info!("Plate {} marked as recovered", updated.plate);
        self.persist();
        Ok(updated)
    }

    /// All records, in insertion order.
    #[must_use]
    pub fn records(&self) -> &[IncidentRecord] {
        &self.records
    }

    /// Records still reported stolen.
    #[must_use]
    pub fn stolen(&self) -> Vec<&IncidentRecord> {
        self.records.iter().filter(|r| r.is_stolen()).collect()
    }

    /// Number of records in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Fixed example records for a first run: two stolen, one recovered,
/// placed around Bogotá.
fn seed_records() -> Vec<IncidentRecord> {
    let now = Utc::now();

    let bke543 = IncidentRecord::with_theft_date(
        "BKE543",
        Location::new(4.60971, -74.08175),
        now - Duration::days(2),
    );
    let xyz789 = IncidentRecord::with_theft_date(
        "XYZ789",
        Location::new(4.624_335, -74.063_644),
        now - Duration::days(5),
    );
    let jkl123 = IncidentRecord::with_theft_date("JKL123", Location::new(4.639_386, -74.082_413), now);

    let (Ok(bke543), Ok(mut xyz), Ok(jkl123)) = (bke543, xyz789, jkl123) else {
        return Vec::new();
    };
    let _ = xyz.recover(Location::new(4.59813, -74.07626), now - Duration::days(1));
    vec![bke543, xyz, jkl123]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incident::IncidentStatus;

    fn test_record(plate: &str) -> IncidentRecord {
        IncidentRecord::new(plate, Location::new(4.6, -74.08)).unwrap()
    }

    fn temp_store_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "motoalerta_{}_{}.json",
            tag,
            std::process::id()
        ))
    }

    #[test]
    fn test_add_and_find() {
        let mut store = IncidentStore::in_memory();
        store.add(test_record("ABC123")).unwrap();

        let found = store.find("ABC123").unwrap();
        assert_eq!(found.plate, "ABC123");
        assert!(found.is_stolen());
    }

    #[test]
    fn test_add_rejects_duplicate_plate_case_insensitive() {
        let mut store = IncidentStore::in_memory();
        store.add(test_record("abc123")).unwrap();

        let result = store.add(test_record("ABC123"));
        assert!(matches!(result, Err(Error::DuplicatePlate { .. })));

        // Store unchanged: one record, normalized id
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].id, "ABC123");
    }

    #[test]
    fn test_find_case_insensitive() {
        let mut store = IncidentStore::in_memory();
        store.add(test_record("BKE543")).unwrap();

        assert!(store.find("bke543").is_some());
        assert!(store.find("BKE543").is_some());
        assert!(store.find("nope").is_none());
    }

    #[test]
    fn test_update_replaces_by_id() {
        let mut store = IncidentStore::in_memory();
        store.add(test_record("ABC123")).unwrap();

        let mut updated = store.find("ABC123").unwrap().clone();
        updated
            .recover(Location::new(4.59, -74.07), Utc::now())
            .unwrap();
        store.update(updated);

        assert!(!store.find("ABC123").unwrap().is_stolen());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut store = IncidentStore::in_memory();
        store.add(test_record("ABC123")).unwrap();

        store.update(test_record("ZZZ999"));
        assert_eq!(store.len(), 1);
        assert!(store.find("ZZZ999").is_none());
    }

    #[test]
    fn test_mark_recovered() {
        let mut store = IncidentStore::in_memory();
        store.add(test_record("ABC123")).unwrap();

        let recovered_at = Location::new(4.59, -74.07);
        let updated = store.mark_recovered("abc123", recovered_at).unwrap();

        assert!(!updated.is_stolen());
        match updated.status {
            IncidentStatus::Recovered {
                recovery_location, ..
            } => assert_eq!(recovery_location, recovered_at),
            IncidentStatus::Stolen => panic!("record should be recovered"),
        }
        // The stored record reflects the transition immediately
        assert!(!store.find("ABC123").unwrap().is_stolen());
    }

    #[test]
    fn test_mark_recovered_unknown_plate() {
        let mut store = IncidentStore::in_memory();
        let result = store.mark_recovered("GONE42", Location::new(4.6, -74.08));
        assert!(matches!(result, Err(Error::RecordNotFound { .. })));
    }

    #[test]
    fn test_mark_recovered_twice_fails() {
        let mut store = IncidentStore::in_memory();
        store.add(test_record("ABC123")).unwrap();
        store
            .mark_recovered("ABC123", Location::new(4.59, -74.07))
            .unwrap();

        let result = store.mark_recovered("ABC123", Location::new(4.58, -74.06));
        assert!(matches!(result, Err(Error::AlreadyRecovered { .. })));
    }

    #[test]
    fn test_stolen_filter() {
        let mut store = IncidentStore::in_memory();
        store.add(test_record("AAA111")).unwrap();
        store.add(test_record("BBB222")).unwrap();
        store
            .mark_recovered("AAA111", Location::new(4.59, -74.07))
            .unwrap();

        let stolen = store.stolen();
        assert_eq!(stolen.len(), 1);
        assert_eq!(stolen[0].plate, "BBB222");
    }

    #[test]
    fn test_seed_records() {
        let seeds = seed_records();
        assert_eq!(seeds.len(), 3);

        let plates: Vec<&str> = seeds.iter().map(|r| r.plate.as_str()).collect();
        assert_eq!(plates, vec!["BKE543", "XYZ789", "JKL123"]);

        let stolen = seeds.iter().filter(|r| r.is_stolen()).count();
        assert_eq!(stolen, 2);
        assert!(!seeds[1].is_stolen());
    }

    #[test]
    fn test_load_missing_file_seeds_store() {
        let path = temp_store_path("seed");
        let _ = std::fs::remove_file(&path);

        let store = IncidentStore::load(&path).unwrap();
        assert_eq!(store.len(), 3);
        assert!(store.find("BKE543").is_some());
        assert!(store.find("XYZ789").is_some());
        assert!(store.find("JKL123").is_some());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_persist_and_reload_round_trip() {
        let path = temp_store_path("roundtrip");
        let _ = std::fs::remove_file(&path);

        let mut store = IncidentStore::load(&path).unwrap();
        store.add(test_record("NEW987")).unwrap();
        store
            .mark_recovered("NEW987", Location::new(4.61, -74.09))
            .unwrap();
        let before: Vec<IncidentRecord> = store.records().to_vec();
        drop(store);

        let reloaded = IncidentStore::load(&path).unwrap();
        assert_eq!(reloaded.records(), before.as_slice());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_corrupt_file_yields_empty_store() {
        let path = temp_store_path("corrupt");
        std::fs::write(&path, "this is not json").unwrap();

        let store = IncidentStore::load(&path).unwrap();
        assert!(store.is_empty());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_creates_parent_dirs() {
        let dir = std::env::temp_dir().join(format!("motoalerta_nested_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("deep/incidents.json");

        let store = IncidentStore::load(&path).unwrap();
        assert_eq!(store.path(), path.as_path());
        assert!(path.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_in_memory_store_is_empty() {
        let store = IncidentStore::in_memory();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert_eq!(store.path().to_string_lossy(), ":memory:");
    }

    #[test]
    fn test_add_failure_leaves_store_unchanged() {
        let mut store = IncidentStore::in_memory();
        store.add(test_record("ABC123")).unwrap();
        let before: Vec<IncidentRecord> = store.records().to_vec();

        let _ = store.add(test_record("abc123"));
        assert_eq!(store.records(), before.as_slice());
    }
}
