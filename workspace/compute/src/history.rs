//! Bounded, persisted log of past predictions.
//!
//! The log is a JSON array stored under a single key of a [`LogStorage`]
//! backend. It only ever grows by appending; once it holds [`MAX_RECORDS`]
//! entries the oldest ones are evicted. Reads never fail: a missing,
//! unreadable or corrupted store is reported as an empty log. Entries are
//! decoded one by one, so a single malformed entry is skipped on read and
//! kept untouched in storage.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use common::{PredictionRecord, PredictionResponse};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::StorageError;

/// Key the log is stored under. Shared with earlier browser builds.
pub const STORAGE_KEY: &str = "housePricePredictions";

/// Maximum number of records kept.
pub const MAX_RECORDS: usize = 100;

/// Synchronous key-value store holding the serialized log.
///
/// Implementations: [`MemoryStorage`] here, a JSON file for the terminal
/// client and `window.localStorage` in the browser.
pub trait LogStorage {
    /// Returns the stored value, `None` when the key was never written.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the stored value. Must be durable when it returns `Ok`.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: LogStorage + ?Sized> LogStorage for &T {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

/// In-memory storage for tests and sessions that should not persist.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with a raw value, e.g. a corrupted log.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::default();
        storage
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        storage
    }

    /// Storage that rejects every write, like a full or disabled browser store.
    pub fn read_only() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl LogStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Write("storage is read-only".to_string()));
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The prediction history, backed by any [`LogStorage`].
///
/// Single writer at a time is assumed; two clients sharing one store may
/// overwrite each other's appends.
#[derive(Debug)]
pub struct PredictionLog<S> {
    storage: S,
    key: String,
    capacity: usize,
}

impl<S: LogStorage> PredictionLog<S> {
    /// Log with the default key and the [`MAX_RECORDS`] cap.
    pub fn new(storage: S) -> Self {
        Self::with_capacity(storage, MAX_RECORDS)
    }

    pub fn with_capacity(storage: S, capacity: usize) -> Self {
        Self {
            storage,
            key: STORAGE_KEY.to_string(),
            capacity: capacity.max(1),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// All records, oldest first. Empty when the store is absent or corrupted.
    ///
    /// Entries that do not decode as a [`PredictionRecord`] are skipped.
    pub fn load_all(&self) -> Vec<PredictionRecord> {
        let entries = match self.read_entries() {
            Ok(Some(entries)) => entries,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Prediction log unreadable, treating it as empty: {}", e);
                return Vec::new();
            }
        };

        entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                serde_json::from_value::<PredictionRecord>(entry)
                    .map_err(|e| warn!("Skipping malformed prediction log entry #{}: {}", index, e))
                    .ok()
            })
            .collect()
    }

    /// The last `n` records in their original order.
    pub fn load_recent(&self, n: usize) -> Vec<PredictionRecord> {
        let mut records = self.load_all();
        let skip = records.len().saturating_sub(n);
        records.drain(..skip);
        records
    }

    pub fn len(&self) -> usize {
        self.load_all().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stamps the response with the current time and appends it.
    pub fn append(&self, response: PredictionResponse) -> Result<PredictionRecord, StorageError> {
        self.append_at(response, Utc::now())
    }

    /// Appends the response with an explicit timestamp.
    pub fn append_at(
        &self,
        response: PredictionResponse,
        timestamp: DateTime<Utc>,
    ) -> Result<PredictionRecord, StorageError> {
        let record = PredictionRecord::from_response(response, timestamp);
        self.append_record(record.clone())?;
        Ok(record)
    }

    /// Appends a complete record, evicting from the front past the cap.
    pub fn append_record(&self, record: PredictionRecord) -> Result<(), StorageError> {
        trace!("Appending prediction record to log '{}'", self.key);

        // A corrupted log is replaced; a log we could not read is left alone.
        let mut entries = match self.read_entries() {
            Ok(entries) => entries.unwrap_or_default(),
            Err(StorageError::Encode(e)) => {
                warn!("Discarding corrupted prediction log: {}", e);
                VecDeque::new()
            }
            Err(e) => return Err(e),
        };

        let entry = serde_json::to_value(&record).map_err(|e| StorageError::Encode(e.to_string()))?;
        entries.push_back(entry);
        while entries.len() > self.capacity {
            entries.pop_front();
        }

        let encoded =
            serde_json::to_string(&entries).map_err(|e| StorageError::Encode(e.to_string()))?;
        self.storage.write(&self.key, &encoded)?;
        debug!("Prediction log now holds {} entries", entries.len());
        Ok(())
    }

    /// The stored array with each entry left undecoded.
    fn read_entries(&self) -> Result<Option<VecDeque<Value>>, StorageError> {
        let Some(raw) = self.storage.read(&self.key)? else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::Encode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{record_with, response_with, ts};

    #[test]
    fn test_empty_store_loads_empty() {
        let log = PredictionLog::new(MemoryStorage::new());
        assert!(log.load_all().is_empty());
        assert!(log.load_recent(10).is_empty());
        assert!(log.is_empty());
    }

    #[test]
    fn test_append_keeps_insertion_order() {
        let log = PredictionLog::new(MemoryStorage::new());
        for price in [10.0, 20.0, 30.0] {
            log.append(response_with(price, Some(100.0), Some(2))).unwrap();
        }

        let prices: Vec<f64> = log.load_all().iter().map(|r| r.predicted_price).collect();
        assert_eq!(prices, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let log = PredictionLog::new(MemoryStorage::new());
        for price in 1..=101 {
            log.append(response_with(price as f64, Some(100.0), Some(2))).unwrap();
        }

        let records = log.load_all();
        assert_eq!(records.len(), MAX_RECORDS);
        assert_eq!(records.first().unwrap().predicted_price, 2.0);
        assert_eq!(records.last().unwrap().predicted_price, 101.0);

        // Retained entries keep their relative order.
        assert!(records.windows(2).all(|w| w[0].predicted_price < w[1].predicted_price));
    }

    #[test]
    fn test_cap_with_small_capacity() {
        let log = PredictionLog::with_capacity(MemoryStorage::new(), 3);
        for price in 1..=7 {
            log.append_record(record_with(price as f64, None, None)).unwrap();
        }
        let prices: Vec<f64> = log.load_all().iter().map(|r| r.predicted_price).collect();
        assert_eq!(prices, vec![5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_load_recent() {
        let log = PredictionLog::new(MemoryStorage::new());
        for price in 1..=5 {
            log.append_record(record_with(price as f64, None, None)).unwrap();
        }

        let prices: Vec<f64> = log.load_recent(2).iter().map(|r| r.predicted_price).collect();
        assert_eq!(prices, vec![4.0, 5.0]);
        assert_eq!(log.load_recent(50).len(), 5);
        assert!(log.load_recent(0).is_empty());
    }

    #[test]
    fn test_corrupted_store_reads_as_empty() {
        let storage = MemoryStorage::with_entry(STORAGE_KEY, "{not json]");
        let log = PredictionLog::new(storage);
        assert!(log.load_all().is_empty());
        assert!(log.load_recent(3).is_empty());
    }

    #[test]
    fn test_append_replaces_corrupted_store() {
        let storage = MemoryStorage::with_entry(STORAGE_KEY, "garbage");
        let log = PredictionLog::new(storage);
        log.append(response_with(42.0, Some(80.0), Some(1))).unwrap();

        let records = log.load_all();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].predicted_price, 42.0);
    }

    #[test]
    fn test_append_stamps_timestamp() {
        let log = PredictionLog::new(MemoryStorage::new());
        let at = ts(2024, 5, 1);
        let record = log.append_at(response_with(1.0, None, None), at).unwrap();
        assert_eq!(record.timestamp, at);

        let raw = log.storage().raw(STORAGE_KEY).unwrap();
        assert!(raw.contains("\"timestamp\":\"2024-05-01T"));
    }

    #[test]
    fn test_write_failure_is_reported() {
        let log = PredictionLog::new(MemoryStorage::read_only());
        let result = log.append(response_with(1.0, None, None));
        assert!(matches!(result, Err(StorageError::Write(_))));
        assert!(log.load_all().is_empty());
    }

    #[test]
    fn test_reads_records_written_by_browser_client() {
        let raw = r#"[
            {"predicted_price": 2.5e9, "features_used": {"area": 120.0, "bedrooms": 3, "bathrooms": 2, "floors": 1}, "timestamp": "2024-03-01T10:00:00.000Z"},
            {"predicted_price": 1.2e9, "features_used": {"area": 60.0, "bedrooms": 1, "bathrooms": 1, "floors": 1, "location_score": 6.4}, "timestamp": "2024-03-02T10:00:00.000Z"}
        ]"#;
        let log = PredictionLog::new(MemoryStorage::with_entry(STORAGE_KEY, raw));
        let records = log.load_all();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].features_used.location_score, Some(6.4));
    }

    #[test]
    fn test_malformed_entry_does_not_hide_the_rest() {
        let good = |price: u32, day: u32| {
            format!(
                r#"{{"predicted_price": {price}, "features_used": {{"area": 90.0, "bedrooms": 2, "bathrooms": 1, "floors": 1}}, "timestamp": "2024-03-0{day}T10:00:00Z"}}"#
            )
        };
        let odd = r#"{"predicted_price": 7, "features_used": {"area": 50.0, "bedrooms": -1, "bathrooms": 1, "floors": 1}, "timestamp": "2024-03-04T10:00:00Z"}"#;
        let raw = format!(
            "[{}, {}, {}, {}, {}, {}]",
            good(1, 1),
            good(2, 2),
            good(3, 3),
            odd,
            good(5, 5),
            good(6, 6)
        );
        let log = PredictionLog::new(MemoryStorage::with_entry(STORAGE_KEY, &raw));

        let prices: Vec<f64> = log.load_all().iter().map(|r| r.predicted_price).collect();
        assert_eq!(prices, vec![1.0, 2.0, 3.0, 5.0, 6.0]);

        log.append(response_with(8.0, Some(100.0), Some(2))).unwrap();
        let prices: Vec<f64> = log.load_all().iter().map(|r| r.predicted_price).collect();
        assert_eq!(prices, vec![1.0, 2.0, 3.0, 5.0, 6.0, 8.0]);

        // The odd entry is kept as written.
        let stored: Vec<Value> = serde_json::from_str(&log.storage().raw(STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(stored.len(), 7);
        assert_eq!(stored[3]["features_used"]["bedrooms"], -1);
    }

    #[test]
    fn test_non_array_store_is_replaced_on_append() {
        let storage = MemoryStorage::with_entry(STORAGE_KEY, r#"{"predicted_price": 1}"#);
        let log = PredictionLog::new(storage);
        assert!(log.load_all().is_empty());

        log.append(response_with(3.0, None, None)).unwrap();
        assert_eq!(log.load_all().len(), 1);
    }
}
