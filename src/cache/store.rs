//! Cache Store Module
//!
//! SQLite-backed response cache with one table per data kind.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use serde_json::Value;
use tracing::debug;

use crate::cache::{current_timestamp, is_fresh, DataKind, RecentEntry};
use crate::error::{Result, WeatherError};

/// How long a connection waits on a locked database before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// == Cache Store ==
/// Durable cache of provider payloads keyed by (kind, city).
///
/// The store holds no open connection. Every operation connects, runs its
/// statements and drops the connection, so clones can be used from any thread.
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Location of the SQLite database file
    db_path: PathBuf,
}

impl CacheStore {
    // == Constructor ==
    /// Opens the store at `db_path`, creating the parent directory and schema
    /// when missing.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                WeatherError::Internal(format!(
                    "cannot create cache directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let store = Self { db_path };
        store.ensure_initialized()?;
        Ok(store)
    }

    /// Path of the backing database file.
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }

    // == Schema ==
    /// Creates both cache tables if they do not exist yet. Safe to call repeatedly.
    pub fn ensure_initialized(&self) -> Result<()> {
        let conn = self.connect()?;
        for kind in DataKind::ALL {
            conn.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {} (
                    city TEXT PRIMARY KEY,
                    data TEXT,
                    timestamp INTEGER
                );",
                kind.table()
            ))?;
        }
        Ok(())
    }

    // == Get ==
    /// Returns the cached payload for `city` if one exists and is still valid.
    ///
    /// Lookup is case-insensitive. Expired and absent entries both yield `None`.
    pub fn get(&self, kind: DataKind, city: &str) -> Result<Option<Value>> {
        self.get_at(kind, city, current_timestamp())
    }

    /// Same as [`CacheStore::get`], judging validity against `now` (Unix seconds).
    pub fn get_at(&self, kind: DataKind, city: &str, now: i64) -> Result<Option<Value>> {
        let conn = self.connect()?;
        let row: Option<(String, i64)> = conn
            .query_row(
                &format!(
                    "SELECT data, timestamp FROM {} WHERE LOWER(city) = ?1
                     ORDER BY timestamp DESC LIMIT 1",
                    kind.table()
                ),
                params![city.to_lowercase()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            Some((data, written_at)) if is_fresh(written_at, now) => {
                Ok(Some(serde_json::from_str(&data)?))
            }
            Some((_, written_at)) => {
                debug!(%kind, city, written_at, "cache entry expired");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    // == Put ==
    /// Stores `payload` for `city`, replacing any previous entry for that city.
    ///
    /// The key is stored lowercased and stamped with the current time. Rows left
    /// behind under another casing of the same city are removed in the same
    /// transaction.
    pub fn put(&self, kind: DataKind, city: &str, payload: &Value) -> Result<()> {
        let key = city.to_lowercase();
        let data = serde_json::to_string(payload)?;
        let written_at = current_timestamp();

        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            &format!(
                "DELETE FROM {} WHERE LOWER(city) = ?1 AND city <> ?1",
                kind.table()
            ),
            params![key],
        )?;
        tx.execute(
            &format!(
                "INSERT OR REPLACE INTO {} (city, data, timestamp) VALUES (?1, ?2, ?3)",
                kind.table()
            ),
            params![key, data, written_at],
        )?;
        tx.commit()?;

        debug!(%kind, city = %key, written_at, "cache entry written");
        Ok(())
    }

    // == Stats ==
    /// Number of rows (valid or expired) stored for `kind`.
    pub fn count(&self, kind: DataKind) -> Result<u64> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", kind.table()),
            [],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as u64)
    }

    /// Most recent write timestamp for `kind`, or None when the table is empty.
    pub fn latest_timestamp(&self, kind: DataKind) -> Result<Option<i64>> {
        let conn = self.connect()?;
        let latest: Option<i64> = conn.query_row(
            &format!("SELECT MAX(timestamp) FROM {}", kind.table()),
            [],
            |row| row.get(0),
        )?;
        Ok(latest)
    }

    /// Size of the database file as reported by SQLite, in bytes.
    pub fn storage_size_bytes(&self) -> Result<u64> {
        let conn = self.connect()?;
        let size: i64 = conn.query_row(
            "SELECT page_count * page_size FROM pragma_page_count(), pragma_page_size()",
            [],
            |row| row.get(0),
        )?;
        Ok(size.max(0) as u64)
    }

    // == Clear All ==
    /// Deletes every row of both tables.
    ///
    /// Returns `(weather_deleted, forecast_deleted)`.
    pub fn clear_all(&self) -> Result<(u64, u64)> {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let weather = tx.execute(
            &format!("DELETE FROM {}", DataKind::CurrentWeather.table()),
            [],
        )?;
        let forecast = tx.execute(&format!("DELETE FROM {}", DataKind::Forecast.table()), [])?;
        tx.commit()?;

        Ok((weather as u64, forecast as u64))
    }

    // == List Recent ==
    /// The `limit` most recently written entries for `kind`, newest first.
    pub fn list_recent(&self, kind: DataKind, limit: usize) -> Result<Vec<RecentEntry>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT city, timestamp FROM {} ORDER BY timestamp DESC LIMIT ?1",
            kind.table()
        ))?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(RecentEntry {
                city: row.get(0)?,
                written_at: row.get(1)?,
            })
        })?;

        let entries = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CACHE_TTL_SECS;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_store() -> (CacheStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = CacheStore::open(temp_dir.path().join("cache.db")).unwrap();
        (store, temp_dir)
    }

    /// Inserts a row with an explicit timestamp, bypassing `put`.
    fn insert_raw(store: &CacheStore, kind: DataKind, city: &str, written_at: i64) {
        let conn = store.connect().unwrap();
        conn.execute(
            &format!(
                "INSERT OR REPLACE INTO {} (city, data, timestamp) VALUES (?1, ?2, ?3)",
                kind.table()
            ),
            params![city, r#"{"legacy":true}"#, written_at],
        )
        .unwrap();
    }

    #[test]
    fn test_open_creates_nested_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app").join("data").join("cache.db");

        let store = CacheStore::open(&path).unwrap();

        assert!(path.exists());
        assert_eq!(store.path(), path.as_path());
        assert_eq!(store.count(DataKind::CurrentWeather).unwrap(), 0);
    }

    #[test]
    fn test_ensure_initialized_is_idempotent() {
        let (store, _dir) = create_test_store();
        store
            .put(DataKind::CurrentWeather, "Paris", &json!({"temp": 18}))
            .unwrap();

        store.ensure_initialized().unwrap();
        store.ensure_initialized().unwrap();

        assert_eq!(store.count(DataKind::CurrentWeather).unwrap(), 1);
        assert_eq!(
            store.get(DataKind::CurrentWeather, "Paris").unwrap(),
            Some(json!({"temp": 18}))
        );
    }

    #[test]
    fn test_get_missing_returns_none() {
        let (store, _dir) = create_test_store();
        assert!(store.get(DataKind::Forecast, "Lima").unwrap().is_none());
    }

    #[test]
    fn test_put_and_get_case_insensitive() {
        let (store, _dir) = create_test_store();
        let payload = json!({"name": "London", "main": {"temp": 11.5}});

        store.put(DataKind::CurrentWeather, "London", &payload).unwrap();

        assert_eq!(
            store.get(DataKind::CurrentWeather, "LONDON").unwrap(),
            Some(payload.clone())
        );
        assert_eq!(
            store.get(DataKind::CurrentWeather, "london").unwrap(),
            Some(payload)
        );
    }

    #[test]
    fn test_put_stores_lowercase_key() {
        let (store, _dir) = create_test_store();
        store
            .put(DataKind::CurrentWeather, "New York", &json!({}))
            .unwrap();

        let recent = store.list_recent(DataKind::CurrentWeather, 10).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].city, "new york");
    }

    #[test]
    fn test_upsert_replaces_across_casings() {
        let (store, _dir) = create_test_store();

        store.put(DataKind::Forecast, "Berlin", &json!({"v": 1})).unwrap();
        store.put(DataKind::Forecast, "BERLIN", &json!({"v": 2})).unwrap();

        assert_eq!(store.count(DataKind::Forecast).unwrap(), 1);
        assert_eq!(
            store.get(DataKind::Forecast, "berlin").unwrap(),
            Some(json!({"v": 2}))
        );
    }

    #[test]
    fn test_put_replaces_legacy_mixed_case_row() {
        let (store, _dir) = create_test_store();
        insert_raw(&store, DataKind::CurrentWeather, "Oslo", current_timestamp());

        store
            .put(DataKind::CurrentWeather, "oslo", &json!({"fresh": true}))
            .unwrap();

        let recent = store.list_recent(DataKind::CurrentWeather, 10).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].city, "oslo");
        assert_eq!(
            store.get(DataKind::CurrentWeather, "Oslo").unwrap(),
            Some(json!({"fresh": true}))
        );
    }

    #[test]
    fn test_freshness_boundary() {
        let (store, _dir) = create_test_store();
        store.put(DataKind::CurrentWeather, "Rome", &json!({"t": 25})).unwrap();
        let written_at = store
            .latest_timestamp(DataKind::CurrentWeather)
            .unwrap()
            .unwrap();

        assert!(store
            .get_at(DataKind::CurrentWeather, "Rome", written_at)
            .unwrap()
            .is_some());
        assert!(store
            .get_at(DataKind::CurrentWeather, "Rome", written_at + CACHE_TTL_SECS - 1)
            .unwrap()
            .is_some());
        assert!(store
            .get_at(DataKind::CurrentWeather, "Rome", written_at + CACHE_TTL_SECS)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_expired_entry_is_kept() {
        let (store, _dir) = create_test_store();
        insert_raw(
            &store,
            DataKind::CurrentWeather,
            "cairo",
            current_timestamp() - CACHE_TTL_SECS - 10,
        );

        assert!(store.get(DataKind::CurrentWeather, "Cairo").unwrap().is_none());
        assert_eq!(store.count(DataKind::CurrentWeather).unwrap(), 1);
    }

    #[test]
    fn test_namespace_isolation() {
        let (store, _dir) = create_test_store();
        store.put(DataKind::CurrentWeather, "Tokyo", &json!({})).unwrap();

        assert_eq!(store.count(DataKind::CurrentWeather).unwrap(), 1);
        assert_eq!(store.count(DataKind::Forecast).unwrap(), 0);
        assert!(store.get(DataKind::Forecast, "Tokyo").unwrap().is_none());
        assert!(store.latest_timestamp(DataKind::Forecast).unwrap().is_none());
    }

    #[test]
    fn test_clear_all_counts() {
        let (store, _dir) = create_test_store();
        for city in ["a", "b", "c"] {
            store.put(DataKind::CurrentWeather, city, &json!({})).unwrap();
        }
        for city in ["d", "e"] {
            store.put(DataKind::Forecast, city, &json!({})).unwrap();
        }

        assert_eq!(store.clear_all().unwrap(), (3, 2));
        assert_eq!(store.count(DataKind::CurrentWeather).unwrap(), 0);
        assert_eq!(store.count(DataKind::Forecast).unwrap(), 0);
        assert_eq!(store.clear_all().unwrap(), (0, 0));
    }

    #[test]
    fn test_list_recent_orders_newest_first() {
        let (store, _dir) = create_test_store();
        insert_raw(&store, DataKind::CurrentWeather, "old", 100);
        insert_raw(&store, DataKind::CurrentWeather, "newest", 300);
        insert_raw(&store, DataKind::CurrentWeather, "middle", 200);

        let recent = store.list_recent(DataKind::CurrentWeather, 2).unwrap();
        let cities: Vec<&str> = recent.iter().map(|e| e.city.as_str()).collect();

        assert_eq!(cities, vec!["newest", "middle"]);
        assert_eq!(
            store.latest_timestamp(DataKind::CurrentWeather).unwrap(),
            Some(300)
        );
    }

    #[test]
    fn test_storage_size_is_reported() {
        let (store, _dir) = create_test_store();
        assert!(store.storage_size_bytes().unwrap() > 0);
    }

    #[test]
    fn test_corrupt_payload_is_an_error() {
        let (store, _dir) = create_test_store();
        let conn = store.connect().unwrap();
        conn.execute(
            "INSERT INTO weather_cache (city, data, timestamp) VALUES ('bad', 'not json', ?1)",
            params![current_timestamp()],
        )
        .unwrap();

        let result = store.get(DataKind::CurrentWeather, "bad");
        assert!(matches!(result, Err(WeatherError::Serialization(_))));
    }
}
