//! File-backed, expiring key/value store for normalized responses.
//!
//! One JSON file per key under the cache root. The file's modification time
//! is the staleness signal; a stale entry is treated as absent but only
//! removed by [`FileCacheStore::sweep_expired`] or an overwrite.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::de::DeserializeOwned;
use serde::Serialize;

pub struct FileCacheStore {
    cache_dir: PathBuf,
    timeout: Duration,
}

impl FileCacheStore {
    /// Open (and create if needed) a cache rooted at `cache_dir`; entries
    /// older than `timeout` are considered absent.
    pub fn new(cache_dir: impl Into<PathBuf>, timeout: Duration) -> io::Result<Self> {
        let cache_dir = cache_dir.into();
        fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir, timeout })
    }

    /// Read a non-expired entry. Missing, stale or unreadable entries all
    /// come back as `None`; `get` never deletes anything.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.entry_path(key);
        let modified = fs::metadata(&path).and_then(|meta| meta.modified()).ok()?;

        if self.is_stale(modified) {
            tracing::info!(key, "caché expirada");
            return None;
        }

        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(payload) => {
                tracing::info!(key, "datos obtenidos de caché");
                Some(payload)
            }
            Err(error) => {
                tracing::error!(key, %error, "error al leer caché");
                None
            }
        }
    }

    /// Store a payload, overwriting any previous entry. Failures are logged
    /// and reported as `false`, never raised: callers proceed without cache.
    pub fn set<T: Serialize>(&self, key: &str, payload: &T) -> bool {
        let path = self.entry_path(key);
        // Staged write + rename so a concurrent `get` never observes a
        // partially written entry.
        let staging = self.cache_dir.join(format!("{key}.json.tmp"));

        let outcome = serde_json::to_string_pretty(payload)
            .map_err(io::Error::other)
            .and_then(|json| fs::write(&staging, json))
            .and_then(|()| fs::rename(&staging, &path));

        match outcome {
            Ok(()) => {
                tracing::info!(key, "datos guardados en caché");
                true
            }
            Err(error) => {
                tracing::error!(key, %error, "error al guardar en caché");
                false
            }
        }
    }

    /// Remove one entry. `false` when it did not exist or removal failed.
    pub fn delete(&self, key: &str) -> bool {
        let path = self.entry_path(key);
        if !path.exists() {
            return false;
        }

        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(key, "caché eliminada");
                true
            }
            Err(error) => {
                tracing::error!(key, %error, "error al eliminar caché");
                false
            }
        }
    }

    /// Explicit maintenance sweep: remove every stale `.json` entry and
    /// report how many were deleted.
    pub fn sweep_expired(&self) -> usize {
        let Ok(entries) = fs::read_dir(&self.cache_dir) else {
            return 0;
        };

        let mut removed = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            let Some(modified) = entry.metadata().ok().and_then(|meta| meta.modified().ok())
            else {
                continue;
            };
            if !self.is_stale(modified) {
                continue;
            }

            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(error) => {
                    tracing::error!(path = %path.display(), %error, "error al eliminar caché expirada");
                }
            }
        }

        tracing::info!(removed, "barrido de caché expirada completado");
        removed
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{key}.json"))
    }

    fn is_stale(&self, modified: SystemTime) -> bool {
        // An mtime in the future (clock skew) reads as age zero, i.e. fresh.
        modified
            .elapsed()
            .map(|age| age >= self.timeout)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use serde_json::{json, Value};
    use tempfile::TempDir;

    use super::*;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    fn store_with_timeout(timeout: Duration) -> (FileCacheStore, TempDir) {
        let dir = TempDir::new().expect("temp dir must be created");
        let store =
            FileCacheStore::new(dir.path().join("cache"), timeout).expect("store must open");
        (store, dir)
    }

    #[test]
    fn round_trips_a_payload() {
        let (store, _dir) = store_with_timeout(DAY);
        let payload = json!({ "tipo": "UI", "fecha": "2023-12-31", "valor": 5.8642 });

        assert!(store.set("ui_2023-12-31", &payload));
        let read: Value = store.get("ui_2023-12-31").expect("fresh entry must hit");
        assert_eq!(read, payload);
    }

    #[test]
    fn missing_key_is_absent() {
        let (store, _dir) = store_with_timeout(DAY);
        assert_eq!(store.get::<Value>("ui_2023-12-31"), None);
    }

    #[test]
    fn set_overwrites_previous_entry() {
        let (store, _dir) = store_with_timeout(DAY);

        assert!(store.set("key", &json!({ "valor": 1.0 })));
        assert!(store.set("key", &json!({ "valor": 2.0 })));

        let read: Value = store.get("key").expect("entry must hit");
        assert_eq!(read, json!({ "valor": 2.0 }));
    }

    #[test]
    fn expired_entry_is_absent_but_not_deleted() {
        let (store, _dir) = store_with_timeout(Duration::from_millis(30));

        assert!(store.set("key", &json!({ "valor": 1.0 })));
        thread::sleep(Duration::from_millis(60));

        assert_eq!(store.get::<Value>("key"), None);
        assert!(
            store.delete("key"),
            "the stale file must still exist until swept or deleted"
        );
    }

    #[test]
    fn zero_timeout_expires_immediately() {
        let (store, _dir) = store_with_timeout(Duration::ZERO);

        assert!(store.set("key", &json!({ "valor": 1.0 })));
        assert_eq!(store.get::<Value>("key"), None);
    }

    #[test]
    fn delete_reports_whether_an_entry_existed() {
        let (store, _dir) = store_with_timeout(DAY);

        assert!(store.set("key", &json!(1)));
        assert!(store.delete("key"));
        assert!(!store.delete("key"));
    }

    #[test]
    fn sweep_removes_only_expired_entries() {
        let (store, dir) = store_with_timeout(Duration::from_millis(30));

        assert!(store.set("old_a", &json!(1)));
        assert!(store.set("old_b", &json!(2)));
        thread::sleep(Duration::from_millis(60));

        // A store over the same directory with a long timeout writes one
        // entry that must survive the sweep.
        let long_lived = FileCacheStore::new(dir.path().join("cache"), DAY)
            .expect("store must open");
        assert!(long_lived.set("recent", &json!(3)));

        assert_eq!(store.sweep_expired(), 2);
        assert!(store.get::<Value>("old_a").is_none());
        assert!(long_lived.get::<Value>("recent").is_some());
    }

    #[test]
    fn sweep_ignores_foreign_files() {
        let (store, dir) = store_with_timeout(Duration::ZERO);

        fs::write(dir.path().join("cache").join("notes.txt"), "keep me")
            .expect("file must be written");

        assert_eq!(store.sweep_expired(), 0);
        assert!(dir.path().join("cache").join("notes.txt").exists());
    }

    #[test]
    fn unserializable_read_is_absent() {
        let (store, dir) = store_with_timeout(DAY);

        fs::write(dir.path().join("cache").join("broken.json"), "{not json")
            .expect("file must be written");

        assert_eq!(store.get::<Value>("broken"), None);
    }
}
