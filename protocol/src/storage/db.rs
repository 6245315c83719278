//! # IssuerDb - Persistent Storage Engine
//!
//! Durable storage for the client's named stores, built on sled's embedded
//! key-value store.
//!
//! ## Tree Layout
//!
//! | Tree     | Key                 | Value                      |
//! |----------|---------------------|----------------------------|
//! | `stores` | store name (UTF-8)  | `bincode(record)`          |
//!
//! Each named store (the issuer registry, the settings) is a single record
//! under a fixed key. Records are small and rewritten whole.
//!
//! ## Atomicity
//!
//! [`IssuerDb::update_record`] runs a read-modify-write through sled's
//! compare-and-swap loop. Two updates of the same record from different
//! tasks or threads never lose each other's changes: the loser of a race
//! re-reads the winner's value and re-applies its change.
//!
//! ## Corrupt Data
//!
//! Persisted records are a cache, not a source of truth. A record that no
//! longer decodes is logged and treated as absent.

use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::{Db, Tree};
use std::path::Path;

use crate::config;

// ---------------------------------------------------------------------------
// Error Type
// ---------------------------------------------------------------------------

/// Errors that can occur during database operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type DbResult<T> = Result<T, DbError>;

// ---------------------------------------------------------------------------
// IssuerDb
// ---------------------------------------------------------------------------

/// Persistent storage for named store records.
///
/// Cloning is cheap and every clone shares the same underlying database,
/// so one `IssuerDb` can back the registry and the settings at once.
#[derive(Debug, Clone)]
pub struct IssuerDb {
    /// The underlying sled database handle.
    db: Db,
    /// Named store records.
    stores: Tree,
}

impl IssuerDb {
    /// Open or create a database at the given filesystem path.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    /// Create a temporary database that is removed when dropped.
    pub fn open_temporary() -> DbResult<Self> {
        let config = sled::Config::new().temporary(true);
        let db = config.open()?;
        Self::from_db(db)
    }

    fn from_db(db: Db) -> DbResult<Self> {
        let stores = db.open_tree(config::STORES_TREE)?;
        Ok(Self { db, stores })
    }

    // -- Record operations --------------------------------------------------

    /// Retrieve and decode the record stored under `name`.
    ///
    /// Returns `None` if nothing was ever stored, and an error if the bytes
    /// do not decode.
    pub fn get_record<T: DeserializeOwned>(&self, name: &str) -> DbResult<Option<T>> {
        match self.stores.get(name.as_bytes())? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Like [`get_record`](Self::get_record), but absent or undecodable
    /// records yield `T::default()`.
    pub fn load_record<T: DeserializeOwned + Default>(&self, name: &str) -> DbResult<T> {
        match self.get_record(name) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Ok(T::default()),
            Err(DbError::Serialization(reason)) => {
                tracing::warn!(store = name, %reason, "discarding undecodable store record");
                Ok(T::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Overwrite the record stored under `name` and flush.
    pub fn put_record<T: Serialize>(&self, name: &str, value: &T) -> DbResult<()> {
        self.stores.insert(name.as_bytes(), encode(value)?)?;
        self.flush()
    }

    /// Atomically read, modify, and write back the record under `name`.
    ///
    /// `apply` receives the current value (or `T::default()` if the record
    /// is absent or undecodable) and mutates it in place. It may be called
    /// more than once when another writer races this one, so it must not
    /// have side effects beyond the value it is given.
    ///
    /// Returns the value as written.
    pub fn update_record<T, F>(&self, name: &str, mut apply: F) -> DbResult<T>
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnMut(&mut T),
    {
        let mut encode_failure: Option<DbError> = None;

        let written = self.stores.update_and_fetch(name.as_bytes(), |current| {
            let mut value: T = match current {
                Some(bytes) => decode(bytes).unwrap_or_else(|e| {
                    tracing::warn!(store = name, reason = %e, "overwriting undecodable store record");
                    T::default()
                }),
                None => T::default(),
            };
            apply(&mut value);

            match encode(&value) {
                Ok(bytes) => {
                    encode_failure = None;
                    Some(bytes)
                }
                Err(e) => {
                    encode_failure = Some(e);
                    current.map(|bytes| bytes.to_vec())
                }
            }
        })?;

        if let Some(e) = encode_failure {
            return Err(e);
        }
        self.flush()?;

        match written {
            Some(bytes) => decode(&bytes),
            None => Ok(T::default()),
        }
    }

    /// Whether a record exists under `name`.
    pub fn contains(&self, name: &str) -> DbResult<bool> {
        Ok(self.stores.contains_key(name.as_bytes())?)
    }

    /// Store raw bytes under `name`, bypassing encoding. Used to seed
    /// records in tests and recovery tooling.
    pub fn put_raw(&self, name: &str, bytes: &[u8]) -> DbResult<()> {
        self.stores.insert(name.as_bytes(), bytes)?;
        self.flush()
    }

    /// Force a flush of all pending writes to disk.
    pub fn flush(&self) -> DbResult<()> {
        self.db.flush()?;
        Ok(())
    }
}

fn encode<T: Serialize>(value: &T) -> DbResult<Vec<u8>> {
    bincode::serialize(value).map_err(|e| DbError::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> DbResult<T> {
    bincode::deserialize(bytes).map_err(|e| DbError::Serialization(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    type Counters = BTreeMap<String, u64>;

    #[test]
    fn missing_record_is_none() {
        let db = IssuerDb::open_temporary().unwrap();
        let value: Option<Counters> = db.get_record("absent").unwrap();
        assert!(value.is_none());
        assert!(!db.contains("absent").unwrap());
    }

    #[test]
    fn put_and_get_record() {
        let db = IssuerDb::open_temporary().unwrap();
        let mut counters = Counters::new();
        counters.insert("a".to_string(), 1);

        db.put_record("counters", &counters).unwrap();
        let loaded: Counters = db.get_record("counters").unwrap().unwrap();
        assert_eq!(loaded, counters);
    }

    #[test]
    fn corrupt_record_loads_as_default() {
        let db = IssuerDb::open_temporary().unwrap();
        db.put_raw("counters", &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01])
            .unwrap();

        assert!(db.get_record::<Counters>("counters").is_err());
        let loaded: Counters = db.load_record("counters").unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn update_creates_absent_record() {
        let db = IssuerDb::open_temporary().unwrap();
        let written: Counters = db
            .update_record("counters", |c: &mut Counters| {
                *c.entry("a".to_string()).or_default() += 1;
            })
            .unwrap();
        assert_eq!(written.get("a"), Some(&1));
    }

    #[test]
    fn record_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        {
            let db = IssuerDb::open(dir.path()).expect("open");
            db.update_record("counters", |c: &mut Counters| {
                c.insert("a".to_string(), 42);
            })
            .unwrap();
        }

        let db = IssuerDb::open(dir.path()).expect("reopen");
        let loaded: Counters = db.load_record("counters").unwrap();
        assert_eq!(loaded.get("a"), Some(&42));
    }

    #[test]
    fn concurrent_updates_do_not_lose_writes() {
        let db = Arc::new(IssuerDb::open_temporary().unwrap());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let db = Arc::clone(&db);
            handles.push(std::thread::spawn(move || {
                for _ in 0..50 {
                    db.update_record("counters", |c: &mut Counters| {
                        *c.entry("hits".to_string()).or_default() += 1;
                    })
                    .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let loaded: Counters = db.load_record("counters").unwrap();
        assert_eq!(loaded.get("hits"), Some(&400));
    }
}
