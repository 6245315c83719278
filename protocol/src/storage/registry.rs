//! # Issuer Registry
//!
//! Per-account index of the issuers this client has created, persisted as
//! one record:
//!
//! ```text
//! { issuers: { <account public key>: [IssuerRecord, ...] } }
//! ```
//!
//! The registry owns that record outright. Callers read through
//! [`IssuerRegistry::get_issuers`] and write through
//! [`IssuerRegistry::add_issuer`]; there is no way to replace the map, so
//! two creations finishing close together cannot clobber each other.
//!
//! The active account is passed in rather than looked up, which makes the
//! "no account selected" case an ordinary input.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use super::db::{DbError, IssuerDb};
use crate::config;
use crate::issuer::IssuerRecord;

/// Errors returned by registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry was read before any account was selected.
    #[error("no active account")]
    NoActiveAccount,

    #[error(transparent)]
    Db(#[from] DbError),
}

/// The persisted registry document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerMap {
    /// Account public key -> issuers in creation order.
    pub issuers: BTreeMap<String, Vec<IssuerRecord>>,
}

impl IssuerMap {
    /// Append `record` under `account_key`, or replace the record with the
    /// same id if the account already has it.
    fn upsert(&mut self, account_key: &str, record: IssuerRecord) {
        let records = self.issuers.entry(account_key.to_string()).or_default();
        match records.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }
}

/// Persistent per-account issuer index.
#[derive(Debug, Clone)]
pub struct IssuerRegistry {
    db: IssuerDb,
}

impl IssuerRegistry {
    /// Open the registry on `db`, writing an empty document on first use.
    pub fn open(db: IssuerDb) -> Result<Self, RegistryError> {
        if !db.contains(config::ISSUER_STORE_NAME)? {
            db.put_record(config::ISSUER_STORE_NAME, &IssuerMap::default())?;
            tracing::debug!(store = config::ISSUER_STORE_NAME, "created empty issuer registry");
        }
        Ok(Self { db })
    }

    /// Record `record` as an issuer owned by `account_key`.
    ///
    /// Appends to the account's sequence, creating it if needed. If the
    /// account already holds a record with the same id, that record is
    /// replaced in place so an id never appears twice. Atomic with respect
    /// to every other `add_issuer` call on the same database.
    pub fn add_issuer(&self, account_key: &str, record: IssuerRecord) -> Result<(), RegistryError> {
        let issuer_id = record.id.clone();
        let written: IssuerMap = self.db.update_record(config::ISSUER_STORE_NAME, |map| {
            IssuerMap::upsert(map, account_key, record.clone());
        })?;

        tracing::info!(
            account = account_key,
            issuer = %issuer_id,
            count = written.issuers.get(account_key).map_or(0, Vec::len),
            "issuer registered"
        );
        Ok(())
    }

    /// Issuers owned by the active account, in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NoActiveAccount`] when `active_account` is
    /// `None`. An account with no issuers yields an empty vector.
    pub fn get_issuers(
        &self,
        active_account: Option<&str>,
    ) -> Result<Vec<IssuerRecord>, RegistryError> {
        let account = active_account.ok_or(RegistryError::NoActiveAccount)?;
        let mut map = self.load()?;
        Ok(map.issuers.remove(account).unwrap_or_default())
    }

    /// Look up one issuer of the active account by id.
    pub fn find_issuer(
        &self,
        active_account: Option<&str>,
        issuer_id: &str,
    ) -> Result<Option<IssuerRecord>, RegistryError> {
        Ok(self
            .get_issuers(active_account)?
            .into_iter()
            .find(|record| record.id == issuer_id))
    }

    /// Accounts that have at least one issuer registered.
    pub fn accounts(&self) -> Result<Vec<String>, RegistryError> {
        Ok(self.load()?.issuers.into_keys().collect())
    }

    fn load(&self) -> Result<IssuerMap, RegistryError> {
        Ok(self.db.load_record(config::ISSUER_STORE_NAME)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
