//! Persisted client settings.
//!
//! Currently just the address of the issuer template on the connected
//! network, which scopes component listings and creation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::db::{DbError, DbResult, IssuerDb};
use crate::config;
use crate::workflow::validation::ValidationError;

/// Errors from writing settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// The persisted settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Address of the issuer template, once configured.
    pub template: Option<String>,
}

/// Read/write access to [`Settings`].
#[derive(Debug, Clone)]
pub struct SettingsStore {
    db: IssuerDb,
}

impl SettingsStore {
    pub fn new(db: IssuerDb) -> Self {
        Self { db }
    }

    /// Current settings; defaults if none were saved or the record is corrupt.
    pub fn settings(&self) -> DbResult<Settings> {
        self.db.load_record(config::SETTINGS_STORE_NAME)
    }

    /// The configured template. A blank stored value counts as unset.
    pub fn template(&self) -> DbResult<Option<String>> {
        Ok(self
            .settings()?
            .template
            .filter(|template| !template.trim().is_empty()))
    }

    /// Persist `template` as the issuer template.
    ///
    /// Surrounding whitespace is dropped and a blank address is refused.
    /// Returns `false` when it was already the configured template; the
    /// comparison happens inside the atomic update, so of two concurrent
    /// identical writes only one reports a change.
    pub fn set_template(&self, template: &str) -> Result<bool, SettingsError> {
        let template = template.trim();
        if template.is_empty() {
            return Err(ValidationError::invalid(config::TEMPLATE_FIELD).into());
        }

        let mut changed = false;
        self.db
            .update_record(config::SETTINGS_STORE_NAME, |settings: &mut Settings| {
                changed = settings.template.as_deref() != Some(template);
                settings.template = Some(template.to_string());
            })?;

        if changed {
            tracing::info!(template, "issuer template set");
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_defaults_to_none() {
        let store = SettingsStore::new(IssuerDb::open_temporary().unwrap());
        assert_eq!(store.template().unwrap(), None);
    }

    #[test]
    fn set_template_reports_changes() {
        let store = SettingsStore::new(IssuerDb::open_temporary().unwrap());
        assert!(store.set_template("template_a").unwrap());
        assert!(!store.set_template("template_a").unwrap());
        assert!(store.set_template(" template_b ").unwrap());
        assert_eq!(store.template().unwrap().as_deref(), Some("template_b"));
    }

    #[test]
    fn blank_template_is_refused_and_never_counts_as_set() {
        let db = IssuerDb::open_temporary().unwrap();
        let store = SettingsStore::new(db.clone());

        for blank in ["", "   ", "\t\n"] {
            match store.set_template(blank) {
                Err(SettingsError::Validation(e)) => assert_eq!(e.field, config::TEMPLATE_FIELD),
                other => panic!("expected validation error for {:?}, got {:?}", blank, other),
            }
        }
        assert_eq!(store.template().unwrap(), None);

        // A blank value persisted by an older build reads as unset.
        db.put_record(config::SETTINGS_STORE_NAME, &Settings { template: Some(" ".to_string()) })
            .unwrap();
        assert_eq!(store.template().unwrap(), None);
        assert!(store.set_template("template_a").unwrap());
    }

    #[test]
    fn concurrent_identical_writes_report_one_change() {
        let store = SettingsStore::new(IssuerDb::open_temporary().unwrap());

        let changed: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| store.set_template("template_a").unwrap()))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|&changed| changed)
                .count()
        });

        assert_eq!(changed, 1);
        assert_eq!(store.template().unwrap().as_deref(), Some("template_a"));
    }

    #[test]
    fn settings_share_the_registry_database() {
        let db = IssuerDb::open_temporary().unwrap();
        let store = SettingsStore::new(db.clone());
        store.set_template("template_a").unwrap();

        let registry = crate::storage::IssuerRegistry::open(db).unwrap();
        assert!(registry.get_issuers(Some("pk")).unwrap().is_empty());
        assert_eq!(store.template().unwrap().as_deref(), Some("template_a"));
    }
}
