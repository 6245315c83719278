//! The issuer currently being operated on.
//!
//! Process-local and never persisted: a restart begins with nothing
//! selected. The record is held by value and is not checked against the
//! registry; callers pass a record they got from the registry or provider.

use parking_lot::RwLock;

use super::types::IssuerRecord;

/// Holder for the active issuer selection.
///
/// Shared between workflows behind an `Arc`; reads hand out clones so no
/// lock is held across an `await`.
#[derive(Debug, Default)]
pub struct ActiveIssuer {
    current: RwLock<Option<IssuerRecord>>,
}

impl ActiveIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection. `None` clears it.
    pub fn set_active_issuer(&self, issuer: Option<IssuerRecord>) {
        match &issuer {
            Some(record) => tracing::debug!(issuer = %record.id, "active issuer set"),
            None => tracing::debug!("active issuer cleared"),
        }
        *self.current.write() = issuer;
    }

    pub fn clear_active_issuer(&self) {
        self.set_active_issuer(None);
    }

    /// A copy of the selected record, if any.
    pub fn active_issuer(&self) -> Option<IssuerRecord> {
        self.current.read().clone()
    }

    pub fn is_set(&self) -> bool {
        self.current.read().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_record;

    #[test]
    fn starts_empty() {
        let active = ActiveIssuer::new();
        assert!(active.active_issuer().is_none());
        assert!(!active.is_set());
    }

    #[test]
    fn set_replaces_previous_selection() {
        let active = ActiveIssuer::new();
        active.set_active_issuer(Some(sample_record("component_1")));
        active.set_active_issuer(Some(sample_record("component_2")));
        assert_eq!(active.active_issuer().unwrap().id, "component_2");
    }

    #[test]
    fn clear_and_set_none_both_reset() {
        let active = ActiveIssuer::new();
        active.set_active_issuer(Some(sample_record("component_1")));
        active.clear_active_issuer();
        assert!(!active.is_set());

        active.set_active_issuer(Some(sample_record("component_1")));
        active.set_active_issuer(None);
        assert!(active.active_issuer().is_none());
    }

    #[test]
    fn selection_is_held_by_value() {
        let active = ActiveIssuer::new();
        let mut record = sample_record("component_1");
        active.set_active_issuer(Some(record.clone()));
        record.version = 7;
        assert_eq!(active.active_issuer().unwrap().version, 0);
    }
}
