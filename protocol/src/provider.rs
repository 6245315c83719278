//! # Provider Interface
//!
//! The wallet-side collaborator that actually talks to the ledger. This
//! crate consumes it and never implements it outside of tests: signing,
//! submission and substate indexing all live behind this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::issuer::{IssuerRecord, NewIssuerParams};
use crate::transaction::{RawTransactionResult, SubstateId, SubstateKind};

/// A provider call failed before the ledger produced a result: the network
/// was unreachable, the wallet refused, the request was malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("provider error: {message}")]
pub struct ProviderError {
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A substate as listed by the provider's indexer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substate {
    pub substate_id: SubstateId,
    pub template_address: Option<String>,
    pub module_name: Option<String>,
    pub version: u32,
}

/// Ledger operations the client depends on.
#[async_trait]
pub trait IssuerProvider: Send + Sync {
    /// List substates of `kind` related to `template_id`.
    ///
    /// Indexers may return substates of other templates too; callers filter.
    async fn list_substates(
        &self,
        template_id: &str,
        kind: SubstateKind,
    ) -> Result<Vec<Substate>, ProviderError>;

    /// Submit a transaction instantiating a new issuer from `template_id`.
    async fn create_new_issuer(
        &self,
        template_id: &str,
        params: &NewIssuerParams,
    ) -> Result<RawTransactionResult, ProviderError>;

    /// Submit a transfer of `amount` from the issuer to `account`, authorized
    /// by `admin_auth_resource`.
    async fn transfer(
        &self,
        issuer_id: &str,
        admin_auth_resource: &str,
        account: &str,
        amount: &str,
    ) -> Result<RawTransactionResult, ProviderError>;

    /// Current ledger view of an issuer component.
    async fn get_issuer(&self, issuer_id: &str) -> Result<IssuerRecord, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn substate_listing_parses_tagged_ids() {
        let substate: Substate = serde_json::from_value(json!({
            "substate_id": { "Component": "component_77" },
            "template_address": "template_1",
            "module_name": "Issuer",
            "version": 2
        }))
        .unwrap();
        assert_eq!(substate.substate_id.as_str(), "component_77");
        assert_eq!(substate.template_address.as_deref(), Some("template_1"));
    }

    #[test]
    fn provider_error_display() {
        assert_eq!(
            ProviderError::new("connection refused").to_string(),
            "provider error: connection refused"
        );
    }
}
