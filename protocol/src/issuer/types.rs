//! Issuer records as the ledger reports them.
//!
//! An issuer is a component instantiated from the issuer template. It owns
//! a vault holding its token supply, optionally a wrapped token that can be
//! exchanged against it, and two auth resources: one gating admin
//! operations (transfers, minting) and one identifying its users.
//!
//! Field names serialize in camelCase to match the wallet's JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::transaction::types::EntityId;

/// Address of a vault substate.
pub type VaultId = String;

/// Address of a resource substate.
pub type ResourceAddress = String;

// ---------------------------------------------------------------------------
// ExchangeFee
// ---------------------------------------------------------------------------

/// Fee charged when exchanging the issuer's token for the wrapped token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExchangeFee {
    /// Flat amount per exchange, in the token's smallest unit.
    Fixed(u64),
    /// Percentage of the exchanged amount.
    Percentage(u16),
}

impl fmt::Display for ExchangeFee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(amount) => write!(f, "{} (fixed)", amount),
            Self::Percentage(rate) => write!(f, "{}%", rate),
        }
    }
}

// ---------------------------------------------------------------------------
// IssuerVault / WrappedToken
// ---------------------------------------------------------------------------

/// The vault holding an issuer's token supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuerVault {
    pub id: VaultId,
    pub resource_address: ResourceAddress,
    /// Balance visible without decrypting confidential outputs.
    pub revealed_amount: u64,
}

/// A token wrapping the issuer's token for public exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedToken {
    pub vault: VaultId,
    pub resource: ResourceAddress,
    pub balance: u64,
    #[serde(alias = "exchange_fee")]
    pub exchange_fee: ExchangeFee,
}

// ---------------------------------------------------------------------------
// IssuerRecord
// ---------------------------------------------------------------------------

/// Snapshot of an issuer component.
///
/// Records are replaced wholesale when the ledger state changes; `version`
/// is the substate version the snapshot was taken at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuerRecord {
    pub id: EntityId,
    pub version: u32,
    pub vault: IssuerVault,
    pub wrapped_token: Option<WrappedToken>,
    pub admin_auth_resource: ResourceAddress,
    pub user_auth_resource: ResourceAddress,
}

impl IssuerRecord {
    pub fn has_wrapped_token(&self) -> bool {
        self.wrapped_token.is_some()
    }

    /// Issuer vault balance plus the wrapped token balance, if any.
    pub fn total_balance(&self) -> u64 {
        let wrapped = self.wrapped_token.as_ref().map_or(0, |w| w.balance);
        self.vault.revealed_amount.saturating_add(wrapped)
    }
}

// ---------------------------------------------------------------------------
// NewIssuerParams
// ---------------------------------------------------------------------------

/// Parameters for instantiating a new issuer component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIssuerParams {
    /// Ticker of the issued token.
    pub token_symbol: String,
    /// Initial supply as a decimal integer string.
    pub initial_supply: String,
    /// Free-form token metadata (name, website, ...).
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}
