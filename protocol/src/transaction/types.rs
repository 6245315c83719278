//! Wire types for ledger transaction results.
//!
//! The provider hands back results in the ledger's JSON shape: a single
//! object with optional `rejected`, `onlyFeeAccepted` and `accept` fields.
//! [`RawTransactionResult`] mirrors that shape exactly so nothing is lost in
//! deserialization; [`TransactionOutcome`] is the sum type the rest of the
//! crate works with once a raw result has been classified.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::config;

/// Identifier of a ledger entity (component, resource, vault) as a string.
pub type EntityId = String;

// ---------------------------------------------------------------------------
// SubstateKind
// ---------------------------------------------------------------------------

/// The kind tag of a substate in a state diff.
///
/// Kinds the client cares about get their own variant; anything else the
/// ledger reports is kept verbatim in [`SubstateKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubstateKind {
    Component,
    Resource,
    Vault,
    NonFungible,
    TransactionReceipt,
    Other(String),
}

impl From<String> for SubstateKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            config::COMPONENT_SUBSTATE_KIND => Self::Component,
            "Resource" => Self::Resource,
            "Vault" => Self::Vault,
            "NonFungible" => Self::NonFungible,
            "TransactionReceipt" => Self::TransactionReceipt,
            _ => Self::Other(tag),
        }
    }
}

impl From<SubstateKind> for String {
    fn from(kind: SubstateKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for SubstateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Component => write!(f, "{}", config::COMPONENT_SUBSTATE_KIND),
            Self::Resource => write!(f, "Resource"),
            Self::Vault => write!(f, "Vault"),
            Self::NonFungible => write!(f, "NonFungible"),
            Self::TransactionReceipt => write!(f, "TransactionReceipt"),
            Self::Other(tag) => write!(f, "{}", tag),
        }
    }
}

// ---------------------------------------------------------------------------
// SubstateId
// ---------------------------------------------------------------------------

/// Address of a substate.
///
/// Diffs carry the address as a plain string, while substate listings wrap
/// it in a single-key object such as `{"Component": "component_ab12"}`. Both
/// forms deserialize to the inner address; serialization always writes the
/// plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SubstateId(String);

impl SubstateId {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SubstateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SubstateId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Plain(String),
            Tagged(BTreeMap<String, String>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Plain(address) => Ok(Self(address)),
            Repr::Tagged(map) => {
                let mut entries = map.into_iter();
                match (entries.next(), entries.next()) {
                    (Some((_kind, address)), None) => Ok(Self(address)),
                    _ => Err(serde::de::Error::custom(
                        "substate id object must have exactly one entry",
                    )),
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// SubstateDiff
// ---------------------------------------------------------------------------

/// One `(kind, id, value)` entry of a diff's `up_substates`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpSubstate(pub SubstateKind, pub SubstateId, pub Value);

impl UpSubstate {
    pub fn kind(&self) -> &SubstateKind {
        &self.0
    }

    pub fn id(&self) -> &SubstateId {
        &self.1
    }

    pub fn value(&self) -> &Value {
        &self.2
    }

    /// The `template_address` of the substate value, if it has one.
    pub fn template_address(&self) -> Option<&str> {
        self.2
            .get(config::TEMPLATE_ADDRESS_FIELD)
            .and_then(Value::as_str)
    }
}

/// State changes produced by a transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubstateDiff {
    /// Substates created or updated, in ledger order.
    #[serde(default)]
    pub up_substates: Vec<UpSubstate>,
    /// Substates consumed. Kept opaque; the client never reads them.
    #[serde(default)]
    pub down_substates: Vec<Value>,
}

// ---------------------------------------------------------------------------
// RejectReason
// ---------------------------------------------------------------------------

/// Ledger-supplied reason a transaction was rejected.
///
/// The ledger reports reasons as arbitrary JSON; it is carried as-is and
/// rendered as compact JSON for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RejectReason(pub Value);

impl RejectReason {
    pub fn message(text: impl Into<String>) -> Self {
        Self(Value::String(text.into()))
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// RawTransactionResult
// ---------------------------------------------------------------------------

/// A transaction result exactly as the provider returns it.
///
/// Well-formed results populate exactly one of the three fields. Use
/// [`classifier::outcome`](super::classifier::outcome) to turn it into a
/// [`TransactionOutcome`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTransactionResult {
    #[serde(default)]
    pub rejected: Option<RejectReason>,
    #[serde(default, rename = "onlyFeeAccepted", alias = "only_fee_accepted")]
    pub only_fee_accepted: Option<(SubstateDiff, RejectReason)>,
    #[serde(default)]
    pub accept: Option<SubstateDiff>,
}

impl RawTransactionResult {
    pub fn accepted(diff: SubstateDiff) -> Self {
        Self {
            accept: Some(diff),
            ..Self::default()
        }
    }

    pub fn rejected(reason: RejectReason) -> Self {
        Self {
            rejected: Some(reason),
            ..Self::default()
        }
    }

    pub fn fees_only(diff: SubstateDiff, reason: RejectReason) -> Self {
        Self {
            only_fee_accepted: Some((diff, reason)),
            ..Self::default()
        }
    }

    /// Number of outcome fields that are populated. Well-formed results
    /// have exactly one.
    pub fn populated_outcomes(&self) -> usize {
        [
            self.rejected.is_some(),
            self.only_fee_accepted.is_some(),
            self.accept.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }

    pub fn is_well_formed(&self) -> bool {
        self.populated_outcomes() == 1
    }
}

impl fmt::Display for RawTransactionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionOutcome
// ---------------------------------------------------------------------------

/// The classified result of a submitted transaction. Exactly one case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransactionOutcome {
    /// Executed; the diff holds the resulting state changes.
    Accepted(SubstateDiff),
    /// Value transfer did not happen but fees were still charged.
    AcceptedFeesOnly {
        diff: SubstateDiff,
        reason: RejectReason,
    },
    /// Rejected outright.
    Rejected(RejectReason),
}

impl TransactionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// The ledger's reason for a rejection, `None` when accepted.
    pub fn reason(&self) -> Option<&RejectReason> {
        match self {
            Self::Accepted(_) => None,
            Self::AcceptedFeesOnly { reason, .. } | Self::Rejected(reason) => Some(reason),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Accepted(_) => "Accepted",
            Self::AcceptedFeesOnly { .. } => "AcceptedFeesOnly",
            Self::Rejected(_) => "Rejected",
        }
    }
}

impl fmt::Display for TransactionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason() {
            Some(reason) => write!(f, "{}: {}", self.kind(), reason),
            None => write!(f, "{}", self.kind()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
