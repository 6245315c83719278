//! # Transaction Result Classification
//!
//! Turns a [`RawTransactionResult`] into a [`TransactionOutcome`] and, for
//! issuer creation, pulls the address of the freshly created component out
//! of the accepted diff.
//!
//! ## Precedence
//!
//! The ledger is supposed to populate exactly one outcome field. When more
//! than one is present the result is still classified, in this order:
//!
//! 1. `rejected`
//! 2. `onlyFeeAccepted`
//! 3. `accept`
//!
//! so a failure is never mistaken for success, and `accept` is only read
//! when both failure fields are absent. Ambiguous results are logged.
//! A result with no outcome field at all is an invariant violation.

use thiserror::Error;

use super::types::{
    EntityId, RawTransactionResult, RejectReason, SubstateDiff, SubstateId, SubstateKind,
    TransactionOutcome,
};

/// Reported when an accepted creation diff lacks the expected component.
pub const MISSING_COMPONENT: &str = "expected created component not found";

/// Reported when a raw result populates none of the outcome fields.
pub const NO_RECOGNIZED_OUTCOME: &str = "result has no recognized outcome";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a transaction result did not yield what the caller needed.
#[derive(Debug, Clone, Error)]
pub enum ClassifyError {
    /// The ledger rejected the transaction.
    #[error("transaction rejected: {0}")]
    TransactionRejected(RejectReason),

    /// The transaction failed but fees were charged.
    #[error("transaction rejected (fees charged): {0}")]
    TransactionFeesOnly(RejectReason),

    /// The result broke a protocol invariant. This is a defect, not a user
    /// error; the raw result is kept for diagnostics.
    #[error("invariant violation: {message}: {raw}")]
    InvariantViolation {
        message: String,
        raw: Box<RawTransactionResult>,
    },
}

impl ClassifyError {
    fn invariant(message: &str, raw: RawTransactionResult) -> Self {
        Self::InvariantViolation {
            message: message.to_string(),
            raw: Box::new(raw),
        }
    }

    /// Whether this is a ledger business outcome rather than a defect.
    pub fn is_ledger_outcome(&self) -> bool {
        matches!(
            self,
            Self::TransactionRejected(_) | Self::TransactionFeesOnly(_)
        )
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classify a raw result into its single outcome.
///
/// # Errors
///
/// Returns [`ClassifyError::InvariantViolation`] if no outcome field is
/// populated. Rejections are *not* errors here; they come back as
/// [`TransactionOutcome::Rejected`] / [`TransactionOutcome::AcceptedFeesOnly`].
pub fn outcome(raw: RawTransactionResult) -> Result<TransactionOutcome, ClassifyError> {
    let populated = raw.populated_outcomes();
    if populated > 1 {
        tracing::warn!(
            populated,
            raw = %raw,
            "transaction result populates more than one outcome, applying precedence"
        );
    }

    match raw {
        RawTransactionResult {
            rejected: Some(reason),
            ..
        } => Ok(TransactionOutcome::Rejected(reason)),
        RawTransactionResult {
            only_fee_accepted: Some((diff, reason)),
            ..
        } => Ok(TransactionOutcome::AcceptedFeesOnly { diff, reason }),
        RawTransactionResult {
            accept: Some(diff), ..
        } => Ok(TransactionOutcome::Accepted(diff)),
        raw => Err(ClassifyError::invariant(NO_RECOGNIZED_OUTCOME, raw)),
    }
}

/// Require an accepted outcome, converting rejections into errors.
pub fn require_accepted(outcome: TransactionOutcome) -> Result<SubstateDiff, ClassifyError> {
    match outcome {
        TransactionOutcome::Accepted(diff) => Ok(diff),
        TransactionOutcome::AcceptedFeesOnly { reason, .. } => {
            Err(ClassifyError::TransactionFeesOnly(reason))
        }
        TransactionOutcome::Rejected(reason) => Err(ClassifyError::TransactionRejected(reason)),
    }
}

/// First component in `diff` instantiated from `template_id`.
pub fn find_created_component<'a>(
    diff: &'a SubstateDiff,
    template_id: &str,
) -> Option<&'a SubstateId> {
    diff.up_substates
        .iter()
        .filter(|substate| substate.kind() == &SubstateKind::Component)
        .find(|substate| substate.template_address() == Some(template_id))
        .map(|substate| substate.id())
}

/// Classify the result of an entity-creating transaction and return the
/// address of the component created from `template_id`.
///
/// # Errors
///
/// - [`ClassifyError::TransactionRejected`] when `rejected` is present.
/// - [`ClassifyError::TransactionFeesOnly`] when `onlyFeeAccepted` is present.
/// - [`ClassifyError::InvariantViolation`] when the result has no outcome, or
///   the accepted diff holds no matching component.
pub fn classify(raw: RawTransactionResult, template_id: &str) -> Result<EntityId, ClassifyError> {
    let diff = require_accepted(outcome(raw)?)?;

    match find_created_component(&diff, template_id) {
        Some(id) => {
            tracing::debug!(component = %id, template = template_id, "created component found");
            Ok(id.as_str().to_string())
        }
        None => Err(ClassifyError::invariant(
            MISSING_COMPONENT,
            RawTransactionResult::accepted(diff),
        )),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
