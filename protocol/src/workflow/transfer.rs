//! # Transfer Workflow
//!
//! Moves value from an issuer to a user account.
//!
//! ## State Machine
//!
//! ```text
//!   Idle ──submit──▶ Validating ──ok──▶ Submitting ──provider ok──▶ Succeeded(outcome)
//!                        │                   │
//!                        └─invalid──▶ Failed ◀┴──provider error / no outcome
//! ```
//!
//! `Succeeded` means the ledger produced a result, which may itself be a
//! rejection; the outcome carries the ledger's reason. `Failed` covers the
//! cases where no usable result exists. Terminal states are not sticky: the
//! next explicit submission starts over from `Validating`.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

use super::validation::{self, ValidationError};
use super::BusyGuard;
use crate::config;
use crate::issuer::IssuerRecord;
use crate::provider::{IssuerProvider, ProviderError};
use crate::transaction::{classifier, ClassifyError, TransactionOutcome};

/// Callback receiving each classified transfer outcome.
pub type ResultCallback = Box<dyn Fn(&TransactionOutcome) + Send + Sync>;

/// Callback fired when a submission is accepted for processing.
pub type SubmitCallback = Box<dyn Fn() + Send + Sync>;

// ---------------------------------------------------------------------------
// Errors & State
// ---------------------------------------------------------------------------

/// Why a transfer submission produced no ledger outcome.
#[derive(Debug, Clone, Error)]
pub enum TransferError {
    /// Rejected locally; the provider was not contacted.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// The provider call itself failed. Retry is allowed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The provider returned a result that could not be classified.
    #[error(transparent)]
    Classification(#[from] ClassifyError),

    /// Another submission on this workflow is still in flight.
    #[error("a transfer is already in flight")]
    Busy,
}

/// Where a transfer workflow currently stands.
#[derive(Debug, Clone, Default)]
pub enum TransferState {
    #[default]
    Idle,
    Validating,
    Submitting,
    Succeeded(TransactionOutcome),
    Failed(TransferError),
}

impl TransferState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Validating => "Validating",
            Self::Submitting => "Submitting",
            Self::Succeeded(_) => "Succeeded",
            Self::Failed(_) => "Failed",
        }
    }
}

// ---------------------------------------------------------------------------
// TransferWorkflow
// ---------------------------------------------------------------------------

/// Transfer form logic for one issuer and one destination account.
pub struct TransferWorkflow {
    provider: Arc<dyn IssuerProvider>,
    issuer: IssuerRecord,
    user_account: String,
    busy: AtomicBool,
    state: Mutex<TransferState>,
    /// Field name -> message, for fields that failed their last check.
    invalid: Mutex<BTreeMap<String, String>>,
    on_result: Option<ResultCallback>,
    on_submit: Option<SubmitCallback>,
}

impl TransferWorkflow {
    pub fn new(
        provider: Arc<dyn IssuerProvider>,
        issuer: IssuerRecord,
        user_account: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            issuer,
            user_account: user_account.into(),
            busy: AtomicBool::new(false),
            state: Mutex::new(TransferState::Idle),
            invalid: Mutex::new(BTreeMap::new()),
            on_result: None,
            on_submit: None,
        }
    }

    /// Register the callback that receives every classified outcome.
    pub fn on_result(mut self, callback: impl Fn(&TransactionOutcome) + Send + Sync + 'static) -> Self {
        self.on_result = Some(Box::new(callback));
        self
    }

    /// Register a callback fired when a submission starts.
    pub fn on_submit(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_submit = Some(Box::new(callback));
        self
    }

    pub fn issuer(&self) -> &IssuerRecord {
        &self.issuer
    }

    pub fn state(&self) -> TransferState {
        self.state.lock().clone()
    }

    /// Whether a submission is in flight. Drives the retry button.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Fields that failed their most recent validation.
    pub fn invalid_fields(&self) -> BTreeMap<String, String> {
        self.invalid.lock().clone()
    }

    /// Dismiss a displayed failure and return to `Idle`.
    ///
    /// Has no effect while a submission is in flight.
    pub fn dismiss(&self) {
        if self.is_busy() {
            return;
        }
        *self.state.lock() = TransferState::Idle;
    }

    /// Validate and submit a transfer of `amount`.
    ///
    /// Returns the classified ledger outcome, which the result callback has
    /// also received. Rejections by the ledger are `Ok` outcomes carrying
    /// the reason.
    ///
    /// # Errors
    ///
    /// - [`TransferError::Busy`] if a submission is already in flight; the
    ///   state is left untouched and the provider is not called.
    /// - [`TransferError::Validation`] if `amount` is not an integer string.
    /// - [`TransferError::Provider`] if the provider call failed.
    /// - [`TransferError::Classification`] if the result had no outcome.
    pub async fn submit(&self, amount: &str) -> Result<TransactionOutcome, TransferError> {
        let _busy = BusyGuard::acquire(&self.busy).ok_or(TransferError::Busy)?;

        if let Some(callback) = &self.on_submit {
            callback();
        }

        self.transition(TransferState::Validating);
        let amount = match validation::validate_amount(config::TRANSFER_AMOUNT_FIELD, amount) {
            Ok(amount) => {
                self.invalid.lock().remove(config::TRANSFER_AMOUNT_FIELD);
                amount
            }
            Err(e) => {
                self.invalid.lock().insert(e.field.clone(), e.message.clone());
                return Err(self.fail(e.into()));
            }
        };

        self.transition(TransferState::Submitting);
        let raw = self
            .provider
            .transfer(
                &self.issuer.id,
                &self.issuer.admin_auth_resource,
                &self.user_account,
                amount,
            )
            .await
            .map_err(|e| self.fail(e.into()))?;

        let outcome = classifier::outcome(raw).map_err(|e| self.fail(e.into()))?;

        tracing::info!(
            issuer = %self.issuer.id,
            account = %self.user_account,
            amount,
            outcome = %outcome,
            "transfer completed"
        );
        self.transition(TransferState::Succeeded(outcome.clone()));
        if let Some(callback) = &self.on_result {
            callback(&outcome);
        }
        Ok(outcome)
    }

    fn transition(&self, next: TransferState) {
        tracing::debug!(issuer = %self.issuer.id, state = next.name(), "transfer state");
        *self.state.lock() = next;
    }

    fn fail(&self, error: TransferError) -> TransferError {
        tracing::warn!(issuer = %self.issuer.id, %error, "transfer failed");
        self.transition(TransferState::Failed(error.clone()));
        error
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issuer::NewIssuerParams;
    use crate::provider::Substate;
    use crate::testing::sample_record;
    use crate::transaction::{RawTransactionResult, RejectReason, SubstateDiff, SubstateKind};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    /// Provider returning a fixed transfer response and counting calls.
    struct FixedProvider {
        response: Result<RawTransactionResult, ProviderError>,
        calls: AtomicUsize,
        last_amount: Mutex<Option<String>>,
    }

    impl FixedProvider {
        fn new(response: Result<RawTransactionResult, ProviderError>) -> Arc<Self> {
            Arc::new(Self {
                response,
                calls: AtomicUsize::new(0),
                last_amount: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl IssuerProvider for FixedProvider {
        async fn list_substates(&self, _: &str, _: SubstateKind) -> Result<Vec<Substate>, ProviderError> {
            Ok(Vec::new())
        }

        async fn create_new_issuer(
            &self,
            _: &str,
            _: &NewIssuerParams,
        ) -> Result<RawTransactionResult, ProviderError> {
            Err(ProviderError::new("unsupported"))
        }

        async fn transfer(
            &self,
            _issuer_id: &str,
            _admin_auth_resource: &str,
            _account: &str,
            amount: &str,
        ) -> Result<RawTransactionResult, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_amount.lock() = Some(amount.to_string());
            self.response.clone()
        }

        async fn get_issuer(&self, issuer_id: &str) -> Result<IssuerRecord, ProviderError> {
            Ok(sample_record(issuer_id))
        }
    }

    fn workflow(provider: Arc<FixedProvider>) -> TransferWorkflow {
        TransferWorkflow::new(provider, sample_record("component_1"), "account_user")
    }

    #[tokio::test]
    async fn accepted_transfer_succeeds_and_clears_busy() {
        let provider = FixedProvider::new(Ok(RawTransactionResult::accepted(SubstateDiff::default())));
        let wf = workflow(Arc::clone(&provider));

        let outcome = wf.submit("100").await.unwrap();
        assert!(outcome.is_accepted());
        assert!(matches!(wf.state(), TransferState::Succeeded(_)));
        assert!(!wf.is_busy());
        assert_eq!(provider.last_amount.lock().as_deref(), Some("100"));
    }

    #[tokio::test]
    async fn invalid_amounts_never_reach_the_provider() {
        let provider = FixedProvider::new(Ok(RawTransactionResult::accepted(SubstateDiff::default())));
        let wf = workflow(Arc::clone(&provider));

        for amount in ["15.0", "-5", "", "abc"] {
            let err = wf.submit(amount).await.unwrap_err();
            assert!(matches!(err, TransferError::Validation(_)), "{:?}", amount);
            assert!(matches!(wf.state(), TransferState::Failed(TransferError::Validation(_))));
            assert!(wf.invalid_fields().contains_key(config::TRANSFER_AMOUNT_FIELD));
            assert!(!wf.is_busy());
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);

        wf.submit("1500").await.unwrap();
        assert!(wf.invalid_fields().is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn provider_failure_is_retryable() {
        let provider = FixedProvider::new(Err(ProviderError::new("connection refused")));
        let wf = workflow(Arc::clone(&provider));

        let err = wf.submit("10").await.unwrap_err();
        assert!(matches!(err, TransferError::Provider(_)));
        assert!(err.to_string().contains("connection refused"));
        assert!(!wf.is_busy());

        wf.dismiss();
        assert!(matches!(wf.state(), TransferState::Idle));

        wf.submit("10").await.unwrap_err();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn ledger_rejection_is_reported_through_callback() {
        let provider = FixedProvider::new(Ok(RawTransactionResult::rejected(RejectReason::message(
            "insufficient funds",
        ))));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let wf = workflow(provider).on_result(move |outcome| {
            sink.lock().push(outcome.kind());
        });

        let outcome = wf.submit("5").await.unwrap();
        assert!(!outcome.is_accepted());
        assert_eq!(outcome.reason(), Some(&RejectReason::message("insufficient funds")));
        assert_eq!(*seen.lock(), vec!["Rejected"]);
    }

    #[tokio::test]
    async fn unclassifiable_result_fails_and_skips_callback() {
        let provider = FixedProvider::new(Ok(RawTransactionResult::default()));
        let called = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&called);
        let wf = workflow(provider).on_result(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let err = wf.submit("5").await.unwrap_err();
        assert!(matches!(
            err,
            TransferError::Classification(ClassifyError::InvariantViolation { .. })
        ));
        assert_eq!(called.load(Ordering::SeqCst), 0);
        assert!(!wf.is_busy());
    }

    #[tokio::test]
    async fn result_callback_observes_the_final_state() {
        let provider = FixedProvider::new(Ok(RawTransactionResult::accepted(SubstateDiff::default())));
        let observed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&observed);

        let wf = Arc::new_cyclic(|this: &std::sync::Weak<TransferWorkflow>| {
            let this = this.clone();
            workflow(provider).on_result(move |_| {
                if let Some(wf) = this.upgrade() {
                    sink.lock().push((wf.state().name(), wf.is_busy()));
                }
            })
        });

        wf.submit("7").await.unwrap();
        assert_eq!(*observed.lock(), vec![("Succeeded", true)]);
    }

    #[tokio::test]
    async fn submit_callback_fires_per_submission() {
        let provider = FixedProvider::new(Ok(RawTransactionResult::accepted(SubstateDiff::default())));
        let submitted = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&submitted);
        let wf = workflow(provider).on_submit(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        wf.submit("1").await.unwrap();
        wf.submit("x").await.unwrap_err();
        assert_eq!(submitted.load(Ordering::SeqCst), 2);
    }
}
