//! # Workflows
//!
//! User-triggered operations that combine the provider, the classifier and
//! the stores.
//!
//! ```text
//! validation.rs - integer amount and new-issuer parameter checks
//! transfer.rs   - TransferWorkflow: Idle → Validating → Submitting → Succeeded | Failed
//! setup.rs      - IssuerSetup: template, component listing, issuer creation
//! ```
//!
//! Each workflow instance allows one operation in flight. A second
//! submission while busy is rejected immediately, never queued, and the
//! busy flag is released on every exit path by [`BusyGuard`].

pub mod setup;
pub mod transfer;
pub mod validation;

pub use setup::{IssuerSetup, SetupError};
pub use transfer::{TransferError, TransferState, TransferWorkflow};
pub use validation::{is_integer_amount, validate_amount, validate_new_issuer, ValidationError};

use std::sync::atomic::{AtomicBool, Ordering};

/// Holds a workflow's busy flag for the duration of one operation.
///
/// Releasing happens in `Drop`, so early returns and `?` cannot leave the
/// flag stuck.
pub(crate) struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    /// Claim `flag`, or `None` if an operation already holds it.
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
