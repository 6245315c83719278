//! # Transaction Module
//!
//! Interpretation of ledger transaction results. The provider submits
//! transactions and returns raw results; this module decides what happened.
//!
//! ## Architecture
//!
//! ```text
//! types.rs      - Wire types (RawTransactionResult, SubstateDiff, SubstateId)
//!                 and the classified TransactionOutcome
//! classifier.rs - Outcome classification and created-component extraction
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Submit** - the provider executes a transaction and returns a
//!    [`RawTransactionResult`].
//! 2. **Classify** - [`outcome`] collapses it into one [`TransactionOutcome`].
//! 3. **Extract** - for creations, [`classify`] also returns the address of
//!    the component instantiated from the requested template.

pub mod classifier;
pub mod types;

pub use classifier::{classify, find_created_component, outcome, require_accepted, ClassifyError};
pub use types::{
    EntityId, RawTransactionResult, RejectReason, SubstateDiff, SubstateId, SubstateKind,
    TransactionOutcome, UpSubstate,
};
