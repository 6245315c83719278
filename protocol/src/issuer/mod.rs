//! # Issuer Module
//!
//! Issuer records and the process-local active issuer selection.
//!
//! ```text
//! types.rs     - IssuerRecord, IssuerVault, WrappedToken, ExchangeFee, NewIssuerParams
//! selection.rs - ActiveIssuer: the record currently being operated on
//! ```
//!
//! All amounts are `u64` in the token's smallest unit.

pub mod selection;
pub mod types;

pub use selection::ActiveIssuer;
pub use types::{
    ExchangeFee, IssuerRecord, IssuerVault, NewIssuerParams, ResourceAddress, VaultId,
    WrappedToken,
};
