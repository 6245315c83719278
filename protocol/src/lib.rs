// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Issuer Protocol - Core Library
//!
//! Client-side core for administering token issuers on a ledger: create an
//! issuer from a template, keep track of which issuers each account owns,
//! and move value out of them.
//!
//! The ledger itself is behind [`provider::IssuerProvider`]; this crate
//! never signs or submits anything on its own. What it does own is the
//! interpretation of what comes back and the local bookkeeping around it.
//!
//! ## Architecture
//!
//! - **transaction** - Raw ledger results, outcome classification, and
//!   created-component extraction.
//! - **issuer** - Issuer records and the active issuer selection.
//! - **storage** - sled-backed issuer registry and settings.
//! - **provider** - The ledger-facing trait the workflows call.
//! - **workflow** - Transfer and setup flows with single-flight guards.
//! - **config** - Store names and field names.
//!
//! ## Design Philosophy
//!
//! 1. A raw result is classified exactly once, into a sum type, and the
//!    rest of the code matches on that.
//! 2. Local stores are caches. Corrupt data degrades to empty, never to a
//!    crash.
//! 3. Every busy flag is released by a guard, not by remembering to.

pub mod config;
pub mod issuer;
pub mod provider;
pub mod storage;
pub mod transaction;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;
