//! # Storage Module
//!
//! Client-side persistence. Nothing here is a source of truth: the ledger
//! is. These stores cache what the client has created and configured so it
//! survives a restart.
//!
//! ## Architecture
//!
//! ```text
//! db.rs       - sled-backed named records with atomic read-modify-write
//! registry.rs - per-account issuer index (append-only from the outside)
//! settings.rs - issuer template setting
//! ```
//!
//! ## Design Decisions
//!
//! 1. **One record per store.** The registry is small and always read
//!    whole, so it lives under a single key and is rewritten on update.
//! 2. **Bincode on disk.** Compact and fast; JSON is for the wire.
//! 3. **Degrade, don't fail.** A record that no longer decodes is logged
//!    and replaced by an empty default.

pub mod db;
pub mod registry;
pub mod settings;

pub use db::{DbError, DbResult, IssuerDb};
pub use registry::{IssuerMap, IssuerRegistry, RegistryError};
pub use settings::{Settings, SettingsError, SettingsStore};
