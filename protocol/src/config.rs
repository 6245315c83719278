//! # Configuration & Constants
//!
//! Names and defaults shared by the library and the operator CLI. Store
//! names are part of the on-disk format: renaming one orphans whatever was
//! persisted under the old name.

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// Name of the sled tree that holds every named store record.
pub const STORES_TREE: &str = "stores";

/// Key of the issuer registry record inside [`STORES_TREE`].
pub const ISSUER_STORE_NAME: &str = "issuers";

/// Key of the settings record inside [`STORES_TREE`].
pub const SETTINGS_STORE_NAME: &str = "settings";

/// Default data directory used by the operator CLI when none is given.
pub const DEFAULT_DATA_DIR: &str = ".issuer-admin";

/// Sub-directory of the data directory that holds the sled database.
pub const DB_DIR_NAME: &str = "db";

// ---------------------------------------------------------------------------
// Ledger vocabulary
// ---------------------------------------------------------------------------

/// Substate kind tag for components in a state diff.
pub const COMPONENT_SUBSTATE_KIND: &str = "Component";

/// Field of a component substate value naming the template it was
/// instantiated from.
pub const TEMPLATE_ADDRESS_FIELD: &str = "template_address";

// ---------------------------------------------------------------------------
// Form fields
// ---------------------------------------------------------------------------

/// Field name reported when the transfer amount fails validation.
pub const TRANSFER_AMOUNT_FIELD: &str = "transferAmount";

/// Field name reported when the token symbol of a new issuer is empty.
pub const TOKEN_SYMBOL_FIELD: &str = "tokenSymbol";

/// Field name reported when the initial supply of a new issuer is invalid.
pub const INITIAL_SUPPLY_FIELD: &str = "initialSupply";

/// Field name reported when the issuer template address is blank.
pub const TEMPLATE_FIELD: &str = "template";

/// Message recorded against a field that failed validation.
pub const INVALID_FIELD_MESSAGE: &str = "Invalid";
