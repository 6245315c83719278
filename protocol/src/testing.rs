//! Fixtures shared by unit tests.

use crate::issuer::{IssuerRecord, IssuerVault};

pub(crate) fn sample_record(id: &str) -> IssuerRecord {
    IssuerRecord {
        id: id.to_string(),
        version: 0,
        vault: IssuerVault {
            id: format!("vault_{}", id),
            resource_address: "resource_token".to_string(),
            revealed_amount: 1_000,
        },
        wrapped_token: None,
        admin_auth_resource: "resource_admin".to_string(),
        user_auth_resource: "resource_user".to_string(),
    }
}
