//! Permission and grant models
//!
//! A `Permission` is a named capability (`"user:read"`, `"self:write"`,
//! `"store:read"`, ...). A `PermissionGrant` is one user↔permission
//! association with its own row id, so a single grant can be revoked
//! precisely without touching the user's other grants.

use scoop_core::traits::Id;
use serde::{Deserialize, Serialize};

/// A named capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    #[serde(default)]
    pub id: Id,
    pub name: String,
}

impl Permission {
    pub fn new(id: Id, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A user's grant of a single permission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    /// Grant row id (revocation handle)
    #[serde(rename = "userPermissionId")]
    pub id: Id,
    pub permission: Permission,
}

impl PermissionGrant {
    pub fn new(id: Id, permission: Permission) -> Self {
        Self { id, permission }
    }

    /// The capability name this grant carries
    pub fn name(&self) -> &str {
        &self.permission.name
    }
}
