//! User model
//!
//! Represents a customer or staff account. Users created through the SMS
//! channel have a phone number but no email; users created through
//! registration have both.

use chrono::{DateTime, Utc};
use scoop_core::traits::{Id, Identifiable, Timestamped, UuidIdentifiable};
use scoop_core::types::UserStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::permission::PermissionGrant;

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Internal numeric id, never exposed in API payloads
    #[serde(skip)]
    pub id: Option<Id>,

    /// Stable external identifier
    pub uuid: Uuid,

    pub first_name: Option<String>,
    pub last_name: Option<String>,

    /// Email address; absent for SMS-created accounts
    pub email: Option<String>,

    pub phone: String,

    pub status: UserStatus,

    /// Granted capabilities
    #[serde(default)]
    pub permissions: Vec<PermissionGrant>,

    pub created_at: Option<DateTime<Utc>>,
}

impl Identifiable for User {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl UuidIdentifiable for User {
    fn uuid(&self) -> Uuid {
        self.uuid
    }
}

impl Timestamped for User {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl User {
    /// Full name, where the pieces exist
    pub fn name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or("");
        let last = self.last_name.as_deref().unwrap_or("");
        format!("{} {}", first, last).trim().to_string()
    }

    /// Whether this identity may authenticate at all
    pub fn can_login(&self) -> bool {
        self.status.can_login()
    }
}

/// New user creation parameters
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[validate(length(max = 255))]
    pub first_name: Option<String>,

    #[validate(length(max = 255))]
    pub last_name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 7, max = 20))]
    pub phone: String,

    #[validate(length(min = 10))]
    pub password: Option<String>,

    pub status: Option<UserStatus>,

    /// Capability names to grant at creation
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// User update parameters (partial)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[validate(length(max = 255))]
    pub first_name: Option<String>,

    #[validate(length(max = 255))]
    pub last_name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 7, max = 20))]
    pub phone: Option<String>,

    pub status: Option<UserStatus>,
}

/// Credentials presented to the login endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_with_missing_pieces() {
        let mut user = User {
            id: Some(1),
            uuid: Uuid::new_v4(),
            first_name: Some("Ada".into()),
            last_name: None,
            email: None,
            phone: "+14045551212".into(),
            status: UserStatus::Verified,
            permissions: vec![],
            created_at: None,
        };
        assert_eq!(user.name(), "Ada");

        user.last_name = Some("Lovelace".into());
        assert_eq!(user.name(), "Ada Lovelace");
    }

    #[test]
    fn test_internal_id_not_serialized() {
        let user = User {
            id: Some(42),
            uuid: Uuid::new_v4(),
            first_name: None,
            last_name: None,
            email: None,
            phone: "+14045551212".into(),
            status: UserStatus::Verified,
            permissions: vec![],
            created_at: None,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("uuid").is_some());
    }
}
