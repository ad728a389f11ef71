//! Common types used throughout the Scoops backend

use serde::{Deserialize, Serialize};

/// User lifecycle status
///
/// A user enters `Unverified` on registration, becomes `Verified` after a
/// confirmed contact channel (or is created verified on first SMS
/// contact), and is marked `Deleted` by the domain layer. The auth
/// subsystem never destroys identities itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Unverified,
    Verified,
    Deleted,
}

impl UserStatus {
    /// Database representation
    pub fn as_i16(self) -> i16 {
        match self {
            UserStatus::Unverified => 1,
            UserStatus::Verified => 2,
            UserStatus::Deleted => 3,
        }
    }

    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            1 => Some(UserStatus::Unverified),
            2 => Some(UserStatus::Verified),
            3 => Some(UserStatus::Deleted),
            _ => None,
        }
    }

    /// Textual slug, as exposed in API payloads
    pub fn slug(self) -> &'static str {
        match self {
            UserStatus::Unverified => "unverified",
            UserStatus::Verified => "verified",
            UserStatus::Deleted => "deleted",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "unverified" | "Unverified" => Some(UserStatus::Unverified),
            "verified" | "Verified" => Some(UserStatus::Verified),
            "deleted" | "Deleted" => Some(UserStatus::Deleted),
            _ => None,
        }
    }

    /// Whether an identity in this state may authenticate
    pub fn can_login(self) -> bool {
        !matches!(self, UserStatus::Deleted)
    }
}

impl Default for UserStatus {
    fn default() -> Self {
        UserStatus::Unverified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            UserStatus::Unverified,
            UserStatus::Verified,
            UserStatus::Deleted,
        ] {
            assert_eq!(UserStatus::from_i16(status.as_i16()), Some(status));
            assert_eq!(UserStatus::from_slug(status.slug()), Some(status));
        }
        assert_eq!(UserStatus::from_i16(9), None);
        assert_eq!(UserStatus::from_slug("frozen"), None);
    }

    #[test]
    fn test_deleted_cannot_login() {
        assert!(UserStatus::Verified.can_login());
        assert!(UserStatus::Unverified.can_login());
        assert!(!UserStatus::Deleted.can_login());
    }
}
