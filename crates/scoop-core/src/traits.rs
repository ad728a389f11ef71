//! Core traits shared by domain models

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Primary key type
pub type Id = i64;

/// Trait for entities that have a primary key
pub trait Identifiable {
    fn id(&self) -> Option<Id>;
    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }
}

/// Trait for entities with UUID identifiers (for API exposure)
pub trait UuidIdentifiable {
    fn uuid(&self) -> Uuid;
}

/// Trait for entities with creation timestamps
pub trait Timestamped {
    fn created_at(&self) -> Option<DateTime<Utc>>;
}
