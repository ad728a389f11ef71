//! Store model
//!
//! A physical shop location in the retail chain.

use chrono::{DateTime, Utc};
use scoop_core::traits::{Id, Identifiable, Timestamped};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Store entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub id: Option<Id>,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub url: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub lat: f64,
    pub lng: f64,
    pub created_at: Option<DateTime<Utc>>,
}

impl Identifiable for Store {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for Store {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl Store {
    /// Single-line mailing address
    pub fn address_string(&self) -> String {
        format!("{} {}, {} {}", self.address, self.city, self.state, self.zip)
    }
}

/// New store creation parameters
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewStore {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub phone: String,
    #[validate(email)]
    pub email: String,
    #[validate(url)]
    pub url: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lng: f64,
}
