//! Flavor model

use chrono::{DateTime, Utc};
use scoop_core::traits::{Id, Identifiable, Timestamped};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::ingredient::Ingredient;

/// An ice cream flavor served at any of the chain's stores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flavor {
    pub id: Option<Id>,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Identifiable for Flavor {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for Flavor {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

/// New flavor creation parameters
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewFlavor {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: String,
    /// Ingredient names; unknown names are created on the fly
    #[serde(default)]
    pub ingredients: Vec<String>,
}
