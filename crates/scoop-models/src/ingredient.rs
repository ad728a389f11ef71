//! Ingredient model

use scoop_core::traits::{Id, Identifiable};
use serde::{Deserialize, Serialize};

/// A flavor ingredient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: Option<Id>,
    pub name: String,
}

impl Identifiable for Ingredient {
    fn id(&self) -> Option<Id> {
        self.id
    }
}
