//! Catalog store abstractions
//!
//! Consumer-facing traits for the resource CRUD around the auth
//! subsystem. Handlers depend on these, not on the concrete sqlx
//! repositories, so API tests can run against fakes.

use async_trait::async_trait;

use scoop_core::pagination::Pagination;
use scoop_core::traits::Id;
use scoop_models::flavor::{Flavor, NewFlavor};
use scoop_models::ingredient::Ingredient;
use scoop_models::store::{NewStore, Store};

use crate::repository::RepositoryResult;

/// Store locations
#[async_trait]
pub trait StoreCatalog: Send + Sync {
    async fn list(&self, pagination: &Pagination) -> RepositoryResult<Vec<Store>>;
    async fn get(&self, id: Id) -> RepositoryResult<Store>;
    async fn insert(&self, new: NewStore) -> RepositoryResult<Store>;
    async fn update(&self, id: Id, new: NewStore) -> RepositoryResult<Store>;
    async fn count(&self) -> RepositoryResult<i64>;
}

/// Flavors and their ingredient lists
#[async_trait]
pub trait FlavorCatalog: Send + Sync {
    async fn list(&self, pagination: &Pagination) -> RepositoryResult<Vec<Flavor>>;
    async fn get(&self, id: Id) -> RepositoryResult<Flavor>;
    async fn insert(&self, new: NewFlavor) -> RepositoryResult<Flavor>;
    async fn count(&self) -> RepositoryResult<i64>;
}

/// Ingredients
#[async_trait]
pub trait IngredientCatalog: Send + Sync {
    async fn search(
        &self,
        pagination: &Pagination,
        terms: &[String],
    ) -> RepositoryResult<Vec<Ingredient>>;
    async fn get(&self, id: Id) -> RepositoryResult<Ingredient>;
}
