//! # scoop-db
//!
//! PostgreSQL persistence for the Scoops backend: the connection pool,
//! the identity store implementation consumed by the auth subsystem, and
//! the catalog repositories (stores, flavors, ingredients).
//!
//! The reference schema lives in `schema.sql` at the crate root.

pub mod catalog;
pub mod flavors;
pub mod ingredients;
pub mod pool;
pub mod repository;
pub mod stores;
pub mod users;

pub use catalog::{FlavorCatalog, IngredientCatalog, StoreCatalog};
pub use flavors::FlavorRepository;
pub use ingredients::IngredientRepository;
pub use pool::{Database, DatabaseConfig};
pub use repository::{RepositoryError, RepositoryResult};
pub use stores::StoreRepository;
pub use users::UserRepository;
