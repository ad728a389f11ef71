//! # scoop-models
//!
//! Domain models for the Scoops backend: users and their permission
//! grants, plus the catalog entities (stores, flavors, ingredients).

pub mod flavor;
pub mod ingredient;
pub mod permission;
pub mod store;
pub mod user;

pub use flavor::*;
pub use ingredient::*;
pub use permission::*;
pub use store::*;
pub use user::*;
