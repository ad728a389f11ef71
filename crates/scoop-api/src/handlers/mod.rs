//! API request handlers

pub mod auth;
pub mod flavors;
pub mod ingredients;
pub mod stores;
pub mod users;
pub mod webhooks;
