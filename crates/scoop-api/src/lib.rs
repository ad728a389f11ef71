//! # scoop-api
//!
//! The REST surface of the Scoops backend: axum handlers, the session and
//! capability middleware, and the route table.
//!
//! Request flow on protected routes: session middleware (token
//! verification + live identity resolution) → capability guard (required
//! set vs. held grants) → handler.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
