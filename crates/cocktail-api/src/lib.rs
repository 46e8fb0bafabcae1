//! Cocktail REST API
//!
//! This crate provides the Axum-based HTTP API: login, the users
//! collection and the cocktails collection.

pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
