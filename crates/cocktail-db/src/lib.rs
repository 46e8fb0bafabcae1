//! Cocktail API Database Layer
//!
//! This crate provides the persistence layer for the Cocktail API,
//! using SQLite via sqlx. Users and cocktails are soft-deletable:
//! trashed rows carry a `deleted_at` timestamp and are hidden from
//! default queries.

pub mod error;
pub mod models;
pub mod repository;
pub mod utils;

pub use error::DbError;
pub use models::*;
pub use repository::Database;
