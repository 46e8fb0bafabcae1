//! Cocktail API Authentication
//!
//! This crate provides the login flow and the bearer-token gate:
//! password hashing, credential verification, JWT issuance and the
//! axum middleware that guards protected routes.

pub mod error;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod verifier;

pub use error::AuthError;
pub use jwt::{Claims, JwtManager};
pub use middleware::{AuthUser, auth_middleware};
pub use password::{hash_password, verify_password};
pub use verifier::{CredentialStore, CredentialVerifier, Verification};
