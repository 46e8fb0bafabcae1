//! Application state

use cocktail_auth::{CredentialVerifier, JwtManager};
use cocktail_db::Database;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub verifier: Arc<CredentialVerifier>,
    /// Argon2 time cost for newly hashed passwords
    pub hash_cost: u32,
}

impl AppState {
    pub fn new(
        db: Database,
        jwt: Arc<JwtManager>,
        verifier: Arc<CredentialVerifier>,
        hash_cost: u32,
    ) -> Self {
        Self {
            db,
            jwt,
            verifier,
            hash_cost,
        }
    }
}

/// Build a state over a fresh in-memory database
#[cfg(test)]
pub(crate) async fn create_test_state() -> AppState {
    let db = Database::in_memory().await.unwrap();
    let jwt = Arc::new(JwtManager::new("test-secret", chrono::Duration::hours(1)).unwrap());
    let verifier = Arc::new(CredentialVerifier::new(Arc::new(db.clone()), 1).unwrap());
    AppState::new(db, jwt, verifier, 1)
}
