//! Credential verification for the login flow

use async_trait::async_trait;
use cocktail_db::{Credential, Database, DbError};
use std::sync::Arc;
use tracing::debug;

use crate::error::AuthError;
use crate::password::{hash_password, verify_password};

/// Read access to stored login credentials
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find the credential of the active account with this exact email
    async fn find_credential(&self, email: &str) -> Result<Option<Credential>, DbError>;
}

#[async_trait]
impl CredentialStore for Database {
    async fn find_credential(&self, email: &str) -> Result<Option<Credential>, DbError> {
        self.get_credential_by_email(email).await
    }
}

/// Outcome of a credential check
#[derive(Debug)]
pub enum Verification {
    Match(Credential),
    NoSuchAccount,
    WrongPassword,
}

/// Checks an email/password pair against the stored password hash
#[derive(Clone)]
pub struct CredentialVerifier {
    store: Arc<dyn CredentialStore>,
    /// Verified when the account does not exist, so both outcomes pay for one hash
    dummy_hash: String,
}

impl CredentialVerifier {
    /// Create a verifier; `hash_cost` should match the cost used for stored hashes
    pub fn new(store: Arc<dyn CredentialStore>, hash_cost: u32) -> Result<Self, AuthError> {
        let dummy_hash = hash_password("timing-equalization-placeholder", hash_cost)?;
        Ok(Self { store, dummy_hash })
    }

    /// Verify a login attempt
    ///
    /// Store faults are returned as `AuthError::Store`, never folded into a
    /// failed match.
    pub async fn verify(&self, email: &str, password: &str) -> Result<Verification, AuthError> {
        let credential = self.store.find_credential(email).await?;

        let Some(credential) = credential else {
            debug!("Login attempt for unknown account: {}", email);
            verify_password(password, &self.dummy_hash)?;
            return Ok(Verification::NoSuchAccount);
        };

        if verify_password(password, &credential.password_hash)? {
            Ok(Verification::Match(credential))
        } else {
            debug!("Wrong password for account: {}", email);
            Ok(Verification::WrongPassword)
        }
    }
}
