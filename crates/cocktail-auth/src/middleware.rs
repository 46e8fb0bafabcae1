//! Authentication middleware for Axum

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use cocktail_db::Credential;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::AuthError;
use crate::jwt::{Claims, JwtManager};

/// Authenticated user information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub nom: String,
    pub prenom: String,
    pub email: String,
}

impl AuthUser {
    /// Create from JWT claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            id: claims.id,
            nom: claims.nom.clone(),
            prenom: claims.prenom.clone(),
            email: claims.email.clone(),
        }
    }
}

impl From<&Credential> for AuthUser {
    fn from(credential: &Credential) -> Self {
        Self {
            id: credential.id,
            nom: credential.nom.clone(),
            prenom: credential.prenom.clone(),
            email: credential.email.clone(),
        }
    }
}

/// Extract bearer token from authorization header
fn extract_bearer_token(header: &str) -> Result<&str, AuthError> {
    let (scheme, token) = header
        .trim()
        .split_once(' ')
        .ok_or(AuthError::InvalidAuthHeader)?;

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthError::InvalidAuthHeader);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(token)
}

/// Authentication middleware
///
/// Rejects the request with 401 unless it carries a valid, unexpired bearer
/// token. On success the decoded `AuthUser` is added to request extensions
/// and the request continues to the handler.
pub async fn auth_middleware(
    State(jwt_manager): State<Arc<JwtManager>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let result = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)
        .and_then(|h| h.to_str().map_err(|_| AuthError::InvalidAuthHeader))
        .and_then(extract_bearer_token)
        .and_then(|token| jwt_manager.validate_token(token));

    let claims = match result {
        Ok(claims) => claims,
        Err(e) => {
            warn!(
                method = %request.method(),
                path = %request.uri().path(),
                "Rejected request: {}",
                e
            );
            return Err(e);
        }
    };

    let user = AuthUser::from_claims(&claims);
    debug!("Authenticated user: {} ({})", user.email, user.id);

    // Add user to request extensions
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
