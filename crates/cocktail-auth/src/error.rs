//! Authentication error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cocktail_db::DbError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("This account does not exists !")]
    AccountNotFound,

    #[error("Wrong password")]
    WrongPassword,

    #[error("Missing authorization header")]
    MissingAuthHeader,

    #[error("Invalid authorization header format")]
    InvalidAuthHeader,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("JWT secret is not configured")]
    MissingSecret,

    #[error("Token lifetime is out of range")]
    InvalidLifetime,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Credential store error: {0}")]
    Store(#[from] DbError),
}

impl AuthError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::AccountNotFound
            | AuthError::WrongPassword
            | AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::InvalidToken
            | AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
            AuthError::MissingSecret
            | AuthError::InvalidLifetime
            | AuthError::PasswordHash(_)
            | AuthError::Jwt(_)
            | AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AuthError::PasswordHash(e) => json!({ "message": "Hash Process Error", "error": e }),
            AuthError::Jwt(e) => json!({ "message": "Login process failed", "error": e.to_string() }),
            AuthError::Store(e) => json!({ "message": "Database Error", "error": e.to_string() }),
            _ => json!({ "message": self.to_string() }),
        };

        (status, axum::Json(body)).into_response()
    }
}
