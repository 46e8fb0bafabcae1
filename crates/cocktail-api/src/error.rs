//! API error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cocktail_auth::AuthError;
use cocktail_db::DbError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("What the hell are you doing !?!")]
    NotImplemented,

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),
}

impl ApiError {
    pub fn missing_data() -> Self {
        ApiError::BadRequest("Missing Data".to_string())
    }

    pub fn missing_parameter() -> Self {
        ApiError::BadRequest("Missing parameter".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Auth(e) => {
                if e.status().is_server_error() {
                    error!("Authentication failure: {}", e);
                }
                return e.into_response();
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "message": msg })),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "message": msg })),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "message": msg })),
            ApiError::NotImplemented => (
                StatusCode::NOT_IMPLEMENTED,
                json!({ "message": ApiError::NotImplemented.to_string() }),
            ),
            ApiError::Database(e) => match e {
                DbError::Duplicate(msg) => (StatusCode::CONFLICT, json!({ "message": msg })),
                _ => {
                    error!("Database error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        json!({ "message": "Database Error", "error": e.to_string() }),
                    )
                }
            },
        };

        (status, axum::Json(body)).into_response()
    }
}
