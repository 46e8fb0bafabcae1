//! Login route

use axum::{Json, Router, extract::State, routing::post};
use cocktail_auth::{AuthError, AuthUser, Verification};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

use super::types::{LoginRequest, LoginResponse};

/// POST /auth/login
async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (email, password) = request.credentials()?;

    debug!("Login attempt for: {}", email);

    let credential = match state.verifier.verify(email, password).await? {
        Verification::Match(credential) => credential,
        Verification::NoSuchAccount => return Err(AuthError::AccountNotFound.into()),
        Verification::WrongPassword => return Err(AuthError::WrongPassword.into()),
    };

    let access_token = state.jwt.generate_token(&AuthUser::from(&credential))?;

    info!("User {} logged in successfully", credential.email);

    Ok(Json(LoginResponse { access_token }))
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}
