//! User management routes

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
};
use cocktail_auth::{AuthUser, JwtManager, auth_middleware, hash_password};
use cocktail_db::{User, UserChanges};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::extract::{ApiJson, ResourceId};
use crate::state::AppState;

use super::types::{
    CreateUserRequest, CreatedResponse, DataResponse, MessageResponse, UpdateUserRequest,
};

fn user_not_found() -> ApiError {
    ApiError::NotFound("This user does not exist !".to_string())
}

/// GET /users
async fn list_users(State(state): State<AppState>) -> Result<Json<DataResponse<Vec<User>>>, ApiError> {
    let users = state.db.list_users().await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /users/{id}
async fn get_user(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<Json<DataResponse<User>>, ApiError> {
    let user = state.db.get_user_by_id(id).await?.ok_or_else(user_not_found)?;

    Ok(Json(DataResponse { data: user }))
}

/// PUT|POST /users
async fn create_user(
    Extension(current): Extension<AuthUser>,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<Json<CreatedResponse<User>>, ApiError> {
    let draft = request.validate()?;

    debug!("Creating user: {}", draft.email);

    // Checked here for the message; the unique index catches concurrent creates
    if state.db.get_user_by_email(&draft.email).await?.is_some() {
        return Err(ApiError::Conflict(format!(
            "The user {} already exists !",
            draft.nom
        )));
    }

    let password_hash = hash_password(&draft.password, state.hash_cost)?;
    let user = state.db.insert_user(draft.into_new_user(password_hash)).await?;

    info!("User {} created by {}", user.email, current.email);

    Ok(Json(CreatedResponse {
        message: "User Created".to_string(),
        data: user,
    }))
}

/// PATCH /users/{id}
async fn update_user(
    Extension(current): Extension<AuthUser>,
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let request = request.validate()?;

    debug!("Updating user: {}", id);

    // Verify user exists
    state.db.get_user_by_id(id).await?.ok_or_else(user_not_found)?;

    let password_hash = match &request.password {
        Some(password) => Some(hash_password(password, state.hash_cost)?),
        None => None,
    };

    let changes = UserChanges {
        nom: request.nom,
        prenom: request.prenom,
        pseudo: request.pseudo,
        email: request.email,
        password_hash,
    };
    state.db.update_user(id, changes).await?;

    info!("User {} updated by {}", id, current.email);

    Ok(Json(MessageResponse {
        message: "User Updated".to_string(),
    }))
}

/// POST /users/untrash/{id}
async fn restore_user(
    Extension(current): Extension<AuthUser>,
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, ApiError> {
    if state.db.restore_user(id).await? {
        info!("User {} restored by {}", id, current.email);
    }

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /users/trash/{id}
async fn trash_user(
    Extension(current): Extension<AuthUser>,
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, ApiError> {
    if state.db.trash_user(id).await? {
        info!("User {} trashed by {}", id, current.email);
    }

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /users/{id}
async fn delete_user(
    Extension(current): Extension<AuthUser>,
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, ApiError> {
    if state.db.delete_user(id).await? {
        info!("User {} deleted by {}", id, current.email);
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Create user routes, all behind the bearer-token guard
pub fn routes(jwt: Arc<JwtManager>) -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).put(create_user).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/users/trash/{id}", delete(trash_user))
        .route("/users/untrash/{id}", post(restore_user))
        .route_layer(from_fn_with_state(jwt, auth_middleware))
}

#[cfg(test)]
mod tests {
    use crate::routes::create_router;
    use crate::routes::test_util::{seed_user, send, token_for};
    use crate::state::create_test_state;
    use axum::http::{Method, StatusCode};
    use cocktail_auth::verify_password;
    use serde_json::json;

    fn jane() -> serde_json::Value {
        json!({
            "nom": "Martin",
            "prenom": "Jeanne",
            "pseudo": "jmartin",
            "email": "jeanne@example.com",
            "password": "plaintext-pass"
        })
    }

    #[tokio::test]
    async fn test_users_require_token() {
        let app = create_router(create_test_state().await);

        let (status, _) = send(&app, Method::GET, "/users", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, Method::PUT, "/users", None, Some(jane())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, Method::GET, "/users/1", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let state = create_test_state().await;
        let admin = seed_user(&state, "admin@example.com", "admin").await;
        let token = token_for(&state, &admin);
        let db = state.db.clone();
        let app = create_router(state);

        let (status, body) = send(&app, Method::PUT, "/users", Some(&token), Some(jane())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "User Created");
        assert_eq!(body["data"]["email"], "jeanne@example.com");
        assert!(body["data"].get("password").is_none());
        assert!(body["data"].get("password_hash").is_none());
        assert!(!body.to_string().contains("plaintext-pass"));

        let stored = db
            .get_credential_by_email("jeanne@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password_hash, "plaintext-pass");
        assert!(verify_password("plaintext-pass", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_create_user_conflict_on_active_email() {
        let state = create_test_state().await;
        let admin = seed_user(&state, "admin@example.com", "admin").await;
        let token = token_for(&state, &admin);
        let app = create_router(state);

        let (status, _) = send(&app, Method::POST, "/users", Some(&token), Some(jane())).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::POST, "/users", Some(&token), Some(jane())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "The user Martin already exists !");
    }

    #[tokio::test]
    async fn test_create_user_after_trash_succeeds() {
        let state = create_test_state().await;
        let admin = seed_user(&state, "admin@example.com", "admin").await;
        let token = token_for(&state, &admin);
        let app = create_router(state);

        let (_, body) = send(&app, Method::PUT, "/users", Some(&token), Some(jane())).await;
        let id = body["data"]["id"].as_i64().unwrap();

        let uri = format!("/users/trash/{}", id);
        let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, Method::PUT, "/users", Some(&token), Some(jane())).await;
        assert_eq!(status, StatusCode::OK);

        // Restoring the first account would duplicate the active email
        let uri = format!("/users/untrash/{}", id);
        let (status, _) = send(&app, Method::POST, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_user_missing_data() {
        let state = create_test_state().await;
        let admin = seed_user(&state, "admin@example.com", "admin").await;
        let token = token_for(&state, &admin);
        let app = create_router(state);

        let body = json!({ "nom": "Martin", "email": "jeanne@example.com" });
        let (status, body) = send(&app, Method::PUT, "/users", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Missing Data");
    }

    #[tokio::test]
    async fn test_patch_user_with_invalid_id() {
        let state = create_test_state().await;
        let admin = seed_user(&state, "admin@example.com", "admin").await;
        let token = token_for(&state, &admin);
        let app = create_router(state);

        let body = json!({ "pseudo": "x" });
        let (status, body) = send(&app, Method::PATCH, "/users/abc", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Missing parameter");

        // The id is checked before the body is read
        let (status, body) = send(&app, Method::PATCH, "/users/abc", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Missing parameter");
    }

    #[tokio::test]
    async fn test_patch_user() {
        let state = create_test_state().await;
        let admin = seed_user(&state, "admin@example.com", "admin").await;
        let token = token_for(&state, &admin);
        let db = state.db.clone();
        let app = create_router(state);

        let uri = format!("/users/{}", admin.id);
        let body = json!({ "pseudo": "boss", "password": "new-password" });
        let (status, body) = send(&app, Method::PATCH, &uri, Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "User Updated" }));

        let stored = db.get_user_by_id(admin.id).await.unwrap().unwrap();
        assert_eq!(stored.pseudo, "boss");
        assert_eq!(stored.nom, "Doe");
        assert_ne!(stored.password_hash, "new-password");
        assert!(verify_password("new-password", &stored.password_hash).unwrap());

        let (status, body) = send(&app, Method::PATCH, "/users/999", Some(&token), Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "This user does not exist !");
    }

    #[tokio::test]
    async fn test_get_list_and_hard_delete_user() {
        let state = create_test_state().await;
        let admin = seed_user(&state, "admin@example.com", "admin").await;
        let token = token_for(&state, &admin);
        let app = create_router(state);

        let (_, body) = send(&app, Method::PUT, "/users", Some(&token), Some(jane())).await;
        let id = body["data"]["id"].as_i64().unwrap();

        let uri = format!("/users/{}", id);
        let (status, body) = send(&app, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["pseudo"], "jmartin");

        let (_, body) = send(&app, Method::GET, "/users", Some(&token), None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let (status, body) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_null());

        let (status, _) = send(&app, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // Deleting again is still a no-content success
        let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
