//! Cocktail routes
//!
//! Reads are public; every mutation goes through the bearer-token guard.

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post, put},
};
use cocktail_auth::{AuthUser, JwtManager, auth_middleware};
use cocktail_db::Cocktail;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::extract::{ApiJson, ResourceId};
use crate::state::AppState;

use super::types::{
    CreateCocktailRequest, CreatedResponse, DataResponse, MessageResponse, UpdateCocktailRequest,
};

fn cocktail_not_found() -> ApiError {
    ApiError::NotFound("This cocktail does not exist !".to_string())
}

/// GET /cocktails
async fn list_cocktails(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<Cocktail>>>, ApiError> {
    let cocktails = state.db.list_cocktails().await?;
    Ok(Json(DataResponse { data: cocktails }))
}

/// GET /cocktails/{id}
async fn get_cocktail(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<Json<DataResponse<Cocktail>>, ApiError> {
    let cocktail = state
        .db
        .get_cocktail_by_id(id)
        .await?
        .ok_or_else(cocktail_not_found)?;

    Ok(Json(DataResponse { data: cocktail }))
}

/// PUT|POST /cocktails
async fn create_cocktail(
    Extension(current): Extension<AuthUser>,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateCocktailRequest>,
) -> Result<Json<CreatedResponse<Cocktail>>, ApiError> {
    let new_cocktail = request.validate()?;

    debug!("Creating cocktail: {}", new_cocktail.nom);

    if state.db.get_cocktail_by_nom(&new_cocktail.nom).await?.is_some() {
        return Err(ApiError::Conflict(format!(
            "The cocktail {} already exists !",
            new_cocktail.nom
        )));
    }

    let cocktail = state.db.insert_cocktail(new_cocktail).await?;

    info!("Cocktail {} created by {}", cocktail.nom, current.email);

    Ok(Json(CreatedResponse {
        message: "Cocktail Created".to_string(),
        data: cocktail,
    }))
}

/// PATCH /cocktails/{id}
async fn update_cocktail(
    Extension(current): Extension<AuthUser>,
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    ApiJson(request): ApiJson<UpdateCocktailRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let changes = request.validate()?;

    debug!("Updating cocktail: {}", id);

    // Verify cocktail exists
    state
        .db
        .get_cocktail_by_id(id)
        .await?
        .ok_or_else(cocktail_not_found)?;

    state.db.update_cocktail(id, changes).await?;

    info!("Cocktail {} updated by {}", id, current.email);

    Ok(Json(MessageResponse {
        message: "Cocktail Updated".to_string(),
    }))
}

/// POST /cocktails/untrash/{id}
async fn restore_cocktail(
    Extension(current): Extension<AuthUser>,
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, ApiError> {
    if state.db.restore_cocktail(id).await? {
        info!("Cocktail {} restored by {}", id, current.email);
    }

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /cocktails/trash/{id}
async fn trash_cocktail(
    Extension(current): Extension<AuthUser>,
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, ApiError> {
    if state.db.trash_cocktail(id).await? {
        info!("Cocktail {} trashed by {}", id, current.email);
    }

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /cocktails/{id}
async fn delete_cocktail(
    Extension(current): Extension<AuthUser>,
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, ApiError> {
    if state.db.delete_cocktail(id).await? {
        info!("Cocktail {} deleted by {}", id, current.email);
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Create cocktail routes
pub fn routes(jwt: Arc<JwtManager>) -> Router<AppState> {
    let guard = from_fn_with_state(jwt, auth_middleware);

    Router::new()
        .route(
            "/cocktails",
            get(list_cocktails).merge(
                put(create_cocktail)
                    .post(create_cocktail)
                    .route_layer(guard.clone()),
            ),
        )
        .route(
            "/cocktails/{id}",
            get(get_cocktail).merge(
                patch(update_cocktail)
                    .delete(delete_cocktail)
                    .route_layer(guard.clone()),
            ),
        )
        .route(
            "/cocktails/trash/{id}",
            delete(trash_cocktail).route_layer(guard.clone()),
        )
        .route(
            "/cocktails/untrash/{id}",
            post(restore_cocktail).route_layer(guard),
        )
}
