//! API routes

mod auth;
mod cocktails;
pub mod types;
mod users;

use axum::{Router, routing::get};

use crate::error::ApiError;
use crate::state::AppState;

/// Liveness message on `/`
async fn online() -> &'static str {
    "I'm online. All is OK !"
}

/// Catch-all for unknown paths and unsupported methods
async fn not_implemented() -> ApiError {
    ApiError::NotImplemented
}

/// Create the main router
///
/// The users collection is gated entirely; cocktails only on mutations.
/// Login and reads stay public.
pub fn create_router(state: AppState) -> Router {
    let jwt = state.jwt.clone();

    Router::new()
        .route("/", get(online))
        .merge(auth::routes())
        .merge(users::routes(jwt.clone()))
        .merge(cocktails::routes(jwt))
        .fallback(not_implemented)
        .method_not_allowed_fallback(not_implemented)
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_util {
    use axum::{
        Router,
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use cocktail_auth::{AuthUser, hash_password};
    use cocktail_db::{NewUser, User};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::state::AppState;

    /// Send one request through the router and decode the JSON body, if any
    pub async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    /// Insert an account directly in the store
    pub async fn seed_user(state: &AppState, email: &str, password: &str) -> User {
        state
            .db
            .insert_user(NewUser {
                nom: "Doe".to_string(),
                prenom: "Jane".to_string(),
                pseudo: "jdoe".to_string(),
                email: email.to_string(),
                password_hash: hash_password(password, state.hash_cost).unwrap(),
            })
            .await
            .unwrap()
    }

    /// Issue a token for a seeded account
    pub fn token_for(state: &AppState, user: &User) -> String {
        state
            .jwt
            .generate_token(&AuthUser {
                id: user.id,
                nom: user.nom.clone(),
                prenom: user.prenom.clone(),
                email: user.email.clone(),
            })
            .unwrap()
    }
}
