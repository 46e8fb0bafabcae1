//! Request/Response DTOs
//!
//! Request fields are all optional at the serde level so that a body with
//! missing fields reaches `validate()` and gets the API's own message instead
//! of a generic deserialization error.

use cocktail_db::{CocktailChanges, NewCocktail, NewUser};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Keep a value only if it is present and non-blank
fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A provided patch value must not be blank
fn optional(value: Option<String>) -> Result<Option<String>, ApiError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(ApiError::BadRequest("Invalid Data".to_string())),
        other => Ok(other),
    }
}

// ==================== Generic Envelopes ====================

/// `{ data }` envelope for reads
#[derive(Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// `{ message, data }` envelope for creations
#[derive(Serialize, Deserialize)]
pub struct CreatedResponse<T> {
    pub message: String,
    pub data: T,
}

/// `{ message }` envelope for updates
#[derive(Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// ==================== Auth Types ====================

/// Login request
#[derive(Deserialize, Default)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    /// Both email and password must be present
    pub fn credentials(&self) -> Result<(&str, &str), ApiError> {
        match (self.email.as_deref(), self.password.as_deref()) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Ok((email, password))
            }
            _ => Err(ApiError::BadRequest("Bad email or password".to_string())),
        }
    }
}

/// Login response
#[derive(Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

// ==================== User Types ====================

/// Create user request
#[derive(Deserialize, Default)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub nom: Option<String>,
    #[serde(default)]
    pub prenom: Option<String>,
    #[serde(default)]
    pub pseudo: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// A user creation that passed validation; the password is still plaintext
pub struct UserDraft {
    pub nom: String,
    pub prenom: String,
    pub pseudo: String,
    pub email: String,
    pub password: String,
}

impl CreateUserRequest {
    pub fn validate(self) -> Result<UserDraft, ApiError> {
        match (
            required(self.nom),
            required(self.prenom),
            required(self.pseudo),
            required(self.email),
            required(self.password),
        ) {
            (Some(nom), Some(prenom), Some(pseudo), Some(email), Some(password)) => Ok(UserDraft {
                nom,
                prenom,
                pseudo,
                email,
                password,
            }),
            _ => Err(ApiError::missing_data()),
        }
    }
}

impl UserDraft {
    /// Swap the plaintext password for its hash
    pub fn into_new_user(self, password_hash: String) -> NewUser {
        NewUser {
            nom: self.nom,
            prenom: self.prenom,
            pseudo: self.pseudo,
            email: self.email,
            password_hash,
        }
    }
}

/// Update user request
#[derive(Deserialize, Default)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub nom: Option<String>,
    #[serde(default)]
    pub prenom: Option<String>,
    #[serde(default)]
    pub pseudo: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(self) -> Result<Self, ApiError> {
        Ok(Self {
            nom: optional(self.nom)?,
            prenom: optional(self.prenom)?,
            pseudo: optional(self.pseudo)?,
            email: optional(self.email)?,
            password: optional(self.password)?,
        })
    }
}

// ==================== Cocktail Types ====================

/// Create cocktail request
#[derive(Deserialize, Default)]
pub struct CreateCocktailRequest {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub nom: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub recette: Option<String>,
}

impl CreateCocktailRequest {
    pub fn validate(self) -> Result<NewCocktail, ApiError> {
        match (
            self.user_id.filter(|id| *id > 0),
            required(self.nom),
            required(self.description),
            required(self.recette),
        ) {
            (Some(user_id), Some(nom), Some(description), Some(recette)) => Ok(NewCocktail {
                user_id,
                nom,
                description,
                recette,
            }),
            _ => Err(ApiError::missing_data()),
        }
    }
}

/// Update cocktail request
#[derive(Deserialize, Default)]
pub struct UpdateCocktailRequest {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub nom: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub recette: Option<String>,
}

impl UpdateCocktailRequest {
    pub fn validate(self) -> Result<CocktailChanges, ApiError> {
        if matches!(self.user_id, Some(id) if id <= 0) {
            return Err(ApiError::BadRequest("Invalid Data".to_string()));
        }

        Ok(CocktailChanges {
            user_id: self.user_id,
            nom: optional(self.nom)?,
            description: optional(self.description)?,
            recette: optional(self.recette)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_credentials_require_both_fields() {
        let request = LoginRequest {
            email: Some("a@b.com".to_string()),
            password: None,
        };
        assert!(request.credentials().is_err());

        let request = LoginRequest {
            email: Some("".to_string()),
            password: Some("secret".to_string()),
        };
        assert!(request.credentials().is_err());

        let request = LoginRequest {
            email: Some("a@b.com".to_string()),
            password: Some("secret".to_string()),
        };
        assert_eq!(request.credentials().unwrap(), ("a@b.com", "secret"));
    }

    #[test]
    fn test_create_user_requires_every_field() {
        let complete = || CreateUserRequest {
            nom: Some("Doe".to_string()),
            prenom: Some("Jane".to_string()),
            pseudo: Some("jdoe".to_string()),
            email: Some("jane@example.com".to_string()),
            password: Some("secret".to_string()),
        };
        assert!(complete().validate().is_ok());

        assert!(CreateUserRequest { pseudo: None, ..complete() }.validate().is_err());
        assert!(
            CreateUserRequest { password: Some("  ".to_string()), ..complete() }
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_create_cocktail_rejects_zero_user_id() {
        let request = CreateCocktailRequest {
            user_id: Some(0),
            nom: Some("Mojito".to_string()),
            description: Some("Cuban highball".to_string()),
            recette: Some("Rum, lime, mint".to_string()),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_cocktail_keeps_absent_fields_absent() {
        let changes = UpdateCocktailRequest {
            recette: Some("Rum, lime".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap();

        assert!(changes.nom.is_none());
        assert!(changes.user_id.is_none());
        assert_eq!(changes.recette.as_deref(), Some("Rum, lime"));

        let blank = UpdateCocktailRequest {
            nom: Some("".to_string()),
            ..Default::default()
        };
        assert!(blank.validate().is_err());
    }
}
