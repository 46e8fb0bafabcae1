//! Database models

use crate::utils::{parse_datetime_or_now, parse_optional_datetime};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

/// User model
///
/// The password hash never leaves the server: it is skipped on serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub nom: String,
    pub prenom: String,
    pub pseudo: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "deletedAt")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Cocktail model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cocktail {
    pub id: i64,
    pub user_id: i64,
    pub nom: String,
    pub description: String,
    pub recette: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "deletedAt")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Login credential of an active account
#[derive(Debug, Clone)]
pub struct Credential {
    pub id: i64,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub password_hash: String,
}

/// New user (for insertion). The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub nom: String,
    pub prenom: String,
    pub pseudo: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial user update; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub pseudo: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

/// New cocktail (for insertion)
#[derive(Debug, Clone)]
pub struct NewCocktail {
    pub user_id: i64,
    pub nom: String,
    pub description: String,
    pub recette: String,
}

/// Partial cocktail update; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct CocktailChanges {
    pub user_id: Option<i64>,
    pub nom: Option<String>,
    pub description: Option<String>,
    pub recette: Option<String>,
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.try_get("id")?,
            nom: row.try_get("nom")?,
            prenom: row.try_get("prenom")?,
            pseudo: row.try_get("pseudo")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
            deleted_at: parse_optional_datetime(row.try_get("deleted_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Cocktail {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Cocktail {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            nom: row.try_get("nom")?,
            description: row.try_get("description")?,
            recette: row.try_get("recette")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
            deleted_at: parse_optional_datetime(row.try_get("deleted_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Credential {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Credential {
            id: row.try_get("id")?,
            nom: row.try_get("nom")?,
            prenom: row.try_get("prenom")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
        })
    }
}
