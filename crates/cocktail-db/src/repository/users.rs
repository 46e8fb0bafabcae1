//! User operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{Credential, NewUser, User, UserChanges};
use crate::repository::Database;

impl Database {
    // ==================== User Operations ====================

    /// Insert a new user
    ///
    /// The partial unique index on `email` rejects a second active account
    /// with the same email as `DbError::Duplicate`.
    pub async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (nom, prenom, pseudo, email, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&user.nom)
        .bind(&user.prenom)
        .bind(&user.pseudo)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from_write(e, || format!("User '{}' already exists", user.email)))?;

        let id: i64 = result.get("id");

        Ok(User {
            id,
            nom: user.nom,
            prenom: user.prenom,
            pseudo: user.pseudo,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Get an active user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, nom, prenom, pseudo, email, password_hash, created_at, updated_at, deleted_at
            FROM users
            WHERE email = ? AND deleted_at IS NULL
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get the login credential of an active user
    pub async fn get_credential_by_email(&self, email: &str) -> Result<Option<Credential>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, nom, prenom, email, password_hash
            FROM users
            WHERE email = ? AND deleted_at IS NULL
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        result
            .map(|row| Credential::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// Get an active user by ID
    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, nom, prenom, pseudo, email, password_hash, created_at, updated_at, deleted_at
            FROM users
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all active users
    pub async fn list_users(&self) -> Result<Vec<User>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, nom, prenom, pseudo, email, password_hash, created_at, updated_at, deleted_at
            FROM users
            WHERE deleted_at IS NULL
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| User::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Apply a partial update to an active user
    ///
    /// Returns `false` when no active user has this ID.
    pub async fn update_user(&self, id: i64, changes: UserChanges) -> Result<bool, DbError> {
        let now = Utc::now();

        // Build dynamic update query
        let mut updates = vec!["updated_at = ?"];
        if changes.nom.is_some() {
            updates.push("nom = ?");
        }
        if changes.prenom.is_some() {
            updates.push("prenom = ?");
        }
        if changes.pseudo.is_some() {
            updates.push("pseudo = ?");
        }
        if changes.email.is_some() {
            updates.push("email = ?");
        }
        if changes.password_hash.is_some() {
            updates.push("password_hash = ?");
        }

        let sql = format!(
            "UPDATE users SET {} WHERE id = ? AND deleted_at IS NULL",
            updates.join(", ")
        );
        let mut query = sqlx::query(&sql).bind(now.to_rfc3339());

        // Bind optional fields in the same order as updates
        if let Some(ref v) = changes.nom {
            query = query.bind(v);
        }
        if let Some(ref v) = changes.prenom {
            query = query.bind(v);
        }
        if let Some(ref v) = changes.pseudo {
            query = query.bind(v);
        }
        if let Some(ref v) = changes.email {
            query = query.bind(v);
        }
        if let Some(ref v) = changes.password_hash {
            query = query.bind(v);
        }

        let result = query.bind(id).execute(&self.pool).await.map_err(|e| {
            DbError::from_write(e, || {
                format!(
                    "User '{}' already exists",
                    changes.email.as_deref().unwrap_or_default()
                )
            })
        })?;
        Ok(result.rows_affected() > 0)
    }

    /// Move a user to the trash (soft delete)
    pub async fn trash_user(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET deleted_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Take a user out of the trash
    pub async fn restore_user(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET deleted_at = NULL
            WHERE id = ? AND deleted_at IS NOT NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_write(e, || format!("Email of user {} is already in use", id)))?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a user, trashed or not
    pub async fn delete_user(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check if any active users exist
    pub async fn has_users(&self) -> Result<bool, DbError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM users WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = result.get("count");
        Ok(count > 0)
    }
}
