//! Cocktail operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{Cocktail, CocktailChanges, NewCocktail};
use crate::repository::Database;

impl Database {
    // ==================== Cocktail Operations ====================

    /// Insert a new cocktail
    pub async fn insert_cocktail(&self, cocktail: NewCocktail) -> Result<Cocktail, DbError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO cocktails (user_id, nom, description, recette, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(cocktail.user_id)
        .bind(&cocktail.nom)
        .bind(&cocktail.description)
        .bind(&cocktail.recette)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DbError::from_write(e, || format!("Cocktail '{}' already exists", cocktail.nom))
        })?;

        let id: i64 = result.get("id");

        Ok(Cocktail {
            id,
            user_id: cocktail.user_id,
            nom: cocktail.nom,
            description: cocktail.description,
            recette: cocktail.recette,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Get an active cocktail by name
    pub async fn get_cocktail_by_nom(&self, nom: &str) -> Result<Option<Cocktail>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, user_id, nom, description, recette, created_at, updated_at, deleted_at
            FROM cocktails
            WHERE nom = ? AND deleted_at IS NULL
            "#,
        )
        .bind(nom)
        .fetch_optional(&self.pool)
        .await?;

        result
            .map(|row| Cocktail::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// Get an active cocktail by ID
    pub async fn get_cocktail_by_id(&self, id: i64) -> Result<Option<Cocktail>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, user_id, nom, description, recette, created_at, updated_at, deleted_at
            FROM cocktails
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result
            .map(|row| Cocktail::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// List all active cocktails
    pub async fn list_cocktails(&self) -> Result<Vec<Cocktail>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, nom, description, recette, created_at, updated_at, deleted_at
            FROM cocktails
            WHERE deleted_at IS NULL
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Cocktail::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Apply a partial update to an active cocktail
    ///
    /// Returns `false` when no active cocktail has this ID.
    pub async fn update_cocktail(&self, id: i64, changes: CocktailChanges) -> Result<bool, DbError> {
        let now = Utc::now();

        // Build dynamic update query
        let mut updates = vec!["updated_at = ?"];
        if changes.user_id.is_some() {
            updates.push("user_id = ?");
        }
        if changes.nom.is_some() {
            updates.push("nom = ?");
        }
        if changes.description.is_some() {
            updates.push("description = ?");
        }
        if changes.recette.is_some() {
            updates.push("recette = ?");
        }

        let sql = format!(
            "UPDATE cocktails SET {} WHERE id = ? AND deleted_at IS NULL",
            updates.join(", ")
        );
        let mut query = sqlx::query(&sql).bind(now.to_rfc3339());

        // Bind optional fields in the same order as updates
        if let Some(v) = changes.user_id {
            query = query.bind(v);
        }
        if let Some(ref v) = changes.nom {
            query = query.bind(v);
        }
        if let Some(ref v) = changes.description {
            query = query.bind(v);
        }
        if let Some(ref v) = changes.recette {
            query = query.bind(v);
        }

        let result = query.bind(id).execute(&self.pool).await.map_err(|e| {
            DbError::from_write(e, || {
                format!(
                    "Cocktail '{}' already exists",
                    changes.nom.as_deref().unwrap_or_default()
                )
            })
        })?;
        Ok(result.rows_affected() > 0)
    }

    /// Move a cocktail to the trash (soft delete)
    pub async fn trash_cocktail(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE cocktails
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

    /// Take a cocktail out of the trash
    pub async fn restore_cocktail(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE cocktails
            SET deleted_at = NULL
            WHERE id = ? AND deleted_at IS NOT NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DbError::from_write(e, || format!("Name of cocktail {} is already in use", id))
        })?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a cocktail, trashed or not
    pub async fn delete_cocktail(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM cocktails WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
