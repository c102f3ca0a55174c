/*
 * Responsibility
 * - drinks CRUD
 * - `recipe` is stored as a serialized JSON document; shaping to short/long
 *   representations happens in the handler layer
 */
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::error::RepoError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DrinkRow {
    pub id: i64,
    pub title: String,
    pub recipe: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub async fn list(pool: &PgPool) -> Result<Vec<DrinkRow>, RepoError> {
    let rows = sqlx::query_as::<_, DrinkRow>(
        r#"
        SELECT id, title, recipe, created_at, updated_at
        FROM drinks
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn create(pool: &PgPool, title: &str, recipe: &str) -> Result<DrinkRow, RepoError> {
    let row = sqlx::query_as::<_, DrinkRow>(
        r#"
        INSERT INTO drinks (title, recipe)
        VALUES ($1, $2)
        RETURNING id, title, recipe, created_at, updated_at
        "#,
    )
    .bind(title)
    .bind(recipe)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    title: Option<&str>,
    recipe: Option<&str>,
) -> Result<Option<DrinkRow>, RepoError> {
    let row = sqlx::query_as::<_, DrinkRow>(
        r#"
        UPDATE drinks
        SET
            title = COALESCE($2, title),
            recipe = COALESCE($3, recipe),
            updated_at = now()
        WHERE id = $1
        RETURNING id, title, recipe, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(recipe)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM drinks
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
