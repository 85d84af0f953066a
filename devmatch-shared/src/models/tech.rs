/// Technology tag model
///
/// A tech is a named technology/skill tag (e.g. "Rust", "PostgreSQL").
/// Techs are immutable once created; projects reference them through the
/// `project_techs` join table.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE techs (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Technology tag row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tech {
    /// Unique tech ID (UUID v4)
    pub id: Uuid,

    /// Tag name, unique
    pub name: String,

    /// When the tag was created
    pub created_at: DateTime<Utc>,
}

impl Tech {
    /// Creates a tech tag
    ///
    /// # Errors
    ///
    /// Returns an error if the name already exists.
    pub async fn create(pool: &PgPool, name: &str) -> Result<Self, sqlx::Error> {
        let tech = sqlx::query_as::<_, Tech>(
            r#"
            INSERT INTO techs (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_one(pool)
        .await?;

        Ok(tech)
    }

    /// Finds a tech by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let tech = sqlx::query_as::<_, Tech>(
            "SELECT id, name, created_at FROM techs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(tech)
    }

    /// Finds a tech by name
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        let tech = sqlx::query_as::<_, Tech>(
            "SELECT id, name, created_at FROM techs WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(tech)
    }

    /// Lists all techs, alphabetically
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let techs = sqlx::query_as::<_, Tech>(
            "SELECT id, name, created_at FROM techs ORDER BY name ASC",
        )
        .fetch_all(pool)
        .await?;

        Ok(techs)
    }
}
