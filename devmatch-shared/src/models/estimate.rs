/// Estimate model: a company's rating of a user
///
/// Companies that have worked with a developer leave an estimate: a 1–5
/// score and an optional comment. Estimates are append-only; there is no
/// update path.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE estimates (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     score INTEGER NOT NULL CHECK (score BETWEEN 1 AND 5),
///     comment TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Estimate row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Estimate {
    /// Unique estimate ID (UUID v4)
    pub id: Uuid,

    /// Company that left the estimate
    pub company_id: Uuid,

    /// User being rated
    pub user_id: Uuid,

    /// Score from 1 to 5
    pub score: i32,

    /// Optional free-text comment
    pub comment: Option<String>,

    /// When the estimate was registered
    pub created_at: DateTime<Utc>,
}

/// Input for registering an estimate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEstimate {
    /// Company that leaves the estimate
    pub company_id: Uuid,

    /// User being rated
    pub user_id: Uuid,

    /// Score from 1 to 5
    pub score: i32,

    /// Optional free-text comment
    pub comment: Option<String>,
}

impl Estimate {
    /// Registers an estimate
    ///
    /// # Errors
    ///
    /// Returns an error if the company or user does not exist (foreign key
    /// violation) or the score is outside 1–5 (check constraint).
    pub async fn create(pool: &PgPool, data: CreateEstimate) -> Result<Self, sqlx::Error> {
        let estimate = sqlx::query_as::<_, Estimate>(
            r#"
            INSERT INTO estimates (company_id, user_id, score, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING id, company_id, user_id, score, comment, created_at
            "#,
        )
        .bind(data.company_id)
        .bind(data.user_id)
        .bind(data.score)
        .bind(data.comment)
        .fetch_one(pool)
        .await?;

        Ok(estimate)
    }

    /// Lists the estimates a user has received, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let estimates = sqlx::query_as::<_, Estimate>(
            r#"
            SELECT id, company_id, user_id, score, comment, created_at
            FROM estimates
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(estimates)
    }

    /// Average score a user has received, if any estimates exist
    pub async fn average_for_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Option<f64>, sqlx::Error> {
        let (avg,): (Option<f64>,) = sqlx::query_as(
            "SELECT AVG(score)::float8 FROM estimates WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(avg)
    }
}
