/// User model and database operations
///
/// A user is a developer account. Username and email are unique; display
/// name is not. Companies look users up by username when registering an
/// estimate.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username CITEXT NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     email CITEXT NOT NULL UNIQUE,
///     name VARCHAR(255),
///     phone VARCHAR(32),
///     version BIGINT NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

use crate::patch::{coerce, PatchError, PatchTarget, Patchable};

/// User model representing a developer account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Login username (case-insensitive, unique)
    pub username: String,

    /// Argon2id password hash, never plaintext
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Contact email (case-insensitive, unique)
    pub email: String,

    /// Optional display name
    pub name: Option<String>,

    /// Optional contact phone number
    pub phone: Option<String>,

    /// Write counter, checked by optimistic patch persists
    pub version: i64,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Login username
    pub username: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    /// Contact email
    pub email: String,

    /// Optional display name
    pub name: Option<String>,

    /// Optional contact phone number
    pub phone: Option<String>,
}

impl User {
    /// Creates a new user in the database
    ///
    /// # Errors
    ///
    /// Returns an error if username or email already exists, or the
    /// database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, email, name, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, password_hash, email, name, phone,
                      version, created_at, updated_at
            "#,
        )
        .bind(data.username)
        .bind(data.password_hash)
        .bind(data.email)
        .bind(data.name)
        .bind(data.phone)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, email, name, phone,
                   version, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username (case-insensitive)
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, email, name, phone,
                   version, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email (case-insensitive)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, email, name, phone,
                   version, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}

impl Patchable for User {
    const ENTITY: &'static str = "user";

    const FIELDS: &'static [&'static str] =
        &["username", "password_hash", "email", "name", "phone"];

    fn set_field(&mut self, field: &str, value: &JsonValue) -> Result<(), PatchError> {
        match field {
            "username" => self.username = coerce::string(field, value)?,
            "password_hash" => self.password_hash = coerce::string(field, value)?,
            "email" => self.email = coerce::string(field, value)?,
            "name" => self.name = coerce::opt_string(field, value)?,
            "phone" => self.phone = coerce::opt_string(field, value)?,
            _ => {
                return Err(PatchError::UnknownField {
                    entity: Self::ENTITY,
                    field: field.to_string(),
                })
            }
        }
        Ok(())
    }
}

#[async_trait]
impl PatchTarget for User {
    fn id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    async fn load(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        Self::find_by_id(pool, id).await
    }

    async fn persist(&self, pool: &PgPool) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = $2, password_hash = $3, email = $4, name = $5, phone = $6,
                version = version + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, password_hash, email, name, phone,
                      version, created_at, updated_at
            "#,
        )
        .bind(self.id)
        .bind(&self.username)
        .bind(&self.password_hash)
        .bind(&self.email)
        .bind(&self.name)
        .bind(&self.phone)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    async fn persist_checked(&self, pool: &PgPool) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = $2, password_hash = $3, email = $4, name = $5, phone = $6,
                version = version + 1, updated_at = NOW()
            WHERE id = $1 AND version = $7
            RETURNING id, username, password_hash, email, name, phone,
                      version, created_at, updated_at
            "#,
        )
        .bind(self.id)
        .bind(&self.username)
        .bind(&self.password_hash)
        .bind(&self.email)
        .bind(&self.name)
        .bind(&self.phone)
        .bind(self.version)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}
