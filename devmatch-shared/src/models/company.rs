/// Company model and database operations
///
/// A company is a recruiting account: it owns project listings and registers
/// estimates for users. Username, email, and name are each unique across all
/// companies; registration checks them up front and the unique indexes are
/// the final word.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE companies (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username CITEXT NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     email CITEXT NOT NULL UNIQUE,
///     name VARCHAR(255) NOT NULL UNIQUE,
///     phone VARCHAR(32),
///     version BIGINT NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use devmatch_shared::models::company::{Company, CreateCompany};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let company = Company::create(&pool, CreateCompany {
///     username: "acme".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     email: "hr@acme.example".to_string(),
///     name: "Acme Corp".to_string(),
///     phone: None,
/// }).await?;
///
/// let found = Company::find_by_username(&pool, "acme").await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

use crate::patch::{coerce, PatchError, PatchTarget, Patchable};

/// Company model representing a recruiting account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    /// Unique company ID (UUID v4)
    pub id: Uuid,

    /// Login username (case-insensitive via CITEXT, unique)
    pub username: String,

    /// Argon2id password hash, never plaintext
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Contact email (case-insensitive, unique)
    pub email: String,

    /// Registered company name (unique)
    pub name: String,

    /// Optional contact phone number
    pub phone: Option<String>,

    /// Write counter, checked by optimistic patch persists
    pub version: i64,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompany {
    /// Login username
    pub username: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    /// Contact email
    pub email: String,

    /// Registered company name
    pub name: String,

    /// Optional contact phone number
    pub phone: Option<String>,
}

impl Company {
    /// Creates a new company in the database
    ///
    /// # Errors
    ///
    /// Returns an error if username, email, or name already exists (unique
    /// constraint violation) or the database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateCompany) -> Result<Self, sqlx::Error> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (username, password_hash, email, name, phone)
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

        Ok(company)
    }

    /// Finds a company by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, username, password_hash, email, name, phone,
                   version, created_at, updated_at
            FROM companies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(company)
    }

    /// Finds a company by username (case-insensitive)
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, username, password_hash, email, name, phone,
                   version, created_at, updated_at
            FROM companies
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(company)
    }

    /// Finds a company by email (case-insensitive)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, username, password_hash, email, name, phone,
                   version, created_at, updated_at
            FROM companies
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(company)
    }

    /// Finds a company by its registered name (case-sensitive)
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, username, password_hash, email, name, phone,
                   version, created_at, updated_at
            FROM companies
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(company)
    }
}

impl Patchable for Company {
    const ENTITY: &'static str = "company";

    const FIELDS: &'static [&'static str] =
        &["username", "password_hash", "email", "name", "phone"];

    fn set_field(&mut self, field: &str, value: &JsonValue) -> Result<(), PatchError> {
        match field {
            "username" => self.username = coerce::string(field, value)?,
            "password_hash" => self.password_hash = coerce::string(field, value)?,
            "email" => self.email = coerce::string(field, value)?,
            "name" => self.name = coerce::string(field, value)?,
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
impl PatchTarget for Company {
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
        let company = sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
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

        Ok(company)
    }

    async fn persist_checked(&self, pool: &PgPool) -> Result<Option<Self>, sqlx::Error> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
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

        Ok(company)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_company() -> Company {
        Company {
            id: Uuid::new_v4(),
            username: "acme".to_string(),
            password_hash: "hash".to_string(),
            email: "hr@acme.example".to_string(),
            name: "Acme Corp".to_string(),
            phone: Some("02-555-0100".to_string()),
            version: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_set_field_changes_only_the_named_field() {
        let mut company = sample_company();
        let before = company.clone();

        company.set_field("email", &json!("jobs@acme.example")).unwrap();

        assert_eq!(company.email, "jobs@acme.example");
        assert_eq!(company.username, before.username);
        assert_eq!(company.name, before.name);
        assert_eq!(company.phone, before.phone);
        assert_eq!(company.password_hash, before.password_hash);
    }

    #[test]
    fn test_set_field_rejects_unknown_field() {
        let mut company = sample_company();
        let err = company.set_field("hometown", &json!("Seoul")).unwrap_err();
        assert!(matches!(err, PatchError::UnknownField { .. }));
    }

    #[test]
    fn test_set_field_rejects_wrong_type() {
        let mut company = sample_company();
        let err = company.set_field("username", &json!(42)).unwrap_err();
        assert!(matches!(err, PatchError::TypeCoercion { .. }));
    }

    #[test]
    fn test_set_field_null_clears_phone() {
        let mut company = sample_company();
        company.set_field("phone", &JsonValue::Null).unwrap();
        assert_eq!(company.phone, None);
    }

    #[test]
    fn test_fields_cover_every_setter_arm() {
        let mut company = sample_company();
        for field in Company::FIELDS {
            let value = json!(format!("value-for-{field}"));
            company.set_field(field, &value).unwrap();
        }
    }

    // Integration tests for database operations are in
    // tests/patch_applier_tests.rs.
}
