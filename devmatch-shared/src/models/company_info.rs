/// Company profile model and database operations
///
/// A company's public profile: CEO, address, business registration details.
/// Exactly one profile row exists per company (`company_id` is unique), and
/// the profile is the primary target of the partial-update applier — the
/// original platform edits it one field at a time from an admin form.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE company_infos (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     company_id UUID NOT NULL UNIQUE REFERENCES companies(id) ON DELETE CASCADE,
///     ceo VARCHAR(255) NOT NULL,
///     address VARCHAR(512) NOT NULL,
///     company_call VARCHAR(32),
///     registration_number VARCHAR(64),
///     registration_file VARCHAR(512),
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

/// Company profile row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CompanyInfo {
    /// Unique profile ID (UUID v4)
    pub id: Uuid,

    /// Owning company (one profile per company)
    pub company_id: Uuid,

    /// CEO name
    pub ceo: String,

    /// Registered business address
    pub address: String,

    /// Optional switchboard number
    pub company_call: Option<String>,

    /// Optional business registration number
    pub registration_number: Option<String>,

    /// Optional URL of the uploaded registration document
    pub registration_file: Option<String>,

    /// Write counter, checked by optimistic patch persists
    pub version: i64,

    /// When the profile was created
    pub created_at: DateTime<Utc>,

    /// When the profile was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a company profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompanyInfo {
    /// Owning company
    pub company_id: Uuid,

    /// CEO name
    pub ceo: String,

    /// Registered business address
    pub address: String,

    /// Optional switchboard number
    pub company_call: Option<String>,

    /// Optional business registration number
    pub registration_number: Option<String>,

    /// Optional URL of the uploaded registration document
    pub registration_file: Option<String>,
}

impl CompanyInfo {
    /// Creates a company profile
    ///
    /// # Errors
    ///
    /// Returns an error if the company already has a profile (unique
    /// constraint on `company_id`) or the company does not exist (foreign
    /// key violation).
    pub async fn create(pool: &PgPool, data: CreateCompanyInfo) -> Result<Self, sqlx::Error> {
        let info = sqlx::query_as::<_, CompanyInfo>(
            r#"
            INSERT INTO company_infos
                (company_id, ceo, address, company_call, registration_number, registration_file)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, company_id, ceo, address, company_call, registration_number,
                      registration_file, version, created_at, updated_at
            "#,
        )
        .bind(data.company_id)
        .bind(data.ceo)
        .bind(data.address)
        .bind(data.company_call)
        .bind(data.registration_number)
        .bind(data.registration_file)
        .fetch_one(pool)
        .await?;

        Ok(info)
    }

    /// Finds a profile by its own ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let info = sqlx::query_as::<_, CompanyInfo>(
            r#"
            SELECT id, company_id, ceo, address, company_call, registration_number,
                   registration_file, version, created_at, updated_at
            FROM company_infos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(info)
    }

    /// Finds the profile belonging to a company
    pub async fn find_by_company_id(
        pool: &PgPool,
        company_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let info = sqlx::query_as::<_, CompanyInfo>(
            r#"
            SELECT id, company_id, ceo, address, company_call, registration_number,
                   registration_file, version, created_at, updated_at
            FROM company_infos
            WHERE company_id = $1
            "#,
        )
        .bind(company_id)
        .fetch_optional(pool)
        .await?;

        Ok(info)
    }
}

impl Patchable for CompanyInfo {
    const ENTITY: &'static str = "company profile";

    const FIELDS: &'static [&'static str] = &[
        "ceo",
        "address",
        "company_call",
        "registration_number",
        "registration_file",
    ];

    fn set_field(&mut self, field: &str, value: &JsonValue) -> Result<(), PatchError> {
        match field {
            "ceo" => self.ceo = coerce::string(field, value)?,
            "address" => self.address = coerce::string(field, value)?,
            "company_call" => self.company_call = coerce::opt_string(field, value)?,
            "registration_number" => self.registration_number = coerce::opt_string(field, value)?,
            "registration_file" => self.registration_file = coerce::opt_string(field, value)?,
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
impl PatchTarget for CompanyInfo {
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
        let info = sqlx::query_as::<_, CompanyInfo>(
            r#"
            UPDATE company_infos
            SET ceo = $2, address = $3, company_call = $4, registration_number = $5,
                registration_file = $6, version = version + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING id, company_id, ceo, address, company_call, registration_number,
                      registration_file, version, created_at, updated_at
            "#,
        )
        .bind(self.id)
        .bind(&self.ceo)
        .bind(&self.address)
        .bind(&self.company_call)
        .bind(&self.registration_number)
        .bind(&self.registration_file)
        .fetch_one(pool)
        .await?;

        Ok(info)
    }

    async fn persist_checked(&self, pool: &PgPool) -> Result<Option<Self>, sqlx::Error> {
        let info = sqlx::query_as::<_, CompanyInfo>(
            r#"
            UPDATE company_infos
            SET ceo = $2, address = $3, company_call = $4, registration_number = $5,
                registration_file = $6, version = version + 1, updated_at = NOW()
            WHERE id = $1 AND version = $7
            RETURNING id, company_id, ceo, address, company_call, registration_number,
                      registration_file, version, created_at, updated_at
            "#,
        )
        .bind(self.id)
        .bind(&self.ceo)
        .bind(&self.address)
        .bind(&self.company_call)
        .bind(&self.registration_number)
        .bind(&self.registration_file)
        .bind(self.version)
        .fetch_optional(pool)
        .await?;

        Ok(info)
    }
}
