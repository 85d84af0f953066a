/// Project listing model and database operations
///
/// A project is a company's recruiting listing. Its technology requirements
/// live in the `project_techs` join table (see
/// [`crate::models::project_tech`]); this module only covers the listing row
/// itself.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     headcount INTEGER,
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

/// Project listing row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID (UUID v4)
    pub id: Uuid,

    /// Owning company
    pub company_id: Uuid,

    /// Listing title
    pub title: String,

    /// Optional long-form description
    pub description: Option<String>,

    /// Optional number of open positions
    pub headcount: Option<i32>,

    /// Write counter, checked by optimistic patch persists
    pub version: i64,

    /// When the listing was created
    pub created_at: DateTime<Utc>,

    /// When the listing was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a project listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Owning company
    pub company_id: Uuid,

    /// Listing title
    pub title: String,

    /// Optional long-form description
    pub description: Option<String>,

    /// Optional number of open positions
    pub headcount: Option<i32>,
}

impl Project {
    /// Creates a project listing
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (company_id, title, description, headcount)
            VALUES ($1, $2, $3, $4)
            RETURNING id, company_id, title, description, headcount,
                      version, created_at, updated_at
            "#,
        )
        .bind(data.company_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.headcount)
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, company_id, title, description, headcount,
                   version, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Lists a company's projects, newest first
    pub async fn list_by_company(
        pool: &PgPool,
        company_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, company_id, title, description, headcount,
                   version, created_at, updated_at
            FROM projects
            WHERE company_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }
}

impl Patchable for Project {
    const ENTITY: &'static str = "project";

    const FIELDS: &'static [&'static str] = &["title", "description", "headcount"];

    fn set_field(&mut self, field: &str, value: &JsonValue) -> Result<(), PatchError> {
        match field {
            "title" => self.title = coerce::string(field, value)?,
            "description" => self.description = coerce::opt_string(field, value)?,
            "headcount" => self.headcount = coerce::opt_int(field, value)?,
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
impl PatchTarget for Project {
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
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET title = $2, description = $3, headcount = $4,
                version = version + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING id, company_id, title, description, headcount,
                      version, created_at, updated_at
            "#,
        )
        .bind(self.id)
        .bind(&self.title)
        .bind(&self.description)
        .bind(self.headcount)
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    async fn persist_checked(&self, pool: &PgPool) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET title = $2, description = $3, headcount = $4,
                version = version + 1, updated_at = NOW()
            WHERE id = $1 AND version = $5
            RETURNING id, company_id, title, description, headcount,
                      version, created_at, updated_at
            "#,
        )
        .bind(self.id)
        .bind(&self.title)
        .bind(&self.description)
        .bind(self.headcount)
        .bind(self.version)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_project() -> Project {
        Project {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            title: "Payments revamp".to_string(),
            description: Some("Rebuild the settlement pipeline".to_string()),
            headcount: Some(3),
            version: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_headcount_coerces_integers() {
        let mut project = sample_project();
        project.set_field("headcount", &json!(7)).unwrap();
        assert_eq!(project.headcount, Some(7));
    }

    #[test]
    fn test_headcount_rejects_strings() {
        let mut project = sample_project();
        let err = project.set_field("headcount", &json!("7")).unwrap_err();
        assert!(matches!(err, PatchError::TypeCoercion { .. }));
    }

    #[test]
    fn test_owner_is_not_patchable() {
        let mut project = sample_project();
        assert!(project
            .set_field("company_id", &json!(Uuid::new_v4().to_string()))
            .is_err());
    }
}
