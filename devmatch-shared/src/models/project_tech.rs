/// Project↔Tech association and tag-filtered project queries
///
/// The `project_techs` join table realizes the many-to-many association
/// between project listings and technology tags. Its composite primary key
/// keeps a (project, tech) pair unique; [`ProjectTech::attach`] additionally
/// swallows duplicate inserts so repeated declarations are idempotent, and
/// the read queries still de-duplicate defensively on their side.
///
/// Loading is always explicit — callers ask for the relation rows or the
/// joined entities they need; nothing is fetched lazily behind the scenes.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE project_techs (
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     tech_id UUID NOT NULL REFERENCES techs(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (project_id, tech_id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use devmatch_shared::models::project_tech::{projects_for_techs_paged, ProjectTech};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, project_id: Uuid, rust_id: Uuid, go_id: Uuid) -> Result<(), sqlx::Error> {
/// ProjectTech::attach(&pool, project_id, rust_id).await?;
///
/// let page = projects_for_techs_paged(&pool, &[rust_id, go_id], 20, 0).await?;
/// println!("{} matching projects, showing {}", page.total_count, page.items.len());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::project::Project;
use super::tech::Tech;

/// Join row linking one project to one tech
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectTech {
    /// Project side of the association
    pub project_id: Uuid,

    /// Tech side of the association
    pub tech_id: Uuid,

    /// When the association was created
    pub created_at: DateTime<Utc>,
}

/// One page of a tag-filtered project search
///
/// `total_count` is the size of the full de-duplicated match set, not the
/// page length, so `total_count >= items.len()` always holds. Both values
/// come from the same repeatable-read snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectPage {
    /// The requested slice of the match set, in stable (project id) order
    pub items: Vec<Project>,

    /// Full de-duplicated match count
    pub total_count: i64,
}

impl ProjectTech {
    /// Declares that a project uses a tech
    ///
    /// Idempotent: attaching an already-attached pair is a no-op. Returns
    /// whether a new association was created.
    ///
    /// # Errors
    ///
    /// Returns an error if the project or tech does not exist (foreign key
    /// violation) or the database is unreachable.
    pub async fn attach(
        pool: &PgPool,
        project_id: Uuid,
        tech_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO project_techs (project_id, tech_id)
            VALUES ($1, $2)
            ON CONFLICT (project_id, tech_id) DO NOTHING
            "#,
        )
        .bind(project_id)
        .bind(tech_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes an association
    ///
    /// Returns whether a row was deleted.
    pub async fn detach(
        pool: &PgPool,
        project_id: Uuid,
        tech_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM project_techs WHERE project_id = $1 AND tech_id = $2",
        )
        .bind(project_id)
        .bind(tech_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists the raw relation rows for a project
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ProjectTech>(
            r#"
            SELECT project_id, tech_id, created_at
            FROM project_techs
            WHERE project_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Lists the raw relation rows matching any of the given techs
    ///
    /// An empty tech set matches nothing and returns immediately.
    pub async fn list_by_techs(
        pool: &PgPool,
        tech_ids: &[Uuid],
    ) -> Result<Vec<Self>, sqlx::Error> {
        if tech_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ProjectTech>(
            r#"
            SELECT project_id, tech_id, created_at
            FROM project_techs
            WHERE tech_id = ANY($1)
            ORDER BY project_id ASC, tech_id ASC
            "#,
        )
        .bind(tech_ids)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}

/// All techs declared by a project, in stable (name) order
pub async fn techs_for_project(pool: &PgPool, project_id: Uuid) -> Result<Vec<Tech>, sqlx::Error> {
    let techs = sqlx::query_as::<_, Tech>(
        r#"
        SELECT t.id, t.name, t.created_at
        FROM project_techs pt
        JOIN techs t ON t.id = pt.tech_id
        WHERE pt.project_id = $1
        ORDER BY t.name ASC
        "#,
    )
    .bind(project_id)
    .fetch_all(pool)
    .await?;

    Ok(techs)
}

/// Every project using at least one of the given techs
///
/// Union semantics across the tech set: a project qualifies by matching any
/// one tech, and appears once no matter how many techs it matches
/// (`SELECT DISTINCT`). An empty tech set matches nothing — there is no
/// match-everything fallback, and no query is issued.
///
/// Results are in stable (project id) order.
pub async fn projects_for_techs(
    pool: &PgPool,
    tech_ids: &[Uuid],
) -> Result<Vec<Project>, sqlx::Error> {
    if tech_ids.is_empty() {
        return Ok(Vec::new());
    }

    let projects = sqlx::query_as::<_, Project>(
        r#"
        SELECT DISTINCT p.id, p.company_id, p.title, p.description, p.headcount,
                        p.version, p.created_at, p.updated_at
        FROM project_techs pt
        JOIN projects p ON p.id = pt.project_id
        WHERE pt.tech_id = ANY($1)
        ORDER BY p.id ASC
        "#,
    )
    .bind(tech_ids)
    .fetch_all(pool)
    .await?;

    Ok(projects)
}

/// Paged variant of [`projects_for_techs`]
///
/// Same matching semantics; `items` is the offset/limit slice of the full
/// de-duplicated match set and `total_count` is that set's size, computed by
/// a separate `COUNT(DISTINCT ...)` pass. Both passes run inside one
/// `REPEATABLE READ` transaction so they observe the same snapshot and
/// cannot disagree within a call.
///
/// An offset at or past `total_count` yields empty `items` with the count
/// still truthful.
pub async fn projects_for_techs_paged(
    pool: &PgPool,
    tech_ids: &[Uuid],
    limit: i64,
    offset: i64,
) -> Result<ProjectPage, sqlx::Error> {
    if tech_ids.is_empty() {
        return Ok(ProjectPage {
            items: Vec::new(),
            total_count: 0,
        });
    }

    let mut tx = pool.begin().await?;

    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
        .execute(&mut *tx)
        .await?;

    let items = sqlx::query_as::<_, Project>(
        r#"
        SELECT DISTINCT p.id, p.company_id, p.title, p.description, p.headcount,
                        p.version, p.created_at, p.updated_at
        FROM project_techs pt
        JOIN projects p ON p.id = pt.project_id
        WHERE pt.tech_id = ANY($1)
        ORDER BY p.id ASC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(tech_ids)
    .bind(limit)
    .bind(offset)
    .fetch_all(&mut *tx)
    .await?;

    let (total_count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(DISTINCT project_id)
        FROM project_techs
        WHERE tech_id = ANY($1)
        "#,
    )
    .bind(tech_ids)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(ProjectPage { items, total_count })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_page_serializes_count() {
        let page = ProjectPage {
            items: Vec::new(),
            total_count: 3,
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["total_count"], 3);
        assert!(json["items"].as_array().unwrap().is_empty());
    }

    // The query functions require a database; integration tests live in
    // tests/project_query_tests.rs.
}
