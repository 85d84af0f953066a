/// Project endpoints: listings, tech declarations, and tag-filtered search
///
/// # Endpoints
///
/// - `POST /v1/projects` - Create a listing with initial techs
/// - `GET  /v1/projects/:id/techs` - Techs declared by a listing
/// - `POST /v1/projects/:id/techs` - Declare another tech
/// - `GET  /v1/projects/search?techs=a,b&offset=0&size=20` - Tag-filtered,
///   paged search across all listings
///
/// Search uses union semantics: a listing matches if it declares at least
/// one of the requested techs, and appears once however many it matches. An
/// empty tech set matches nothing.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use devmatch_shared::{
    auth::middleware::AuthContext,
    models::{
        project::{CreateProject, Project},
        project_tech::{self, ProjectPage, ProjectTech},
        tech::Tech,
    },
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Default page size for search when none is given
const DEFAULT_PAGE_SIZE: i64 = 20;

/// Upper bound on requested page size
const MAX_PAGE_SIZE: i64 = 100;

/// Project creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Listing title
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,

    /// Optional long-form description
    pub description: Option<String>,

    /// Optional number of open positions
    #[validate(range(min = 1, message = "Headcount must be positive"))]
    pub headcount: Option<i32>,

    /// Techs the project uses, by id
    #[serde(default)]
    pub tech_ids: Vec<Uuid>,
}

/// Tech declaration request
#[derive(Debug, Deserialize)]
pub struct AttachTechRequest {
    /// Tech to declare
    pub tech_id: Uuid,
}

/// Search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Comma-separated tech ids; absent or empty matches nothing
    pub techs: Option<String>,

    /// Number of matches to skip
    pub offset: Option<i64>,

    /// Page size (1–100)
    pub size: Option<i64>,
}

/// Create a project listing
///
/// The listing is owned by the authenticated company. Every tech id given
/// must exist; the associations are written through the join table.
///
/// # Errors
///
/// - `403 Forbidden`: Principal is not a company account
/// - `404 Not Found`: A tech id does not exist
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<Json<Project>> {
    if !auth.is_company() {
        return Err(ApiError::Forbidden(
            "Only company accounts can create projects".to_string(),
        ));
    }
    req.validate()?;

    // Resolve every tech up front so a bad id fails before the insert
    for tech_id in &req.tech_ids {
        Tech::find_by_id(&state.db, *tech_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Tech {} not found", tech_id)))?;
    }

    let project = Project::create(
        &state.db,
        CreateProject {
            company_id: auth.account_id,
            title: req.title,
            description: req.description,
            headcount: req.headcount,
        },
    )
    .await?;

    for tech_id in &req.tech_ids {
        ProjectTech::attach(&state.db, project.id, *tech_id).await?;
    }

    Ok(Json(project))
}

/// Techs declared by a project
pub async fn project_techs(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Tech>>> {
    Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let techs = project_tech::techs_for_project(&state.db, project_id).await?;

    Ok(Json(techs))
}

/// Declare an additional tech on a project
///
/// Idempotent: declaring an already-declared tech is a no-op.
pub async fn attach_tech(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(project_id): Path<Uuid>,
    Json(req): Json<AttachTechRequest>,
) -> ApiResult<Json<Vec<Tech>>> {
    if !auth.is_company() {
        return Err(ApiError::Forbidden(
            "Only company accounts can modify projects".to_string(),
        ));
    }

    Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Tech::find_by_id(&state.db, req.tech_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tech not found".to_string()))?;

    ProjectTech::attach(&state.db, project_id, req.tech_id).await?;

    let techs = project_tech::techs_for_project(&state.db, project_id).await?;

    Ok(Json(techs))
}

/// Tag-filtered, paged project search
///
/// # Endpoint
///
/// ```text
/// GET /v1/projects/search?techs=<uuid>,<uuid>&offset=0&size=20
/// ```
///
/// # Response
///
/// ```json
/// {
///   "items": [ ... up to `size` projects ... ],
///   "total_count": 3
/// }
/// ```
///
/// `total_count` is the full de-duplicated match count, independent of the
/// requested page; an offset past the end yields empty items with the count
/// intact.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed tech id, negative offset, or size
///   outside 1–100
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<ProjectPage>> {
    let tech_ids = parse_tech_ids(params.techs.as_deref())?;

    let offset = params.offset.unwrap_or(0);
    if offset < 0 {
        return Err(ApiError::BadRequest("Offset must be non-negative".to_string()));
    }

    let size = params.size.unwrap_or(DEFAULT_PAGE_SIZE);
    if size < 1 || size > MAX_PAGE_SIZE {
        return Err(ApiError::BadRequest(format!(
            "Size must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }

    let page = project_tech::projects_for_techs_paged(&state.db, &tech_ids, size, offset).await?;

    Ok(Json(page))
}

fn parse_tech_ids(raw: Option<&str>) -> Result<Vec<Uuid>, ApiError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Uuid>()
                .map_err(|_| ApiError::BadRequest(format!("Invalid tech id: {}", s)))
        })
        .collect()
}
