/// Technology tag endpoints
///
/// # Endpoints
///
/// - `GET  /v1/techs` - List all tags
/// - `POST /v1/techs` - Create a tag

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use devmatch_shared::{auth::middleware::AuthContext, models::tech::Tech};
use serde::Deserialize;
use validator::Validate;

/// Tech creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTechRequest {
    /// Tag name
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
}

/// List all tech tags, alphabetically
pub async fn list_techs(State(state): State<AppState>) -> ApiResult<Json<Vec<Tech>>> {
    let techs = Tech::list(&state.db).await?;

    Ok(Json(techs))
}

/// Create a tech tag
///
/// # Errors
///
/// - `409 Conflict`: A tag with that name already exists
pub async fn create_tech(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
    Json(req): Json<CreateTechRequest>,
) -> ApiResult<Json<Tech>> {
    req.validate()?;

    if Tech::find_by_name(&state.db, &req.name).await?.is_some() {
        return Err(ApiError::Conflict("Tech already exists".to_string()));
    }

    let tech = Tech::create(&state.db, &req.name).await?;

    Ok(Json(tech))
}
